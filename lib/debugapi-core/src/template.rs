use std::str::FromStr;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::error::{BuildError, ParamLocation, TemplateError};

/// Valid placeholder names: one or more ASCII word characters.
static NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("a valid regex"));

/// A token of a parsed path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text copied verbatim into the resolved path.
    Literal(String),
    /// A `{name}` placeholder.
    Placeholder(String),
}

/// A URL path with named `{name}` placeholders, tokenized once at definition time.
///
/// The same placeholder may appear several times; every occurrence receives the
/// same value. Values are inserted verbatim: producing path-safe output is the job
/// of the parameter transforms, not of the substitution.
///
/// # Example
///
/// ```rust
/// use debugapi_core::PathTemplate;
///
/// let template = PathTemplate::parse("/stats/dump/{db}/{table}")?;
/// let names: Vec<_> = template.placeholders().collect();
/// assert_eq!(names, ["db", "table"]);
/// # Ok::<(), debugapi_core::TemplateError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("{raw}")]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Tokenizes a path template.
    ///
    /// # Errors
    ///
    /// Returns a [`TemplateError`] for an unbalanced brace or a placeholder name
    /// that is not made of ASCII word characters.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TemplateError> {
        let raw = raw.into();
        let mut segments = Vec::new();
        let mut literal_start = 0;
        let mut rest = raw.char_indices();

        while let Some((offset, ch)) = rest.next() {
            match ch {
                '{' => {
                    let Some(len) = raw.get(offset + 1..).and_then(|tail| tail.find('}')) else {
                        return Err(TemplateError::UnclosedPlaceholder {
                            template: raw.clone(),
                            offset,
                        });
                    };
                    let name = raw.get(offset + 1..offset + 1 + len).unwrap_or_default();
                    if !NAME.is_match(name) {
                        return Err(TemplateError::InvalidPlaceholderName {
                            template: raw.clone(),
                            name: name.to_string(),
                        });
                    }

                    if let Some(literal) = raw.get(literal_start..offset).filter(|it| !it.is_empty())
                    {
                        segments.push(Segment::Literal(literal.to_string()));
                    }
                    segments.push(Segment::Placeholder(name.to_string()));

                    // skip the name and the closing brace, both ASCII
                    literal_start = offset + len + 2;
                    rest.nth(len);
                }
                '}' => {
                    return Err(TemplateError::UnexpectedClosingBrace {
                        template: raw.clone(),
                        offset,
                    });
                }
                _ => {}
            }
        }

        if let Some(literal) = raw.get(literal_start..).filter(|it| !it.is_empty()) {
            segments.push(Segment::Literal(literal.to_string()));
        }

        Ok(Self { raw, segments })
    }

    /// The template as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The literal and placeholder tokens, in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Placeholder names in order of appearance, repeated names included.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Substitutes every placeholder with its value.
    ///
    /// Placeholders are always required: a missing or empty value fails the whole
    /// resolution.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingRequiredParam`] for the first placeholder without
    /// a value.
    pub fn resolve(&self, values: &IndexMap<String, String>) -> Result<String, BuildError> {
        let mut path = String::with_capacity(self.raw.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(literal) => path.push_str(literal),
                Segment::Placeholder(name) => {
                    let Some(value) = values.get(name).filter(|it| !it.is_empty()) else {
                        return Err(BuildError::MissingRequiredParam {
                            location: ParamLocation::Path,
                            template: self.raw.clone(),
                            name: name.clone(),
                        });
                    };
                    path.push_str(value);
                }
            }
        }
        Ok(path)
    }
}

impl FromStr for PathTemplate {
    type Err = TemplateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl Serialize for PathTemplate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn values<const N: usize>(pairs: [(&str, &str); N]) -> IndexMap<String, String> {
        pairs
            .into_iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn should_tokenize_template() {
        let template = PathTemplate::parse("/stats/dump/{db}/{table}").expect("valid template");

        insta::assert_debug_snapshot!(template.segments(), @r#"
        [
            Literal(
                "/stats/dump/",
            ),
            Placeholder(
                "db",
            ),
            Literal(
                "/",
            ),
            Placeholder(
                "table",
            ),
        ]
        "#);
    }

    #[test]
    fn should_tokenize_adjacent_placeholders_and_suffix() {
        let template = PathTemplate::parse("{a}{b}.json").expect("valid template");

        assert_eq!(
            template.segments(),
            [
                Segment::Placeholder("a".to_string()),
                Segment::Placeholder("b".to_string()),
                Segment::Literal(".json".to_string()),
            ]
        );
    }

    #[test]
    fn should_keep_template_without_placeholder_as_single_literal() {
        let template = PathTemplate::parse("/info/all").expect("valid template");

        assert_eq!(template.placeholders().count(), 0);
        assert_eq!(template.resolve(&IndexMap::new()), Ok("/info/all".to_string()));
    }

    #[rstest]
    #[case::unclosed("/schema/{db", "Unclosed placeholder at offset 8 in '/schema/{db'")]
    #[case::stray_close("/schema/db}", "Unexpected '}' at offset 10 in '/schema/db}'")]
    #[case::empty_name("/schema/{}", r#"Invalid placeholder name "" in '/schema/{}'"#)]
    #[case::nested("/a/{b{c}}", r#"Invalid placeholder name "b{c" in '/a/{b{c}}'"#)]
    #[case::dash("/a/{b-c}", r#"Invalid placeholder name "b-c" in '/a/{b-c}'"#)]
    fn should_reject_malformed_templates(#[case] raw: &str, #[case] expected: &str) {
        let error = PathTemplate::parse(raw).expect_err("malformed template");
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn should_resolve_path() {
        let template = PathTemplate::parse("/schema/{db}/{table}").expect("valid template");

        let path = template.resolve(&values([("db", "test"), ("table", "t1")]));

        assert_eq!(path, Ok("/schema/test/t1".to_string()));
    }

    #[test]
    fn should_substitute_every_occurrence() {
        let template =
            PathTemplate::parse("/api/{version}/users/{id}/posts/{id}/comments/{version}")
                .expect("valid template");

        let path = template.resolve(&values([("version", "v1"), ("id", "456")]));

        assert_eq!(path, Ok("/api/v1/users/456/posts/456/comments/v1".to_string()));
    }

    #[test]
    fn should_not_match_name_prefix() {
        let template = PathTemplate::parse("/users/{user_id}/posts/{id}").expect("valid template");

        let path = template.resolve(&values([("id", "1"), ("user_id", "2")]));

        assert_eq!(path, Ok("/users/2/posts/1".to_string()));
    }

    #[test]
    fn should_insert_values_verbatim() {
        let template = PathTemplate::parse("/search/{query}").expect("valid template");

        let path = template.resolve(&values([("query", "a%2Fb")]));

        assert_eq!(path, Ok("/search/a%2Fb".to_string()));
    }

    #[rstest]
    #[case::missing(values([("db", "test")]))]
    #[case::empty(values([("db", "test"), ("table", "")]))]
    fn should_fail_on_missing_placeholder_value(#[case] values: IndexMap<String, String>) {
        let template = PathTemplate::parse("/schema/{db}/{table}").expect("valid template");

        let result = template.resolve(&values);

        assert_eq!(
            result,
            Err(BuildError::MissingRequiredParam {
                location: ParamLocation::Path,
                template: "/schema/{db}/{table}".to_string(),
                name: "table".to_string(),
            })
        );
    }

    #[test]
    fn should_handle_non_ascii_literals() {
        let template = PathTemplate::parse("/é/{id}/ü").expect("valid template");

        let path = template.resolve(&values([("id", "1")]));

        assert_eq!(path, Ok("/é/1/ü".to_string()));
    }

    #[test]
    fn should_display_and_serialize_as_raw_template() {
        let template: PathTemplate = "/db-table/{tableID}".parse().expect("valid template");

        assert_eq!(template.to_string(), "/db-table/{tableID}");
        assert_eq!(
            serde_json::to_string(&template).ok().as_deref(),
            Some(r#""/db-table/{tableID}""#)
        );
    }
}
