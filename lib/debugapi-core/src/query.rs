use indexmap::IndexMap;
use url::form_urlencoded;

use crate::error::{BuildError, ParamLocation};
use crate::param::Param;

/// Encodes the transformed query values as an `application/x-www-form-urlencoded` string.
///
/// Keys follow the declaration order of `params`. An absent optional parameter is
/// omitted entirely; an absent required parameter fails with
/// [`BuildError::MissingRequiredParam`].
pub(crate) fn encode_query(
    template: &str,
    params: &[Param],
    values: &IndexMap<String, String>,
) -> Result<String, BuildError> {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for param in params {
        match values.get(param.name()) {
            Some(value) => {
                serializer.append_pair(param.name(), value);
            }
            None if param.is_required() => {
                return Err(BuildError::MissingRequiredParam {
                    location: ParamLocation::Query,
                    template: template.to_string(),
                    name: param.name().to_string(),
                });
            }
            None => {}
        }
    }
    Ok(serializer.finish())
}
