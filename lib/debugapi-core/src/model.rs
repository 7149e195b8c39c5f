use std::borrow::Cow;
use std::sync::{Arc, LazyLock};

use serde::Serialize;

use crate::transform::Transform;

static TEXT: LazyLock<Arc<ParamModel>> = LazyLock::new(|| Arc::new(ParamModel::new("text")));
static IP: LazyLock<Arc<ParamModel>> =
    LazyLock::new(|| Arc::new(ParamModel::new("ip").with_transform(Transform::ip())));
static INT: LazyLock<Arc<ParamModel>> =
    LazyLock::new(|| Arc::new(ParamModel::new("int").with_transform(Transform::integer())));
static HOST: LazyLock<Arc<ParamModel>> =
    LazyLock::new(|| Arc::new(ParamModel::new("host").with_transform(Transform::ip())));
static DB: LazyLock<Arc<ParamModel>> = LazyLock::new(|| Arc::new(ParamModel::new("db")));
static TABLE: LazyLock<Arc<ParamModel>> = LazyLock::new(|| Arc::new(ParamModel::new("table")));
static TABLE_ID: LazyLock<Arc<ParamModel>> = LazyLock::new(|| {
    Arc::new(ParamModel::new("table_id").with_transform(Transform::integer()))
});

/// A reusable value kind with its canonical validator/normalizer.
///
/// The type tag is what a UI uses to pick an input widget; the transform is applied
/// to every parameter declared with this model. Stock models are process-wide and
/// shared by reference:
///
/// | type       | transform           |
/// |------------|---------------------|
/// | `text`     | none                |
/// | `ip`       | [`Transform::ip`]      |
/// | `int`      | [`Transform::integer`] |
/// | `host`     | [`Transform::ip`]      |
/// | `db`       | none                |
/// | `table`    | none                |
/// | `table_id` | [`Transform::integer`] |
#[derive(Debug, Clone, Serialize)]
pub struct ParamModel {
    #[serde(rename = "type")]
    kind: Cow<'static, str>,
    #[serde(skip)]
    transform: Option<Transform>,
}

impl ParamModel {
    /// Creates a model without transform.
    pub fn new(kind: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind: kind.into(),
            transform: None,
        }
    }

    /// Sets the model transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// The type tag.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The model transform, if any.
    pub fn transform(&self) -> Option<&Transform> {
        self.transform.as_ref()
    }

    /// Free text.
    pub fn text() -> Arc<Self> {
        Arc::clone(&*TEXT)
    }

    /// An IPv4 or IPv6 address.
    pub fn ip() -> Arc<Self> {
        Arc::clone(&*IP)
    }

    /// A base-10 integer.
    pub fn int() -> Arc<Self> {
        Arc::clone(&*INT)
    }

    /// The IP address of a cluster node, picked from the known hosts by a UI.
    ///
    /// Validated like [`ParamModel::ip`]; pair it with [`Transform::append_port`] to
    /// target a node status port.
    pub fn host() -> Arc<Self> {
        Arc::clone(&*HOST)
    }

    /// A database name.
    pub fn db() -> Arc<Self> {
        Arc::clone(&*DB)
    }

    /// A table name.
    pub fn table() -> Arc<Self> {
        Arc::clone(&*TABLE)
    }

    /// A numeric table identifier.
    pub fn table_id() -> Arc<Self> {
        Arc::clone(&*TABLE_ID)
    }

    /// Looks up a stock model by its type tag.
    pub fn from_kind(kind: &str) -> Option<Arc<Self>> {
        let model = match kind {
            "text" => Self::text(),
            "ip" => Self::ip(),
            "int" => Self::int(),
            "host" => Self::host(),
            "db" => Self::db(),
            "table" => Self::table(),
            "table_id" => Self::table_id(),
            _ => return None,
        };
        Some(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_share_stock_models() {
        assert!(Arc::ptr_eq(&ParamModel::ip(), &ParamModel::ip()));
        assert!(Arc::ptr_eq(
            &ParamModel::text(),
            &ParamModel::from_kind("text").unwrap_or_else(ParamModel::db)
        ));
    }

    #[test]
    fn should_validate_with_model_transform() {
        let ip = ParamModel::ip();
        let transform = ip.transform().map(|it| it.apply("not-an-ip"));
        assert!(matches!(transform, Some(Err(_))));

        assert!(ParamModel::text().transform().is_none());
    }

    #[test]
    fn should_validate_host_as_ip() {
        let host = ParamModel::from_kind("host").unwrap_or_else(ParamModel::text);

        assert_eq!(host.kind(), "host");
        let transform = host.transform().expect("host has a transform");
        assert!(transform.apply("10.0.0.1").is_ok());
        assert!(transform.apply("tidb-0").is_err());
    }

    #[test]
    fn should_reject_unknown_kind() {
        assert!(ParamModel::from_kind("uuid").is_none());
    }

    #[test]
    fn should_serialize_type_only() {
        let json = serde_json::to_string(&*ParamModel::table_id()).unwrap_or_default();
        insta::assert_snapshot!(json, @r#"{"type":"table_id"}"#);
    }
}
