use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::error::{BuildError, TransformStage};
use crate::model::ParamModel;
use crate::transform::Transform;

/// Raw, caller-supplied parameter values indexed by parameter name.
///
/// Implemented for the usual map types and for slices/arrays of `(name, value)` pairs
/// (the first matching pair wins).
pub trait ParamValues {
    /// Returns the raw value supplied for `name`.
    fn value(&self, name: &str) -> Option<&str>;
}

impl<K, V, S> ParamValues for HashMap<K, V, S>
where
    K: Borrow<str> + Hash + Eq,
    V: AsRef<str>,
    S: BuildHasher,
{
    fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(|value| value.as_ref())
    }
}

impl<K, V, S> ParamValues for IndexMap<K, V, S>
where
    K: Borrow<str> + Hash + Eq,
    V: AsRef<str>,
    S: BuildHasher,
{
    fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(|value| value.as_ref())
    }
}

impl<K, V> ParamValues for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
    V: AsRef<str>,
{
    fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(|value| value.as_ref())
    }
}

impl<K: AsRef<str>, V: AsRef<str>> ParamValues for [(K, V)] {
    fn value(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(key, _)| key.as_ref() == name)
            .map(|(_, value)| value.as_ref())
    }
}

impl<K: AsRef<str>, V: AsRef<str>, const N: usize> ParamValues for [(K, V); N] {
    fn value(&self, name: &str) -> Option<&str> {
        self.as_slice().value(name)
    }
}

/// One declared path or query parameter of an endpoint.
///
/// # Example
///
/// ```rust
/// use debugapi_core::{Param, ParamModel, Transform};
///
/// let seconds = Param::new("seconds", ParamModel::int())
///     .with_pre_transform(Transform::default_value("10"));
///
/// assert_eq!(seconds.transform(None).ok().flatten().as_deref(), Some("10"));
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Param {
    name: String,
    required: bool,
    model: Arc<ParamModel>,
    #[serde(skip)]
    pre: Option<Transform>,
    #[serde(skip)]
    post: Option<Transform>,
}

impl Param {
    /// Creates an optional parameter.
    pub fn new(name: impl Into<String>, model: Arc<ParamModel>) -> Self {
        Self {
            name: name.into(),
            required: false,
            model,
            pre: None,
            post: None,
        }
    }

    /// Creates a required parameter.
    pub fn required(name: impl Into<String>, model: Arc<ParamModel>) -> Self {
        Self::new(name, model).with_required(true)
    }

    /// Sets the required flag.
    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the transform that runs before the model transform.
    ///
    /// It is the only stage that sees an absent value (as an empty string), so it
    /// can synthesize a default.
    #[must_use]
    pub fn with_pre_transform(mut self, transform: Transform) -> Self {
        self.pre = Some(transform);
        self
    }

    /// Sets the transform that runs after the model transform.
    #[must_use]
    pub fn with_post_transform(mut self, transform: Transform) -> Self {
        self.post = Some(transform);
        self
    }

    /// The parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a query parameter must be present. Path parameters are always required.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The parameter model.
    pub fn model(&self) -> &ParamModel {
        &self.model
    }

    /// Runs the transform pipeline over a raw value.
    ///
    /// Stages run in order: pre-transform, model transform, post-transform. A missing
    /// raw value enters the pipeline as an empty string. As soon as the value is empty
    /// the remaining stages are skipped and the parameter is absent (`Ok(None)`).
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidParam`] naming this parameter and the failing stage.
    pub fn transform(&self, raw: Option<&str>) -> Result<Option<String>, BuildError> {
        let mut value = raw.unwrap_or_default().to_string();

        let stages = [
            (TransformStage::Pre, self.pre.as_ref()),
            (TransformStage::Model, self.model.transform()),
            (TransformStage::Post, self.post.as_ref()),
        ];
        for (stage, transform) in stages {
            if value.is_empty() && stage != TransformStage::Pre {
                break;
            }
            let Some(transform) = transform else {
                continue;
            };
            value = transform
                .apply(&value)
                .map_err(|source| BuildError::InvalidParam {
                    name: self.name.clone(),
                    stage,
                    source,
                })?;
        }

        if value.is_empty() {
            debug!(name = %self.name, supplied = raw.is_some(), "parameter is absent");
            return Ok(None);
        }
        Ok(Some(value))
    }
}

/// Transforms the values of every declared parameter, keeping only present ones.
pub(crate) fn transform_values<V>(
    params: &[Param],
    values: &V,
) -> Result<IndexMap<String, String>, BuildError>
where
    V: ParamValues + ?Sized,
{
    let mut result = IndexMap::with_capacity(params.len());
    for param in params {
        if let Some(value) = param.transform(values.value(param.name()))? {
            result.insert(param.name().to_string(), value);
        }
    }
    Ok(result)
}
