//! Composable value transforms.
//!
//! A [`Transform`] is a pure, fallible `&str -> String` function. Transforms validate
//! and normalize the raw string values supplied for endpoint parameters. They are
//! cheap to clone and shared freely between parameters and threads.
//!
//! # Example
//!
//! ```rust
//! use debugapi_core::Transform;
//!
//! let host = Transform::ip().then(Transform::append_port(10080));
//!
//! assert_eq!(host.apply("10.0.0.1").ok().as_deref(), Some("10.0.0.1:10080"));
//! assert!(host.apply("not-an-ip").is_err());
//! ```

use std::borrow::Cow;
use std::fmt::{self, Debug};
use std::net::{IpAddr, Ipv6Addr};
use std::sync::Arc;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::error::TransformError;

/// Characters kept as-is in an escaped path segment (RFC 3986 unreserved set).
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

type TransformFn = dyn Fn(&str) -> Result<String, TransformError> + Send + Sync;

/// A named, fallible string transform.
///
/// The name is only used for diagnostics.
#[derive(Clone)]
pub struct Transform {
    name: Cow<'static, str>,
    func: Arc<TransformFn>,
}

impl Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Transform").field(&self.name).finish()
    }
}

impl Transform {
    /// Wraps a function as a transform.
    pub fn new<F>(name: impl Into<Cow<'static, str>>, func: F) -> Self
    where
        F: Fn(&str) -> Result<String, TransformError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// The diagnostic name of this transform.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Applies the transform to a value.
    ///
    /// # Errors
    ///
    /// Returns the [`TransformError`] produced by the wrapped function.
    pub fn apply(&self, value: &str) -> Result<String, TransformError> {
        (self.func)(value)
    }

    /// Chains two transforms, feeding the output of `self` into `next`.
    #[must_use]
    pub fn then(self, next: Transform) -> Self {
        let name = format!("{}+{}", self.name, next.name);
        Self::new(name, move |value| {
            let value = self.apply(value)?;
            next.apply(&value)
        })
    }

    /// Accepts IPv4 and IPv6 addresses, returning the value unchanged.
    pub fn ip() -> Self {
        Self::new("ip", |value| match value.parse::<IpAddr>() {
            Ok(_) => Ok(value.to_string()),
            Err(_) => Err(TransformError::InvalidIp {
                input: value.to_string(),
            }),
        })
    }

    /// Accepts base-10 integers, returning the value unchanged.
    pub fn integer() -> Self {
        Self::new("integer", |value| match value.parse::<i64>() {
            Ok(_) => Ok(value.to_string()),
            Err(_) => Err(TransformError::InvalidInteger {
                input: value.to_string(),
            }),
        })
    }

    /// Appends a fixed `:port` suffix, bracketing IPv6 addresses.
    pub fn append_port(port: u16) -> Self {
        Self::new(format!("append_port({port})"), move |value| {
            if value.parse::<Ipv6Addr>().is_ok() {
                Ok(format!("[{value}]:{port}"))
            } else {
                Ok(format!("{value}:{port}"))
            }
        })
    }

    /// Substitutes a default when the value is empty.
    pub fn default_value(default: impl Into<String>) -> Self {
        let default = default.into();
        Self::new(format!("default({default})"), move |value| {
            if value.is_empty() {
                Ok(default.clone())
            } else {
                Ok(value.to_string())
            }
        })
    }

    /// Percent-encodes everything outside the unreserved set so the value is a
    /// single safe path segment.
    ///
    /// The dot segments `.` and `..` are rejected: they survive encoding and would be
    /// resolved against the rest of the path.
    pub fn escape_path_segment() -> Self {
        Self::new("escape_path_segment", |value| {
            if matches!(value, "." | "..") {
                return Err(TransformError::rejected(format!(
                    "{value:?} is not a valid path segment"
                )));
            }
            Ok(utf8_percent_encode(value, PATH_SEGMENT).to_string())
        })
    }
}
