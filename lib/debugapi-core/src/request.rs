use std::net::Ipv6Addr;

use http::uri::Scheme;
use serde::Serialize;
use url::Url;

use crate::endpoint::EndpointMethod;

/// A fully-resolved request, ready to be executed by an HTTP client.
///
/// `path` never contains placeholder syntax and `query` is an
/// `application/x-www-form-urlencoded` string without the leading `?` (empty when
/// there is no query parameter).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Request {
    /// The HTTP method.
    pub method: EndpointMethod,
    /// The target host name or IP address.
    pub host: String,
    /// The target port.
    pub port: u16,
    /// The resolved path.
    pub path: String,
    /// The encoded query string.
    pub query: String,
}

impl Request {
    /// The `host:port` authority, IPv6 addresses being bracketed.
    pub fn authority(&self) -> String {
        let Self { host, port, .. } = self;
        if host.parse::<Ipv6Addr>().is_ok() {
            format!("[{host}]:{port}")
        } else {
            format!("{host}:{port}")
        }
    }

    /// The path followed by `?query` when the query is not empty.
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }

    /// The absolute URL of this request.
    ///
    /// The authority always comes from `host` and `port`: the path is set as-is, never
    /// resolved as a reference, so a path starting with `//` stays a path.
    ///
    /// # Errors
    ///
    /// Returns a [`url::ParseError`] if the host is not a valid URL host.
    pub fn url(&self, scheme: &Scheme) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&format!("{scheme}://{}", self.authority()))?;
        url.set_path(&self.path);
        url.set_query((!self.query.is_empty()).then_some(self.query.as_str()));
        Ok(url)
    }

    /// Converts into an [`http::Request`] with an empty body.
    ///
    /// # Errors
    ///
    /// Returns an [`http::Error`] if the authority or the path cannot form a URI.
    pub fn to_http(&self, scheme: Scheme) -> Result<http::Request<()>, http::Error> {
        let uri = http::Uri::builder()
            .scheme(scheme)
            .authority(self.authority())
            .path_and_query(self.path_and_query())
            .build()?;

        http::Request::builder()
            .method(http::Method::from(self.method))
            .uri(uri)
            .body(())
    }
}
