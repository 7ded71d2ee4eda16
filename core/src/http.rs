//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe a request and a response as plain data. The core
//! builds `HttpRequest` values without touching the network; either a
//! `Transport` or the host executes them and hands back an `HttpResponse`.
//!
//! Every request the orders API takes is a POST, so there is no method field.
//! `path` is account-relative (`12345/orders`); the base URL belongs to the
//! transport. All fields use owned types so values can cross the FFI boundary
//! without lifetime concerns.

/// Content type sent with every request body.
pub const JSON_API_CONTENT_TYPE: &str = "application/vnd.api+json";

/// A POST request described as plain data.
///
/// Built by `RequestBuilder::build_*` methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpRequest {
    pub(crate) fn post_json(path: String, body: String) -> Self {
        Self {
            path,
            headers: vec![("content-type".to_string(), JSON_API_CONTENT_TYPE.to_string())],
            body,
        }
    }
}

/// An HTTP response described as plain data.
///
/// Returned by a `Transport`, or constructed by the host after executing an
/// `HttpRequest`, then passed to `normalize`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}
