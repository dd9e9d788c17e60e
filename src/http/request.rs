use std::fmt;

use crate::http::parser::ParseError;

/// HTTP request methods.
///
/// Only `GET` is served; any other token on the request line makes the
/// request invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
}

impl Method {
    /// Parses an HTTP method from a string.
    ///
    /// Matching is case-sensitive.
    ///
    /// # Example
    ///
    /// ```
    /// # use turnstile::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("get"), None);
    /// assert_eq!(Method::from_str("POST"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request line that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The HTTP method
    pub method: Method,
    /// The request target, always starting with `/`
    pub path: String,
    /// Protocol token as sent by the client (e.g. "HTTP/1.0"), not validated
    pub version: String,
}

/// Outcome of parsing one request line.
///
/// Malformed input is ordinary traffic, so it is a value here rather than an
/// error: the connection answers it with 400 and closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedRequest {
    Valid(Request),
    Invalid(ParseError),
}

impl ParsedRequest {
    pub fn is_valid(&self) -> bool {
        matches!(self, ParsedRequest::Valid(_))
    }

    /// The validated request, if any.
    pub fn request(&self) -> Option<&Request> {
        match self {
            ParsedRequest::Valid(req) => Some(req),
            ParsedRequest::Invalid(_) => None,
        }
    }

    /// Why the line was rejected, if it was.
    pub fn error(&self) -> Option<&ParseError> {
        match self {
            ParsedRequest::Valid(_) => None,
            ParsedRequest::Invalid(e) => Some(e),
        }
    }
}
