use tokio::fs::File;

/// HTTP status codes the server can answer with.
///
/// - `Ok` (200): File found, body follows
/// - `MovedPermanently` (301): Fixed redirect route
/// - `BadRequest` (400): Malformed or non-GET request line
/// - `NotFound` (404): No such file under the document root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 301 Moved Permanently
    MovedPermanently,
    /// 400 Bad request
    BadRequest,
    /// 404 Not Found
    NotFound,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use turnstile::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::MovedPermanently => 301,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
        }
    }

    /// Returns the reason phrase written on the status line.
    ///
    /// These are the exact phrases clients of this server have always seen,
    /// including the lowercase "request" in the 400 phrase.
    ///
    /// # Example
    ///
    /// ```
    /// # use turnstile::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad request");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::MovedPermanently => "Moved Permanently",
            StatusCode::BadRequest => "Bad request",
            StatusCode::NotFound => "Not Found",
        }
    }
}

/// What the connection should send back for one request.
///
/// Produced by dispatch, consumed by [`ResponseWriter`](crate::http::writer::ResponseWriter).
#[derive(Debug)]
pub enum ResponseOutcome {
    /// 200 with headers and a body streamed from `body`
    Ok {
        content_type: &'static str,
        content_length: u64,
        body: File,
    },
    /// 301; `location` is only written when configured
    Redirect { location: Option<String> },
    NotFound,
    BadRequest,
}

impl ResponseOutcome {
    pub fn status(&self) -> StatusCode {
        match self {
            ResponseOutcome::Ok { .. } => StatusCode::Ok,
            ResponseOutcome::Redirect { .. } => StatusCode::MovedPermanently,
            ResponseOutcome::NotFound => StatusCode::NotFound,
            ResponseOutcome::BadRequest => StatusCode::BadRequest,
        }
    }
}
