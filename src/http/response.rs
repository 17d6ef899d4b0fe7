use std::collections::HashMap;

/// Represents a complete HTTP response ready to be sent to a client.
///
/// The status code is a plain `u16` so that upstream responses are
/// relayed with their original status and reason phrase, whatever they
/// are, instead of being mapped onto a fixed set.
#[derive(Debug)]
pub struct Response {
    /// The HTTP status code (e.g., 200, 503)
    pub status: u16,
    /// The reason phrase; empty means "use the canonical phrase"
    pub reason: String,
    /// HTTP headers as key-value pairs
    pub headers: HashMap<String, String>,
    /// Response body as bytes
    pub body: Vec<u8>,
}

/// Returns the canonical reason phrase for the status codes this
/// load balancer produces itself. Unknown codes get an empty phrase.
pub fn canonical_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "",
    }
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(200)
///     .header("Content-Type", "application/json")
///     .body(b"{}".to_vec())
///     .build();
/// ```
pub struct ResponseBuilder {
    status: u16,
    reason: String,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            reason: String::new(),
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Sets the reason phrase (used when relaying an upstream status line).
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    /// Adds or replaces a header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Replaces all headers (used when relaying an upstream header set).
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Builds the final Response.
    ///
    /// Automatically adds the Content-Length header based on body size if not already present.
    pub fn build(mut self) -> Response {
        // Auto Content-Length (important)
        self.headers
            .entry("Content-Length".to_string())
            .or_insert_with(|| self.body.len().to_string());

        Response {
            status: self.status,
            reason: self.reason,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    /// The reason phrase to put on the status line.
    pub fn reason_phrase(&self) -> &str {
        if self.reason.is_empty() {
            canonical_reason(self.status)
        } else {
            &self.reason
        }
    }

    /// Creates a 503 Service Unavailable response, sent when no alive
    /// backend can be selected.
    pub fn service_unavailable() -> Self {
        ResponseBuilder::new(503)
            .header("Content-Type", "text/plain")
            .body(b"Service not available".to_vec())
            .build()
    }

    /// Creates a 502 Bad Gateway response for a failed backend connection.
    pub fn bad_gateway() -> Self {
        ResponseBuilder::new(502)
            .header("Content-Type", "text/plain")
            .body(b"502 Bad Gateway\r\n\r\nFailed to connect to backend server.".to_vec())
            .build()
    }

    /// Creates a 504 Gateway Timeout response for a backend that did not
    /// answer in time.
    pub fn gateway_timeout() -> Self {
        ResponseBuilder::new(504)
            .header("Content-Type", "text/plain")
            .body(b"504 Gateway Timeout\r\n\r\nThe backend server did not respond in time.".to_vec())
            .build()
    }
}
