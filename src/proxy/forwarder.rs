//! Single-host request forwarding
//!
//! A `Forwarder` is bound to one backend URL at construction and forwards
//! HTTP/1.1 requests to it: scheme, host, and port are replaced with the
//! backend's, path and query are preserved.

use crate::http::request::Request;
use crate::http::response::{Response, ResponseBuilder};
use anyhow::{Context, Result};
use bytes::{Buf, BytesMut};
use std::collections::HashMap;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Default buffer size for streaming
const BUFFER_SIZE: usize = 8192;

/// Upper bound on upstream response headers.
const MAX_HEADER_BYTES: usize = 64 * 1024;

/// Forwarding handle bound to a single backend.
#[derive(Debug)]
pub struct Forwarder {
    /// "host:port" to connect to.
    addr: String,

    /// Host header value sent upstream.
    host_header: String,

    /// Connection timeout duration
    connect_timeout: Duration,

    /// Request timeout duration
    request_timeout: Duration,
}

impl Forwarder {
    /// Bind a forwarder to a backend URL, precomputing the connect
    /// address and Host header.
    pub fn new(url: &url::Url, connect_timeout: Duration, request_timeout: Duration) -> Result<Self> {
        let host = url.host_str().context("Backend URL missing host")?;
        let port = url.port().unwrap_or(match url.scheme() {
            "https" => 443,
            _ => 80,
        });

        let host_header = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        Ok(Self {
            addr: format!("{}:{}", host, port),
            host_header,
            connect_timeout,
            request_timeout,
        })
    }

    /// Forward a request to the backend and read the full response.
    pub async fn forward(&self, request: &Request) -> Result<Response> {
        let stream = timeout(self.connect_timeout, TcpStream::connect(&self.addr))
            .await
            .context("Connection timeout")?
            .context("Failed to connect to backend")?;

        tracing::trace!(backend = %self.addr, "Connected to backend");

        timeout(
            self.request_timeout,
            self.send_request_and_receive_response(stream, request),
        )
        .await
        .context("Request timeout")?
    }

    async fn send_request_and_receive_response(
        &self,
        mut stream: TcpStream,
        request: &Request,
    ) -> Result<Response> {
        let request_bytes = self.build_http_request(request);
        stream.write_all(&request_bytes).await?;
        stream.flush().await?;

        tracing::trace!("Request sent to backend");

        self.read_http_response(&mut stream).await
    }

    /// Build HTTP request bytes to send to the backend.
    ///
    /// Method, path, and query are forwarded verbatim; the Host header is
    /// rewritten to the backend authority and hop-by-hop headers are
    /// stripped.
    ///
    /// Note: This method is made public for integration testing purposes
    pub fn build_http_request(&self, request: &Request) -> Vec<u8> {
        let mut buffer = Vec::new();

        let path = if request.path.is_empty() {
            "/"
        } else {
            &request.path
        };

        buffer.extend_from_slice(
            format!("{} {} {}\r\n", request.method, path, request.version).as_bytes(),
        );

        let mut headers = request.headers.clone();

        headers.insert("Host".to_string(), self.host_header.clone());

        // Remove hop-by-hop headers
        headers.remove("Connection");
        headers.remove("Keep-Alive");
        headers.remove("Proxy-Connection");
        headers.remove("Transfer-Encoding");
        headers.remove("Upgrade");

        // One upstream connection per request
        headers.insert("Connection".to_string(), "close".to_string());

        for (key, value) in &headers {
            buffer.extend_from_slice(format!("{}: {}\r\n", key, value).as_bytes());
        }

        buffer.extend_from_slice(b"\r\n");

        if !request.body.is_empty() {
            buffer.extend_from_slice(&request.body);
        }

        buffer
    }

    /// Read HTTP response from backend
    async fn read_http_response(&self, stream: &mut TcpStream) -> Result<Response> {
        let mut buffer = BytesMut::with_capacity(BUFFER_SIZE);

        loop {
            let n = stream.read_buf(&mut buffer).await?;

            if n == 0 {
                anyhow::bail!("Connection closed before complete response received");
            }

            // Complete headers end with \r\n\r\n
            if let Some(headers_end) = buffer.windows(4).position(|window| window == b"\r\n\r\n") {
                let headers_bytes = buffer.split_to(headers_end + 4);
                let (status, reason, headers) = parse_response_head(&headers_bytes)?;

                let body = self.read_response_body(stream, &mut buffer, &headers).await?;

                let response = ResponseBuilder::new(status)
                    .reason(reason)
                    .headers(headers)
                    .body(body)
                    .build();

                return Ok(response);
            }

            if buffer.len() > MAX_HEADER_BYTES {
                anyhow::bail!("Response headers too large");
            }
        }
    }

    /// Read response body based on Content-Length
    async fn read_response_body(
        &self,
        stream: &mut TcpStream,
        buffer: &mut BytesMut,
        headers: &HashMap<String, String>,
    ) -> Result<Vec<u8>> {
        let content_length = if let Some(cl) = headers.get("Content-Length") {
            cl.parse::<usize>().unwrap_or(0)
        } else {
            // No Content-Length, read until the backend closes
            let mut body = buffer.to_vec();
            buffer.clear();
            loop {
                let n = stream.read_buf(buffer).await?;
                if n == 0 {
                    break;
                }
                body.extend_from_slice(&buffer[..n]);
                buffer.clear();
            }
            return Ok(body);
        };

        if content_length == 0 {
            return Ok(Vec::new());
        }

        let mut body = Vec::with_capacity(content_length);

        // Use buffered bytes first
        let from_buffer = buffer.len().min(content_length);
        body.extend_from_slice(&buffer[..from_buffer]);
        buffer.advance(from_buffer);

        while body.len() < content_length {
            let remaining = content_length - body.len();
            let to_read = remaining.min(BUFFER_SIZE);

            buffer.resize(to_read, 0);
            let n = stream.read(&mut buffer[..to_read]).await?;

            if n == 0 {
                anyhow::bail!("Connection closed before complete body received");
            }

            body.extend_from_slice(&buffer[..n]);
        }

        Ok(body)
    }
}

/// Parse an upstream status line and headers, preserving the status code
/// and reason phrase verbatim.
fn parse_response_head(headers_bytes: &[u8]) -> Result<(u16, String, HashMap<String, String>)> {
    let headers_str =
        std::str::from_utf8(headers_bytes).context("Invalid UTF-8 in response headers")?;

    let mut lines = headers_str.lines();

    let status_line = lines.next().context("Empty response")?;
    let parts: Vec<&str> = status_line.splitn(3, ' ').collect();

    if parts.len() < 2 {
        anyhow::bail!("Invalid status line: {}", status_line);
    }

    let status: u16 = parts[1].parse().context("Invalid status code")?;
    let reason = parts.get(2).unwrap_or(&"").to_string();

    let mut headers = HashMap::new();
    for line in lines {
        if line.is_empty() {
            break;
        }

        if let Some((key, value)) = line.split_once(':') {
            headers.insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    Ok((status, reason, headers))
}

/// Default translation of a transport failure into a client response.
///
/// This is the forwarding mechanism's own behavior; the dispatcher relays
/// it without interpretation and never retries another backend.
pub fn error_response(error: &anyhow::Error) -> Response {
    let error_str = error.to_string();

    if error_str.contains("timeout") {
        Response::gateway_timeout()
    } else {
        Response::bad_gateway()
    }
}
