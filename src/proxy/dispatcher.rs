//! Per-request dispatch
//!
//! The dispatcher is the single entry point bound to the listening
//! address: it asks the pool for the next peer and forwards the request
//! through that peer's handle, or fails closed with a 503.

use crate::http::request::Request;
use crate::http::response::Response;
use crate::proxy::forwarder;
use crate::proxy::pool::ServerPool;

pub struct Dispatcher {
    pool: ServerPool,
}

impl Dispatcher {
    pub fn new(pool: ServerPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &ServerPool {
        &self.pool
    }

    /// Handle one inbound request: select a peer, forward, relay.
    ///
    /// When no alive peer is available the client gets a fixed 503. A
    /// transport failure during forwarding is relayed as the forwarder's
    /// default error response; there is no retry against another backend.
    pub async fn dispatch(&self, request: &Request) -> Response {
        let Some(backend) = self.pool.select_next() else {
            return Response::service_unavailable();
        };

        tracing::debug!(
            backend = backend.display_name(),
            method = %request.method,
            path = %request.path,
            "Forwarding request to backend"
        );

        match backend.forward(request).await {
            Ok(response) => {
                tracing::info!(
                    backend = backend.display_name(),
                    status = response.status,
                    method = %request.method,
                    path = %request.path,
                    "Request forwarded"
                );
                response
            }
            Err(e) => {
                tracing::warn!(
                    backend = backend.display_name(),
                    error = %e,
                    method = %request.method,
                    path = %request.path,
                    "Failed to forward request to backend"
                );
                forwarder::error_response(&e)
            }
        }
    }
}
