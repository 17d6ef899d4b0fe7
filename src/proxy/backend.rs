//! Backend server representation
//!
//! A backend is an upstream target plus a liveness flag and an owned
//! forwarding handle bound to the target URL at construction.

use crate::config::BackendConfig;
use crate::http::request::Request;
use crate::http::response::Response;
use crate::proxy::forwarder::Forwarder;
use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// An upstream server the load balancer can forward requests to.
#[derive(Debug)]
pub struct Backend {
    /// Backend base URL, immutable after construction.
    url: url::Url,

    /// Optional backend name for logging.
    name: Option<String>,

    /// Liveness flag. Selection reads it; only an external health
    /// reporter (or initialization) writes it.
    alive: AtomicBool,

    /// Forwarding handle bound to `url`; stateless and safe for
    /// concurrent use.
    forwarder: Forwarder,
}

impl Backend {
    /// Create a backend from configuration. Fails on a malformed URL,
    /// which aborts startup for the whole backend list.
    pub fn new(
        config: BackendConfig,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self> {
        let url = url::Url::parse(&config.url)
            .with_context(|| format!("Malformed backend URL: {}", config.url))?;

        let forwarder = Forwarder::new(&url, connect_timeout, request_timeout)?;

        Ok(Self {
            url,
            name: config.name,
            alive: AtomicBool::new(true),
            forwarder,
        })
    }

    /// Backend base URL as a string.
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Get a display name for the backend (name or URL)
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.url.as_str())
    }

    /// Current liveness. Safe for unbounded concurrent callers; a
    /// concurrent writer is observed as either the old or new value.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Liveness setter for an external health reporter. The selection
    /// and dispatch paths never call this.
    pub fn set_alive(&self, alive: bool) {
        self.alive.store(alive, Ordering::Release);
    }

    /// Forward a request to this backend and stream the response back.
    ///
    /// Transport failures are returned to the caller untouched; this
    /// component does not interpret or retry them.
    pub async fn forward(&self, request: &Request) -> Result<Response> {
        self.forwarder.forward(request).await
    }
}
