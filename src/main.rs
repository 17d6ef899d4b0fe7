use std::sync::Arc;
use std::time::Duration;

use rotor::config::Config;
use rotor::proxy::{Backend, Dispatcher, ServerPool};
use rotor::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;

    let mut backends = Vec::with_capacity(cfg.backends.len());
    for entry in &cfg.backends {
        let backend = Backend::new(
            entry.clone(),
            Duration::from_secs(cfg.proxy.connect_timeout_secs),
            Duration::from_secs(cfg.proxy.request_timeout_secs),
        )?;
        tracing::info!(url = %entry.url, "Backend registered");
        backends.push(backend);
    }

    let pool = ServerPool::new(backends);
    let dispatcher = Arc::new(Dispatcher::new(pool));

    tokio::select! {
        res = server::listener::run(&cfg.server.listen_addr, dispatcher) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
