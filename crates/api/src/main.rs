use anyhow::Context;

use workforce_api::app::{build_app, services::build_services};
use workforce_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    workforce_observability::init();

    let config = ApiConfig::from_env().context("invalid configuration")?;
    let services = build_services(&config)
        .await
        .context("failed to initialize storage")?;
    let app = build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        backend = config.backend_name(),
        "listening"
    );

    axum::serve(listener, app).await.context("server terminated")?;
    Ok(())
}
