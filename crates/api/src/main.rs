use std::sync::Arc;

use anyhow::Context;

use stockdesk_api::app::{build_app, AppServices};
use stockdesk_api::config::ApiConfig;
use stockdesk_infra::Seed;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::from_env()?;
    stockdesk_observability::init_with(config.log_format);

    if config.uses_dev_secret() {
        tracing::warn!("JWT_SECRET not set; using insecure dev default");
    }

    let services = match &config.seed_file {
        Some(path) => {
            let seed = Seed::from_path(path)
                .with_context(|| format!("loading seed file {}", path.display()))?;
            AppServices::from_seed(&seed)?
        }
        None => AppServices::in_memory(),
    }
    .with_invoice_due_days(config.invoice_due_days)
    .with_autocomplete_limit(config.autocomplete_limit);

    let app = build_app(config.jwt_secret.clone(), Arc::new(services));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
