mod api;
mod auth;
mod middleware;

use tracing_subscriber::EnvFilter;

use bcgw_bigcommerce::{BrandCatalog, ProductCatalog, UpstreamClient};

use crate::{
    api::{build_app, AppState},
    auth::{AuthIssuer, UserStore},
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = bcgw_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let client = UpstreamClient::new(
        &config.bigcommerce_api_url,
        &config.bigcommerce_token,
        config.bigcommerce_timeout_secs,
    )?;

    let store = UserStore::from_config(&config)?;
    let auth = AuthState::from_config(&config, !store.is_empty());
    let state = AppState {
        products: ProductCatalog::new(client.clone()),
        brands: BrandCatalog::new(client),
        issuer: AuthIssuer::new(store, &config),
    };
    let app = build_app(state, auth);

    tracing::info!(addr = %config.bind_addr, env = %config.env, "starting catalog gateway");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
