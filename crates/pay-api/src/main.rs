//! # Payment Gateway
//!
//! Card payment handler served over HTTP.
//!
//! ## Usage
//!
//! ```bash
//! # Secret holding {"api_key": "sk_test_..."}
//! export STRIPE_SECRET_KEY_ARN=arn:aws:secretsmanager:...:secret:stripe
//! export ENVIRONMENT=staging
//!
//! # Run the server
//! payment-gateway
//! ```

use pay_api::config::{GatewayConfig, LogFormat};
use pay_api::{routes, AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = GatewayConfig::from_env()?;

    // Initialize logging
    let (pretty, json) = match config.log_format {
        LogFormat::Pretty => (Some(fmt::layer()), None),
        LogFormat::Json => (None, Some(fmt::layer().json())),
    };
    tracing_subscriber::registry()
        .with(pretty)
        .with(json)
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let addr = config.socket_addr()?;
    info!("Environment: {}", config.environment);

    let state = AppState::from_config(config).await?;
    let app = routes::create_router(state);

    info!("Payment gateway listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
