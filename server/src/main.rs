use std::env;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use collector_corner_cli::{Assembler, Config};
use collector_corner_server::{app, state::AppState};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Config::from_env()?;
    let assembler = Assembler::from_config(&config).context("building HTTP clients")?;
    let mut router = app(AppState::new(assembler, &config.shop_name));

    if let Ok(client_url) = env::var("CLIENT_URL") {
        let origin = client_url
            .parse::<HeaderValue>()
            .with_context(|| format!("CLIENT_URL `{client_url}` is not a valid origin"))?;
        let cors = CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::COOKIE])
            .allow_credentials(true);
        router = router.layer(cors);
    }

    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    info!(addr = %bind_addr, model = %config.model, "newsletter server listening");
    axum::serve(listener, router).await?;
    Ok(())
}
