// ABOUTME: Server binary wiring configuration, storage, LLM provider, and routes
// ABOUTME: Parses CLI flags, builds ServerResources, and serves the axum router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 taskchat contributors

//! taskchat server entry point.

use anyhow::{Context, Result};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use clap::Parser;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use taskchat::auth::AuthManager;
use taskchat::config::ServerConfig;
use taskchat::database::Database;
use taskchat::llm::OpenAiCompatibleProvider;
use taskchat::logging;
use taskchat::resources::ServerResources;
use taskchat::routes;

#[derive(Parser)]
#[command(
    name = "taskchat-server",
    about = "Multi-tenant todo backend with LLM tool-calling chat",
    version
)]
struct Args {
    /// HTTP port to listen on (overrides HTTP_PORT)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(port) = args.port {
        config.http_port = port;
    }
    info!("Starting taskchat server: {}", config.summary());

    let database = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    let auth_manager = AuthManager::new(&config.auth);
    let llm = Arc::new(OpenAiCompatibleProvider::new(config.llm.clone())?);

    let resources = Arc::new(ServerResources::new(
        database,
        auth_manager,
        llm,
        config.clone(),
    ));

    let app = routes::router(resources)
        .layer(cors_layer(&config)?)
        .layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on {addr}");

    axum::serve(listener, app)
        .await
        .context("HTTP server failed")?;

    Ok(())
}

fn cors_layer(config: &ServerConfig) -> Result<CorsLayer> {
    let origins = config
        .cors_allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin: {origin}"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]))
}
