// ABOUTME: Liveness endpoints for load balancers and uptime checks
// ABOUTME: Serves the API banner at / and a health payload at /health
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 taskchat contributors

//! Health routes: `GET /` and `GET /health`.

use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};

/// Build the health router
pub fn router() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Todo API is running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
