// ABOUTME: HTTP route handlers grouped by domain into axum routers
// ABOUTME: Shared per-request authentication helpers live here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 taskchat contributors

//! # HTTP Routes
//!
//! One router per domain, merged in the server binary. Handlers authenticate
//! per request from the `Authorization` header; tenant-scoped routes
//! additionally require the path user id to match the token subject.

pub mod auth;
pub mod chat;
pub mod health;
pub mod tasks;

use axum::http::HeaderMap;
use axum::Router;
use std::sync::Arc;

use crate::auth::AuthenticatedUser;
use crate::errors::{AppError, AppResult};
use crate::resources::ServerResources;

/// Build the complete application router.
///
/// Middleware layers (CORS, request tracing) are applied by the binary; tests
/// drive this router directly.
#[must_use]
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(health::router())
        .merge(auth::router(resources.clone()))
        .merge(tasks::router(resources.clone()))
        .merge(chat::router(resources))
}

/// Authenticate the request and enforce that the caller owns the path tenant.
///
/// # Errors
///
/// Returns an auth error for missing/invalid credentials and a
/// permission-denied error when the path user id is not the token subject.
pub(crate) fn authorize_tenant(
    resources: &ServerResources,
    headers: &HeaderMap,
    path_user_id: i64,
) -> AppResult<AuthenticatedUser> {
    let authorization = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok());
    let user = resources.auth_manager.authenticate(authorization)?;

    if user.user_id != path_user_id {
        return Err(AppError::permission_denied(
            "Access denied: user_id mismatch",
        ));
    }

    Ok(user)
}
