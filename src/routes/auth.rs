// ABOUTME: Signup and login endpoints issuing JWT access tokens
// ABOUTME: Registers users with bcrypt-hashed passwords and verifies credentials
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 taskchat contributors

//! Authentication routes: `POST /api/auth/signup` and `POST /api/auth/login`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::post;
use axum::Router;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::auth::{hash_password, verify_password};
use crate::errors::{AppError, AppResult};
use crate::models::User;
use crate::resources::ServerResources;

/// Signup request body
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for both signup and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: User,
}

/// Build the auth router
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .with_state(resources)
}

async fn signup(
    State(resources): State<Arc<ServerResources>>,
    Json(request): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    validate_email(&request.email)?;
    if request.password.is_empty() {
        return Err(AppError::invalid_input("Password must not be empty"));
    }

    if resources
        .database
        .get_user_by_email(&request.email)
        .await?
        .is_some()
    {
        return Err(AppError::already_exists("Email already registered"));
    }

    let password_hash = hash_password(&request.password)?;
    let user = resources
        .database
        .create_user(&request.email, &password_hash, &request.name)
        .await?;

    info!(user_id = user.id, "New user registered");

    let access_token = resources.auth_manager.generate_token(&user)?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            access_token,
            token_type: "bearer",
            user,
        }),
    ))
}

async fn login(
    State(resources): State<Arc<ServerResources>>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let Some(user) = resources.database.get_user_by_email(&request.email).await? else {
        return Err(AppError::auth_invalid("Incorrect email or password"));
    };

    if !verify_password(request.password, user.password_hash.clone()).await? {
        return Err(AppError::auth_invalid("Incorrect email or password"));
    }

    let access_token = resources.auth_manager.generate_token(&user)?;
    Ok(Json(AuthResponse {
        access_token,
        token_type: "bearer",
        user,
    }))
}

fn validate_email(email: &str) -> AppResult<()> {
    let valid = email.contains('@') && !email.starts_with('@') && !email.ends_with('@');
    if valid {
        Ok(())
    } else {
        Err(AppError::invalid_input("Invalid email address"))
    }
}
