// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses environment variables into a typed ServerConfig constructed at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 taskchat contributors

//! Environment-based configuration.
//!
//! All configuration is read once at startup by [`ServerConfig::from_env`] and
//! passed explicitly to the components that need it. There is no global
//! settings singleton.

use anyhow::{Context, Result};
use std::env;

/// Default HTTP port when `HTTP_PORT` is unset
const DEFAULT_HTTP_PORT: u16 = 8081;

/// Default JWT expiry when `TOKEN_EXPIRY_HOURS` is unset
const DEFAULT_TOKEN_EXPIRY_HOURS: i64 = 24;

/// Default OpenAI-compatible endpoint (OpenRouter)
const DEFAULT_LLM_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default chat model
const DEFAULT_LLM_MODEL: &str = "mistralai/mistral-small-3.1-24b-instruct:free";

/// Top-level server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port for the HTTP listener
    pub http_port: u16,
    /// SQLite database URL, e.g. `sqlite:./data/taskchat.db`
    pub database_url: String,
    /// Authentication settings
    pub auth: AuthConfig,
    /// LLM provider settings
    pub llm: LlmConfig,
    /// Origins allowed by the CORS layer
    pub cors_allowed_origins: Vec<String>,
}

/// JWT signing configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 signing secret
    pub jwt_secret: String,
    /// Access token lifetime in hours
    pub token_expiry_hours: i64,
}

/// OpenAI-compatible LLM endpoint configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Base URL of the chat-completions API
    pub base_url: String,
    /// Bearer API key; optional for local servers
    pub api_key: Option<String>,
    /// Model identifier sent with every request
    pub model: String,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable (`DATABASE_URL`, `JWT_SECRET`)
    /// is missing or a numeric variable fails to parse.
    pub fn from_env() -> Result<Self> {
        let http_port = parse_env("HTTP_PORT", DEFAULT_HTTP_PORT)?;
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        let token_expiry_hours = parse_env("TOKEN_EXPIRY_HOURS", DEFAULT_TOKEN_EXPIRY_HOURS)?;

        let llm = LlmConfig {
            base_url: env::var("LLM_BASE_URL").unwrap_or_else(|_| DEFAULT_LLM_BASE_URL.to_owned()),
            api_key: env::var("LLM_API_KEY").ok().filter(|k| !k.is_empty()),
            model: env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_owned()),
        };

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(ToOwned::to_owned)
                    .collect()
            })
            .unwrap_or_else(|_| vec!["http://localhost:3000".to_owned()]);

        Ok(Self {
            http_port,
            database_url,
            auth: AuthConfig {
                jwt_secret,
                token_expiry_hours,
            },
            llm,
            cors_allowed_origins,
        })
    }

    /// One-line startup summary safe for logging (no secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "port={} db={} llm={} model={} cors_origins={}",
            self.http_port,
            self.database_url,
            self.llm.base_url,
            self.llm.model,
            self.cors_allowed_origins.len()
        )
    }
}

/// Parse an environment variable with a default fallback
fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("{name} has an invalid value: {value}")),
        Err(_) => Ok(default),
    }
}
