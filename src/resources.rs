// ABOUTME: Shared server resource container injected into all route handlers
// ABOUTME: Bundles database, auth manager, LLM provider, and configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 taskchat contributors

//! # Server Resources
//!
//! One container, built once at startup and shared behind an `Arc`, so every
//! handler sees the same database pool, auth manager, and LLM provider. Tests
//! build the same container with an in-memory database and a fake provider.

use std::sync::Arc;

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::Database;
use crate::llm::LlmProvider;

/// Container for all shared server resources
pub struct ServerResources {
    /// Database connection pool
    pub database: Database,
    /// JWT issuing and validation
    pub auth_manager: AuthManager,
    /// Chat completion backend driving the agent loop
    pub llm: Arc<dyn LlmProvider>,
    /// Server configuration
    pub config: ServerConfig,
}

impl ServerResources {
    /// Create a new resource container.
    #[must_use]
    pub fn new(
        database: Database,
        auth_manager: AuthManager,
        llm: Arc<dyn LlmProvider>,
        config: ServerConfig,
    ) -> Self {
        Self {
            database,
            auth_manager,
            llm,
            config,
        }
    }
}
