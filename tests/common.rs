// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides database, resource, user, and scripted LLM provider helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 taskchat contributors

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

//! Shared test utilities for `taskchat` integration tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Once};

use anyhow::Result;
use async_trait::async_trait;

use taskchat::auth::{hash_password, AuthManager};
use taskchat::config::{AuthConfig, LlmConfig, ServerConfig};
use taskchat::database::Database;
use taskchat::errors::AppError;
use taskchat::llm::{
    ChatRequest, ChatResponseWithTools, FunctionDeclaration, LlmProvider, ToolCall,
};
use taskchat::models::User;
use taskchat::resources::ServerResources;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_test_writer()
            .init();
    });
}

/// Standard in-memory test database
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    Ok(Database::new("sqlite::memory:").await?)
}

/// Configuration used by all integration tests
pub fn test_config() -> ServerConfig {
    ServerConfig {
        http_port: 0,
        database_url: "sqlite::memory:".to_owned(),
        auth: AuthConfig {
            jwt_secret: "test-jwt-secret".to_owned(),
            token_expiry_hours: 24,
        },
        llm: LlmConfig {
            base_url: "http://localhost:11434/v1".to_owned(),
            api_key: None,
            model: "fake-model".to_owned(),
        },
        cors_allowed_origins: vec!["http://localhost:3000".to_owned()],
    }
}

/// Build server resources around an in-memory database and the given provider
pub async fn create_test_resources(llm: Arc<dyn LlmProvider>) -> Result<Arc<ServerResources>> {
    let database = create_test_database().await?;
    let config = test_config();
    let auth_manager = AuthManager::new(&config.auth);
    Ok(Arc::new(ServerResources::new(
        database,
        auth_manager,
        llm,
        config,
    )))
}

/// Create a user directly in the store
pub async fn create_test_user(database: &Database, email: &str) -> Result<User> {
    let password_hash = hash_password("password123")?;
    Ok(database.create_user(email, &password_hash, "Test User").await?)
}

/// Bearer header value for a user
pub fn bearer_token(resources: &ServerResources, user: &User) -> String {
    let token = resources.auth_manager.generate_token(user).unwrap();
    format!("Bearer {token}")
}

// ============================================================================
// Scripted LLM Provider
// ============================================================================

/// One scripted provider step
pub enum FakeStep {
    /// Return this response
    Reply(ChatResponseWithTools),
    /// Fail the call with an external-service error
    Fail(String),
}

/// A plain-text final answer
pub fn text_reply(text: &str) -> FakeStep {
    FakeStep::Reply(ChatResponseWithTools {
        content: Some(text.to_owned()),
        tool_calls: None,
        model: "fake-model".to_owned(),
        usage: None,
        finish_reason: Some("stop".to_owned()),
    })
}

/// An assistant frame requesting the given tool calls
pub fn tool_reply(calls: Vec<(&str, &str, serde_json::Value)>) -> FakeStep {
    FakeStep::Reply(ChatResponseWithTools {
        content: None,
        tool_calls: Some(
            calls
                .into_iter()
                .map(|(id, name, arguments)| ToolCall {
                    id: id.to_owned(),
                    name: name.to_owned(),
                    arguments,
                })
                .collect(),
        ),
        model: "fake-model".to_owned(),
        usage: None,
        finish_reason: Some("tool_calls".to_owned()),
    })
}

/// Scripted fake provider: pops one step per call and records every request
pub struct FakeLlm {
    script: Mutex<VecDeque<FakeStep>>,
    /// Every request the agent loop sent, in order
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl FakeLlm {
    pub fn scripted(steps: Vec<FakeStep>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(steps.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Number of completed provider calls
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmProvider for FakeLlm {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn default_model(&self) -> &str {
        "fake-model"
    }

    async fn complete_with_tools(
        &self,
        request: &ChatRequest,
        _tools: &[FunctionDeclaration],
    ) -> Result<ChatResponseWithTools, AppError> {
        self.requests.lock().unwrap().push(request.clone());

        let step = self.script.lock().unwrap().pop_front();
        match step {
            Some(FakeStep::Reply(response)) => Ok(response),
            Some(FakeStep::Fail(message)) => Err(AppError::external_service("FakeLlm", message)),
            None => Err(AppError::external_service("FakeLlm", "script exhausted")),
        }
    }
}
