// ABOUTME: Library root for the taskchat multi-tenant todo backend
// ABOUTME: Exposes the agent loop, tool registry, storage, auth, and HTTP routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 taskchat contributors

//! # taskchat
//!
//! Multi-tenant todo backend with a conversational interface. Users manage
//! tasks over REST or through natural-language chat turns that an LLM
//! tool-calling loop translates into task operations. Each chat turn runs in
//! one database transaction, so the transcript and every tool side effect
//! commit or roll back together.

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// The bounded tool-calling conversation loop
pub mod agent;
/// JWT authentication and password hashing
pub mod auth;
/// Environment-based server configuration
pub mod config;
/// SQLite storage for users, tasks, and conversations
pub mod database;
/// Unified error handling
pub mod errors;
/// LLM provider abstraction and OpenAI-compatible implementation
pub mod llm;
/// Structured logging setup
pub mod logging;
/// Domain models and validation bounds
pub mod models;
/// Shared server resource container
pub mod resources;
/// HTTP route handlers
pub mod routes;
/// Task tools executed on behalf of the model
pub mod tools;
