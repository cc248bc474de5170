// ABOUTME: Tool registry executed on behalf of the LLM during chat turns
// ABOUTME: Closed set of task tools dispatched against a transactional session
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 taskchat contributors

//! # Task Tools
//!
//! The closed set of tools the model may invoke during a chat turn. Tools
//! never surface Rust errors to the agent loop; [`registry::dispatch`] is the
//! single boundary that converts every failure, including unknown names and
//! malformed arguments, into a structured JSON result payload the model can
//! read.

pub mod context;
pub mod implementations;
pub mod registry;

pub use context::ToolContext;
pub use registry::{dispatch, ToolKind};
