// ABOUTME: Execution context handed to every tool invocation
// ABOUTME: Carries the enforced owner id and the turn's database session
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 taskchat contributors

//! Tool execution context.

use sqlx::SqliteConnection;

/// Per-invocation context for tool execution.
///
/// The `owner_id` comes from the authenticated request, never from model
/// arguments; tools can only touch that tenant's rows. The session slot
/// borrows the chat turn's open transaction so tool side effects commit or
/// roll back together with the transcript. A context without a session can
/// still be dispatched against, but every tool reports the missing session
/// as an error payload without touching the store.
pub struct ToolContext<'a> {
    /// Authenticated owner whose data the tools operate on
    pub owner_id: i64,
    /// Connection inside the turn's transaction, if one is open
    pub session: Option<&'a mut SqliteConnection>,
}

impl<'a> ToolContext<'a> {
    /// Create a context bound to the turn's transaction.
    pub fn new(owner_id: i64, session: &'a mut SqliteConnection) -> Self {
        Self {
            owner_id,
            session: Some(session),
        }
    }

    /// Create a context with no database session.
    #[must_use]
    pub const fn detached(owner_id: i64) -> Self {
        Self {
            owner_id,
            session: None,
        }
    }
}
