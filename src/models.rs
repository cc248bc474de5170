// ABOUTME: Domain models shared across database, tools, and HTTP layers
// ABOUTME: Defines User, Task, Conversation, and Message records plus validation bounds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 taskchat contributors

//! Core domain models.
//!
//! Records mirror the SQLite schema one-to-one. Every tenant-scoped record
//! carries the owning `user_id`; queries always filter on it.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length of a task title
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum length of a task description
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// Maximum length of a chat message
pub const MAX_MESSAGE_LEN: usize = 5000;

/// A registered user account
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID
    pub id: i64,
    /// Email address (unique)
    pub email: String,
    /// Bcrypt password hash; never serialized to clients
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Display name
    pub display_name: String,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// A todo item owned by exactly one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique task ID
    pub id: i64,
    /// Owning user ID
    pub user_id: i64,
    /// Task title (non-empty, bounded)
    pub title: String,
    /// Task description (bounded, defaults to empty)
    pub description: String,
    /// Completion flag
    pub completed: bool,
    /// When the task was created
    pub created_at: DateTime<Utc>,
    /// When the task was last mutated
    pub updated_at: DateTime<Utc>,
}

/// Completion-status filter for task listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    /// All tasks regardless of completion
    #[default]
    All,
    /// Tasks with `completed = false`
    Pending,
    /// Tasks with `completed = true`
    Completed,
}

impl StatusFilter {
    /// The completion flag implied by this filter, if any
    #[must_use]
    pub const fn completed_flag(&self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::Pending => Some(false),
            Self::Completed => Some(true),
        }
    }
}

/// A chat conversation: an ordered container for messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique conversation ID
    pub id: i64,
    /// Owning user ID
    pub user_id: i64,
    /// When the conversation was created
    pub created_at: DateTime<Utc>,
    /// When the last turn completed
    pub updated_at: DateTime<Utc>,
}

/// A single persisted chat message. Append-only; never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: i64,
    /// Conversation this message belongs to
    pub conversation_id: i64,
    /// Owning user ID
    pub user_id: i64,
    /// Sender role: `user` or `assistant`
    pub role: String,
    /// Message content
    pub content: String,
    /// When the message was created; the authoritative transcript order
    pub created_at: DateTime<Utc>,
}

/// Validate a task title against the schema bounds.
///
/// # Errors
///
/// Returns an invalid-input error if the title is blank or too long.
pub fn validate_title(title: &str) -> AppResult<()> {
    if title.trim().is_empty() {
        return Err(AppError::invalid_input("Task title must not be empty"));
    }
    if title.len() > MAX_TITLE_LEN {
        return Err(AppError::invalid_input(format!(
            "Task title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate a task description against the schema bounds.
///
/// # Errors
///
/// Returns an invalid-input error if the description is too long.
pub fn validate_description(description: &str) -> AppResult<()> {
    if description.len() > MAX_DESCRIPTION_LEN {
        return Err(AppError::invalid_input(format!(
            "Task description must be at most {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate a chat message against the schema bounds.
///
/// # Errors
///
/// Returns an invalid-input error if the message is blank or too long.
pub fn validate_message(message: &str) -> AppResult<()> {
    if message.trim().is_empty() {
        return Err(AppError::invalid_input("Message must not be empty"));
    }
    if message.len() > MAX_MESSAGE_LEN {
        return Err(AppError::invalid_input(format!(
            "Message must be at most {MAX_MESSAGE_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_filter_flags() {
        assert_eq!(StatusFilter::All.completed_flag(), None);
        assert_eq!(StatusFilter::Pending.completed_flag(), Some(false));
        assert_eq!(StatusFilter::Completed.completed_flag(), Some(true));
    }

    #[test]
    fn test_status_filter_deserializes_lowercase() {
        let filter: StatusFilter = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(filter, StatusFilter::Pending);
    }

    #[test]
    fn test_validate_title_bounds() {
        assert!(validate_title("Buy milk").is_ok());
        assert!(validate_title("   ").is_err());
        assert!(validate_title(&"x".repeat(MAX_TITLE_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_message_bounds() {
        assert!(validate_message("hello").is_ok());
        assert!(validate_message("").is_err());
        assert!(validate_message(&"x".repeat(MAX_MESSAGE_LEN + 1)).is_err());
    }

    #[test]
    fn test_user_serialization_hides_password_hash() {
        let user = User {
            id: 1,
            email: "a@example.com".to_owned(),
            password_hash: "$2b$12$hash".to_owned(),
            display_name: "A".to_owned(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
    }
}
