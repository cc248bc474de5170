// ABOUTME: Closed tool registry mapping tool names to typed implementations
// ABOUTME: Dispatch is the single boundary converting all failures to result payloads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 taskchat contributors

//! Tool registry and dispatch.
//!
//! [`ToolKind`] is a closed enum, so the advertised schemas and the dispatch
//! arms cannot drift apart: adding a variant forces both to be updated.

use serde_json::{json, Value};
use tracing::{debug, warn};

use super::context::ToolContext;
use super::implementations;
use crate::llm::FunctionDeclaration;

/// The closed set of tools exposed to the model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    /// Create a new task
    AddTask,
    /// List tasks, optionally filtered by status
    ListTasks,
    /// Update a task's title or description
    UpdateTask,
    /// Delete a task
    DeleteTask,
    /// Toggle a task's completion flag
    CompleteTask,
}

impl ToolKind {
    /// Every tool, in the order advertised to the model
    pub const ALL: [Self; 5] = [
        Self::AddTask,
        Self::ListTasks,
        Self::UpdateTask,
        Self::DeleteTask,
        Self::CompleteTask,
    ];

    /// Resolve a tool by its wire name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "add_task" => Some(Self::AddTask),
            "list_tasks" => Some(Self::ListTasks),
            "update_task" => Some(Self::UpdateTask),
            "delete_task" => Some(Self::DeleteTask),
            "complete_task" => Some(Self::CompleteTask),
            _ => None,
        }
    }

    /// Wire name of this tool
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AddTask => "add_task",
            Self::ListTasks => "list_tasks",
            Self::UpdateTask => "update_task",
            Self::DeleteTask => "delete_task",
            Self::CompleteTask => "complete_task",
        }
    }

    /// Function declaration advertised to the model.
    ///
    /// The owner id is injected server-side and never appears in the schema.
    #[must_use]
    pub fn declaration(&self) -> FunctionDeclaration {
        let (description, parameters) = match self {
            Self::AddTask => (
                "Create a new task for the user",
                json!({
                    "type": "object",
                    "properties": {
                        "title": {
                            "type": "string",
                            "description": "The task title"
                        },
                        "description": {
                            "type": "string",
                            "description": "Optional task description",
                            "default": ""
                        }
                    },
                    "required": ["title"]
                }),
            ),
            Self::ListTasks => (
                "List tasks for the user. Can filter by status: all, pending, or completed",
                json!({
                    "type": "object",
                    "properties": {
                        "status": {
                            "type": "string",
                            "description": "Filter by status: 'all', 'pending', or 'completed'",
                            "enum": ["all", "pending", "completed"],
                            "default": "all"
                        }
                    },
                    "required": []
                }),
            ),
            Self::UpdateTask => (
                "Update a task's title or description",
                json!({
                    "type": "object",
                    "properties": {
                        "task_id": {
                            "type": "integer",
                            "description": "The task ID to update"
                        },
                        "title": {
                            "type": "string",
                            "description": "New title (optional)"
                        },
                        "description": {
                            "type": "string",
                            "description": "New description (optional)"
                        }
                    },
                    "required": ["task_id"]
                }),
            ),
            Self::DeleteTask => (
                "Delete a task",
                json!({
                    "type": "object",
                    "properties": {
                        "task_id": {
                            "type": "integer",
                            "description": "The task ID to delete"
                        }
                    },
                    "required": ["task_id"]
                }),
            ),
            Self::CompleteTask => (
                "Toggle task completion status (mark as done or pending)",
                json!({
                    "type": "object",
                    "properties": {
                        "task_id": {
                            "type": "integer",
                            "description": "The task ID to toggle"
                        }
                    },
                    "required": ["task_id"]
                }),
            ),
        };

        FunctionDeclaration {
            name: self.name().to_owned(),
            description: description.to_owned(),
            parameters,
        }
    }

    /// Declarations for every tool, in advertised order
    #[must_use]
    pub fn declarations() -> Vec<FunctionDeclaration> {
        Self::ALL.iter().map(Self::declaration).collect()
    }
}

/// Execute a tool by name and return its result payload.
///
/// This is the only boundary between tool execution and the agent loop:
/// every failure mode becomes a `{"status": "error", "message": ...}`
/// payload. Unknown names, malformed arguments, missing sessions, and tool
/// errors all stay inside it.
pub async fn dispatch(name: &str, args: Value, ctx: &mut ToolContext<'_>) -> Value {
    let Some(kind) = ToolKind::from_name(name) else {
        warn!(tool = name, "Model requested unknown tool");
        return error_payload(format!("Unknown tool: {name}"));
    };

    let owner_id = ctx.owner_id;
    let Some(session) = ctx.session.as_deref_mut() else {
        return error_payload("Database session is required");
    };

    debug!(tool = name, owner_id, "Executing tool");

    let result = match kind {
        ToolKind::AddTask => match serde_json::from_value(args) {
            Ok(decoded) => implementations::add_task(session, owner_id, decoded).await,
            Err(e) => return decode_error_payload(name, &e),
        },
        ToolKind::ListTasks => match serde_json::from_value(args) {
            Ok(decoded) => implementations::list_tasks(session, owner_id, decoded).await,
            Err(e) => return decode_error_payload(name, &e),
        },
        ToolKind::UpdateTask => match serde_json::from_value(args) {
            Ok(decoded) => implementations::update_task(session, owner_id, decoded).await,
            Err(e) => return decode_error_payload(name, &e),
        },
        ToolKind::DeleteTask => match serde_json::from_value(args) {
            Ok(decoded) => implementations::delete_task(session, owner_id, decoded).await,
            Err(e) => return decode_error_payload(name, &e),
        },
        ToolKind::CompleteTask => match serde_json::from_value(args) {
            Ok(decoded) => implementations::complete_task(session, owner_id, decoded).await,
            Err(e) => return decode_error_payload(name, &e),
        },
    };

    match result {
        Ok(payload) => payload,
        Err(e) => {
            warn!(tool = name, error = %e.message, "Tool failed");
            error_payload(e.message)
        }
    }
}

fn error_payload(message: impl Into<String>) -> Value {
    json!({
        "status": "error",
        "message": message.into(),
    })
}

fn decode_error_payload(name: &str, e: &serde_json::Error) -> Value {
    warn!(tool = name, error = %e, "Invalid tool arguments");
    error_payload(format!("Invalid arguments for {name}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_round_trips() {
        for kind in ToolKind::ALL {
            assert_eq!(ToolKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ToolKind::from_name("make_coffee"), None);
    }

    #[test]
    fn test_declarations_cover_all_tools() {
        let decls = ToolKind::declarations();
        assert_eq!(decls.len(), ToolKind::ALL.len());
        assert_eq!(decls[0].name, "add_task");
        assert!(decls
            .iter()
            .all(|d| d.parameters["type"] == "object"));
    }

    #[test]
    fn test_schemas_never_expose_owner_id() {
        for decl in ToolKind::declarations() {
            let props = decl.parameters["properties"]
                .as_object()
                .expect("object schema");
            assert!(!props.contains_key("user_id"), "{}", decl.name);
        }
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool() {
        let mut ctx = ToolContext::detached(1);
        let payload = dispatch("make_coffee", json!({}), &mut ctx).await;
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["message"], "Unknown tool: make_coffee");
    }

    #[tokio::test]
    async fn test_dispatch_without_session() {
        let mut ctx = ToolContext::detached(1);
        let payload = dispatch("add_task", json!({"title": "x"}), &mut ctx).await;
        assert_eq!(
            payload,
            json!({"status": "error", "message": "Database session is required"})
        );
    }
}
