// ABOUTME: Integration tests for the tool registry and tool implementations
// ABOUTME: Exercises dispatch payloads, session handling, and tenant scoping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 taskchat contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{create_test_database, create_test_user};
use serde_json::json;
use sqlx::Row;
use taskchat::tools::{dispatch, ToolContext};

// ============================================================================
// Session Handling
// ============================================================================

#[tokio::test]
async fn test_missing_session_yields_exact_error_payload() {
    let db = create_test_database().await.unwrap();
    let user = create_test_user(&db, "a@example.com").await.unwrap();

    let mut ctx = ToolContext::detached(user.id);
    let payload = dispatch("add_task", json!({"title": "Buy milk"}), &mut ctx).await;

    assert_eq!(
        payload,
        json!({"status": "error", "message": "Database session is required"})
    );

    // Nothing was written.
    let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM tasks")
        .fetch_one(db.pool())
        .await
        .unwrap()
        .get("n");
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_unknown_tool_payload() {
    let db = create_test_database().await.unwrap();
    let user = create_test_user(&db, "a@example.com").await.unwrap();

    let mut tx = db.pool().begin().await.unwrap();
    let mut ctx = ToolContext::new(user.id, &mut tx);
    let payload = dispatch("make_coffee", json!({}), &mut ctx).await;

    assert_eq!(payload["status"], "error");
    assert_eq!(payload["message"], "Unknown tool: make_coffee");
}

// ============================================================================
// Add + List
// ============================================================================

#[tokio::test]
async fn test_add_then_list_pending() {
    let db = create_test_database().await.unwrap();
    let user = create_test_user(&db, "a@example.com").await.unwrap();

    let mut tx = db.pool().begin().await.unwrap();
    let mut ctx = ToolContext::new(user.id, &mut tx);

    let added = dispatch(
        "add_task",
        json!({"title": "Buy milk", "description": "2 liters"}),
        &mut ctx,
    )
    .await;
    assert_eq!(added["status"], "success");
    assert_eq!(added["title"], "Buy milk");
    assert_eq!(added["message"], "Task 'Buy milk' created successfully");
    assert!(added["task_id"].as_i64().unwrap() > 0);

    let listed = dispatch("list_tasks", json!({"status": "pending"}), &mut ctx).await;
    assert_eq!(listed["status"], "success");
    assert_eq!(listed["count"], 1);
    assert_eq!(listed["message"], "Found 1 task(s)");
    assert_eq!(listed["tasks"][0]["title"], "Buy milk");
    assert_eq!(listed["tasks"][0]["description"], "2 liters");
    assert_eq!(listed["tasks"][0]["completed"], false);
}

#[tokio::test]
async fn test_list_completed_filter_excludes_pending() {
    let db = create_test_database().await.unwrap();
    let user = create_test_user(&db, "a@example.com").await.unwrap();

    let mut tx = db.pool().begin().await.unwrap();
    let mut ctx = ToolContext::new(user.id, &mut tx);

    dispatch("add_task", json!({"title": "Pending one"}), &mut ctx).await;

    let listed = dispatch("list_tasks", json!({"status": "completed"}), &mut ctx).await;
    assert_eq!(listed["count"], 0);
    assert_eq!(listed["message"], "Found 0 task(s)");
}

#[tokio::test]
async fn test_add_task_rejects_blank_title() {
    let db = create_test_database().await.unwrap();
    let user = create_test_user(&db, "a@example.com").await.unwrap();

    let mut tx = db.pool().begin().await.unwrap();
    let mut ctx = ToolContext::new(user.id, &mut tx);

    let payload = dispatch("add_task", json!({"title": "   "}), &mut ctx).await;
    assert_eq!(payload["status"], "error");

    let listed = dispatch("list_tasks", json!({}), &mut ctx).await;
    assert_eq!(listed["count"], 0);
}

#[tokio::test]
async fn test_add_task_missing_title_is_error_payload() {
    let db = create_test_database().await.unwrap();
    let user = create_test_user(&db, "a@example.com").await.unwrap();

    let mut tx = db.pool().begin().await.unwrap();
    let mut ctx = ToolContext::new(user.id, &mut tx);

    let payload = dispatch("add_task", json!({"description": "no title"}), &mut ctx).await;
    assert_eq!(payload["status"], "error");
    assert!(payload["message"]
        .as_str()
        .unwrap()
        .contains("Invalid arguments for add_task"));
}

// ============================================================================
// Complete / Update / Delete
// ============================================================================

#[tokio::test]
async fn test_complete_toggles_and_toggles_back() {
    let db = create_test_database().await.unwrap();
    let user = create_test_user(&db, "a@example.com").await.unwrap();

    let mut tx = db.pool().begin().await.unwrap();
    let mut ctx = ToolContext::new(user.id, &mut tx);

    let added = dispatch("add_task", json!({"title": "Call mom"}), &mut ctx).await;
    let task_id = added["task_id"].as_i64().unwrap();

    let first = dispatch("complete_task", json!({"task_id": task_id}), &mut ctx).await;
    assert_eq!(first["status"], "success");
    assert_eq!(first["completed"], true);
    assert_eq!(first["message"], "Task 'Call mom' completed");

    let second = dispatch("complete_task", json!({"task_id": task_id}), &mut ctx).await;
    assert_eq!(second["completed"], false);
    assert_eq!(second["message"], "Task 'Call mom' marked as pending");
}

#[tokio::test]
async fn test_partial_update_preserves_absent_fields() {
    let db = create_test_database().await.unwrap();
    let user = create_test_user(&db, "a@example.com").await.unwrap();

    let mut tx = db.pool().begin().await.unwrap();
    let mut ctx = ToolContext::new(user.id, &mut tx);

    let added = dispatch(
        "add_task",
        json!({"title": "Original", "description": "Keep me"}),
        &mut ctx,
    )
    .await;
    let task_id = added["task_id"].as_i64().unwrap();

    let updated = dispatch(
        "update_task",
        json!({"task_id": task_id, "title": "Renamed"}),
        &mut ctx,
    )
    .await;
    assert_eq!(updated["status"], "success");
    assert_eq!(updated["title"], "Renamed");
    assert_eq!(updated["message"], "Task 'Renamed' updated successfully");

    let listed = dispatch("list_tasks", json!({}), &mut ctx).await;
    assert_eq!(listed["tasks"][0]["title"], "Renamed");
    assert_eq!(listed["tasks"][0]["description"], "Keep me");
}

#[tokio::test]
async fn test_delete_task_removes_it() {
    let db = create_test_database().await.unwrap();
    let user = create_test_user(&db, "a@example.com").await.unwrap();

    let mut tx = db.pool().begin().await.unwrap();
    let mut ctx = ToolContext::new(user.id, &mut tx);

    let added = dispatch("add_task", json!({"title": "Ephemeral"}), &mut ctx).await;
    let task_id = added["task_id"].as_i64().unwrap();

    let deleted = dispatch("delete_task", json!({"task_id": task_id}), &mut ctx).await;
    assert_eq!(deleted["status"], "success");
    assert_eq!(deleted["message"], "Task 'Ephemeral' deleted successfully");
    assert_eq!(deleted["task_id"], task_id);

    let listed = dispatch("list_tasks", json!({}), &mut ctx).await;
    assert_eq!(listed["count"], 0);
}

// ============================================================================
// Tenant Scoping
// ============================================================================

#[tokio::test]
async fn test_cross_tenant_update_reports_not_found() {
    let db = create_test_database().await.unwrap();
    let owner = create_test_user(&db, "owner@example.com").await.unwrap();
    let intruder = create_test_user(&db, "intruder@example.com").await.unwrap();

    let mut tx = db.pool().begin().await.unwrap();

    let mut owner_ctx = ToolContext::new(owner.id, &mut tx);
    let added = dispatch("add_task", json!({"title": "Private"}), &mut owner_ctx).await;
    let task_id = added["task_id"].as_i64().unwrap();

    let mut intruder_ctx = ToolContext::new(intruder.id, &mut tx);
    let payload = dispatch(
        "update_task",
        json!({"task_id": task_id, "title": "Hijacked"}),
        &mut intruder_ctx,
    )
    .await;

    assert_eq!(payload["status"], "error");
    assert_eq!(
        payload["message"],
        format!("Task {task_id} not found")
    );

    // The owner's task is untouched.
    let mut owner_ctx = ToolContext::new(owner.id, &mut tx);
    let listed = dispatch("list_tasks", json!({}), &mut owner_ctx).await;
    assert_eq!(listed["tasks"][0]["title"], "Private");
}

#[tokio::test]
async fn test_list_tasks_only_sees_own_rows() {
    let db = create_test_database().await.unwrap();
    let alice = create_test_user(&db, "alice@example.com").await.unwrap();
    let bob = create_test_user(&db, "bob@example.com").await.unwrap();

    let mut tx = db.pool().begin().await.unwrap();

    let mut alice_ctx = ToolContext::new(alice.id, &mut tx);
    dispatch("add_task", json!({"title": "Alice's task"}), &mut alice_ctx).await;

    let mut bob_ctx = ToolContext::new(bob.id, &mut tx);
    let listed = dispatch("list_tasks", json!({}), &mut bob_ctx).await;
    assert_eq!(listed["count"], 0);
}
