// ABOUTME: Helper module exports for integration tests
// ABOUTME: Re-exports the axum HTTP test harness
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 taskchat contributors

pub mod axum_test;
