// ABOUTME: Generic OpenAI-compatible LLM provider over HTTP chat completions
// ABOUTME: Supports OpenRouter, Ollama, vLLM, and any OpenAI-compatible endpoint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 taskchat contributors

//! # OpenAI-Compatible Provider
//!
//! Implementation of [`LlmProvider`] for any endpoint speaking the OpenAI
//! `chat/completions` wire format with function calling. The default
//! configuration targets OpenRouter; local servers (Ollama, vLLM) work by
//! pointing `LLM_BASE_URL` at them and leaving `LLM_API_KEY` unset.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info};

use super::{
    ChatMessage, ChatRequest, ChatResponseWithTools, FunctionDeclaration, LlmProvider, TokenUsage,
    ToolCall,
};
use crate::config::LlmConfig;
use crate::errors::AppError;

/// Request timeout for completion calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

// ============================================================================
// Wire Types
// ============================================================================

/// Chat completion request body
#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<OpenAiTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<String>,
}

/// A message on the wire
#[derive(Debug, Serialize)]
struct OpenAiMessage {
    role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<OpenAiToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

/// Tool definition on the wire
#[derive(Debug, Serialize)]
struct OpenAiTool {
    #[serde(rename = "type")]
    tool_type: &'static str,
    function: OpenAiFunctionDef,
}

/// Function schema inside a tool definition
#[derive(Debug, Serialize)]
struct OpenAiFunctionDef {
    name: String,
    description: String,
    parameters: Value,
}

/// Tool call in requests and responses
#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAiToolCall {
    id: String,
    #[serde(rename = "type")]
    call_type: String,
    function: OpenAiFunctionCall,
}

/// Function call details: name plus JSON-encoded argument string
#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAiFunctionCall {
    name: String,
    arguments: String,
}

/// Chat completion response body
#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    model: Option<String>,
    choices: Vec<OpenAiChoice>,
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<OpenAiToolCall>>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

// ============================================================================
// Provider
// ============================================================================

/// Provider for OpenAI-compatible chat completion endpoints
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: LlmConfig,
}

impl OpenAiCompatibleProvider {
    /// Create a provider from LLM configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: LlmConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {e}")))?;

        info!(
            "LLM provider configured: {} (model {})",
            config.base_url, config.model
        );

        Ok(Self { client, config })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }

    /// Add authorization header if an API key is configured
    fn add_auth_header(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(ref api_key) = self.config.api_key {
            request.header("Authorization", format!("Bearer {api_key}"))
        } else {
            request
        }
    }

    fn convert_messages(messages: &[ChatMessage]) -> Vec<OpenAiMessage> {
        messages
            .iter()
            .map(|msg| OpenAiMessage {
                role: msg.role.as_str(),
                content: msg.content.clone(),
                tool_calls: msg.tool_calls.as_ref().map(|calls| {
                    calls
                        .iter()
                        .map(|call| OpenAiToolCall {
                            id: call.id.clone(),
                            call_type: "function".to_owned(),
                            function: OpenAiFunctionCall {
                                name: call.name.clone(),
                                arguments: call.arguments.to_string(),
                            },
                        })
                        .collect()
                }),
                tool_call_id: msg.tool_call_id.clone(),
                name: msg.name.clone(),
            })
            .collect()
    }

    fn convert_tools(tools: &[FunctionDeclaration]) -> Vec<OpenAiTool> {
        tools
            .iter()
            .map(|decl| OpenAiTool {
                tool_type: "function",
                function: OpenAiFunctionDef {
                    name: decl.name.clone(),
                    description: decl.description.clone(),
                    parameters: decl.parameters.clone(),
                },
            })
            .collect()
    }

    /// Convert response tool calls to the internal [`ToolCall`] format
    fn convert_tool_calls(tool_calls: &[OpenAiToolCall]) -> Vec<ToolCall> {
        tool_calls
            .iter()
            .map(|call| {
                debug!(
                    tool_call_id = %call.id,
                    function_name = %call.function.name,
                    "Converting tool call"
                );
                // Unparseable arguments become an empty object; the registry
                // reports the decode failure back to the model.
                let arguments: Value =
                    serde_json::from_str(&call.function.arguments).unwrap_or_default();
                ToolCall {
                    id: call.id.clone(),
                    name: call.function.name.clone(),
                    arguments,
                }
            })
            .collect()
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &'static str {
        "openai-compatible"
    }

    fn default_model(&self) -> &str {
        &self.config.model
    }

    async fn complete_with_tools(
        &self,
        request: &ChatRequest,
        tools: &[FunctionDeclaration],
    ) -> Result<ChatResponseWithTools, AppError> {
        let model = request.model.as_deref().unwrap_or(&self.config.model);

        let body = OpenAiRequest {
            model: model.to_owned(),
            messages: Self::convert_messages(&request.messages),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            tools: (!tools.is_empty()).then(|| Self::convert_tools(tools)),
            tool_choice: (!tools.is_empty()).then(|| "auto".to_owned()),
        };

        let http_request = self
            .client
            .post(self.api_url("chat/completions"))
            .header("Content-Type", "application/json")
            .json(&body);

        let response = self.add_auth_header(http_request).send().await.map_err(|e| {
            error!("Failed to send request to LLM endpoint: {e}");
            if e.is_connect() {
                AppError::external_service(
                    "LLM",
                    format!("Cannot connect to {}", self.config.base_url),
                )
            } else {
                AppError::external_service("LLM", format!("Request failed: {e}"))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::external_service("LLM", format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            error!("LLM endpoint returned {status}: {}", truncate(&body, 500));
            return Err(AppError::external_service(
                "LLM",
                format!("API returned {status}"),
            ));
        }

        let parsed: OpenAiResponse = serde_json::from_str(&body).map_err(|e| {
            error!(
                "Failed to parse LLM response: {e} - body: {}",
                truncate(&body, 500)
            );
            AppError::external_service("LLM", format!("Failed to parse response: {e}"))
        })?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::external_service("LLM", "API returned no choices"))?;

        let tool_calls = choice.message.tool_calls.map(|calls| {
            info!("Model requested {} tool calls", calls.len());
            Self::convert_tool_calls(&calls)
        });

        debug!(
            content_len = choice.message.content.as_ref().map(String::len),
            tool_call_count = tool_calls.as_ref().map(Vec::len),
            finish_reason = ?choice.finish_reason,
            "Received LLM response"
        );

        Ok(ChatResponseWithTools {
            content: choice.message.content,
            tool_calls,
            model: parsed.model.unwrap_or_else(|| model.to_owned()),
            usage: parsed.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            finish_reason: choice.finish_reason,
        })
    }
}

fn truncate(body: &str, max: usize) -> &str {
    match body.char_indices().nth(max) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_messages_keeps_tool_frames() {
        let messages = vec![
            ChatMessage::assistant_with_tools(
                None,
                vec![ToolCall {
                    id: "call_1".to_owned(),
                    name: "add_task".to_owned(),
                    arguments: serde_json::json!({"title": "Buy milk"}),
                }],
            ),
            ChatMessage::tool_result("call_1", "add_task", "{\"status\":\"success\"}"),
        ];

        let wire = OpenAiCompatibleProvider::convert_messages(&messages);
        assert_eq!(wire[0].role, "assistant");
        let calls = wire[0].tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].function.name, "add_task");
        assert!(calls[0].function.arguments.contains("Buy milk"));
        assert_eq!(wire[1].role, "tool");
        assert_eq!(wire[1].tool_call_id.as_deref(), Some("call_1"));
    }

    #[test]
    fn test_convert_tool_calls_decodes_arguments() {
        let calls = vec![OpenAiToolCall {
            id: "call_9".to_owned(),
            call_type: "function".to_owned(),
            function: OpenAiFunctionCall {
                name: "list_tasks".to_owned(),
                arguments: "{\"status\": \"pending\"}".to_owned(),
            },
        }];

        let converted = OpenAiCompatibleProvider::convert_tool_calls(&calls);
        assert_eq!(converted[0].name, "list_tasks");
        assert_eq!(converted[0].arguments["status"], "pending");
    }

    #[test]
    fn test_convert_tool_calls_tolerates_bad_arguments() {
        let calls = vec![OpenAiToolCall {
            id: "call_9".to_owned(),
            call_type: "function".to_owned(),
            function: OpenAiFunctionCall {
                name: "add_task".to_owned(),
                arguments: "not json".to_owned(),
            },
        }];

        let converted = OpenAiCompatibleProvider::convert_tool_calls(&calls);
        assert_eq!(converted[0].arguments, Value::Null);
    }
}
