//! Tool dispatch
//!
//! Runs the tool calls of one assistant turn, one at a time and in request
//! order, and turns each into a tool-role transcript message plus a
//! `ProcessedToolCall` record.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::handoff::HandoffPayload;
use super::name::ToolName;
use super::service::{ToolCallOutcome, ToolService};
use crate::error::{PipelineError, PipelineResult};
use crate::logging::Logger;
use crate::types::{empty_args, ConversationMessage, ProcessedToolCall, RequestedToolCall};

/// Output of one dispatch batch
///
/// `tool_call_messages[i]` and `processed_tool_calls[i]` describe the same
/// call, in the order the calls were requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDispatchOutcome {
    pub tool_call_messages: Vec<ConversationMessage>,
    pub processed_tool_calls: Vec<ProcessedToolCall>,
}

impl ToolDispatchOutcome {
    fn push(&mut self, call: &RequestedToolCall, args: Value, result: String) {
        self.tool_call_messages
            .push(ConversationMessage::tool_result(&call.id, result.as_str()));
        self.processed_tool_calls
            .push(ProcessedToolCall::new(&call.id, &call.name, args, result));
    }
}

/// Routes requested tool calls to handoff or to the tool service
pub struct ToolDispatcher {
    service: Arc<dyn ToolService>,
    logger: Arc<dyn Logger>,
}

impl ToolDispatcher {
    pub fn new(service: Arc<dyn ToolService>, logger: Arc<dyn Logger>) -> Self {
        Self { service, logger }
    }

    /// Execute every requested call
    ///
    /// Per-call failures (bad name, failed or erroring tool) are recorded as
    /// `Error: <message>` results and never stop the batch. Arguments that
    /// are not valid JSON do: the whole batch fails with
    /// `ToolProcessingFailed`, unlike extraction which falls back to `{}`.
    pub async fn process_tool_calls(
        &self,
        calls: &[RequestedToolCall],
    ) -> PipelineResult<ToolDispatchOutcome> {
        let mut outcome = ToolDispatchOutcome::default();
        if calls.is_empty() {
            return Ok(outcome);
        }

        self.logger.info(&format!(
            "[ToolDispatcher] Processing {} tool call(s)",
            calls.len()
        ));

        for call in calls {
            let args: Value = serde_json::from_str(&call.arguments).map_err(|e| {
                self.logger.error(&format!(
                    "[ToolDispatcher] Unparseable arguments for {} ({}): {}",
                    call.name, call.id, e
                ));
                PipelineError::ToolProcessingFailed(format!(
                    "Failed to parse arguments of tool call {}: {}",
                    call.id, e
                ))
            })?;

            let (args, result) = self.dispatch(call, args).await?;
            outcome.push(call, args, result);
        }

        Ok(outcome)
    }

    /// Result text of one call, with the args to record alongside it
    async fn dispatch(
        &self,
        call: &RequestedToolCall,
        args: Value,
    ) -> PipelineResult<(Value, String)> {
        let (server, tool) = match ToolName::parse(&call.name) {
            Some(ToolName::Handoff) => {
                self.logger
                    .info(&format!("[ToolDispatcher] Handoff requested: {}", call.name));
                let result = to_json(&HandoffPayload::new(&args))?;
                return Ok((args, result));
            }
            Some(ToolName::Mcp { server, tool }) => (server, tool),
            None => {
                self.logger.warn(&format!(
                    "[ToolDispatcher] Invalid tool name format: {}",
                    call.name
                ));
                return Ok((
                    empty_args(),
                    format!("Error: Invalid tool name format: {}", call.name),
                ));
            }
        };

        self.logger.debug(&format!(
            "[ToolDispatcher] Calling {} on server {}",
            tool, server
        ));

        match self.service.call_tool(server, tool, args.clone()).await {
            Ok(ToolCallOutcome {
                success: true,
                data,
                ..
            }) => {
                let result = to_json(&data.unwrap_or(Value::Null))?;
                Ok((args, result))
            }
            Ok(ToolCallOutcome { error, .. }) => {
                let message = error.unwrap_or_else(|| "Tool call failed".to_string());
                self.logger.warn(&format!(
                    "[ToolDispatcher] {} reported failure: {}",
                    call.name, message
                ));
                Ok((args, format!("Error: {}", message)))
            }
            Err(e) => {
                self.logger
                    .error(&format!("[ToolDispatcher] {} failed: {}", call.name, e));
                Ok((empty_args(), format!("Error: {}", e)))
            }
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> PipelineResult<String> {
    serde_json::to_string(value).map_err(|e| PipelineError::ToolProcessingFailed(e.to_string()))
}
