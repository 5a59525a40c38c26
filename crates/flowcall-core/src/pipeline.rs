//! Node-level orchestration
//!
//! `FlowPipeline::call_model` runs one model turn for a flow node: one
//! completion request, the assistant message appended to a copy of the
//! transcript, and the requested tool calls extracted. Running those tool
//! calls is a separate step, `FlowPipeline::process_tool_calls`, so the
//! caller decides whether and how often to loop.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::completion::{CompletionClient, CompletionService, ModelCallResult};
use crate::config::ModelCatalog;
use crate::credentials::CredentialResolver;
use crate::error::PipelineResult;
use crate::extract::extract_tool_calls;
use crate::logging::Logger;
use crate::tools::{ToolDispatchOutcome, ToolDispatcher, ToolService};
use crate::transcript::appended;
use crate::types::{ConversationMessage, ModelDescriptor, RequestedToolCall, ToolSchema};

/// Content that already starts with a speaker heading
static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^## .+says:\s*\n\n").expect("Valid regex pattern"));

/// Whether `content` already carries a `## ... says:` heading
pub fn has_speaker_heading(content: &str) -> bool {
    HEADING.is_match(content)
}

/// `## <node> - <model name> (<model>) says:` followed by a blank line
pub fn speaker_heading(node_name: &str, model: &ModelDescriptor) -> String {
    format!("## {} - {} ({}) says:\n\n", node_name, model.name, model.model)
}

/// Inputs of one model turn
#[derive(Debug, Clone, Copy)]
pub struct CallModelParams<'a> {
    pub model_id: &'a str,
    /// System prompt; empty for none
    pub prompt: &'a str,
    pub messages: &'a [ConversationMessage],
    pub tools: Option<&'a [ToolSchema]>,
    /// Display name of the flow node, used in the speaker heading
    pub node_name: &'a str,
    pub process_node_id: Option<&'a str>,
}

/// External collaborators of a pipeline
#[derive(Clone)]
pub struct PipelineServices {
    pub catalog: Arc<dyn ModelCatalog>,
    pub credentials: Arc<dyn CredentialResolver>,
    pub completions: Arc<dyn CompletionClient>,
    pub tools: Arc<dyn ToolService>,
}

/// Model call and tool dispatch for flow nodes
pub struct FlowPipeline {
    completion: CompletionService,
    dispatcher: ToolDispatcher,
    logger: Arc<dyn Logger>,
}

impl FlowPipeline {
    pub fn new(services: PipelineServices, logger: Arc<dyn Logger>) -> Self {
        Self {
            completion: CompletionService::new(
                services.catalog,
                services.credentials,
                services.completions,
                logger.clone(),
            ),
            dispatcher: ToolDispatcher::new(services.tools, logger.clone()),
            logger,
        }
    }

    /// One model turn
    ///
    /// On success the returned transcript is `params.messages` plus exactly
    /// one assistant message. Errors from the completion layer are returned
    /// unchanged.
    pub async fn call_model(&self, params: CallModelParams<'_>) -> PipelineResult<ModelCallResult> {
        let outcome = self
            .completion
            .complete(params.model_id, params.prompt, params.messages, params.tools)
            .await?;

        let raw = outcome.result.content;
        let content = if has_speaker_heading(&raw) {
            raw
        } else {
            format!("{}{}", speaker_heading(params.node_name, &outcome.model), raw)
        };

        let requested: Vec<RequestedToolCall> = outcome
            .message
            .tool_calls()
            .iter()
            .map(|c| c.to_requested())
            .collect();
        let tool_calls = extract_tool_calls(&outcome.message, self.logger.as_ref());

        let assistant = ConversationMessage::assistant(content.as_str(), requested)
            .with_process_node_id(params.process_node_id.map(str::to_string));

        self.logger.info(&format!(
            "[FlowPipeline] {} answered for node '{}' ({} tool call(s))",
            outcome.model.id,
            params.node_name,
            tool_calls.as_ref().map_or(0, Vec::len)
        ));

        Ok(ModelCallResult {
            content,
            messages: appended(params.messages, [assistant]),
            full_response: outcome.result.full_response,
            tool_calls,
        })
    }

    /// Run the tool calls of one assistant turn
    pub async fn process_tool_calls(
        &self,
        calls: &[RequestedToolCall],
    ) -> PipelineResult<ToolDispatchOutcome> {
        self.dispatcher.process_tool_calls(calls).await
    }
}
