//! One chat-completion round trip
//!
//! Resolves the model and its key, builds the wire request, sends it once,
//! and validates what comes back. Appending to the transcript is left to
//! the caller.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::client::{CompletionClient, CompletionEndpoint, CompletionError};
use super::patch::patch_tool_schemas;
use super::response::validate_response;
use crate::config::ModelCatalog;
use crate::credentials::CredentialResolver;
use crate::error::{PipelineError, PipelineResult};
use crate::logging::Logger;
use crate::types::{
    ChatCompletionRequest, ChoiceMessage, ConversationMessage, ModelDescriptor, ProcessedToolCall,
    Temperature, ToolSchema, WireMessage,
};

/// Result of a model call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelCallResult {
    /// Assistant text
    pub content: String,
    pub messages: Vec<ConversationMessage>,
    /// Raw provider body
    pub full_response: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ProcessedToolCall>>,
}

/// What `CompletionService::complete` hands back
///
/// `result.messages` is the input transcript unchanged and
/// `result.tool_calls` is always `None` at this layer.
#[derive(Debug, Clone)]
pub struct CompletionOutcome {
    pub result: ModelCallResult,
    /// Descriptor the request was built from
    pub model: ModelDescriptor,
    /// Validated first choice message
    pub message: ChoiceMessage,
}

/// Completion client bound to a model catalog and a credential resolver
pub struct CompletionService {
    catalog: Arc<dyn ModelCatalog>,
    credentials: Arc<dyn CredentialResolver>,
    client: Arc<dyn CompletionClient>,
    logger: Arc<dyn Logger>,
}

impl CompletionService {
    pub fn new(
        catalog: Arc<dyn ModelCatalog>,
        credentials: Arc<dyn CredentialResolver>,
        client: Arc<dyn CompletionClient>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            catalog,
            credentials,
            client,
            logger,
        }
    }

    /// Perform exactly one completion request
    pub async fn complete(
        &self,
        model_id: &str,
        prompt: &str,
        messages: &[ConversationMessage],
        tools: Option<&[ToolSchema]>,
    ) -> PipelineResult<CompletionOutcome> {
        let model = self
            .catalog
            .get_model(model_id)
            .await
            .map_err(|e| {
                self.logger.error(&format!(
                    "[CompletionService] Model catalog unavailable while looking up {}: {}",
                    model_id, e
                ));
                PipelineError::unknown(&e)
            })?
            .ok_or_else(|| PipelineError::model_not_found(model_id))?;

        let endpoint = self.endpoint(&model).await?;
        let request = self.build_request(&model, prompt, messages, tools);

        self.logger.info(&format!(
            "[CompletionService] Calling {} ({}) with {} message(s), {} tool(s)",
            model.name,
            model.model,
            request.messages.len(),
            request.tools.as_ref().map_or(0, Vec::len)
        ));

        let body = self
            .client
            .create(&endpoint, &request)
            .await
            .map_err(|e| self.translate(e))?;

        let (_, message) = validate_response(&body).map_err(|e| {
            self.logger
                .error(&format!("[CompletionService] Unusable response: {}", e));
            e
        })?;

        Ok(CompletionOutcome {
            result: ModelCallResult {
                content: message.text(),
                messages: messages.to_vec(),
                full_response: body,
                tool_calls: None,
            },
            model,
            message,
        })
    }

    async fn endpoint(&self, model: &ModelDescriptor) -> PipelineResult<CompletionEndpoint> {
        let reference = model
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .ok_or_else(|| PipelineError::api_key(&model.id, "No API key configured"))?;

        let api_key = self
            .credentials
            .resolve_api_key(reference)
            .await
            .ok_or_else(|| {
                PipelineError::api_key(
                    &model.id,
                    format!("Could not resolve API key reference '{}'", reference),
                )
            })?;

        Ok(CompletionEndpoint::new(model.base_url.as_deref(), api_key))
    }

    fn build_request(
        &self,
        model: &ModelDescriptor,
        prompt: &str,
        messages: &[ConversationMessage],
        tools: Option<&[ToolSchema]>,
    ) -> ChatCompletionRequest {
        let temperature = match model.temperature() {
            Temperature::Invalid => {
                self.logger.warn(&format!(
                    "[CompletionService] Ignoring unparseable temperature {:?} for model {}",
                    model.temperature.as_deref().unwrap_or_default(),
                    model.id
                ));
                Temperature::Invalid.value()
            }
            other => other.value(),
        };

        let mut wire = Vec::with_capacity(messages.len() + 1);
        if !prompt.is_empty() {
            wire.push(WireMessage::system(prompt));
        }
        wire.extend(messages.iter().map(WireMessage::from));

        ChatCompletionRequest {
            model: model.model.clone(),
            messages: wire,
            temperature,
            tools: tools.filter(|t| !t.is_empty()).map(patch_tool_schemas),
        }
    }

    fn translate(&self, error: CompletionError) -> PipelineError {
        self.logger
            .error(&format!("[CompletionService] Completion failed: {}", error));
        match error {
            CompletionError::Api {
                message,
                status,
                error_type,
                code,
                param,
            } => PipelineError::ApiError {
                message,
                status,
                error_type,
                code,
                param,
            },
            other @ CompletionError::Client(_) => PipelineError::unknown(&other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::{chat_response, MockCompletionClient};
    use crate::config::{ConfigFile, ConfigResult, MemoryModelCatalog};
    use crate::credentials::SecretCredentialResolver;
    use crate::logging::{LogLevel, MemoryLogger, NoOpLogger};
    use crate::secrets::{ChainSecretStore, MemorySecretStore, SecretStore};
    use serde_json::json;

    fn catalog() -> Arc<MemoryModelCatalog> {
        Arc::new(MemoryModelCatalog::with_models(vec![
            ModelDescriptor::new("gpt4o", "GPT-4o", "gpt-4o")
                .with_temperature("0.3")
                .with_api_key("openai")
                .with_base_url("http://llm.local/v1"),
            ModelDescriptor::new("nokey", "No Key", "x"),
            ModelDescriptor::new("warm", "Warm", "w")
                .with_temperature("warm")
                .with_api_key("openai"),
        ]))
    }

    fn credentials() -> Arc<SecretCredentialResolver> {
        let store = MemorySecretStore::new();
        store.store("openai", "sk-test").unwrap();
        Arc::new(SecretCredentialResolver::new(ChainSecretStore::new(vec![Arc::new(store)])))
    }

    fn service(client: Arc<MockCompletionClient>, logger: Arc<dyn Logger>) -> CompletionService {
        CompletionService::new(catalog(), credentials(), client, logger)
    }

    #[tokio::test]
    async fn test_model_not_found() {
        let client = Arc::new(MockCompletionClient::text("hi"));
        let err = service(client.clone(), Arc::new(NoOpLogger))
            .complete("missing", "", &[], None)
            .await
            .unwrap_err();

        assert_eq!(err, PipelineError::model_not_found("missing"));
        assert_eq!(client.request_count(), 0);
    }

    struct BrokenCatalog;

    #[async_trait::async_trait]
    impl ModelCatalog for BrokenCatalog {
        async fn get_model(&self, _id: &str) -> ConfigResult<Option<ModelDescriptor>> {
            Err(ConfigFile::from_yaml("models:\n  - id: gpt4o\n    name: [unterminated").unwrap_err())
        }

        async fn list_models(&self) -> ConfigResult<Vec<ModelDescriptor>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_catalog_failure_is_unknown_error() {
        let logger = Arc::new(MemoryLogger::new());
        let client = Arc::new(MockCompletionClient::text("hi"));
        let err = CompletionService::new(Arc::new(BrokenCatalog), credentials(), client.clone(), logger.clone())
            .complete("gpt4o", "", &[], None)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "unknown_error");
        assert!(err.to_string().contains("YAML"));
        assert_eq!(client.request_count(), 0);
        assert_eq!(logger.messages_at(LogLevel::Error).len(), 1);
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let client = Arc::new(MockCompletionClient::text("hi"));
        let err = service(client.clone(), Arc::new(NoOpLogger))
            .complete("nokey", "", &[], None)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "api_key_error");
        assert_eq!(client.request_count(), 0);
    }

    #[tokio::test]
    async fn test_request_shape() {
        let client = Arc::new(MockCompletionClient::text("Hello"));
        let transcript = vec![ConversationMessage::user("hi")];
        let tools = vec![ToolSchema::function("_-_-_vision_-_-_describe", "Describe").with_parameters(
            json!({ "type": "object", "properties": { "imageUrl": { "type": "string", "format": "uri" } } }),
        )];

        let outcome = service(client.clone(), Arc::new(NoOpLogger))
            .complete("gpt4o", "You are terse.", &transcript, Some(tools.as_slice()))
            .await
            .unwrap();

        assert_eq!(outcome.result.content, "Hello");
        assert_eq!(outcome.result.messages, transcript);
        assert!(outcome.result.tool_calls.is_none());
        assert_eq!(outcome.model.id, "gpt4o");

        let (endpoint, request) = client.requests().remove(0);
        assert_eq!(endpoint.completions_url(), "http://llm.local/v1/chat/completions");
        assert_eq!(endpoint.api_key, "sk-test");
        assert_eq!(request.model, "gpt-4o");
        assert_eq!(request.temperature, 0.3);

        let wire = serde_json::to_value(&request).unwrap();
        assert_eq!(wire["messages"][0], json!({ "role": "system", "content": "You are terse." }));
        assert_eq!(wire["messages"][1]["content"], "hi");
        assert!(wire["messages"][1].get("timestamp").is_none());
        assert!(wire["tools"][0]["function"]["parameters"]["properties"]["imageUrl"]
            .get("format")
            .is_none());
        assert_eq!(tools[0].properties().unwrap()["imageUrl"]["format"], "uri");
    }

    #[tokio::test]
    async fn test_invalid_temperature_warns() {
        let logger = Arc::new(MemoryLogger::new());
        let client = Arc::new(MockCompletionClient::text("ok"));

        service(client.clone(), logger.clone())
            .complete("warm", "", &[], Some(&[][..]))
            .await
            .unwrap();

        let request = client.last_request().unwrap();
        assert_eq!(request.temperature, 0.0);
        assert!(request.tools.is_none());
        assert!(request.messages.is_empty());
        assert_eq!(logger.warnings().len(), 1);
    }

    #[tokio::test]
    async fn test_client_errors_are_classified() {
        let client = Arc::new(MockCompletionClient::error(CompletionError::Api {
            message: "rate limited".to_string(),
            status: Some(429),
            error_type: Some("rate_limit_exceeded".to_string()),
            code: None,
            param: None,
        }));
        let err = service(client, Arc::new(NoOpLogger))
            .complete("gpt4o", "", &[], None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "api_error");
        assert!(err.is_retryable());

        let client = Arc::new(MockCompletionClient::error(CompletionError::Client(
            "tls backend unavailable".to_string(),
        )));
        let err = service(client, Arc::new(NoOpLogger))
            .complete("gpt4o", "", &[], None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "unknown_error");
    }

    #[tokio::test]
    async fn test_embedded_error_in_success_body() {
        let client = Arc::new(MockCompletionClient::fixed(json!({
            "error": { "message": "Provider returned error", "code": 502 }
        })));
        let err = service(client, Arc::new(NoOpLogger))
            .complete("gpt4o", "", &[], None)
            .await
            .unwrap_err();

        match err {
            PipelineError::ApiError { message, status, .. } => {
                assert_eq!(message, "Provider returned error");
                assert_eq!(status, Some(502));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_null_content_is_empty() {
        let client = Arc::new(MockCompletionClient::fixed(chat_response(json!({
            "role": "assistant",
            "content": null,
            "tool_calls": [{ "id": "c1", "type": "function", "function": { "name": "handoff", "arguments": "{}" } }]
        }))));
        let outcome = service(client, Arc::new(NoOpLogger))
            .complete("gpt4o", "", &[], None)
            .await
            .unwrap();

        assert_eq!(outcome.result.content, "");
        assert_eq!(outcome.message.tool_calls().len(), 1);
    }
}
