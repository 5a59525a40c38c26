//! Core types shared by the pipeline components

mod message;
mod model;
mod tool;
mod wire;

pub use message::{ConversationMessage, MessageRole, RequestedToolCall};
pub use model::{ModelDescriptor, Temperature, DEFAULT_TEMPERATURE};
pub use tool::{empty_args, FunctionSchema, ProcessedToolCall, ToolSchema};
pub use wire::{
    ChatCompletionRequest, ChatCompletionResponse, Choice, ChoiceMessage, EmbeddedError,
    ResponseFunctionCall, ResponseToolCall, WireFunctionCall, WireMessage, WireToolCall,
};
