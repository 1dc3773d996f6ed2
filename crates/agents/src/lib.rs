//! Narrow LLM surface for the reply pipeline: typed chat messages, the
//! provider trait, and provider/model reference resolution.

pub mod error;
pub mod model;
pub mod resolve;

pub use {
    error::{Error, Result},
    model::{ChatMessage, CompletionOptions, CompletionResponse, LlmProvider, Usage},
    resolve::{
        ModelAliasIndex, ModelRef, ModelResolver, parse_model_ref, resolve_model_ref_from_string,
    },
};
