//! Trait definitions for the remote model provider and the session log.
//!
//! `ModelProvider` is implemented by the `interviewbot-providers` crate and
//! `SessionLog` by `interviewbot-store`.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, ServiceError};

// ---------------------------------------------------------------------------
// Model provider trait
// ---------------------------------------------------------------------------

/// Trait for hosted model backends offering speech-to-text and chat completion.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Human-readable provider name (e.g. "groq").
    fn name(&self) -> &str;

    /// Transcribe an audio file and return the transcript text.
    async fn transcribe(&self, request: &TranscriptionRequest) -> Result<String, ProviderError>;

    /// Run a chat completion and return the content of the first choice.
    /// A response without a choice or content is `InvalidResponse`.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError>;
}

/// Request to transcribe an audio file on local disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionRequest {
    /// Path to the audio file.
    pub audio_path: PathBuf,
    /// Transcription model identifier (e.g. "whisper-large-v3").
    pub model: String,
    /// Language hint (ISO-639-1).
    pub language: String,
}

/// Request for a single-turn chat completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier (e.g. "llama-3.3-70b-versatile").
    pub model: String,
    /// System message.
    pub system_prompt: String,
    /// User message.
    pub prompt: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

// ---------------------------------------------------------------------------
// Session log trait
// ---------------------------------------------------------------------------

/// Append-only sink for evaluated answers.
///
/// Calls are blocking; async callers should run them on a blocking thread.
pub trait SessionLog: Send + Sync {
    /// Record one evaluated answer. `evaluation` is already-serialized JSON.
    fn append(&self, question: &str, answer: &str, evaluation: &str) -> Result<(), ServiceError>;
}
