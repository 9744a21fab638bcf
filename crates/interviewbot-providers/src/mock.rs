//! Mock provider for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use interviewbot_core::error::ProviderError;
use interviewbot_core::traits::{CompletionRequest, ModelProvider, TranscriptionRequest};

/// A mock model provider for exercising the gateway and router without
/// real API calls.
///
/// Completions are matched on prompt content. Transcription reads the audio
/// file like a real provider would, then returns a fixed transcript.
pub struct MockProvider {
    /// Map of prompt substring → completion.
    responses: HashMap<String, String>,
    /// Default completion if no prompt matches.
    default_response: String,
    /// Transcript returned for any readable audio file.
    transcript: String,
    /// When set, every call fails with an API error carrying this message.
    failure: Option<String>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last completion request received.
    last_request: Mutex<Option<CompletionRequest>>,
    /// Size of the last audio file read.
    last_audio_len: Mutex<Option<usize>>,
}

impl MockProvider {
    /// Create a new mock provider with the given prompt→response mappings.
    pub fn new(responses: HashMap<String, String>) -> Self {
        Self {
            responses,
            default_response: "Tell me about yourself.".to_string(),
            transcript: "mock transcript".to_string(),
            failure: None,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
            last_audio_len: Mutex::new(None),
        }
    }

    /// Create a mock that always returns the same completion.
    pub fn with_fixed_response(response: &str) -> Self {
        Self {
            default_response: response.to_string(),
            ..Self::new(HashMap::new())
        }
    }

    /// Create a mock whose every call fails.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::new(HashMap::new())
        }
    }

    /// Set the transcript returned by `transcribe`.
    pub fn with_transcript(mut self, transcript: &str) -> Self {
        self.transcript = transcript.to_string();
        self
    }

    /// Get the number of calls made to this provider.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last completion request made to this provider.
    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.last_request.lock().unwrap().clone()
    }

    /// Size in bytes of the last audio file this provider read.
    pub fn last_audio_len(&self) -> Option<usize> {
        *self.last_audio_len.lock().unwrap()
    }

    fn check_failure(&self) -> Result<(), ProviderError> {
        match &self.failure {
            Some(message) => Err(ProviderError::ApiError {
                status: 500,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn transcribe(&self, request: &TranscriptionRequest) -> Result<String, ProviderError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);

        let audio = tokio::fs::read(&request.audio_path)
            .await
            .map_err(|source| ProviderError::AudioFile {
                path: request.audio_path.display().to_string(),
                source,
            })?;
        *self.last_audio_len.lock().unwrap() = Some(audio.len());

        self.check_failure()?;
        Ok(self.transcript.clone())
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap() = Some(request.clone());

        self.check_failure()?;

        // Find a matching response based on prompt content
        let content = self
            .responses
            .iter()
            .find(|(key, _)| request.prompt.contains(key.as_str()))
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| self.default_response.clone());

        Ok(content)
    }
}
