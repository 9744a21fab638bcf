//! Groq API provider implementation.
//!
//! Groq exposes an OpenAI-compatible surface, so the same client also works
//! against any OpenAI-style endpoint via `base_url`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use interviewbot_core::error::ProviderError;
use interviewbot_core::model::TranscriptionPayload;
use interviewbot_core::traits::{CompletionRequest, ModelProvider, TranscriptionRequest};

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Groq (OpenAI-compatible) API provider.
pub struct GroqProvider {
    api_key: String,
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl GroqProvider {
    pub fn new(
        api_key: &str,
        base_url: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ProviderError::NetworkError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key: api_key.to_string(),
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout_secs,
            client,
        })
    }

    fn map_send_error(&self, e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout(self.timeout_secs)
        } else {
            ProviderError::NetworkError(e.to_string())
        }
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    max_tokens: u32,
    temperature: f64,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: ChatUsage,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize, Default)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// Map non-success statuses to provider errors.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    let status = response.status().as_u16();
    if status == 429 {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(5)
            * 1000;
        return Err(ProviderError::RateLimited {
            retry_after_ms: retry_after,
        });
    }
    if status == 401 {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::AuthenticationFailed(body));
    }
    if status == 404 {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::ModelNotFound(body));
    }
    if status >= 400 {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::ApiError {
            status,
            message: body,
        });
    }
    Ok(response)
}

#[async_trait]
impl ModelProvider for GroqProvider {
    fn name(&self) -> &str {
        "groq"
    }

    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn transcribe(&self, request: &TranscriptionRequest) -> Result<String, ProviderError> {
        let start = Instant::now();

        let audio = tokio::fs::read(&request.audio_path)
            .await
            .map_err(|source| ProviderError::AudioFile {
                path: request.audio_path.display().to_string(),
                source,
            })?;
        let file_name = request
            .audio_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());
        let audio_len = audio.len();

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(audio).file_name(file_name),
            )
            .text("model", request.model.clone())
            .text("language", request.language.clone())
            .text("response_format", "json");

        let response = self
            .client
            .post(format!("{}/v1/audio/transcriptions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        let response = check_status(response).await?;

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("failed to read response: {e}")))?;

        debug!(
            audio_bytes = audio_len,
            latency_ms = start.elapsed().as_millis() as u64,
            "transcription finished"
        );

        TranscriptionPayload::from_body(&body)
            .into_text()
            .ok_or_else(|| {
                ProviderError::InvalidResponse(format!("transcription response has no text: {body}"))
            })
    }

    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        let start = Instant::now();

        let body = ChatRequest {
            model: request.model.clone(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: request.system_prompt.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.prompt.clone(),
                },
            ],
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        let response = check_status(response).await?;

        let api_response: ChatResponse = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("failed to parse response: {e}"))
        })?;

        debug!(
            prompt_tokens = api_response.usage.prompt_tokens,
            completion_tokens = api_response.usage.completion_tokens,
            latency_ms = start.elapsed().as_millis() as u64,
            "completion finished"
        );

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::InvalidResponse("response has no choices".into()))?;
        choice
            .message
            .content
            .ok_or_else(|| ProviderError::InvalidResponse("choice has no content".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> GroqProvider {
        GroqProvider::new("test-key", Some(server.uri()), DEFAULT_TIMEOUT_SECS).unwrap()
    }

    fn completion_request() -> CompletionRequest {
        CompletionRequest {
            model: "llama-3.3-70b-versatile".into(),
            system_prompt: "You are an interviewer AI for HR and technical rounds.".into(),
            prompt: "Start a new interview.".into(),
            max_tokens: 200,
            temperature: 0.7,
        }
    }

    fn audio_file(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("answer.webm");
        std::fs::write(&path, b"fake-audio-bytes").unwrap();
        path
    }

    #[tokio::test]
    async fn successful_completion() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "choices": [{"message": {"content": "Tell me about yourself.", "role": "assistant"}, "index": 0}],
            "model": "llama-3.3-70b-versatile",
            "usage": {"prompt_tokens": 40, "completion_tokens": 8, "total_tokens": 48}
        });

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "llama-3.3-70b-versatile",
                "max_tokens": 200,
                "temperature": 0.7,
                "messages": [
                    {"role": "system", "content": "You are an interviewer AI for HR and technical rounds."},
                    {"role": "user", "content": "Start a new interview."}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .expect(1)
            .mount(&server)
            .await;

        let content = provider(&server)
            .complete(&completion_request())
            .await
            .unwrap();
        assert_eq!(content, "Tell me about yourself.");
    }

    #[tokio::test]
    async fn empty_choices_are_invalid() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let err = provider(&server)
            .complete(&completion_request())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProviderError::InvalidResponse(ref m) if m == "response has no choices"
        ));
    }

    #[tokio::test]
    async fn null_content_is_invalid() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": null}, "index": 0}]
            })))
            .mount(&server)
            .await;

        let err = provider(&server)
            .complete(&completion_request())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProviderError::InvalidResponse(ref m) if m == "choice has no content"
        ));
    }

    #[tokio::test]
    async fn empty_content_is_returned_as_is() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": ""}, "index": 0}]
            })))
            .mount(&server)
            .await;

        let content = provider(&server)
            .complete(&completion_request())
            .await
            .unwrap();
        assert_eq!(content, "");
    }

    #[tokio::test]
    async fn error_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .mount(&server)
            .await;

        let err = provider(&server)
            .complete(&completion_request())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::ApiError { status: 500, .. }));
        assert!(err.to_string().contains("internal error"));
    }

    #[tokio::test]
    async fn auth_and_rate_limit_responses() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/audio/transcriptions"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "3"))
            .mount(&server)
            .await;

        let err = provider(&server)
            .complete(&completion_request())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::AuthenticationFailed(ref body) if body == "invalid api key"));

        let dir = tempfile::tempdir().unwrap();
        let request = TranscriptionRequest {
            audio_path: audio_file(&dir),
            model: "whisper-large-v3".into(),
            language: "en".into(),
        };
        let err = provider(&server).transcribe(&request).await.unwrap_err();
        assert!(matches!(
            err,
            ProviderError::RateLimited {
                retry_after_ms: 3000
            }
        ));
    }

    #[tokio::test]
    async fn transcription_sends_multipart_form() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/audio/transcriptions"))
            .and(header("Authorization", "Bearer test-key"))
            .and(body_string_contains("whisper-large-v3"))
            .and(body_string_contains("fake-audio-bytes"))
            .and(body_string_contains("answer.webm"))
            .and(body_string_contains("name=\"language\"\r\n\r\nen\r\n"))
            .and(body_string_contains("name=\"response_format\""))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"text": " I enjoy building APIs."})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let request = TranscriptionRequest {
            audio_path: audio_file(&dir),
            model: "whisper-large-v3".into(),
            language: "en".into(),
        };
        let text = provider(&server).transcribe(&request).await.unwrap();
        assert_eq!(text, " I enjoy building APIs.");
    }

    #[tokio::test]
    async fn transcription_plain_text_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/audio/transcriptions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("plain transcript"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let request = TranscriptionRequest {
            audio_path: audio_file(&dir),
            model: "whisper-large-v3".into(),
            language: "en".into(),
        };
        let text = provider(&server).transcribe(&request).await.unwrap();
        assert_eq!(text, "plain transcript");
    }

    #[tokio::test]
    async fn transcription_without_text_is_invalid() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/audio/transcriptions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"segments": []})),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let request = TranscriptionRequest {
            audio_path: audio_file(&dir),
            model: "whisper-large-v3".into(),
            language: "en".into(),
        };
        let err = provider(&server).transcribe(&request).await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn missing_audio_file() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let request = TranscriptionRequest {
            audio_path: PathBuf::from("/nonexistent/answer.webm"),
            model: "whisper-large-v3".into(),
            language: "en".into(),
        };
        let err = provider(&server).transcribe(&request).await.unwrap_err();
        assert!(matches!(err, ProviderError::AudioFile { .. }));
        assert!(err.to_string().contains("/nonexistent/answer.webm"));
    }

    #[test]
    fn trailing_slash_in_base_url() {
        let provider =
            GroqProvider::new("key", Some("http://localhost:9000/".into()), 5).unwrap();
        assert_eq!(provider.base_url, "http://localhost:9000");
        assert_eq!(provider.name(), "groq");
    }
}
