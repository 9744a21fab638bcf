//! Interview gateway.
//!
//! Turns the three interview operations (transcribe, next question,
//! evaluate) into calls on a [`ModelProvider`], with fixed prompts and
//! generation parameters, and normalizes what comes back.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::error::ProviderError;
use crate::model::{Evaluation, EvaluationResult};
use crate::prompts::{
    evaluation_prompt, question_prompt, DEFAULT_CHAT_MODEL, DEFAULT_TRANSCRIPTION_MODEL,
    EVALUATION_MAX_TOKENS, EVALUATION_TEMPERATURE, EVALUATOR_SYSTEM_PROMPT,
    INTERVIEWER_SYSTEM_PROMPT, QUESTION_MAX_TOKENS, QUESTION_TEMPERATURE,
    TRANSCRIPTION_LANGUAGE,
};
use crate::traits::{CompletionRequest, ModelProvider, TranscriptionRequest};

/// Model identifiers used by the gateway.
#[derive(Debug, Clone)]
pub struct GatewayModels {
    pub chat: String,
    pub transcription: String,
}

impl Default for GatewayModels {
    fn default() -> Self {
        Self {
            chat: DEFAULT_CHAT_MODEL.to_string(),
            transcription: DEFAULT_TRANSCRIPTION_MODEL.to_string(),
        }
    }
}

/// Built once at startup and shared by every request.
#[derive(Clone)]
pub struct InterviewGateway {
    provider: Arc<dyn ModelProvider>,
    models: GatewayModels,
}

impl InterviewGateway {
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self::with_models(provider, GatewayModels::default())
    }

    pub fn with_models(provider: Arc<dyn ModelProvider>, models: GatewayModels) -> Self {
        Self { provider, models }
    }

    /// Name of the underlying provider.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn models(&self) -> &GatewayModels {
        &self.models
    }

    /// Transcribe the audio file at `audio_path` to English text.
    #[instrument(skip(self), fields(provider = %self.provider.name()))]
    pub async fn transcribe(&self, audio_path: &Path) -> Result<String, ProviderError> {
        let request = TranscriptionRequest {
            audio_path: audio_path.to_path_buf(),
            model: self.models.transcription.clone(),
            language: TRANSCRIPTION_LANGUAGE.to_string(),
        };
        self.provider.transcribe(&request).await
    }

    /// Ask for the next interview question.
    ///
    /// A blank `previous_answer` starts a new interview; otherwise the answer
    /// is embedded in a follow-up prompt.
    #[instrument(skip_all, fields(provider = %self.provider.name()))]
    pub async fn generate_question(&self, previous_answer: &str) -> Result<String, ProviderError> {
        let request = CompletionRequest {
            model: self.models.chat.clone(),
            system_prompt: INTERVIEWER_SYSTEM_PROMPT.to_string(),
            prompt: question_prompt(previous_answer),
            max_tokens: QUESTION_MAX_TOKENS,
            temperature: QUESTION_TEMPERATURE,
        };
        let content = self.provider.complete(&request).await?;
        Ok(content.trim().to_string())
    }

    /// Evaluate a candidate answer.
    ///
    /// Blank answers short-circuit without a remote call. Output that is not
    /// valid JSON degrades to a fallback result; only transport failures are
    /// returned as errors.
    #[instrument(skip_all, fields(provider = %self.provider.name()))]
    pub async fn evaluate_answer(&self, answer: &str) -> Result<Evaluation, ProviderError> {
        if answer.trim().is_empty() {
            return Ok(EvaluationResult::no_answer().into());
        }

        let request = CompletionRequest {
            model: self.models.chat.clone(),
            system_prompt: EVALUATOR_SYSTEM_PROMPT.to_string(),
            prompt: evaluation_prompt(answer),
            max_tokens: EVALUATION_MAX_TOKENS,
            temperature: EVALUATION_TEMPERATURE,
        };
        let raw = self.provider.complete(&request).await?;
        let evaluation = parse_evaluation(&raw);
        debug!(fallback = evaluation.is_fallback(), "evaluation parsed");
        Ok(evaluation)
    }
}

/// Strip markdown code fences and surrounding whitespace from model output.
pub fn clean_model_output(raw: &str) -> String {
    raw.trim()
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Parse raw evaluator output.
///
/// Valid JSON is returned as-is; anything else becomes
/// [`EvaluationResult::unparsable`] carrying the cleaned text.
pub fn parse_evaluation(raw: &str) -> Evaluation {
    let cleaned = clean_model_output(raw);
    debug!(raw = %raw, cleaned = %cleaned, "evaluator output");

    match serde_json::from_str::<serde_json::Value>(&cleaned) {
        Ok(value) => Evaluation::Model(value),
        Err(e) => {
            warn!(error = %e, "evaluator output is not valid JSON");
            EvaluationResult::unparsable(&cleaned).into()
        }
    }
}
