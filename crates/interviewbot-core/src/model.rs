//! Core data model types for interviewbot.
//!
//! These are the values that travel between the gateway, the router, and the
//! session store.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Structured verdict on a single candidate answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Expected to lie in 0–10. Never clamped.
    pub score: f64,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl EvaluationResult {
    /// Result returned for a blank answer.
    pub fn no_answer() -> Self {
        Self {
            score: 0.0,
            strengths: vec![],
            weaknesses: vec!["No answer provided.".to_string()],
            suggestions: vec!["Please respond to the question.".to_string()],
        }
    }

    /// Result returned when the model's output is not valid JSON.
    ///
    /// The cleaned output is kept in `suggestions` so it can be inspected.
    pub fn unparsable(cleaned_output: &str) -> Self {
        Self {
            score: 0.0,
            strengths: vec![],
            weaknesses: vec!["Failed to parse model output.".to_string()],
            suggestions: vec![cleaned_output.to_string()],
        }
    }
}

/// What the evaluator hands back for an answer.
///
/// The model's JSON is passed through untouched: no schema check, no score
/// clamping. Locally built results cover the blank-answer and parse-failure
/// paths. Both serialize to their plain JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Evaluation {
    /// JSON produced by the model, verbatim.
    Model(serde_json::Value),
    /// Result built locally without model output.
    Fallback(EvaluationResult),
}

impl Evaluation {
    /// Returns `true` if this evaluation was built locally.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Evaluation::Fallback(_))
    }

    /// Typed view of the evaluation, if the model's JSON has the expected shape.
    pub fn as_result(&self) -> Option<EvaluationResult> {
        match self {
            Evaluation::Model(value) => serde_json::from_value(value.clone()).ok(),
            Evaluation::Fallback(result) => Some(result.clone()),
        }
    }

    /// Serialize to the JSON text stored alongside the session record.
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl From<EvaluationResult> for Evaluation {
    fn from(result: EvaluationResult) -> Self {
        Evaluation::Fallback(result)
    }
}

/// One persisted row of the `sessions` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Assigned by the store, strictly increasing.
    pub id: i64,
    /// May be empty.
    pub question: String,
    pub answer: String,
    /// Serialized evaluation JSON.
    pub evaluation: String,
    pub created_at: NaiveDateTime,
}

/// Body returned by a transcription endpoint.
///
/// Providers disagree on the shape: a JSON object with a `text` field, some
/// other JSON mapping, or the bare transcript.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TranscriptionPayload {
    Object { text: String },
    Mapping(serde_json::Map<String, serde_json::Value>),
    Plain(String),
}

impl TranscriptionPayload {
    /// Decode a raw response body. Bodies that are not JSON are plain text.
    pub fn from_body(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_else(|_| TranscriptionPayload::Plain(body.to_string()))
    }

    /// Extract the transcript text.
    ///
    /// Returns `None` for a mapping that carries no `text` entry.
    pub fn into_text(self) -> Option<String> {
        match self {
            TranscriptionPayload::Object { text } => Some(text),
            TranscriptionPayload::Mapping(mut map) => match map.remove("text")? {
                serde_json::Value::String(text) => Some(text),
                serde_json::Value::Null => None,
                other => Some(other.to_string()),
            },
            TranscriptionPayload::Plain(text) => Some(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn no_answer_serializes_to_fixed_shape() {
        let evaluation = Evaluation::from(EvaluationResult::no_answer());
        assert_eq!(
            serde_json::to_value(&evaluation).unwrap(),
            json!({
                "score": 0.0,
                "strengths": [],
                "weaknesses": ["No answer provided."],
                "suggestions": ["Please respond to the question."]
            })
        );
    }

    #[test]
    fn model_evaluation_serializes_verbatim() {
        let raw = json!({"score": 7, "strengths": ["clear"], "extra": true});
        let evaluation = Evaluation::Model(raw.clone());
        assert_eq!(serde_json::to_value(&evaluation).unwrap(), raw);
        assert_eq!(evaluation.to_json_string().unwrap(), raw.to_string());
    }

    #[test]
    fn typed_view_of_model_evaluation() {
        let evaluation = Evaluation::Model(json!({
            "score": 12.5,
            "strengths": ["depth"],
            "weaknesses": [],
            "suggestions": ["shorter"]
        }));
        let result = evaluation.as_result().unwrap();
        assert_eq!(result.score, 12.5);
        assert_eq!(result.suggestions, vec!["shorter"]);

        let odd = Evaluation::Model(json!({"score": "high"}));
        assert!(odd.as_result().is_none());
    }

    #[test]
    fn transcription_payload_object() {
        let payload = TranscriptionPayload::from_body(r#"{"text": "hello there", "x_groq": {}}"#);
        assert!(matches!(payload, TranscriptionPayload::Object { .. }));
        assert_eq!(payload.into_text().as_deref(), Some("hello there"));
    }

    #[test]
    fn transcription_payload_plain_text_body() {
        let payload = TranscriptionPayload::from_body("hello there");
        assert_eq!(payload, TranscriptionPayload::Plain("hello there".into()));
        assert_eq!(payload.into_text().as_deref(), Some("hello there"));
    }

    #[test]
    fn transcription_payload_json_string() {
        let payload = TranscriptionPayload::from_body(r#""quoted transcript""#);
        assert_eq!(payload.into_text().as_deref(), Some("quoted transcript"));
    }

    #[test]
    fn transcription_payload_mapping_without_text() {
        let payload = TranscriptionPayload::from_body(r#"{"segments": []}"#);
        assert!(matches!(payload, TranscriptionPayload::Mapping(_)));
        assert_eq!(payload.into_text(), None);
    }

    #[test]
    fn transcription_payload_mapping_with_non_string_text() {
        let payload = TranscriptionPayload::from_body(r#"{"text": 42}"#);
        assert_eq!(payload.into_text().as_deref(), Some("42"));
    }
}
