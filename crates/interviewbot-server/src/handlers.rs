//! API request handlers.

use std::io::Write;
use std::path::{Path, PathBuf};

use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, error, info, warn};

use interviewbot_core::error::{ProviderError, ServiceError};
use interviewbot_core::model::Evaluation;

use crate::error::ApiError;
use crate::state::AppState;

/// Multipart field carrying the audio upload.
const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Serialize, Deserialize)]
pub struct TranscribeResponse {
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct NextQuestionParams {
    #[serde(default)]
    pub prev_answer: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub question: String,
}

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    pub evaluation: Evaluation,
}

fn log_provider_error(operation: &str, err: &ProviderError) {
    if err.is_remote_rejection() {
        warn!(operation, error = %err, "model provider rejected request");
    } else {
        error!(operation, error = %err, "model provider call failed");
    }
}

/// POST /api/transcribe - transcribe an uploaded audio file
pub async fn transcribe(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TranscribeResponse>, ApiError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(UPLOAD_FIELD) {
            let suffix = upload_suffix(field.file_name());
            let bytes = field.bytes().await?;
            upload = Some((suffix, bytes));
            break;
        }
    }
    let (suffix, bytes) =
        upload.ok_or_else(|| ApiError::unprocessable(format!("field required: {UPLOAD_FIELD}")))?;

    // The staged file is removed when `staged` drops, whatever happens below.
    let staged = stage_upload(state.scratch_dir.clone(), suffix, bytes.to_vec())
        .await
        .map_err(|e| {
            error!(error = %e, "failed to stage upload");
            ApiError::internal(e.to_string())
        })?;

    let result = state.gateway.transcribe(staged.path()).await;
    drop(staged);

    let text = result.map_err(|e| {
        log_provider_error("transcribe", &e);
        ApiError::internal(e.to_string())
    })?;

    info!(chars = text.len(), "transcribed upload");
    Ok(Json(TranscribeResponse { text }))
}

/// Temp-file suffix preserving the upload's extension, if any.
fn upload_suffix(file_name: Option<&str>) -> String {
    file_name
        .and_then(|name| Path::new(name).extension())
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

/// Write the upload to a named temp file inside `dir`.
async fn stage_upload(
    dir: PathBuf,
    suffix: String,
    bytes: Vec<u8>,
) -> Result<NamedTempFile, ServiceError> {
    let staged = tokio::task::spawn_blocking(move || -> std::io::Result<NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(&suffix)
            .tempfile_in(&dir)?;
        file.write_all(&bytes)?;
        file.flush()?;
        Ok(file)
    })
    .await
    .map_err(std::io::Error::other)??;
    Ok(staged)
}

/// GET /api/next_question - generate the next interview question
pub async fn next_question(
    State(state): State<AppState>,
    Query(params): Query<NextQuestionParams>,
) -> Result<Json<QuestionResponse>, ApiError> {
    let question = state
        .gateway
        .generate_question(&params.prev_answer)
        .await
        .map_err(|e| {
            log_provider_error("next_question", &e);
            ApiError::internal(format!("Failed to generate question: {e}"))
        })?;

    Ok(Json(QuestionResponse { question }))
}

/// POST /api/evaluate - score an answer and log it
pub async fn evaluate(
    State(state): State<AppState>,
    payload: Result<Json<EvaluateRequest>, JsonRejection>,
) -> Result<Json<EvaluateResponse>, ApiError> {
    let Json(request) = payload?;
    let evaluation = state
        .gateway
        .evaluate_answer(&request.answer)
        .await
        .map_err(|e| {
            log_provider_error("evaluate", &e);
            ApiError::internal(format!("Evaluation failed: {e}"))
        })?;

    record_session(&state, request.answer, &evaluation).await;

    Ok(Json(EvaluateResponse { evaluation }))
}

/// Append the evaluated answer to the session log. Failures are only logged.
async fn record_session(state: &AppState, answer: String, evaluation: &Evaluation) {
    let serialized = match evaluation.to_json_string() {
        Ok(s) => s,
        Err(e) => {
            warn!(error = %e, "failed to serialize evaluation; session not saved");
            return;
        }
    };

    let sessions = state.sessions.clone();
    let outcome =
        tokio::task::spawn_blocking(move || sessions.append("", &answer, &serialized)).await;

    match outcome {
        Ok(Ok(())) => debug!("session record saved"),
        Ok(Err(e)) => warn!(error = %e, "failed to save session record"),
        Err(e) => warn!(error = %e, "session record task failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_keeps_extension() {
        assert_eq!(upload_suffix(Some("answer.webm")), ".webm");
        assert_eq!(upload_suffix(Some("recording.final.wav")), ".wav");
        assert_eq!(upload_suffix(Some("blob")), "");
        assert_eq!(upload_suffix(None), "");
    }

    #[tokio::test]
    async fn staged_upload_is_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let staged = stage_upload(dir.path().to_path_buf(), ".wav".into(), vec![1, 2, 3])
            .await
            .unwrap();
        let path = staged.path().to_path_buf();
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
        assert!(path.to_string_lossy().ends_with(".wav"));

        drop(staged);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn staging_into_missing_directory_fails() {
        let err = stage_upload(PathBuf::from("/nonexistent/scratch"), String::new(), vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Io(_)));
    }
}
