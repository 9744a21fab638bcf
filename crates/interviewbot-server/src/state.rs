//! Shared application state.

use std::path::PathBuf;
use std::sync::Arc;

use interviewbot_core::gateway::InterviewGateway;
use interviewbot_core::traits::SessionLog;
use interviewbot_providers::config::DEFAULT_MAX_UPLOAD_BYTES;

/// Built once at startup and cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub gateway: InterviewGateway,
    pub sessions: Arc<dyn SessionLog>,
    /// Directory uploads are staged in while being transcribed.
    pub scratch_dir: PathBuf,
    /// Largest request body accepted by `/api/transcribe`.
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(gateway: InterviewGateway, sessions: Arc<dyn SessionLog>) -> Self {
        Self {
            gateway,
            sessions,
            scratch_dir: std::env::temp_dir(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    pub fn with_max_upload_bytes(mut self, limit: usize) -> Self {
        self.max_upload_bytes = limit;
        self
    }
}
