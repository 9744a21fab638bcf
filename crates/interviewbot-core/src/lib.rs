//! interviewbot-core — data model, traits, and the interview gateway.
//!
//! This crate defines the evaluation and session types, the error taxonomy,
//! the provider and session-log traits, and the prompt orchestration that
//! the rest of interviewbot builds on.

pub mod error;
pub mod gateway;
pub mod model;
pub mod prompts;
pub mod traits;

pub use error::{ProviderError, ServiceError};
pub use gateway::{GatewayModels, InterviewGateway};
pub use model::{Evaluation, EvaluationResult, SessionRecord, TranscriptionPayload};
