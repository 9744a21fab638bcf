//! interviewbot-providers — remote model provider integrations.
//!
//! Implements the `ModelProvider` trait for Groq's OpenAI-compatible API,
//! plus a mock provider and the configuration that selects between them.

pub mod config;
pub mod groq;
pub mod mock;

pub use config::{
    create_provider, load_config_from, InterviewbotConfig, ProviderConfig, ServerConfig,
};
pub use groq::GroqProvider;
pub use mock::MockProvider;
