//! Pluggable local AI backend abstraction for the money coach
//!
//! All backends run locally (no cloud APIs) - Ollama, OpenAI-compatible
//! servers, etc. The coach answers free-form money questions grounded in the
//! user's own numbers; the prompt carries a financial snapshot so the model
//! never has to guess at balances.
//!
//! # Configuration
//!
//! Environment variables:
//! - `AI_BACKEND`: Backend to use (ollama, openai_compatible, mock). Default: ollama
//! - `OLLAMA_HOST`: Ollama server URL (required for ollama backend)
//! - `OLLAMA_MODEL`: Default model name (default: llama3.2)
//! - `OPENAI_COMPATIBLE_HOST`: Server URL (required for openai_compatible backend)
//! - `OPENAI_COMPATIBLE_MODEL`: Model name (default: gpt-3.5-turbo)
//! - `OPENAI_COMPATIBLE_API_KEY`: API key if required (optional)

mod mock;
mod ollama;
mod openai_compatible;

pub use mock::MockBackend;
pub use ollama::OllamaBackend;
pub use openai_compatible::OpenAICompatibleBackend;

use async_trait::async_trait;

use crate::error::Result;
use crate::metrics::{GoalView, Summary};
use crate::models::ChatMessage;

/// Financial snapshot handed to the coach with every question
///
/// Built from the metrics engine so the coach's numbers always match the
/// dashboard.
#[derive(Debug, Clone, Default)]
pub struct CoachContext {
    pub summary: Summary,
    pub goals: Vec<GoalView>,
}

impl CoachContext {
    /// Render the snapshot as prompt text
    pub fn render(&self) -> String {
        let mut lines = vec![
            "User's financial snapshot:".to_string(),
            format!("- Monthly income: ₹{:.0}", self.summary.total_income),
            format!("- Monthly expenses: ₹{:.0}", self.summary.total_expenses),
            format!("- Current balance: ₹{:.0}", self.summary.current_balance),
            format!("- Savings rate: {:.1}%", self.summary.savings_rate),
            format!(
                "- Financial health score: {:.1}/10",
                self.summary.financial_health_score
            ),
        ];
        for goal in &self.goals {
            lines.push(format!(
                "- Goal '{}': ₹{:.0} of ₹{:.0} ({:.0}%), {} days left",
                goal.name,
                goal.current_amount,
                goal.target_amount,
                goal.progress_percent,
                goal.days_left,
            ));
        }
        lines.join("\n")
    }
}

/// Trait defining the interface for all coach backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait CoachBackend: Send + Sync {
    /// Answer a money question grounded in the user's snapshot and recent history
    async fn coach_reply(
        &self,
        context: &CoachContext,
        history: &[ChatMessage],
        question: &str,
    ) -> Result<String>;

    /// Check if the backend is available
    async fn health_check(&self) -> bool;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Build the full prompt sent to text-completion backends
fn build_prompt(context: &CoachContext, history: &[ChatMessage], question: &str) -> String {
    let mut prompt = String::from(
        "You are a friendly personal finance coach. Give short, practical advice \
         in plain language, using the snapshot below. Do not invent numbers.\n\n",
    );
    prompt.push_str(&context.render());
    prompt.push_str("\n\n");
    for message in history {
        prompt.push_str(&format!("{}: {}\n", message.role, message.content));
    }
    prompt.push_str(&format!("user: {}\nassistant:", question));
    prompt
}

/// Concrete coach client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AiClient {
    /// Ollama backend (HTTP API)
    Ollama(OllamaBackend),
    /// OpenAI-compatible backend (Docker Model Runner, vLLM, LocalAI, llama-server, etc.)
    OpenAICompatible(OpenAICompatibleBackend),
    /// Mock backend for testing and offline use
    Mock(MockBackend),
}

impl AiClient {
    /// Create a coach client from environment variables
    ///
    /// Checks `AI_BACKEND` to determine which backend to use:
    /// - `ollama` (default): Uses OLLAMA_HOST and OLLAMA_MODEL
    /// - `openai_compatible`: Uses OPENAI_COMPATIBLE_HOST and OPENAI_COMPATIBLE_MODEL
    /// - `mock`: Offline keyword-routed replies
    ///
    /// Falls back to the mock backend when the required variables are unset so
    /// the chat endpoints always answer.
    pub fn from_env() -> Self {
        let backend = std::env::var("AI_BACKEND").unwrap_or_else(|_| "ollama".to_string());

        let client = match backend.to_lowercase().as_str() {
            "ollama" => OllamaBackend::from_env().map(AiClient::Ollama),
            "openai_compatible" | "openai" | "vllm" | "localai" | "llamacpp" => {
                OpenAICompatibleBackend::from_env().map(AiClient::OpenAICompatible)
            }
            "mock" => Some(AiClient::Mock(MockBackend::new())),
            _ => {
                tracing::warn!(backend = %backend, "Unknown AI_BACKEND, falling back to ollama");
                OllamaBackend::from_env().map(AiClient::Ollama)
            }
        };

        client.unwrap_or_else(|| {
            tracing::info!("No AI backend configured, coach will use offline replies");
            AiClient::Mock(MockBackend::new())
        })
    }

    /// Create an Ollama backend directly
    pub fn ollama(host: &str, model: &str) -> Self {
        AiClient::Ollama(OllamaBackend::new(host, model))
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AiClient::Mock(MockBackend::new())
    }
}

#[async_trait]
impl CoachBackend for AiClient {
    async fn coach_reply(
        &self,
        context: &CoachContext,
        history: &[ChatMessage],
        question: &str,
    ) -> Result<String> {
        match self {
            AiClient::Ollama(b) => b.coach_reply(context, history, question).await,
            AiClient::OpenAICompatible(b) => b.coach_reply(context, history, question).await,
            AiClient::Mock(b) => b.coach_reply(context, history, question).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AiClient::Ollama(b) => b.health_check().await,
            AiClient::OpenAICompatible(b) => b.health_check().await,
            AiClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AiClient::Ollama(b) => b.model(),
            AiClient::OpenAICompatible(b) => b.model(),
            AiClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AiClient::Ollama(b) => b.host(),
            AiClient::OpenAICompatible(b) => b.host(),
            AiClient::Mock(b) => b.host(),
        }
    }
}
