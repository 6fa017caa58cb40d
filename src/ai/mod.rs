// Copyright 2025 bakri (tidynest@proton.me)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Generative-language integration for the "ask a question" page
//!
//! # Layers
//!
//! - **`AiClient`**: one remote text-generation call (prompt in, text out)
//! - **`GeminiClient`**: the production client, talking to the Google
//!   Generative Language REST API
//! - **`AiService`**: what the web layer calls. It owns an optional client
//!   and performs the checks every request needs before going remote:
//!   client availability first, then a non-blank prompt
//!
//! A missing API key does not stop the site. The service is built without
//! a client and every question is answered with `AiError::Unavailable`.
//!
//! # Example
//! ```
//! use termbook::ai::AiService;
//!
//! let service = AiService::unavailable("GOOGLE_API_KEY is not set");
//! assert!(!service.is_available());
//! assert_eq!(service.model(), None);
//! ```

pub mod gemini;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

pub use gemini::GeminiClient;

/// Errors surfaced by the AI page
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AiError {
    /// No client was configured (e.g. missing API key)
    #[error("The AI model is not available: {0}")]
    Unavailable(String),

    /// Prompt blank after trimming
    #[error("Please type your question.")]
    EmptyPrompt,

    /// Network or transport failure
    #[error("Request to the AI service failed: {0}")]
    Request(String),

    /// The API answered with a non-success status
    #[error("AI service returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// The API answered but produced no text (e.g. blocked prompt)
    #[error("AI service returned no text: {0}")]
    EmptyResponse(String),

    /// The response body could not be decoded
    #[error("Invalid response from AI service: {0}")]
    InvalidResponse(String),
}

/// A remote text-generation backend
#[async_trait]
pub trait AiClient: Send + Sync {
    /// Model identifier, for logging and display
    fn model(&self) -> &str;

    /// Generates an answer for a non-blank prompt
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;
}

/// Entry point used by the router
///
/// Cheap to clone; the client is shared.
#[derive(Clone)]
pub struct AiService {
    client: Option<Arc<dyn AiClient>>,
    unavailable_reason: String,
}

impl AiService {
    /// Service backed by `client`
    pub fn new(client: Arc<dyn AiClient>) -> Self {
        Self {
            client: Some(client),
            unavailable_reason: String::new(),
        }
    }

    /// Service with no client; every question fails with `reason`
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            client: None,
            unavailable_reason: reason.into(),
        }
    }

    /// Returns true if a client is configured
    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }

    /// Model name of the configured client
    pub fn model(&self) -> Option<&str> {
        self.client.as_deref().map(|c| c.model())
    }

    /// Asks a question
    ///
    /// # Errors
    ///
    /// - `Unavailable` if no client is configured (checked first)
    /// - `EmptyPrompt` if the prompt is blank
    /// - any error from the client call, unchanged; no retries
    pub async fn ask(&self, prompt: &str) -> Result<String, AiError> {
        let Some(client) = &self.client else {
            return Err(AiError::Unavailable(self.unavailable_reason.clone()));
        };

        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(AiError::EmptyPrompt);
        }

        info!(model = client.model(), prompt_chars = prompt.chars().count(), "sending prompt");
        match client.generate(prompt).await {
            Ok(answer) => Ok(answer),
            Err(e) => {
                warn!(model = client.model(), "AI request failed: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests;
