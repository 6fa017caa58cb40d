//! AI module tests
//!
//! - `AiService` checks against a stub client
//! - Gemini response decoding
//! - `GeminiClient` against a local mock server
