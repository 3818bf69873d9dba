//! OpenAI-compatible chat completions client.
//!
//! Serves Mistral (`https://api.mistral.ai/v1`) and GROQ
//! (`https://api.groq.com/openai/v1`), which share the
//! `POST /chat/completions` request and response shape.

mod api;
mod client;
mod config;

pub use client::OpenAiCompatClient;
pub use config::OpenAiCompatConfig;
