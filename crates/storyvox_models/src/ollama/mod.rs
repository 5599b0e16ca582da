//! Ollama text generation.

mod client;
mod prompt;

pub use client::OllamaTextGenerator;
