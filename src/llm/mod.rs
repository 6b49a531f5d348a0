//! LLM Provider Clients and Abstractions
//!
//! This module provides a unified interface for the text-generation backend
//! behind every research stage. Provider-specific implementations sit behind
//! the [`LLMClient`] trait so stages never depend on a concrete API.
//!
//! # Architecture
//!
//! - [`LLMClient`] - The core trait that all providers implement
//! - [`LLMClientFactory`] - Builds per-stage clients from the configured [`Provider`]
//! - [`structured`] - Asks a backend for a value of a declared output shape
//!
//! # Supported Providers
//!
//! Enable providers via Cargo features:
//! - `ollama` - Local Ollama server (default)
//! - `openai` - OpenAI API and compatible endpoints

/// Core LLM client trait and provider selection.
pub mod client;
/// Structured (schema-shaped) generation on top of any client.
pub mod structured;

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "openai")]
pub mod openai;

pub use client::{LLMClient, LLMClientFactory, Provider};
pub use structured::{generate_structured, parse_structured, OutputShape};
