//! CHED Chat API Library
//!
//! This library serves the Philippine CHED institution dataset over HTTP and
//! answers natural-language questions about it through a resilient chat
//! gateway: an ordered Gemini model failover chain with a deterministic
//! local responder as terminal fallback.
//!
//! # Modules
//!
//! - `chat`: Chat gateway orchestration.
//! - `chat_models`: Caller-facing chat payloads and Gemini wire models.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `failover`: Ordered model failover chain.
//! - `fallback`: Offline keyword responder.
//! - `gemini`: Gemini API client.
//! - `guardrail`: System instruction composition.
//! - `handlers`: HTTP request handlers.
//! - `models`: Dataset models.
//! - `store`: In-memory institution store and CSV ingestion.

pub mod chat;
pub mod chat_models;
pub mod config;
pub mod errors;
pub mod failover;
pub mod fallback;
pub mod gemini;
pub mod guardrail;
pub mod handlers;
pub mod models;
pub mod store;
