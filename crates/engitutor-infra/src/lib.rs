//! Infrastructure layer for Engitutor.
//!
//! Contains implementations of the repository and provider traits defined
//! in `engitutor-core`: SQLite storage and the OpenAI completion provider,
//! plus environment-based configuration.

pub mod config;
pub mod llm;
pub mod sqlite;
