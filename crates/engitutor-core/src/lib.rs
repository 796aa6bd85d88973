//! Core business logic for Engitutor.
//!
//! This crate defines the two orchestration pieces of the system -- the
//! chat relay and the conversation session controller -- plus the traits
//! they depend on. Concrete implementations (SQLite, OpenAI) live in
//! engitutor-infra; this crate never depends on infrastructure.

pub mod chat;
pub mod llm;
pub mod profile;
pub mod relay;
