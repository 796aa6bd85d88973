//! Shared domain types for Engitutor.
//!
//! This crate has no business logic: it defines the data shapes exchanged
//! between the core, infra, and API layers, plus the error enums used
//! across crate boundaries.

pub mod chat;
pub mod error;
pub mod llm;
pub mod profile;
