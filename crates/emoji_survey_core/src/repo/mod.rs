//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the survey store contract used by services.
//! - Isolate SQLite query details from use-case orchestration.
//!
//! # Invariants
//! - Write paths call `SurveyResponse::validate()` before SQL mutations.
//! - Read paths drop rows that no longer parse instead of failing the read.

pub mod response_repo;
