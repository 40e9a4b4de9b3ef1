//! Survey domain model.
//!
//! # Responsibility
//! - Define the canonical response record and its closed answer domains.
//! - Define the unvalidated draft shape and the boundary validation that
//!   turns it into a response.
//!
//! # Invariants
//! - A `SurveyResponse` that passed `validate()` satisfies every field
//!   constraint; the store never persists one that did not.
//! - Drafts are never trusted past the store boundary without validation.

pub mod draft;
pub mod response;
