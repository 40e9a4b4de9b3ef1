//! Read-only result sharing.
//!
//! # Responsibility
//! - Encode/decode the aggregate snapshot embedded in share links.
//! - Build the display report rendered by the shared view.
//!
//! # Invariants
//! - A snapshot is detached from the live store.
//! - Decoding and reporting degrade to `None` / a placeholder report; they
//!   never fail.

pub mod link;
pub mod report;
