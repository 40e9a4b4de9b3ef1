//! UI-facing bindings for the emoji survey core.

pub mod api;
