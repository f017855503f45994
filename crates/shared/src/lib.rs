//! Shared utilities for the Secret Santa backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Bearer token issuing and verification
//! - Common validation logic (email normalization, field clamping)

pub mod token;
pub mod validation;
