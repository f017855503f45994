//! Domain layer for the Secret Santa backend.
//!
//! This crate contains:
//! - Domain models (Participant, Assignment, Settings)
//! - Business logic (admin authorization, draw candidate selection)
//! - The notification contract consumed by the assignment engine

pub mod models;
pub mod services;
