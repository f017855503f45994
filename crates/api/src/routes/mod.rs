//! Route handlers.

pub mod assignments;
pub mod draw;
pub mod health;
pub mod participation;
pub mod reminders;
pub mod roster;
pub mod settings;
