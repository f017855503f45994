//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod assignment;
pub mod participant;
pub mod settings;

pub use assignment::{AssignmentEntity, AssignmentRecordEntity, AssignmentWithReceiverEntity};
pub use participant::ParticipantEntity;
pub use settings::SettingsEntity;
