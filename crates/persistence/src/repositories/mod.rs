//! Repository layer for database access.

pub mod assignment;
pub mod participant;
pub mod settings;

pub use assignment::AssignmentRepository;
pub use participant::ParticipantRepository;
pub use settings::SettingsRepository;
