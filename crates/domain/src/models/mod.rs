//! Domain models for the Secret Santa backend.

pub mod assignment;
pub mod participant;
pub mod participation;
pub mod settings;

pub use assignment::{
    Assignment, AssignmentListResponse, AssignmentRecord, AssignmentResponse, DrawResponse,
};
pub use participant::{
    Participant, ParticipantResponse, RosterEntry, RosterEntryInput, RosterReplaceResponse,
    RosterUploadRequest,
};
pub use participation::{ParticipationMember, ParticipationResponse, ParticipationStats};
pub use settings::{
    PublicSettingsResponse, Settings, SettingsResponse, UpdateSettingsRequest, MASKED_PASSWORD,
    SETTINGS_ID,
};
