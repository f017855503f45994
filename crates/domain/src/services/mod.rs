//! Business logic services.

pub mod admin;
pub mod draw;
pub mod notification;

pub use admin::is_admin;
pub use notification::{AssignmentNotification, AssignmentNotifier, MockNotifier, NotifyError};
