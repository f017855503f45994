//! Application services: authorization gate, draw orchestration, email
//! delivery.

pub mod authz;
pub mod draw;
pub mod email;
