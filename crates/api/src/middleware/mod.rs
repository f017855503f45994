//! HTTP middleware and logging setup.

pub mod logging;
