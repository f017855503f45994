//! Request extractors.

pub mod caller;

pub use caller::{CallerIdentity, OptionalCaller};
