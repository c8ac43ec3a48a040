//! Unique-index build validation.
//!
//! The validator issues one create-index request against an already loaded
//! collection and compares the classified outcome with the expected one.
//! Index builds are deterministic over committed data, so there is no retry.

pub mod error;
pub mod validator;

pub use error::ValidatorError;
pub use validator::{IndexOutcome, Validator};
