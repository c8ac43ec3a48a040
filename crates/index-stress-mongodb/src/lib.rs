//! MongoDB backend for the unique-index stress harness.

pub mod args;
pub mod client;
pub mod error;

pub use args::MongoDBArgs;
pub use client::MongoDBClient;
pub use error::{classify, MongoDBClientError};
