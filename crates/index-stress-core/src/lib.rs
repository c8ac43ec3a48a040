//! Core types for the unique-index stress harness.
//!
//! This crate holds everything the loader and validator share: the document
//! model, value generators, index specifications, the [`DatabaseClient`]
//! abstraction and an in-memory client used for tests and dry runs.
//!
//! # Architecture
//!
//! ```text
//!  ValueGenerator ──► Loader ──insert_many──┐
//!                                           ▼
//!                                   DatabaseClient (MongoDB / memory)
//!                                           ▲
//!  ExpectedOutcome ─► Validator ─create_index┘
//! ```

pub mod client;
pub mod document;
pub mod error;
pub mod generator;
pub mod index;
pub mod memory;

pub use client::DatabaseClient;
pub use document::{Document, DEFAULT_FIELD};
pub use error::ClientError;
pub use generator::ValueGenerator;
pub use index::{ExpectedOutcome, IndexDirection, IndexSpec};
pub use memory::MemoryClient;

/// Default maximum number of documents per bulk insert.
pub const DEFAULT_CHUNK_SIZE: i64 = 100_000;
