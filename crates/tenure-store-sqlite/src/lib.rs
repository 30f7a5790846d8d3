//! SQLite backend for the Tenure contract register.
//!
//! The whole collection lives in one row of a key/value table, so every save
//! is a single-statement (and therefore atomic) write. Access goes through
//! [`tokio_rusqlite`] so it runs off the async runtime's worker threads.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
