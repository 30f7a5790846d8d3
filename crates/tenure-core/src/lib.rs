//! Core types and operations for the Tenure contract register.
//!
//! This crate is deliberately free of HTTP and database dependencies. Storage
//! backends implement [`store::ContractStore`]; everything else in the
//! workspace depends on the lineage, lifecycle and query logic defined here.

pub mod contract;
pub mod document;
pub mod error;
pub mod lifecycle;
pub mod lineage;
pub mod memory;
pub mod query;
pub mod store;

pub use error::{Error, Result};
