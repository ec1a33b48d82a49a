//! # Stocktake Common Library
//!
//! Shared code for the Stocktake inventory suite:
//! - Error types
//! - Configuration and data directory resolution
//! - Database initialization and schema

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
