//! Prelude module for date_code crate.
//!
//! Re-exports the derive macros shared across modules.

pub use derive_more::Display;
