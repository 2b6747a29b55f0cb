//! # paddock-core
//!
//! Core crate for Paddock. Contains traits, configuration schemas, shared
//! domain types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Paddock crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
