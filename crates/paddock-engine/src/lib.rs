//! # paddock-engine
//!
//! The core of Paddock: the pool catalog with alias resolution, request
//! validation, and the two-phase all-or-nothing checkout engine.

pub mod catalog;
pub mod checkout;
pub mod request;

pub use catalog::PoolCatalog;
pub use checkout::CheckoutEngine;
