//! # paddock-inventory
//!
//! Inventory store providers for Paddock: a Redis-backed store for real
//! deployments and an in-memory store for single-node use and tests,
//! plus the manager that dispatches between them by configuration.

#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::InventoryManager;
