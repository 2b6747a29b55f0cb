//! Trait seams between the checkout engine and its external collaborators.

pub mod auth_gate;
pub mod inventory;

pub use auth_gate::AuthGate;
pub use inventory::InventoryStore;
