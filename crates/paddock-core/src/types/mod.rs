//! Shared domain types.

pub mod checkout;
pub mod machine;
