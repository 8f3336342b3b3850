//! Data models
//!
//! Shared between the order store and its callers.
//! All values are immutable once constructed; constructors validate.

pub mod order;
pub mod product;

// Re-exports
pub use order::*;
pub use product::*;
