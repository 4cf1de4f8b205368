//! Cache Module
//!
//! Object cache that stores scalar values under generated identifiers, with
//! call counting and call history on its store operation.

mod store;
mod value;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use store::{Cache, StoreOperation, STORE_OPERATION};
pub use value::{decode_float, decode_int, decode_str, StoredValue};
