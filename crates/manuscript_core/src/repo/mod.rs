//! Repository layer over the flat string-keyed store.
//!
//! # Responsibility
//! - Define the key-value contract used by the persistence adapter.
//! - Keep SQL details behind that contract.

pub mod kv_repo;
