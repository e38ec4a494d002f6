#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// A hash map using separate chaining with embedded bucket heads.
///
/// This module provides a `Dict` that resolves collisions through
/// per-bucket linked chains instead of open addressing.
pub mod dict;

/// FNV-1a, DJB2, and SDBM digest functions.
///
/// This module provides the crate's hashers as `core::hash::Hasher`
/// implementations plus one-shot helpers over byte slices.
pub mod hash;

/// A HashMap implementation using bounded linear probing.
///
/// This module provides a `HashMap` that wraps the `HashTable` and provides
/// a standard key-value map interface with configurable hashers.
pub mod hash_map;

pub mod hash_table;

/// A hash set implementation using bounded linear probing.
///
/// This module provides a `HashSet` that wraps the `HashTable` and provides
/// a standard set interface with configurable hashers.
pub mod hash_set;

pub use dict::Dict;
pub use hash::DefaultHashBuilder;
pub use hash_map::Entry;
pub use hash_map::HashMap;
pub use hash_set::HashSet;
pub use hash_table::HashTable;
