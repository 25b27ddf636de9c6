//! Adapters implementing the domain ports.

pub mod in_memory;
pub mod numbering;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
pub mod statement;
pub mod write_set;
