//! Durable key/value storage for the gallery record
//!
//! Holds one serialized record per key. The file-backed store is used by the
//! CLI; the in-memory store stands in for it in tests.

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::Result;

pub trait RecordStorage: Send + Sync {
    /// Stored record, or `None` when the key was never written or was removed.
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
