//! Durable key-value slots
//!
//! The session store only needs to read and write a couple of string values
//! by key, so persistence sits behind this narrow interface. `FileStore`
//! keeps one file per key on disk; `MemoryStore` is the in-process fake.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// A minimal string key-value store
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> crate::Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> crate::Result<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> crate::Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> crate::Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> crate::Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> crate::Result<()> {
        (**self).remove(key)
    }
}
