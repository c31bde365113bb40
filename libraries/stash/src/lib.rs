//! This is a small library for keeping app state in a key-value blob store.
//! It was written for the kana quiz, so it only includes what that project needs.
//!
//! Storage model:
//! 1. The app keeps its whole state in memory and owns it exclusively.
//! 2. Persisting means overwriting one blob under a fixed key with the serialized state. There are no partial writes.
//! 3. Loading reads the blob back. A missing blob is not an error, it just means "start fresh".
//! 4. [`DirtyTracker`] remembers whether the in-memory state changed since the last successful write.
//!
//! Backends implement [`BlobStore`]. [`MemoryStore`] is for tests and throwaway sessions,
//! [`DirectoryStore`] keeps one file per key on disk.

mod directory;
mod dirty_tracker;
mod error;
mod memory;

use serde::{Serialize, de::DeserializeOwned};

pub use directory::DirectoryStore;
pub use dirty_tracker::*;
pub use error::Error;
pub use memory::MemoryStore;

/// Asynchronous get/set/remove over string blobs.
///
/// Mutating calls take `&mut self`, so a store can never have two writes in flight.
#[allow(async_fn_in_trait)]
pub trait BlobStore {
    /// Returns `Ok(None)` when nothing is stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    async fn set(&mut self, key: &str, value: String) -> Result<(), Error>;

    /// Removing a missing key is not an error.
    async fn remove(&mut self, key: &str) -> Result<(), Error>;

    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, Error> {
        match self.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn set_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), Error> {
        let raw = serde_json::to_string(value)?;
        self.set(key, raw).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Settings {
        volume: u8,
        muted: bool,
    }

    #[test]
    fn test_json_helpers() {
        block_on(async {
            let mut store = MemoryStore::default();
            let settings = Settings {
                volume: 7,
                muted: false,
            };
            store.set_json("settings", &settings).await.unwrap();
            let loaded: Option<Settings> = store.get_json("settings").await.unwrap();
            assert_eq!(loaded, Some(settings));
        });
    }

    #[test]
    fn test_json_helpers_missing_key() {
        block_on(async {
            let store = MemoryStore::default();
            let loaded: Option<Settings> = store.get_json("settings").await.unwrap();
            assert_eq!(loaded, None);
        });
    }

    #[test]
    fn test_json_helpers_corrupt_blob() {
        block_on(async {
            let mut store = MemoryStore::default();
            store.set("settings", "{not json".to_string()).await.unwrap();
            let loaded = store.get_json::<Settings>("settings").await;
            assert!(matches!(loaded, Err(Error::Json(_))));
        });
    }
}
