use std::collections::BTreeMap;

use crate::{BlobStore, Error};

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    blobs: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.blobs.contains_key(key)
    }
}

impl BlobStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.blobs.get(key).cloned())
    }

    async fn set(&mut self, key: &str, value: String) -> Result<(), Error> {
        self.blobs.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&mut self, key: &str) -> Result<(), Error> {
        self.blobs.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_set_get_remove() {
        block_on(async {
            let mut store = MemoryStore::default();
            assert_eq!(store.get("a").await.unwrap(), None);

            store.set("a", "1".to_string()).await.unwrap();
            store.set("a", "2".to_string()).await.unwrap();
            assert_eq!(store.get("a").await.unwrap(), Some("2".to_string()));
            assert_eq!(store.len(), 1);

            store.remove("a").await.unwrap();
            store.remove("a").await.unwrap();
            assert!(store.is_empty());
        });
    }
}
