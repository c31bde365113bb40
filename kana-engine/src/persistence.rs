use std::sync::Arc;

use kana_utils::Inventory;
use stash::{BlobStore, DirtyTracker};

use crate::record::RecordMap;
use crate::{Deck, SchedulingPolicy};

/// Key under which the whole record mapping is stored.
pub const LEARNING_DATA_KEY: &str = "kanaLearningData";

/// Set once the learner has dismissed the welcome screen.
pub const WELCOME_KEY: &str = "doNotShowWelcome";

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("failed to read learning data: {0}")]
    Read(#[source] stash::Error),

    #[error("failed to write learning data: {0}")]
    Write(#[source] stash::Error),
}

/// Loads and saves the record mapping through a [`BlobStore`].
#[derive(Debug, Default)]
pub struct RecordStore<S> {
    blobs: S,
}

impl<S: BlobStore> RecordStore<S> {
    pub fn new(blobs: S) -> Self {
        Self { blobs }
    }

    pub fn blobs(&self) -> &S {
        &self.blobs
    }

    /// `Ok(None)` when nothing has been saved yet.
    pub async fn load(&self) -> Result<Option<RecordMap>, PersistenceError> {
        self.blobs
            .get_json(LEARNING_DATA_KEY)
            .await
            .map_err(PersistenceError::Read)
    }

    /// Overwrites the stored mapping.
    pub async fn save(&mut self, records: &RecordMap) -> Result<(), PersistenceError> {
        self.blobs
            .set_json(LEARNING_DATA_KEY, records)
            .await
            .map_err(PersistenceError::Write)
    }

    /// Forgets all learning progress.
    pub async fn reset(&mut self) -> Result<(), PersistenceError> {
        self.blobs
            .remove(LEARNING_DATA_KEY)
            .await
            .map_err(PersistenceError::Write)
    }

    /// Loads the deck, or starts a new one if nothing usable is stored.
    ///
    /// The returned tracker is clean only when the stored data was used as is. A new or
    /// repaired deck is dirty so that the caller writes it back.
    pub async fn load_deck(
        &self,
        inventory: Arc<Inventory>,
        policy: SchedulingPolicy,
    ) -> DirtyTracker<Deck> {
        match self.load().await {
            Ok(Some(records)) => {
                let (deck, repairs) = Deck::from_records_counting_repairs(records, inventory, policy);
                log::info!("Loaded learning data for {} characters", deck.records.len());
                if repairs == 0 {
                    DirtyTracker::clean(deck)
                } else {
                    DirtyTracker::fresh(deck)
                }
            }
            Ok(None) => {
                log::info!("No learning data stored, starting fresh");
                DirtyTracker::fresh(Deck::new(inventory, policy))
            }
            Err(e) => {
                log::warn!("{e}; starting fresh");
                DirtyTracker::fresh(Deck::new(inventory, policy))
            }
        }
    }

    pub async fn welcome_dismissed(&self) -> bool {
        match self.blobs.get(WELCOME_KEY).await {
            Ok(value) => value.is_some_and(|v| v == "true"),
            Err(e) => {
                log::warn!("Could not read welcome flag: {e}");
                false
            }
        }
    }

    pub async fn set_welcome_dismissed(&mut self) -> Result<(), PersistenceError> {
        self.blobs
            .set(WELCOME_KEY, "true".to_string())
            .await
            .map_err(PersistenceError::Write)
    }

    /// Brings the welcome screen back. Learning progress is kept.
    pub async fn start_over(&mut self) -> Result<(), PersistenceError> {
        self.blobs
            .remove(WELCOME_KEY)
            .await
            .map_err(PersistenceError::Write)
    }
}
