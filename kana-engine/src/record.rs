use chrono::{DateTime, TimeDelta, Utc};
use kana_utils::{Group, Inventory, KanaCharacter};
use serde::{Deserialize, Serialize};

use crate::coerce::{count, duration_ms, flag, timestamp};

/// All learning records, keyed by symbol.
pub type RecordMap = im::OrdMap<String, LearningRecord>;

/// Per-character learning progress.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningRecord {
    pub symbol: String,
    #[serde(with = "count")]
    pub correct_streak: u32,
    #[serde(with = "count")]
    pub incorrect_streak: u32,
    /// `None` until the first answer.
    #[serde(default, with = "timestamp")]
    pub last_reviewed_at: Option<DateTime<Utc>>,
    /// Zero means the record has not been given a delay yet.
    #[serde(with = "duration_ms")]
    pub interval: TimeDelta,
    #[serde(with = "count")]
    pub correct_count: u32,
    #[serde(with = "count")]
    pub incorrect_count: u32,
    #[serde(with = "duration_ms")]
    pub time_spent: TimeDelta,
    #[serde(with = "flag")]
    pub is_completed: bool,
    pub group: Group,
}

impl LearningRecord {
    pub fn new(character: &KanaCharacter) -> Self {
        Self {
            symbol: character.symbol.clone(),
            correct_streak: 0,
            incorrect_streak: 0,
            last_reviewed_at: None,
            interval: TimeDelta::zero(),
            correct_count: 0,
            incorrect_count: 0,
            time_spent: TimeDelta::zero(),
            is_completed: false,
            group: character.group,
        }
    }

    pub fn is_new(&self) -> bool {
        self.last_reviewed_at.is_none()
    }

    /// When the record becomes due. `None` for records that were never reviewed.
    pub fn next_review_at(&self) -> Option<DateTime<Utc>> {
        // an interval too large to represent is never due
        self.last_reviewed_at?.checked_add_signed(self.interval)
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_at().is_some_and(|due| now >= due)
    }
}

/// One fresh record per inventory character.
pub fn initial_records(inventory: &Inventory) -> RecordMap {
    inventory
        .iter()
        .map(|character| (character.symbol.clone(), LearningRecord::new(character)))
        .collect()
}

/// Makes a loaded mapping agree with the inventory again.
///
/// Returns the repaired mapping and the number of fixes applied.
pub(crate) fn reconcile(loaded: RecordMap, inventory: &Inventory) -> (RecordMap, usize) {
    let mut repairs = 0;
    let mut records = RecordMap::new();

    for character in inventory.iter() {
        let record = match loaded.get(&character.symbol) {
            Some(record) => {
                let mut record = record.clone();
                if record.symbol != character.symbol || record.group != character.group {
                    record.symbol = character.symbol.clone();
                    record.group = character.group;
                    repairs += 1;
                }
                if record.is_completed && record.last_reviewed_at.is_none() {
                    record.is_completed = false;
                    repairs += 1;
                }
                if record.correct_streak > 0 && record.incorrect_streak > 0 {
                    record.incorrect_streak = 0;
                    repairs += 1;
                }
                record
            }
            None => {
                repairs += 1;
                LearningRecord::new(character)
            }
        };
        records.insert(character.symbol.clone(), record);
    }

    let unknown = loaded.keys().filter(|s| !inventory.contains(s)).count();
    if unknown > 0 {
        log::warn!("Dropping {unknown} stored records with no matching character");
    }

    (records, repairs + unknown)
}
