use std::sync::Arc;

use kana_utils::{Inventory, KanaCharacter};

use crate::SchedulingPolicy;
use crate::record::{LearningRecord, RecordMap, initial_records, reconcile};

/// The learner's progress over the whole inventory.
///
/// Cloning is cheap: records live in a persistent map and the inventory is shared.
#[derive(Clone, Debug)]
pub struct Deck {
    pub(crate) records: RecordMap,
    pub(crate) inventory: Arc<Inventory>,
    pub(crate) policy: SchedulingPolicy,
}

impl Deck {
    pub fn new(inventory: Arc<Inventory>, policy: SchedulingPolicy) -> Self {
        Self {
            records: initial_records(&inventory),
            inventory,
            policy,
        }
    }

    /// Builds a deck from stored records, repairing any mismatch with the inventory.
    pub fn from_records(
        records: RecordMap,
        inventory: Arc<Inventory>,
        policy: SchedulingPolicy,
    ) -> Self {
        Self::from_records_counting_repairs(records, inventory, policy).0
    }

    pub(crate) fn from_records_counting_repairs(
        records: RecordMap,
        inventory: Arc<Inventory>,
        policy: SchedulingPolicy,
    ) -> (Self, usize) {
        let (records, repairs) = reconcile(records, &inventory);
        if repairs > 0 {
            log::warn!("Stored learning data needed {repairs} repairs to match the kana table");
        }
        (
            Self {
                records,
                inventory,
                policy,
            },
            repairs,
        )
    }

    pub fn records(&self) -> &RecordMap {
        &self.records
    }

    pub fn record(&self, symbol: &str) -> Option<&LearningRecord> {
        self.records.get(symbol)
    }

    pub fn inventory(&self) -> &Arc<Inventory> {
        &self.inventory
    }

    pub fn policy(&self) -> &SchedulingPolicy {
        &self.policy
    }

    pub(crate) fn character(&self, record: &LearningRecord) -> Option<&KanaCharacter> {
        self.inventory.get(&record.symbol)
    }

    /// Records in inventory order.
    pub fn iter(&self) -> impl Iterator<Item = &LearningRecord> {
        self.inventory
            .iter()
            .filter_map(|character| self.records.get(&character.symbol))
    }
}

impl PartialEq for Deck {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records && self.policy == other.policy
    }
}
