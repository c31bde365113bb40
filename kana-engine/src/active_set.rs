use kana_utils::Group;

use crate::Deck;
use crate::record::LearningRecord;

impl Deck {
    /// The working set of characters to study.
    ///
    /// Incomplete records are collected group by group in curriculum order until there are at
    /// least `min_active_set` of them. A group that is nearly done therefore pulls in the next
    /// group early. Empty only once every record is completed.
    pub fn active_set(&self) -> Vec<&LearningRecord> {
        let mut active = Vec::new();
        for group in Group::CURRICULUM {
            active.extend(
                self.inventory
                    .in_group(group)
                    .filter_map(|character| self.records.get(&character.symbol))
                    .filter(|record| !record.is_completed),
            );
            if active.len() >= self.policy.min_active_set {
                break;
            }
        }
        active
    }

    /// True once every record is completed.
    pub fn is_finished(&self) -> bool {
        self.records.values().all(|record| record.is_completed)
    }
}
