use chrono::{DateTime, Utc};
use kana_utils::KanaCharacter;
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::Deck;
use crate::record::LearningRecord;

/// Records that have been reviewed before and whose interval has elapsed.
///
/// Completed records are not filtered out here: whether they can resurface is decided by
/// what the caller passes in.
pub fn due_records<'a>(
    records: impl IntoIterator<Item = &'a LearningRecord>,
    now: DateTime<Utc>,
) -> impl Iterator<Item = &'a LearningRecord> {
    records.into_iter().filter(move |record| record.is_due(now))
}

/// The active set split by scheduling state.
#[derive(Debug, Clone)]
pub struct ReviewInfo<'a> {
    pub due: Vec<&'a KanaCharacter>,
    /// Never reviewed yet.
    pub new: Vec<&'a KanaCharacter>,
    /// Reviewed but not due, soonest first.
    pub upcoming: Vec<(&'a KanaCharacter, DateTime<Utc>)>,
}

impl ReviewInfo<'_> {
    pub fn next_due_at(&self) -> Option<DateTime<Utc>> {
        self.upcoming.first().map(|(_, at)| *at)
    }

    pub fn total_count(&self) -> usize {
        self.due.len() + self.new.len() + self.upcoming.len()
    }
}

impl Deck {
    /// Characters from the active set that are due at `now`.
    pub fn due_characters(&self, now: DateTime<Utc>) -> Vec<&KanaCharacter> {
        due_records(self.active_set(), now)
            .filter_map(|record| self.character(record))
            .collect()
    }

    pub fn review_info(&self, now: DateTime<Utc>) -> ReviewInfo<'_> {
        let mut due = vec![];
        let mut new = vec![];
        let mut upcoming = vec![];

        for record in self.active_set() {
            let Some(character) = self.character(record) else {
                log::error!("Record {} has no character in the inventory", record.symbol);
                continue;
            };
            match record.next_review_at() {
                None if record.is_new() => new.push(character),
                Some(at) if now >= at => due.push(character),
                Some(at) => upcoming.push((character, at)),
                // interval overflowed: treat as never due again
                None => {}
            }
        }

        upcoming.sort_by_key(|(_, at)| *at);

        ReviewInfo { due, new, upcoming }
    }

    /// Picks the character for the next question.
    ///
    /// Due characters come first, then new ones, then anything in the active set. The
    /// previously shown symbol is skipped whenever there is another choice. Returns `None`
    /// once the curriculum is finished.
    pub fn pick_next<R: Rng + ?Sized>(
        &self,
        now: DateTime<Utc>,
        previous: Option<&str>,
        rng: &mut R,
    ) -> Option<&KanaCharacter> {
        let info = self.review_info(now);
        let mut candidates = if !info.due.is_empty() {
            info.due
        } else if !info.new.is_empty() {
            info.new
        } else {
            info.upcoming.into_iter().map(|(c, _)| c).collect()
        };

        if candidates.len() >= 2 {
            if let Some(previous) = previous {
                candidates.retain(|c| c.symbol != previous);
            }
        }

        candidates.choose(rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeDelta;
    use kana_utils::Inventory;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::SchedulingPolicy;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-06-01T12:00:00Z")
            .unwrap()
            .to_utc()
    }

    fn deck() -> Deck {
        Deck::new(Arc::new(Inventory::kana()), SchedulingPolicy::default())
    }

    fn reviewed(deck: &mut Deck, symbol: &str, ago: TimeDelta, interval: TimeDelta) {
        let mut record = deck.records[symbol].clone();
        record.last_reviewed_at = Some(now() - ago);
        record.interval = interval;
        record.correct_streak = 1;
        deck.records.insert(symbol.to_string(), record);
    }

    #[test]
    fn test_due_window() {
        let mut deck = deck();
        let interval = TimeDelta::minutes(4);
        reviewed(&mut deck, "あ", interval * 2, interval);
        reviewed(&mut deck, "い", interval / 2, interval);

        let due: Vec<&str> = deck
            .due_characters(now())
            .iter()
            .map(|c| c.symbol.as_str())
            .collect();
        assert_eq!(due, vec!["あ"]);
    }

    #[test]
    fn test_never_reviewed_is_not_due() {
        let deck = deck();
        assert!(deck.due_characters(now()).is_empty());
        assert_eq!(deck.review_info(now()).new.len(), 46);
    }

    #[test]
    fn test_completed_records_can_be_due() {
        let mut deck = deck();
        reviewed(&mut deck, "あ", TimeDelta::days(30), TimeDelta::days(20));
        let mut record = deck.records["あ"].clone();
        record.is_completed = true;
        deck.records.insert("あ".to_string(), record);

        // the active set hides it, the scheduler itself does not
        assert!(deck.due_characters(now()).is_empty());
        let due: Vec<_> = due_records(deck.records.values(), now()).collect();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].symbol, "あ");
    }

    #[test]
    fn test_review_info_partitions_active_set() {
        let mut deck = deck();
        reviewed(&mut deck, "あ", TimeDelta::minutes(5), TimeDelta::minutes(1));
        reviewed(&mut deck, "い", TimeDelta::minutes(1), TimeDelta::minutes(10));
        reviewed(&mut deck, "う", TimeDelta::minutes(1), TimeDelta::minutes(3));

        let info = deck.review_info(now());
        assert_eq!(info.due.len(), 1);
        assert_eq!(info.upcoming.len(), 2);
        assert_eq!(info.new.len(), 43);
        assert_eq!(info.total_count(), 46);
        assert_eq!(info.upcoming[0].0.symbol, "う");
        assert_eq!(info.next_due_at(), Some(now() + TimeDelta::minutes(2)));
    }

    #[test]
    fn test_pick_prefers_due() {
        let mut deck = deck();
        reviewed(&mut deck, "か", TimeDelta::minutes(5), TimeDelta::minutes(1));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..20 {
            let picked = deck.pick_next(now(), None, &mut rng).unwrap();
            assert_eq!(picked.symbol, "か");
        }
    }

    #[test]
    fn test_pick_avoids_previous_symbol() {
        let mut deck = deck();
        reviewed(&mut deck, "か", TimeDelta::minutes(5), TimeDelta::minutes(1));
        reviewed(&mut deck, "き", TimeDelta::minutes(5), TimeDelta::minutes(1));
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..20 {
            let picked = deck.pick_next(now(), Some("か"), &mut rng).unwrap();
            assert_eq!(picked.symbol, "き");
        }
    }

    #[test]
    fn test_pick_repeats_when_only_one_candidate() {
        let mut deck = deck();
        reviewed(&mut deck, "か", TimeDelta::minutes(5), TimeDelta::minutes(1));
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let picked = deck.pick_next(now(), Some("か"), &mut rng).unwrap();
        assert_eq!(picked.symbol, "か");
    }

    #[test]
    fn test_pick_practices_ahead_when_nothing_due_or_new() {
        let mut deck = deck();
        let symbols: Vec<String> = deck.active_set().iter().map(|r| r.symbol.clone()).collect();
        for symbol in &symbols {
            reviewed(&mut deck, symbol, TimeDelta::minutes(1), TimeDelta::hours(1));
        }
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let picked = deck.pick_next(now(), None, &mut rng).unwrap();
        assert!(symbols.contains(&picked.symbol));
    }
}
