use chrono::{DateTime, TimeDelta, Utc};

use crate::record::LearningRecord;
use crate::{Deck, SchedulingPolicy};

/// Applies one answer to a record.
pub fn apply_answer(
    record: &mut LearningRecord,
    is_correct: bool,
    elapsed: TimeDelta,
    now: DateTime<Utc>,
    policy: &SchedulingPolicy,
) {
    record.last_reviewed_at = Some(now);
    // stored as whole milliseconds, so only count whole milliseconds
    let elapsed = TimeDelta::milliseconds(elapsed.max(TimeDelta::zero()).num_milliseconds());
    record.time_spent = record
        .time_spent
        .checked_add(&elapsed)
        .unwrap_or(TimeDelta::MAX);

    if is_correct {
        record.correct_streak += 1;
        record.incorrect_streak = 0;
        record.correct_count += 1;
        record.interval = if record.interval.is_zero() {
            policy.base_interval
        } else {
            // checked_mul can step past TimeDelta::MAX without returning None
            record
                .interval
                .checked_mul(policy.growth_factor)
                .filter(|grown| *grown <= TimeDelta::MAX)
                .unwrap_or(TimeDelta::MAX)
        };
        if record.correct_streak >= policy.completion_streak
            || record.interval > policy.completion_interval
        {
            record.is_completed = true;
        }
    } else {
        record.correct_streak = 0;
        record.incorrect_streak += 1;
        record.incorrect_count += 1;
        let shrunk = record
            .interval
            .checked_div(policy.growth_factor)
            .unwrap_or(policy.min_interval);
        record.interval = shrunk.max(policy.min_interval);
        record.is_completed = false;
    }
}

impl Deck {
    /// Applies an answer in place. Returns false if `symbol` is unknown.
    pub fn apply_answer(
        &mut self,
        symbol: &str,
        is_correct: bool,
        elapsed: TimeDelta,
        now: DateTime<Utc>,
    ) -> bool {
        let policy = &self.policy;
        let Some(record) = self.records.get_mut(symbol) else {
            log::warn!("Ignoring answer for unknown symbol {symbol:?}");
            return false;
        };
        apply_answer(record, is_correct, elapsed, now, policy);
        log::debug!(
            "{symbol}: correct={is_correct} streak={} interval={}s completed={}",
            record.correct_streak,
            record.interval.num_seconds(),
            record.is_completed
        );
        true
    }

    /// Returns the deck as it is after the answer. `self` is left untouched.
    pub fn record_answer(
        &self,
        symbol: &str,
        is_correct: bool,
        elapsed: TimeDelta,
        now: DateTime<Utc>,
    ) -> Deck {
        let mut deck = self.clone();
        deck.apply_answer(symbol, is_correct, elapsed, now);
        deck
    }
}
