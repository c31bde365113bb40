use std::fmt;

use chrono::TimeDelta;
use kana_utils::Group;
use serde::Serialize;

use crate::Deck;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    /// Between 0 and 1. An empty total counts as done.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.completed, self.total)
    }
}

/// One row of the statistics table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSummary {
    pub symbol: String,
    pub correct_count: u32,
    pub incorrect_count: u32,
    #[serde(serialize_with = "serialize_millis")]
    pub time_spent: TimeDelta,
}

impl RecordSummary {
    pub fn format_time_spent(&self) -> String {
        format_time(self.time_spent)
    }
}

fn serialize_millis<S: serde::Serializer>(value: &TimeDelta, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_i64(value.num_milliseconds())
}

/// Seconds under a minute, minutes under an hour, hours otherwise.
///
/// Values are truncated to two decimals and trailing zeros dropped: `12.34s`, `1.5m`, `2h`.
pub fn format_time(time: TimeDelta) -> String {
    const SECOND: i64 = 1_000;
    const MINUTE: i64 = 60 * SECOND;
    const HOUR: i64 = 60 * MINUTE;

    let ms = time.num_milliseconds().max(0);
    let (unit_ms, suffix) = if ms < MINUTE {
        (SECOND, "s")
    } else if ms < HOUR {
        (MINUTE, "m")
    } else {
        (HOUR, "h")
    };

    let hundredths = (i128::from(ms) * 100 / i128::from(unit_ms)) as i64;
    let (whole, frac) = (hundredths / 100, hundredths % 100);
    if frac == 0 {
        format!("{whole}{suffix}")
    } else if frac % 10 == 0 {
        format!("{whole}.{}{suffix}", frac / 10)
    } else {
        format!("{whole}.{frac:02}{suffix}")
    }
}

impl Deck {
    /// Completed records over the whole inventory.
    pub fn progress(&self) -> Progress {
        Progress {
            completed: self.records.values().filter(|r| r.is_completed).count(),
            total: self.records.len(),
        }
    }

    pub fn group_progress(&self, group: Group) -> Progress {
        let mut progress = Progress {
            completed: 0,
            total: 0,
        };
        for record in self.iter().filter(|r| r.group == group) {
            progress.total += 1;
            if record.is_completed {
                progress.completed += 1;
            }
        }
        progress
    }

    /// Per-record counters in inventory order.
    pub fn statistics(&self) -> Vec<RecordSummary> {
        self.iter()
            .map(|record| RecordSummary {
                symbol: record.symbol.clone(),
                correct_count: record.correct_count,
                incorrect_count: record.incorrect_count,
                time_spent: record.time_spent,
            })
            .collect()
    }
}
