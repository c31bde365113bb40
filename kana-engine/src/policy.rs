use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::coerce::duration_ms;

/// Tunable constants of the review scheduler.
///
/// Hosts usually take the default and override a field or two, the same way one would
/// tweak FSRS parameters with `..Default::default()`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchedulingPolicy {
    /// Interval given to a record on its first correct answer.
    #[serde(with = "duration_ms")]
    pub base_interval: TimeDelta,
    /// Floor for intervals after an incorrect answer.
    #[serde(with = "duration_ms")]
    pub min_interval: TimeDelta,
    pub growth_factor: i32,
    /// Consecutive correct answers after which a record counts as learned.
    pub completion_streak: u32,
    /// An interval above this also marks the record as learned.
    #[serde(with = "duration_ms")]
    pub completion_interval: TimeDelta,
    pub min_active_set: usize,
}

impl Default for SchedulingPolicy {
    fn default() -> Self {
        Self {
            base_interval: TimeDelta::minutes(1),
            min_interval: TimeDelta::minutes(1),
            growth_factor: 2,
            completion_streak: 10,
            completion_interval: TimeDelta::days(10),
            min_active_set: 5,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("growth factor must be at least 2, got {0}")]
    GrowthFactor(i32),

    #[error("minimum interval must be positive")]
    MinInterval,

    #[error("base interval must not be shorter than the minimum interval")]
    BaseInterval,

    #[error("the active set needs room for at least one character")]
    ActiveSet,

    #[error("invalid policy JSON: {0}")]
    Json(String),
}

impl SchedulingPolicy {
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.growth_factor < 2 {
            return Err(PolicyError::GrowthFactor(self.growth_factor));
        }
        if self.min_interval <= TimeDelta::zero() {
            return Err(PolicyError::MinInterval);
        }
        if self.base_interval < self.min_interval {
            return Err(PolicyError::BaseInterval);
        }
        if self.min_active_set == 0 {
            return Err(PolicyError::ActiveSet);
        }
        Ok(())
    }

    /// Parses a policy override. Missing fields keep their default value.
    pub fn from_json(json: &str) -> Result<Self, PolicyError> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| PolicyError::Json(e.to_string()))?;
        // serde also reads a struct from a sequence of its fields
        if !value.is_object() {
            return Err(PolicyError::Json(format!("expected an object, got {value}")));
        }
        let policy: Self =
            serde_json::from_value(value).map_err(|e| PolicyError::Json(e.to_string()))?;
        policy.validate()?;
        Ok(policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(SchedulingPolicy::default().validate(), Ok(()));
    }

    #[test]
    fn test_partial_override() {
        let policy = SchedulingPolicy::from_json(r#"{"completionStreak": 5}"#).unwrap();
        assert_eq!(policy.completion_streak, 5);
        assert_eq!(policy.base_interval, TimeDelta::minutes(1));
        assert_eq!(policy.completion_interval, TimeDelta::days(10));
    }

    #[test]
    fn test_intervals_in_milliseconds() {
        let policy = SchedulingPolicy::from_json(r#"{"baseInterval": 120000}"#).unwrap();
        assert_eq!(policy.base_interval, TimeDelta::minutes(2));
    }

    #[test]
    fn test_only_objects_accepted() {
        for json in ["[]", "[60000]", "null", "5", r#""fast""#] {
            assert!(
                matches!(SchedulingPolicy::from_json(json), Err(PolicyError::Json(_))),
                "{json}"
            );
        }
        assert_eq!(SchedulingPolicy::from_json("{}"), Ok(SchedulingPolicy::default()));
    }

    #[test]
    fn test_inconsistent_policies_rejected() {
        assert_eq!(
            SchedulingPolicy::from_json(r#"{"growthFactor": 1}"#),
            Err(PolicyError::GrowthFactor(1))
        );
        assert_eq!(
            SchedulingPolicy::from_json(r#"{"minInterval": 0}"#),
            Err(PolicyError::MinInterval)
        );
        assert_eq!(
            SchedulingPolicy::from_json(r#"{"baseInterval": 1000}"#),
            Err(PolicyError::BaseInterval)
        );
        assert_eq!(
            SchedulingPolicy::from_json(r#"{"minActiveSet": 0}"#),
            Err(PolicyError::ActiveSet)
        );
        assert!(matches!(
            SchedulingPolicy::from_json("[]"),
            Err(PolicyError::Json(_))
        ));
    }
}
