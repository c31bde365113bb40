//! Serde adapters that accept numbers and booleans in their textual form too.
//!
//! Learning data has been through key-value stores that hand everything back as strings,
//! so `"3"`, `3` and `3.0` must all load as the count 3, and `"true"` as `true`.

use chrono::{DateTime, TimeDelta, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Lenient {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Lenient {
    fn into_integer(self) -> Result<i64, String> {
        match self {
            Lenient::Int(n) => Ok(n),
            Lenient::Float(f) => float_to_integer(f),
            Lenient::Text(s) => {
                let s = s.trim();
                match s.parse::<i64>() {
                    Ok(n) => Ok(n),
                    Err(_) => s
                        .parse::<f64>()
                        .map_err(|_| format!("expected a number, got {s:?}"))
                        .and_then(float_to_integer),
                }
            }
            Lenient::Bool(b) => Err(format!("expected a number, got {b}")),
        }
    }
}

fn float_to_integer(f: f64) -> Result<i64, String> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Ok(f as i64)
    } else {
        Err(format!("expected a whole number, got {f}"))
    }
}

pub(crate) mod count {
    use super::*;

    pub fn serialize<S: Serializer>(value: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(*value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let n = Lenient::deserialize(deserializer)?
            .into_integer()
            .map_err(D::Error::custom)?;
        u32::try_from(n).map_err(|_| D::Error::custom(format!("count out of range: {n}")))
    }
}

pub(crate) mod flag {
    use super::*;

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(*value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match Lenient::deserialize(deserializer)? {
            Lenient::Bool(b) => Ok(b),
            Lenient::Text(s) => match s.trim() {
                "true" => Ok(true),
                "false" => Ok(false),
                other => Err(D::Error::custom(format!("expected a boolean, got {other:?}"))),
            },
            other => Err(D::Error::custom(format!("expected a boolean, got {other:?}"))),
        }
    }
}

/// Durations are stored as whole milliseconds. Negative values load as zero.
pub(crate) mod duration_ms {
    use super::*;

    pub fn serialize<S: Serializer>(value: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error> {
        // num_milliseconds panics outside this range
        let value = (*value).clamp(TimeDelta::MIN, TimeDelta::MAX);
        serializer.serialize_i64(value.num_milliseconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TimeDelta, D::Error> {
        let ms = Lenient::deserialize(deserializer)?
            .into_integer()
            .map_err(D::Error::custom)?;
        if ms < 0 {
            log::warn!("Negative duration {ms}ms in stored data, treating it as zero");
            return Ok(TimeDelta::zero());
        }
        TimeDelta::try_milliseconds(ms)
            .ok_or_else(|| D::Error::custom(format!("duration out of range: {ms}ms")))
    }
}

/// Optional timestamps: written as RFC 3339, read as RFC 3339 or epoch milliseconds.
pub(crate) mod timestamp {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(timestamp) => serializer.serialize_some(timestamp),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let Some(raw) = Option::<Lenient>::deserialize(deserializer)? else {
            return Ok(None);
        };
        if let Lenient::Text(s) = &raw {
            let s = s.trim();
            if s.is_empty() || s == "null" {
                return Ok(None);
            }
            if let Ok(parsed) = DateTime::parse_from_rfc3339(s) {
                return Ok(Some(parsed.with_timezone(&Utc)));
            }
        }
        let ms = raw.into_integer().map_err(D::Error::custom)?;
        DateTime::from_timestamp_millis(ms)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("timestamp out of range: {ms}")))
    }
}
