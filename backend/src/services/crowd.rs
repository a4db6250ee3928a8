//! Crowd level classification.
//!
//! A hospital's crowd level is derived from how many bookings reference it,
//! how many beds it reports as available, and its advertised wait time. The
//! label is never stored; callers recompute it from current booking counts on
//! every read.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Wait time (minutes) below which a hospital can be `Low`.
pub const LOW_WAIT_LIMIT_MIN: i64 = 20;
/// Wait time (minutes) below which a hospital can be `Medium`.
pub const MEDIUM_WAIT_LIMIT_MIN: i64 = 40;

/// Qualitative congestion label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrowdLevel {
    Empty,
    Low,
    Medium,
    High,
}

impl CrowdLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CrowdLevel::Empty => "Empty",
            CrowdLevel::Low => "Low",
            CrowdLevel::Medium => "Medium",
            CrowdLevel::High => "High",
        }
    }
}

impl fmt::Display for CrowdLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored hospital data that cannot be turned into classifier inputs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CrowdLevelError {
    #[error("wait time {value} does not start with an integer number of minutes")]
    MalformedWaitTime { value: Value },

    #[error("available beds {value} is not an integer")]
    MalformedBedCount { value: Value },
}

/// Booking totals keyed by the `hospital_id` field of each booking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingCounts {
    counts: HashMap<String, u64>,
}

impl BookingCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tally bookings from their `hospital_id` values. Non-string values are
    /// skipped since they can never equal a hospital's string identifier.
    pub fn tally<'a, I>(hospital_ids: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a Value>>,
    {
        let mut counts = HashMap::new();
        for id in hospital_ids.into_iter().flatten() {
            if let Value::String(id) = id {
                *counts.entry(id.clone()).or_insert(0) += 1;
            }
        }
        Self { counts }
    }

    pub fn record(&mut self, hospital_id: impl Into<String>, bookings: u64) {
        *self.counts.entry(hospital_id.into()).or_insert(0) += bookings;
    }

    pub fn for_hospital(&self, hospital_id: &str) -> u64 {
        self.counts.get(hospital_id).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}

impl From<HashMap<String, u64>> for BookingCounts {
    fn from(counts: HashMap<String, u64>) -> Self {
        Self { counts }
    }
}

/// Classify congestion from already-coerced inputs.
///
/// Rules are checked in order and the first match wins. `available_beds / 2`
/// is floor division, so zero (or negative) bed counts leave only `Empty` and
/// `High` reachable.
pub fn classify(bookings: u64, available_beds: i64, wait_minutes: i64) -> CrowdLevel {
    let bookings = i64::try_from(bookings).unwrap_or(i64::MAX);

    if bookings == 0 {
        CrowdLevel::Empty
    } else if bookings < available_beds.div_euclid(2) && wait_minutes < LOW_WAIT_LIMIT_MIN {
        CrowdLevel::Low
    } else if bookings < available_beds && wait_minutes < MEDIUM_WAIT_LIMIT_MIN {
        CrowdLevel::Medium
    } else {
        CrowdLevel::High
    }
}

/// Coerce a stored bed count to an integer.
///
/// Integers pass through, floats truncate toward zero, strings are trimmed and
/// parsed as base-10, and booleans count as 0 or 1.
pub fn coerce_bed_count(value: &Value) -> Result<i64, CrowdLevelError> {
    let malformed = || CrowdLevelError::MalformedBedCount {
        value: value.clone(),
    };

    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if let Some(f) = n.as_f64().filter(|f| f.is_finite()) {
                Ok(f.trunc() as i64)
            } else {
                Err(malformed())
            }
        }
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| malformed()),
        Value::Bool(b) => Ok(i64::from(*b)),
        _ => Err(malformed()),
    }
}

/// Parse the leading whitespace-delimited token of a wait time such as
/// `"15 min"` into minutes. The unit token is ignored.
pub fn parse_wait_minutes(value: &Value) -> Result<i64, CrowdLevelError> {
    let malformed = || CrowdLevelError::MalformedWaitTime {
        value: value.clone(),
    };

    let text = value.as_str().ok_or_else(malformed)?;
    let token = text.split_whitespace().next().ok_or_else(malformed)?;
    token.parse::<i64>().map_err(|_| malformed())
}

/// Crowd level for one hospital given its raw stored bed count and wait time.
pub fn crowd_level(
    hospital_id: &str,
    available_beds: &Value,
    wait_time: &Value,
    counts: &BookingCounts,
) -> Result<CrowdLevel, CrowdLevelError> {
    let beds = coerce_bed_count(available_beds)?;
    let wait = parse_wait_minutes(wait_time)?;
    Ok(classify(counts.for_hospital(hospital_id), beds, wait))
}
