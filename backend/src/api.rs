//! Public identifier types for the backend.
//!
//! Storage identifiers are UUIDs assigned by the repository. Booking codes are
//! the short human-readable references handed back to callers.

pub use crate::models::booking::{Booking, StoredBooking};
pub use crate::models::hospital::{HospitalDocument, HospitalView};
pub use crate::services::crowd::CrowdLevel;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Error returned when a string is not a well-formed storage identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed storage identifier '{input}'")]
pub struct InvalidIdentifier {
    pub input: String,
}

/// Hospital identifier (storage primary key).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HospitalId(pub Uuid);

/// Booking identifier (storage primary key, distinct from the booking code).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingDocumentId(pub Uuid);

impl HospitalId {
    pub fn new(value: Uuid) -> Self {
        HospitalId(value)
    }

    pub fn generate() -> Self {
        HospitalId(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl BookingDocumentId {
    pub fn new(value: Uuid) -> Self {
        BookingDocumentId(value)
    }

    pub fn generate() -> Self {
        BookingDocumentId(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl FromStr for HospitalId {
    type Err = InvalidIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(HospitalId)
            .map_err(|_| InvalidIdentifier {
                input: s.to_string(),
            })
    }
}

impl fmt::Display for HospitalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for BookingDocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
