//! Booking documents.
//!
//! Bookings accept any caller-supplied fields. The service layers two typed
//! members on top: the booking code and the creation timestamp.

use chrono::{Local, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::BookingDocumentId;
use crate::models::Document;
use crate::services::booking_code::BookingCode;

/// Keys owned by the system; caller values for these are discarded.
pub const RESERVED_FIELDS: [&str; 3] = ["_id", "booking_id", "created_at"];

/// A booking as written to storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub booking_id: BookingCode,
    /// Server local time, ISO-8601 without offset.
    pub created_at: NaiveDateTime,
    #[serde(flatten)]
    pub fields: Document,
}

impl Booking {
    /// Stamp caller fields with `booking_id` and `created_at`.
    pub fn new(mut fields: Document, booking_id: BookingCode, created_at: NaiveDateTime) -> Self {
        for key in RESERVED_FIELDS {
            fields.remove(key);
        }
        Self {
            booking_id,
            created_at,
            fields,
        }
    }

    /// Stamp caller fields with a fresh code and the current local time.
    pub fn stamp(fields: Document) -> Self {
        Self::new(fields, BookingCode::generate(), local_now())
    }

    /// The free-form hospital reference, if the caller supplied one.
    pub fn hospital_id(&self) -> Option<&Value> {
        self.fields.get("hospital_id")
    }
}

/// A booking read back from storage, with its storage id exposed as `_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredBooking {
    #[serde(rename = "_id")]
    pub id: BookingDocumentId,
    #[serde(flatten)]
    pub booking: Booking,
}

/// Current local wall-clock time at microsecond precision.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(6)
}
