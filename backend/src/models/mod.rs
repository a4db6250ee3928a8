//! Stored documents and public representations.

pub mod booking;
pub mod hospital;

pub use booking::{Booking, StoredBooking};
pub use hospital::{HospitalDocument, HospitalView};

/// Semi-structured document body: field name to arbitrary JSON value.
pub type Document = serde_json::Map<String, serde_json::Value>;
