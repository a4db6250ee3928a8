//! Data Transfer Objects for the HTTP API.
//!
//! Hospital and booking bodies are the model types themselves; this module
//! only holds the request and response shapes that exist for the API alone.

use serde::{Deserialize, Serialize};

pub use crate::models::{HospitalView, StoredBooking};

/// Query parameters for the hospital listing.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HospitalQuery {
    /// Exact location label, matched ignoring case (optional)
    #[serde(default)]
    pub location: Option<String>,
}

/// Response for booking creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBookingResponse {
    /// Always true; failures use the error body instead
    pub success: bool,
    /// Generated booking code
    pub booking_id: String,
    /// Message about the operation
    pub message: String,
}

impl CreateBookingResponse {
    pub fn created(booking_id: impl Into<String>) -> Self {
        Self {
            success: true,
            booking_id: booking_id.into(),
            message: "Booking created successfully".to_string(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the crate serving the API
    pub version: String,
    /// Database connection status
    pub database: String,
}
