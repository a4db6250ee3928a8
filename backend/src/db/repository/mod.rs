//! Repository traits for the hospital and booking collections.
//!
//! Each method is one storage call: no multi-step protocol, no retry. The
//! traits are split per collection and joined by [`FullRepository`], which
//! is what the HTTP layer holds.

use async_trait::async_trait;

use crate::api::{BookingDocumentId, HospitalId};
use crate::models::{Booking, Document, HospitalDocument, StoredBooking};
use crate::services::crowd::BookingCounts;

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

/// Repository trait for the hospitals collection.
///
/// Hospitals are never created through the API; the write methods here are
/// only used by startup seeding.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait HospitalRepository: Send + Sync {
    /// Check that the backing store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// List hospitals, optionally keeping only those whose `location` equals
    /// `location` ignoring case.
    ///
    /// # Arguments
    /// * `location` - Exact location label to match, or `None` for all
    ///
    /// # Returns
    /// * `Ok(Vec<HospitalDocument>)` - Matching hospitals in storage order
    /// * `Err(RepositoryError)` - If the query fails
    async fn list_hospitals(
        &self,
        location: Option<&str>,
    ) -> RepositoryResult<Vec<HospitalDocument>>;

    /// Fetch a single hospital.
    ///
    /// # Returns
    /// * `Ok(Some(doc))` if found, `Ok(None)` if no record has this id
    async fn get_hospital(&self, id: HospitalId) -> RepositoryResult<Option<HospitalDocument>>;

    /// Set `location` on the first hospital whose `name` equals `name`.
    ///
    /// # Returns
    /// * `Ok(true)` if a hospital was updated
    async fn set_location_by_name(&self, name: &str, location: &str) -> RepositoryResult<bool>;

    /// Store a hospital document and return the id assigned to it.
    async fn seed_hospital(&self, fields: Document) -> RepositoryResult<HospitalId>;
}

/// Repository trait for the bookings collection.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Store a booking as-is and return its storage id.
    async fn insert_booking(&self, booking: &Booking) -> RepositoryResult<BookingDocumentId>;

    /// Every stored booking in insertion order.
    async fn list_bookings(&self) -> RepositoryResult<Vec<StoredBooking>>;

    /// Booking totals per `hospital_id`, from a full pass over the
    /// collection.
    async fn count_bookings_by_hospital(&self) -> RepositoryResult<BookingCounts>;
}

/// Everything the API needs from storage.
pub trait FullRepository: HospitalRepository + BookingRepository {}

impl<T> FullRepository for T where T: HospitalRepository + BookingRepository {}
