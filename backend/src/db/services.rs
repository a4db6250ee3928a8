//! Data access layer.
//!
//! Functions here are what the HTTP handlers call. They work against any
//! [`FullRepository`] and add the pieces storage does not know about: id
//! parsing, booking stamping, and the crowd-level projection.

use tracing::{debug, info, warn};

use super::repo_config::LocationAssignment;
use super::repository::{ErrorContext, FullRepository, RepositoryError, RepositoryResult};
use crate::api::HospitalId;
use crate::models::{Booking, Document, HospitalView, StoredBooking};

/// Fixed message for identifiers that are not storage ids.
pub const INVALID_HOSPITAL_ID: &str = "Invalid Hospital ID";
/// Fixed message for well-formed identifiers with no record.
pub const HOSPITAL_NOT_FOUND: &str = "Hospital not found";

/// Check if the repository is healthy and accessible.
pub async fn health_check(repo: &dyn FullRepository) -> RepositoryResult<bool> {
    repo.health_check().await
}

/// List hospitals with their crowd level.
///
/// An empty `location` is treated as no filter. Booking counts are read once
/// for the whole listing.
pub async fn list_hospitals(
    repo: &dyn FullRepository,
    location: Option<&str>,
) -> RepositoryResult<Vec<HospitalView>> {
    let location = location.filter(|loc| !loc.is_empty());
    let hospitals = repo.list_hospitals(location).await?;
    let counts = repo.count_bookings_by_hospital().await?;
    debug!(
        hospitals = hospitals.len(),
        bookings = counts.total(),
        ?location,
        "listing hospitals"
    );

    hospitals
        .iter()
        .map(|doc| {
            HospitalView::from_document(doc, &counts).map_err(|e| {
                RepositoryError::from(e)
                    .with_operation("list_hospitals")
                    .with_entity_id(doc.id)
            })
        })
        .collect()
}

/// Fetch one hospital by the raw identifier taken from the request path.
///
/// # Errors
/// * `InvalidIdentifier` - `raw_id` is not a storage id
/// * `NotFound` - no hospital has this id
/// * anything else the repository reports, unchanged
pub async fn get_hospital(repo: &dyn FullRepository, raw_id: &str) -> RepositoryResult<HospitalView> {
    let id: HospitalId = raw_id.parse().map_err(|_| {
        RepositoryError::invalid_identifier_with_context(
            INVALID_HOSPITAL_ID,
            ErrorContext::new("get_hospital")
                .with_entity("hospital")
                .with_entity_id(raw_id),
        )
    })?;

    let doc = repo.get_hospital(id).await?.ok_or_else(|| {
        RepositoryError::not_found_with_context(
            HOSPITAL_NOT_FOUND,
            ErrorContext::new("get_hospital")
                .with_entity("hospital")
                .with_entity_id(id),
        )
    })?;

    let counts = repo.count_bookings_by_hospital().await?;
    HospitalView::from_document(&doc, &counts).map_err(|e| {
        RepositoryError::from(e)
            .with_operation("get_hospital")
            .with_entity_id(id)
    })
}

/// Stamp caller fields with a booking code and creation time, then store them.
///
/// The returned booking carries the generated code the caller should quote.
pub async fn create_booking(repo: &dyn FullRepository, fields: Document) -> RepositoryResult<Booking> {
    let booking = Booking::stamp(fields);
    let id = repo.insert_booking(&booking).await?;
    info!(
        booking_id = %booking.booking_id,
        document_id = %id,
        hospital_id = ?booking.hospital_id(),
        "booking created"
    );
    Ok(booking)
}

/// Every stored booking.
pub async fn list_bookings(repo: &dyn FullRepository) -> RepositoryResult<Vec<StoredBooking>> {
    repo.list_bookings().await
}

/// Apply configured hospital locations by name.
///
/// Names with no matching hospital are skipped with a warning.
///
/// # Returns
/// * `Ok(usize)` - Number of hospitals updated
pub async fn apply_location_assignments(
    repo: &dyn FullRepository,
    assignments: &[LocationAssignment],
) -> RepositoryResult<usize> {
    let mut updated = 0;
    for assignment in assignments {
        if repo
            .set_location_by_name(&assignment.name, &assignment.location)
            .await?
        {
            updated += 1;
        } else {
            warn!(name = %assignment.name, "no hospital to assign location to");
        }
    }
    Ok(updated)
}

/// Store `hospitals` when the collection is empty.
///
/// A store that already holds hospitals is left alone, so restarting against
/// a persistent backend does not duplicate the seed data.
///
/// # Returns
/// * `Ok(usize)` - Number of hospitals inserted
pub async fn seed_hospitals(
    repo: &dyn FullRepository,
    hospitals: Vec<Document>,
) -> RepositoryResult<usize> {
    if hospitals.is_empty() {
        return Ok(0);
    }
    let existing = repo.list_hospitals(None).await?.len();
    if existing > 0 {
        info!(existing, "hospitals already present, skipping seed data");
        return Ok(0);
    }

    let count = hospitals.len();
    for fields in hospitals {
        repo.seed_hospital(fields).await?;
    }
    Ok(count)
}
