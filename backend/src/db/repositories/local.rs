//! In-memory repository for unit testing and local development.
//!
//! Hospitals and bookings live in two vectors behind `parking_lot` locks. The
//! store can be switched offline to exercise storage-outage handling.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::api::{BookingDocumentId, HospitalId};
use crate::db::repository::{
    BookingRepository, ErrorContext, HospitalRepository, RepositoryError, RepositoryResult,
};
use crate::models::{Booking, Document, HospitalDocument, StoredBooking};
use crate::services::crowd::BookingCounts;

#[derive(Default)]
struct Collections {
    hospitals: Vec<HospitalDocument>,
    bookings: Vec<StoredBooking>,
}

/// In-memory document store.
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<Collections>>,
    online: Arc<AtomicBool>,
}

impl LocalRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(Collections::default())),
            online: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Create a repository preloaded with hospital documents.
    pub fn with_hospitals<I>(hospitals: I) -> Self
    where
        I: IntoIterator<Item = Document>,
    {
        let repo = Self::new();
        for fields in hospitals {
            repo.insert_hospital(fields);
        }
        repo
    }

    /// Seed a hospital and return the id assigned to it.
    pub fn insert_hospital(&self, fields: Document) -> HospitalId {
        let id = HospitalId::generate();
        self.data
            .write()
            .hospitals
            .push(HospitalDocument::new(id, fields));
        id
    }

    /// Simulate the store going away (or coming back).
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    fn ensure_online(&self, operation: &str) -> RepositoryResult<()> {
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(RepositoryError::connection_with_context(
                "local repository is offline",
                ErrorContext::new(operation),
            ))
        }
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HospitalRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.online.load(Ordering::SeqCst))
    }

    async fn list_hospitals(
        &self,
        location: Option<&str>,
    ) -> RepositoryResult<Vec<HospitalDocument>> {
        self.ensure_online("list_hospitals")?;
        let data = self.data.read();
        Ok(data
            .hospitals
            .iter()
            .filter(|h| location.map_or(true, |loc| h.location_matches(loc)))
            .cloned()
            .collect())
    }

    async fn get_hospital(&self, id: HospitalId) -> RepositoryResult<Option<HospitalDocument>> {
        self.ensure_online("get_hospital")?;
        let data = self.data.read();
        Ok(data.hospitals.iter().find(|h| h.id == id).cloned())
    }

    async fn set_location_by_name(&self, name: &str, location: &str) -> RepositoryResult<bool> {
        self.ensure_online("set_location_by_name")?;
        let mut data = self.data.write();
        match data.hospitals.iter_mut().find(|h| h.name() == Some(name)) {
            Some(hospital) => {
                hospital
                    .fields
                    .insert("location".to_string(), Value::String(location.to_string()));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn seed_hospital(&self, fields: Document) -> RepositoryResult<HospitalId> {
        self.ensure_online("seed_hospital")?;
        Ok(self.insert_hospital(fields))
    }
}

#[async_trait]
impl BookingRepository for LocalRepository {
    async fn insert_booking(&self, booking: &Booking) -> RepositoryResult<BookingDocumentId> {
        self.ensure_online("insert_booking")?;
        let id = BookingDocumentId::generate();
        self.data.write().bookings.push(StoredBooking {
            id,
            booking: booking.clone(),
        });
        Ok(id)
    }

    async fn list_bookings(&self) -> RepositoryResult<Vec<StoredBooking>> {
        self.ensure_online("list_bookings")?;
        Ok(self.data.read().bookings.clone())
    }

    async fn count_bookings_by_hospital(&self) -> RepositoryResult<BookingCounts> {
        self.ensure_online("count_bookings_by_hospital")?;
        let data = self.data.read();
        Ok(BookingCounts::tally(
            data.bookings.iter().map(|b| b.booking.hospital_id()),
        ))
    }
}
