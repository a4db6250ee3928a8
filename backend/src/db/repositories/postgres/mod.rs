//! Diesel store for Postgres.
//!
//! Both collections are stored document-style: one `JSONB` body per row keyed
//! by a database-generated UUID. Filters on document fields are pushed down as
//! JSONB expressions.
//!
//! The pool is r2d2 and pending migrations run when the repository is
//! created. Every call takes one pooled connection on the blocking thread pool.

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel::sql_types::Text;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use serde_json::Value;
use std::str::FromStr;
use std::time::Duration;
use tokio::task;
use tracing::debug;

use crate::api::{BookingDocumentId, HospitalId};
use crate::db::repository::{
    BookingRepository, ErrorContext, HospitalRepository, RepositoryError, RepositoryResult,
};
use crate::models::{Booking, Document, HospitalDocument, StoredBooking};
use crate::services::crowd::BookingCounts;

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

const HOSPITALS_BY_LOCATION_SQL: &str = "SELECT id, doc, created_at FROM hospitals \
     WHERE jsonb_typeof(doc->'location') = 'string' \
     AND lower(doc->>'location') = lower($1) \
     ORDER BY created_at, id";

const SET_LOCATION_BY_NAME_SQL: &str = "UPDATE hospitals \
     SET doc = jsonb_set(doc, '{location}', to_jsonb($1::text), true) \
     WHERE id = (SELECT id FROM hospitals \
                 WHERE jsonb_typeof(doc->'name') = 'string' AND doc->>'name' = $2 \
                 ORDER BY created_at, id LIMIT 1)";

const BOOKING_COUNTS_SQL: &str = "SELECT doc->>'hospital_id' AS hospital_id, COUNT(*) AS bookings \
     FROM bookings \
     WHERE jsonb_typeof(doc->'hospital_id') = 'string' \
     GROUP BY doc->>'hospital_id'";

/// Connection and pool settings.
///
/// `from_env` reads `DATABASE_URL` (or `PG_DATABASE_URL`) plus the optional
/// `PG_POOL_MAX`, `PG_POOL_MIN`, `PG_CONN_TIMEOUT_SEC` and
/// `PG_IDLE_TIMEOUT_SEC`; the same knobs live under `[postgres]` in
/// `repository.toml`.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub database_url: String,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub connection_timeout_sec: u64,
    pub idle_timeout_sec: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
        }
    }
}

/// Parsed value of `name`, or `fallback` when unset or unparseable.
fn env_or<T: FromStr>(name: &str, fallback: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(fallback)
}

impl PostgresConfig {
    pub fn from_env() -> RepositoryResult<Self> {
        let database_url = ["DATABASE_URL", "PG_DATABASE_URL"]
            .iter()
            .find_map(|name| std::env::var(name).ok())
            .ok_or_else(|| {
                RepositoryError::configuration("DATABASE_URL or PG_DATABASE_URL must be set")
            })?;

        let defaults = Self::default();
        Ok(Self {
            database_url,
            max_pool_size: env_or("PG_POOL_MAX", defaults.max_pool_size),
            min_pool_size: env_or("PG_POOL_MIN", defaults.min_pool_size),
            connection_timeout_sec: env_or("PG_CONN_TIMEOUT_SEC", defaults.connection_timeout_sec),
            idle_timeout_sec: env_or("PG_IDLE_TIMEOUT_SEC", defaults.idle_timeout_sec),
        })
    }

    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Self::default()
        }
    }

    fn build_pool(&self) -> RepositoryResult<PgPool> {
        Pool::builder()
            .max_size(self.max_pool_size)
            .min_idle(Some(self.min_pool_size))
            .connection_timeout(Duration::from_secs(self.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(self.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(ConnectionManager::new(&self.database_url))
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("build_pool")
                        .with_details(format!("max_size={}", self.max_pool_size)),
                )
            })
    }
}

/// Diesel-backed repository over the `hospitals` and `bookings` tables.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Build the pool and bring the schema up to date.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let pool = config.build_pool()?;
        let mut conn = pool.get().map_err(|e| {
            RepositoryError::connection_with_context(e.to_string(), ErrorContext::new("migrate"))
        })?;
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("migrate"),
            )
        })?;
        drop(conn);

        Ok(Self { pool })
    }

    /// Run `f` on a pooled connection off the async runtime.
    ///
    /// One attempt only: pool and query failures go back to the caller
    /// tagged with `operation`.
    async fn with_conn<T, F>(&self, operation: &'static str, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        let joined = task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            f(&mut conn)
        })
        .await;

        match joined {
            Ok(result) => result.map_err(|e| e.with_operation(operation)),
            Err(e) => Err(RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new(operation),
            )),
        }
    }
}

fn row_to_hospital(row: HospitalRow) -> RepositoryResult<HospitalDocument> {
    match row.doc {
        Value::Object(fields) => Ok(HospitalDocument::new(HospitalId(row.id), fields)),
        other => Err(RepositoryError::validation_with_context(
            format!("hospital document is not an object: {}", other),
            ErrorContext::default()
                .with_entity("hospital")
                .with_entity_id(row.id),
        )),
    }
}

fn row_to_booking(row: BookingRow) -> RepositoryResult<StoredBooking> {
    let booking: Booking = serde_json::from_value(row.doc).map_err(|e| {
        RepositoryError::validation_with_context(
            format!("booking document cannot be decoded: {}", e),
            ErrorContext::default()
                .with_entity("booking")
                .with_entity_id(row.id),
        )
    })?;

    Ok(StoredBooking {
        id: BookingDocumentId(row.id),
        booking,
    })
}

#[async_trait]
impl HospitalRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn("health_check", |conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(RepositoryError::from)
        })
        .await
    }

    async fn list_hospitals(
        &self,
        location: Option<&str>,
    ) -> RepositoryResult<Vec<HospitalDocument>> {
        let location = location.map(str::to_string);
        self.with_conn("list_hospitals", move |conn| {
            let rows: Vec<HospitalRow> = match location {
                Some(location) => {
                    debug!(%location, "filtering hospitals by location");
                    sql_query(HOSPITALS_BY_LOCATION_SQL)
                        .bind::<Text, _>(location)
                        .load(conn)?
                }
                None => hospitals::table
                    .select(HospitalRow::as_select())
                    .order((hospitals::created_at.asc(), hospitals::id.asc()))
                    .load(conn)?,
            };

            rows.into_iter().map(row_to_hospital).collect()
        })
        .await
    }

    async fn get_hospital(&self, id: HospitalId) -> RepositoryResult<Option<HospitalDocument>> {
        self.with_conn("get_hospital", move |conn| {
            let row = hospitals::table
                .find(id.value())
                .select(HospitalRow::as_select())
                .first::<HospitalRow>(conn)
                .optional()?;

            row.map(row_to_hospital).transpose()
        })
        .await
    }

    async fn set_location_by_name(&self, name: &str, location: &str) -> RepositoryResult<bool> {
        let name = name.to_string();
        let location = location.to_string();
        self.with_conn("set_location_by_name", move |conn| {
            let updated = sql_query(SET_LOCATION_BY_NAME_SQL)
                .bind::<Text, _>(location)
                .bind::<Text, _>(name)
                .execute(conn)?;
            Ok(updated > 0)
        })
        .await
    }

    async fn seed_hospital(&self, fields: Document) -> RepositoryResult<HospitalId> {
        self.with_conn("seed_hospital", move |conn| {
            let id: uuid::Uuid = diesel::insert_into(hospitals::table)
                .values(&NewHospitalRow {
                    doc: Value::Object(fields),
                })
                .returning(hospitals::id)
                .get_result(conn)?;
            Ok(HospitalId(id))
        })
        .await
    }
}

#[async_trait]
impl BookingRepository for PostgresRepository {
    async fn insert_booking(&self, booking: &Booking) -> RepositoryResult<BookingDocumentId> {
        let doc = serde_json::to_value(booking).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Failed to serialize booking: {}", e),
                ErrorContext::new("insert_booking").with_entity("booking"),
            )
        })?;

        self.with_conn("insert_booking", move |conn| {
            let id: uuid::Uuid = diesel::insert_into(bookings::table)
                .values(&NewBookingRow { doc })
                .returning(bookings::id)
                .get_result(conn)?;
            Ok(BookingDocumentId(id))
        })
        .await
    }

    async fn list_bookings(&self) -> RepositoryResult<Vec<StoredBooking>> {
        self.with_conn("list_bookings", |conn| {
            let rows: Vec<BookingRow> = bookings::table
                .select(BookingRow::as_select())
                .order((bookings::created_at.asc(), bookings::id.asc()))
                .load(conn)?;

            rows.into_iter().map(row_to_booking).collect()
        })
        .await
    }

    async fn count_bookings_by_hospital(&self) -> RepositoryResult<BookingCounts> {
        self.with_conn("count_bookings_by_hospital", |conn| {
            let rows: Vec<BookingCountRow> = sql_query(BOOKING_COUNTS_SQL).load(conn)?;

            let mut counts = BookingCounts::new();
            for row in rows {
                counts.record(row.hospital_id, u64::try_from(row.bookings).unwrap_or(0));
            }
            Ok(counts)
        })
        .await
    }
}
