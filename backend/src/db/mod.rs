//! Hospital and booking storage.
//!
//! Layers, top to bottom:
//!
//! - [`services`]: what the HTTP handlers call. Parses ids, stamps bookings,
//!   projects hospitals with their crowd level, and runs startup seeding.
//! - [`repository`]: the [`HospitalRepository`] / [`BookingRepository`]
//!   traits and [`RepositoryError`].
//! - [`repositories`]: the in-memory store and, behind `postgres-repo`, the
//!   Diesel store keeping JSONB documents.
//! - [`repo_config`] and [`factory`]: `repository.toml` and the startup
//!   sequence that turns it into a ready store.
//!
//! ```ignore
//! use medifind::db::{services, RepositoryConfig, RepositoryFactory};
//!
//! let startup = RepositoryFactory::bootstrap(RepositoryConfig::discover().as_deref()).await?;
//! let downtown = services::list_hospitals(startup.repository.as_ref(), Some("Downtown")).await?;
//! ```

#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;


#[cfg(feature = "postgres-repo")]
pub use repositories::postgres::PostgresConfig;

pub use services::{
    apply_location_assignments, create_booking, get_hospital, health_check, list_bookings,
    list_hospitals, seed_hospitals,
};

pub use repo_config::{LocationAssignment, RepositoryConfig, RepositoryType};

pub use factory::{RepositoryFactory, Startup};
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::PostgresRepository;
pub use repository::{
    BookingRepository, ErrorContext, FullRepository, HospitalRepository, RepositoryError,
    RepositoryResult,
};
