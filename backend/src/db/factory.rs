//! Opening the configured store and loading startup data into it.
//!
//! Startup is three steps:
//! 1. open the backend named by `repository.toml`, or the one the environment
//!    selects when there is no file;
//! 2. insert the `[seed]` hospitals if the store holds none;
//! 3. apply `[[locations]]` by hospital name.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use super::repo_config::{RepositoryConfig, RepositoryType};
use super::repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
use super::repositories::{PostgresConfig, PostgresRepository};
use super::repository::{FullRepository, RepositoryError, RepositoryResult};
use super::services;

/// A ready store plus what startup did to it.
pub struct Startup {
    pub repository: Arc<dyn FullRepository>,
    /// Hospitals inserted from the seed file.
    pub seeded: usize,
    /// Hospitals whose location was set from `[[locations]]`.
    pub locations_updated: usize,
}

/// Builds repositories from configuration.
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Run the startup sequence for `config_path`, or for the environment when
    /// no file is given.
    pub async fn bootstrap(config_path: Option<&Path>) -> RepositoryResult<Startup> {
        match config_path {
            Some(path) => {
                info!(config = %path.display(), "loading repository configuration");
                Self::bootstrap_with(&RepositoryConfig::load(path)?).await
            }
            None => Ok(Startup {
                repository: Self::from_env().await?,
                seeded: 0,
                locations_updated: 0,
            }),
        }
    }

    /// Open the store described by `config`, seed it and apply locations.
    ///
    /// The seed file is read before connecting so a broken file fails
    /// without touching storage.
    pub async fn bootstrap_with(config: &RepositoryConfig) -> RepositoryResult<Startup> {
        let seed = config.read_seed_hospitals()?;
        let repository = Self::open(config).await?;

        let seeded = services::seed_hospitals(repository.as_ref(), seed).await?;
        let locations_updated =
            services::apply_location_assignments(repository.as_ref(), &config.locations).await?;
        info!(
            backend = ?config.repository_type(),
            seeded,
            locations_updated,
            "repository ready"
        );

        Ok(Startup {
            repository,
            seeded,
            locations_updated,
        })
    }

    /// Open the backend `config` names, without loading any data.
    pub async fn open(config: &RepositoryConfig) -> RepositoryResult<Arc<dyn FullRepository>> {
        match config.repository_type() {
            RepositoryType::Local => Ok(Arc::new(LocalRepository::new())),
            #[cfg(feature = "postgres-repo")]
            RepositoryType::Postgres => Self::connect_postgres(config.postgres_config()?).await,
            #[cfg(not(feature = "postgres-repo"))]
            RepositoryType::Postgres => Err(postgres_disabled()),
        }
    }

    /// Open the backend selected by `REPOSITORY_TYPE` / `DATABASE_URL`.
    pub async fn from_env() -> RepositoryResult<Arc<dyn FullRepository>> {
        match RepositoryType::from_env() {
            RepositoryType::Local => Ok(Arc::new(LocalRepository::new())),
            #[cfg(feature = "postgres-repo")]
            RepositoryType::Postgres => Self::connect_postgres(PostgresConfig::from_env()?).await,
            #[cfg(not(feature = "postgres-repo"))]
            RepositoryType::Postgres => Err(postgres_disabled()),
        }
    }

    /// Pool setup and migrations block, so they run on the blocking pool.
    #[cfg(feature = "postgres-repo")]
    async fn connect_postgres(config: PostgresConfig) -> RepositoryResult<Arc<dyn FullRepository>> {
        let repo = tokio::task::spawn_blocking(move || PostgresRepository::new(config))
            .await
            .map_err(|e| RepositoryError::internal(format!("Task join error: {}", e)))??;
        Ok(Arc::new(repo))
    }
}

#[cfg(not(feature = "postgres-repo"))]
fn postgres_disabled() -> RepositoryError {
    RepositoryError::configuration("Postgres repository feature not enabled")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_open_local_is_empty() {
        let config = RepositoryConfig::parse("[repository]\ntype = \"local\"\n").unwrap();
        let repo = RepositoryFactory::open(&config).await.ok().unwrap();
        assert!(repo.health_check().await.unwrap());
        assert!(repo.list_hospitals(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bad_seed_file_fails_before_opening() {
        let mut config = RepositoryConfig::parse(
            "[repository]\ntype = \"postgres\"\n[seed]\nhospitals_file = \"absent.json\"\n",
        )
        .unwrap();
        config.base_dir = Some(PathBuf::from("/nonexistent"));

        let err = RepositoryFactory::bootstrap_with(&config).await.err().unwrap();
        assert!(err.message().contains("hospitals file"));
    }
}
