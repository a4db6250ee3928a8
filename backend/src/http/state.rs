//! State cloned into every handler.

use std::path::PathBuf;
use std::sync::Arc;

use crate::db::repository::FullRepository;

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn FullRepository>,
    /// Directory of static frontend assets served for non-API paths
    pub static_dir: Option<PathBuf>,
}

impl AppState {
    /// State with no static directory.
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self {
            repository,
            static_dir: None,
        }
    }

    /// Serve files from `dir` for any path not handled by the API.
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }
}
