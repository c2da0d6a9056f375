use std::path::{Path, PathBuf};
use std::sync::Arc;

use storage::repository::{ScoreRepository, Storage};

use crate::Clock;
use crate::catalog::CatalogService;
use crate::sessions::SessionEngine;

/// Assembles the score store, the session engine and the quiz catalog.
pub struct AppServices {
    scores: Arc<dyn ScoreRepository>,
    engine: SessionEngine,
    catalog: CatalogService,
}

impl AppServices {
    /// Build services backed by the JSON score file at `scores_path`.
    #[must_use]
    pub fn open(
        quiz_dir: impl Into<PathBuf>,
        scores_path: &Path,
        clock: Clock,
        timer_secs: u32,
    ) -> Self {
        Self::from_storage(quiz_dir, Storage::json(scores_path), clock, timer_secs)
    }

    #[must_use]
    pub fn from_storage(
        quiz_dir: impl Into<PathBuf>,
        storage: Storage,
        clock: Clock,
        timer_secs: u32,
    ) -> Self {
        let engine =
            SessionEngine::new(clock, Arc::clone(&storage.scores)).with_timer_secs(timer_secs);
        let catalog = CatalogService::new(quiz_dir, Arc::clone(&storage.scores));
        Self {
            scores: storage.scores,
            engine,
            catalog,
        }
    }

    #[must_use]
    pub fn scores(&self) -> Arc<dyn ScoreRepository> {
        Arc::clone(&self.scores)
    }

    #[must_use]
    pub fn engine(&self) -> &SessionEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut SessionEngine {
        &mut self.engine
    }

    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.catalog
    }
}
