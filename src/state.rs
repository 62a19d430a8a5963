//! Application state management

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::Authenticator;
use crate::config::Config;
use crate::convert::{ConversionPipeline, RenderEngine, WkhtmltopdfEngine};
use crate::storage::ArtifactStore;

/// Shared application state
///
/// Collaborators are constructed here and injected into the pipeline; there
/// are no process-wide singletons.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    db: SqlitePool,
    store: ArtifactStore,
    authenticator: Authenticator,
    pipeline: ConversionPipeline,
}

impl AppState {
    /// Create application state with the configured external render engine
    pub fn new(config: Config, db: SqlitePool) -> Self {
        let engine = Arc::new(WkhtmltopdfEngine::new(&config.renderer.binary));
        Self::with_engine(config, db, engine)
    }

    /// Create application state with an explicit render engine
    ///
    /// Tests substitute the engine through this seam.
    pub fn with_engine(config: Config, db: SqlitePool, engine: Arc<dyn RenderEngine>) -> Self {
        let store = ArtifactStore::new(&config.storage.staging_dir, &config.storage.artifacts_dir);
        let authenticator = Authenticator::new(db.clone());
        let pipeline = ConversionPipeline::new(store.clone(), engine);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                db,
                store,
                authenticator,
                pipeline,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the database pool
    pub fn db(&self) -> &SqlitePool {
        &self.inner.db
    }

    /// Get the artifact store
    pub fn store(&self) -> &ArtifactStore {
        &self.inner.store
    }

    /// Get the authenticator
    pub fn authenticator(&self) -> &Authenticator {
        &self.inner.authenticator
    }

    /// Get the conversion pipeline
    pub fn pipeline(&self) -> &ConversionPipeline {
        &self.inner.pipeline
    }
}
