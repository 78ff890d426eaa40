//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::cache::CacheOperations;
use crate::clients::ContentGenerator;
use crate::config::{ContentConfig, EnvironmentConfig};
use crate::services::{CacheInspector, DailyContentService};

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub store: Arc<dyn CacheOperations>,
    pub content: Arc<DailyContentService>,
    pub inspector: Arc<CacheInspector>,
}

impl AppState {
    pub fn new(
        config: EnvironmentConfig,
        content_config: ContentConfig,
        store: Arc<dyn CacheOperations>,
        generator: Arc<dyn ContentGenerator>,
    ) -> Self {
        let content_config = Arc::new(content_config);
        let inspector = CacheInspector::new(store.clone(), content_config.timezone);
        let content = DailyContentService::new(store.clone(), generator, content_config);

        Self {
            config,
            store,
            content: Arc::new(content),
            inspector: Arc::new(inspector),
        }
    }
}
