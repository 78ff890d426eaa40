//! Servicios de negocio
//!
//! Gate de generación diaria, llamada al proveedor, limpieza de contenido
//! antiguo e inspección del cache.

pub mod cache_inspector;
pub mod daily_content_service;
pub mod generation_service;
pub mod retention_sweeper;

#[cfg(test)]
pub(crate) mod test_support;

pub use cache_inspector::{CacheInspector, CacheSnapshot};
pub use daily_content_service::DailyContentService;
pub use generation_service::GenerationService;
pub use retention_sweeper::{RetentionSweeper, SweepReport};
