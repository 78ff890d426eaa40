//! Vistas HTML
//!
//! Página principal y barra de navegación.

pub mod navigation;
pub mod page;
