//! Subsistema de customización declarativa.
//!
//! - `Marker`: la regla declarativa (metadata de orden + efecto en dos
//!   fases).
//! - `order_markers`: ordenamiento, filtrado y políticas (exclusividad).
//! - `ApplicationRecord`: tracking idempotente por instancia de contexto.
//! - `apply_customization`: el driver que compone las tres piezas.

pub mod definition;
pub mod driver;
pub mod ordering;
mod tracker;

pub use definition::{Marker, MarkerKind};
pub use driver::apply_customization;
pub use ordering::order_markers;
pub use tracker::ApplicationRecord;
