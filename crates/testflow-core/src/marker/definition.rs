//! Contrato de los markers de customización.
//!
//! Un marker es una regla declarativa inmutable: metadata de ordenamiento
//! (target, prioridad, visibilidad, grupo de exclusividad, set de
//! cancelación) más un efecto en dos fases (`customize` y `post_customize`)
//! contra el contexto en construcción.

use std::fmt;

use crate::context::{CustomTarget, TargetType};
use crate::errors::CoreError;

/// Identificador estable de una clase de marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerKind(pub &'static str);

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl fmt::Debug for dyn Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Marker").field("kind", &self.kind()).finish()
    }
}

/// Regla de configuración declarativa aplicable a un contexto.
///
/// Implementaciones deben ser inmutables después de construidas; el engine
/// de ordenamiento las consume cada vez que se construye un contexto del
/// tipo correspondiente.
pub trait Marker: Send + Sync {
    /// Identificador estable de la clase de marker.
    fn kind(&self) -> MarkerKind;

    /// Tipo de contexto que este marker puede customizar.
    fn target(&self) -> TargetType;

    /// Rango de aplicación. 0 significa "al final dentro de su clase".
    fn priority(&self) -> u16 {
        0
    }

    /// Si la aplicación exitosa se recuerda como `invoked` (visible) o
    /// como `suppressed`.
    fn visible(&self) -> bool {
        true
    }

    /// Kinds que, si ya fueron invocados, suprimen este marker.
    fn cancellation_set(&self) -> &[MarkerKind] {
        &[]
    }

    /// Clave de exclusividad: de los markers que comparten grupo sobrevive
    /// solo el último declarado.
    fn exclusivity_group(&self) -> Option<&str> {
        None
    }

    /// Efecto principal contra el contexto.
    fn customize(&self, ctx: &mut dyn CustomTarget) -> Result<(), CoreError>;

    /// Efecto posterior, después de `customize`.
    fn post_customize(&self, ctx: &mut dyn CustomTarget) -> Result<(), CoreError> {
        let _ = ctx;
        Ok(())
    }
}
