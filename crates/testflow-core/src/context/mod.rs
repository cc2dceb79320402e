//! Contextos customizables.
//!
//! `TargetType` modela la jerarquía de tipos como tabla de rutas;
//! `CustomTarget` es la costura por la que los markers reciben el contexto
//! (un downcast fallido es la violación de precondición del marker);
//! `TestContext` es la instancia concreta que el framework configura y
//! contra la que ejecutan los steps.

pub mod target;
mod test_context;

pub use target::{targets, TargetType};
pub use test_context::TestContext;
pub(crate) use test_context::SessionStamp;

use std::any::Any;

use crate::errors::CoreError;
use crate::marker::MarkerKind;

/// Objeto que acepta customización. Los markers lo reciben como trait
/// object y bajan al tipo concreto que saben configurar.
pub trait CustomTarget: Any {
    /// Tipo declarado de esta instancia dentro de la jerarquía.
    fn target_type(&self) -> TargetType;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Baja el contexto al tipo concreto que el marker requiere.
///
/// Un fallo aquí es un error de configuración (el tipo suministrado no
/// implementa la capacidad requerida), reportado al momento de invocar el
/// driver, nunca diferido.
pub fn expect_context<'a, C: CustomTarget>(ctx: &'a mut dyn CustomTarget,
                                           kind: MarkerKind)
                                           -> Result<&'a mut C, CoreError> {
    let target = ctx.target_type();
    ctx.as_any_mut()
       .downcast_mut::<C>()
       .ok_or_else(|| CoreError::MarkerSourceMismatch { kind: kind.to_string(),
                                                        target: target.name().to_string() })
}
