//! Driver de customización: orquesta el engine de ordenamiento y el
//! registro de aplicación contra una instancia de contexto.

use std::sync::Arc;

use log::debug;

use crate::context::{CustomTarget, TargetType};
use crate::errors::CoreError;

use super::{order_markers, ApplicationRecord, Marker};

/// Aplica los markers declarados sobre `ctx`, en el orden que produce el
/// engine, actualizando `record`.
///
/// Por cada marker sobreviviente, en orden:
/// - se omite si su kind ya fue registrado (idempotencia);
/// - si su cláusula de cancelación dispara, se registra como suprimido y
///   sus efectos no corren;
/// - si no, corre `customize` y luego `post_customize`; un error de
///   cualquiera de los dos propaga sin traducción (error fatal de
///   configuración);
/// - finalmente el kind se clasifica como `invoked` (visible) o
///   `suppressed` (no visible).
pub fn apply_customization(ctx: &mut dyn CustomTarget,
                           declared: &[Arc<dyn Marker>],
                           record: &mut ApplicationRecord,
                           target: Option<TargetType>)
                           -> Result<(), CoreError> {
    let target = target.unwrap_or_else(|| ctx.target_type());
    let ordered = order_markers(declared, &target)?;

    for marker in ordered {
        let kind = marker.kind();
        if !record.should_apply(&kind) {
            debug!("marker {kind} ya registrado, se omite");
            continue;
        }
        if record.cancellation_hits(marker.cancellation_set()) {
            debug!("marker {kind} vetado por su set de cancelación");
            record.note_suppressed(kind);
            continue;
        }

        marker.customize(ctx)?;
        marker.post_customize(ctx)?;

        if marker.visible() {
            record.note_invoked(kind);
        } else {
            record.note_suppressed(kind);
        }
        debug!("marker {kind} aplicado sobre '{}'", target.name());
    }

    Ok(())
}
