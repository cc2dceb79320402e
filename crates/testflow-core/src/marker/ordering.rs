//! Engine de ordenamiento y políticas de markers.
//!
//! Algoritmo puro, sin efectos secundarios:
//! 1. Verifica el contrato: el target del contexto y el de cada marker
//!    declarado deben pertenecer a la jerarquía customizable (violación =
//!    error de configuración, nunca un no-op silencioso).
//! 2. Filtra los markers asignables al tipo del contexto (el tipo exacto o
//!    cualquier supertipo suyo).
//! 3. Política de exclusividad: por cada grupo no vacío sobrevive solo el
//!    miembro declarado en último lugar.
//! 4. Orden estable: el marker con target más específico primero; prioridad
//!    0 después de cualquier prioridad distinta de 0; el resto por
//!    prioridad ascendente. Empates conservan orden de declaración.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use crate::context::TargetType;
use crate::errors::CoreError;

use super::Marker;

/// Produce la secuencia de aplicación para `target` a partir de los markers
/// declarados (en orden de declaración).
pub fn order_markers(declared: &[Arc<dyn Marker>],
                     target: &TargetType)
                     -> Result<Vec<Arc<dyn Marker>>, CoreError> {
    if !target.accepts_customization() {
        return Err(CoreError::MarkerTargetNotCustomizable(target.name().to_string()));
    }
    for marker in declared {
        if !marker.target().accepts_customization() {
            return Err(CoreError::MarkerTargetNotCustomizable(marker.target().name().to_string()));
        }
    }

    let assignable: Vec<Arc<dyn Marker>> = declared.iter()
                                                   .filter(|m| m.target().is_assignable_from(target))
                                                   .cloned()
                                                   .collect();

    let mut survivors = apply_exclusivity_policy(assignable);
    survivors.sort_by(|a, b| compare_markers(a.as_ref(), b.as_ref()));
    Ok(survivors)
}

/// De los markers que comparten grupo de exclusividad sobrevive el último
/// declarado; los demás se descartan antes del sort.
fn apply_exclusivity_policy(markers: Vec<Arc<dyn Marker>>) -> Vec<Arc<dyn Marker>> {
    let mut last_of_group: HashMap<String, usize> = HashMap::new();
    for (idx, marker) in markers.iter().enumerate() {
        if let Some(group) = marker.exclusivity_group() {
            last_of_group.insert(group.to_string(), idx);
        }
    }

    markers.into_iter()
           .enumerate()
           .filter(|(idx, marker)| match marker.exclusivity_group() {
               Some(group) => last_of_group.get(group) == Some(idx),
               None => true,
           })
           .map(|(_, marker)| marker)
           .collect()
}

/// Comparador del sort estable. La customización más específica gana el
/// empate; prioridad 0 se procesa al final dentro de cada clase.
fn compare_markers(a: &dyn Marker, b: &dyn Marker) -> Ordering {
    let (ta, tb) = (a.target(), b.target());
    if ta.is_strict_subtype_of(&tb) {
        return Ordering::Less;
    }
    if tb.is_strict_subtype_of(&ta) {
        return Ordering::Greater;
    }
    match (a.priority(), b.priority()) {
        (0, 0) => Ordering::Equal,
        (0, _) => Ordering::Greater,
        (_, 0) => Ordering::Less,
        (pa, pb) => pa.cmp(&pb),
    }
}
