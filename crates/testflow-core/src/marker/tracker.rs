//! Registro de aplicación de markers por instancia de contexto.

use indexmap::IndexSet;

use super::MarkerKind;

/// Dos conjuntos disjuntos de kinds: los invocados (aplicados y visibles) y
/// los suprimidos (aplicados pero no visibles, o vetados por cancelación).
///
/// Solo el driver de customización lo muta; garantiza idempotencia a través
/// de invocaciones repetidas sobre la misma instancia de contexto.
#[derive(Debug, Clone, Default)]
pub struct ApplicationRecord {
    invoked: IndexSet<MarkerKind>,
    suppressed: IndexSet<MarkerKind>,
}

impl ApplicationRecord {
    /// `false` si el kind ya fue registrado (en cualquiera de los dos
    /// conjuntos): nunca se re-aplica.
    pub fn should_apply(&self, kind: &MarkerKind) -> bool {
        !self.invoked.contains(kind) && !self.suppressed.contains(kind)
    }

    /// `true` si algún miembro del set de cancelación ya fue invocado.
    /// Un kind presente solo en `suppressed` no cancela.
    pub fn cancellation_hits(&self, set: &[MarkerKind]) -> bool {
        set.iter().any(|k| self.invoked.contains(k))
    }

    pub fn note_invoked(&mut self, kind: MarkerKind) {
        self.invoked.insert(kind);
    }

    pub fn note_suppressed(&mut self, kind: MarkerKind) {
        self.suppressed.insert(kind);
    }

    /// Kinds aplicados y visibles, en orden de aplicación.
    pub fn invoked(&self) -> impl Iterator<Item = &MarkerKind> {
        self.invoked.iter()
    }

    /// Kinds suprimidos, en orden de registro.
    pub fn suppressed(&self) -> impl Iterator<Item = &MarkerKind> {
        self.suppressed.iter()
    }

    pub fn is_invoked(&self, kind: &MarkerKind) -> bool {
        self.invoked.contains(kind)
    }

    pub fn is_suppressed(&self, kind: &MarkerKind) -> bool {
        self.suppressed.contains(kind)
    }

    pub fn len(&self) -> usize {
        self.invoked.len() + self.suppressed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invoked.is_empty() && self.suppressed.is_empty()
    }
}
