//! Descriptores de tipo de contexto.
//!
//! En lugar de reflexión, la jerarquía de contextos customizables se modela
//! como una tabla de rutas: cada tipo es un camino estático de segmentos
//! desde la raíz `customizable`. La relación de prefijos da la
//! asignabilidad y la relación de subtipo que usa el comparador de markers.

/// Raíz de la jerarquía: todo tipo que acepta customización cuelga de aquí.
const CUSTOMIZABLE_ROOT: &str = "customizable";

/// Descriptor de un tipo de contexto dentro de la jerarquía.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetType {
    path: &'static [&'static str],
}

impl TargetType {
    /// Construye un descriptor a partir de su camino completo de segmentos.
    pub const fn new(path: &'static [&'static str]) -> Self {
        Self { path }
    }

    /// Último segmento del camino (nombre corto del tipo).
    pub fn name(&self) -> &'static str {
        self.path.last().copied().unwrap_or("?")
    }

    /// `true` si el tipo pertenece a la jerarquía customizable.
    pub fn accepts_customization(&self) -> bool {
        self.path.first().copied() == Some(CUSTOMIZABLE_ROOT)
    }

    /// `true` si un valor de tipo `other` puede tratarse como `self`
    /// (`self` es `other` o un ancestro suyo).
    pub fn is_assignable_from(&self, other: &TargetType) -> bool {
        other.path.len() >= self.path.len() && other.path[..self.path.len()] == *self.path
    }

    /// `true` si `self` es un subtipo estricto de `other`.
    pub fn is_strict_subtype_of(&self, other: &TargetType) -> bool {
        self.path.len() > other.path.len() && other.is_assignable_from(self)
    }
}

/// Tipos de contexto que define el framework, de la raíz hacia abajo.
pub mod targets {
    use super::TargetType;

    /// Contexto base: acepta customización, nada más.
    pub const CUSTOMIZABLE: TargetType = TargetType::new(&["customizable"]);
    /// Contexto con slot de settings.
    pub const SETTINGS_DRIVEN: TargetType = TargetType::new(&["customizable", "settings"]);
    /// Contexto con manejo de sesiones.
    pub const SESSION_DRIVEN: TargetType = TargetType::new(&["customizable", "settings", "session"]);
    /// Contexto capaz de ejecutar steps.
    pub const STEP_DRIVEN: TargetType = TargetType::new(&["customizable", "settings", "session", "stepping"]);
    /// Contexto con browser y driver web.
    pub const WEB_DRIVEN: TargetType =
        TargetType::new(&["customizable", "settings", "session", "stepping", "webdriving"]);
}
