//! Validadores de steps y de módulos.

use super::definition::Step;
use super::module::ModuleKind;

/// Resultado de un validador de step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub is_valid: bool,
    pub message: String,
}

impl Verdict {
    pub fn valid() -> Self {
        Self { is_valid: true,
               message: String::new() }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self { is_valid: false,
               message: message.into() }
    }
}

/// Valida un step antes de que corra cualquier hook. El primer veredicto
/// inválido aborta el run.
pub trait StepValidator: Send + Sync {
    fn validate(&self, step: &dyn Step) -> Verdict;
}

/// Predicado puro que decide si un módulo participa del run de un step.
/// Un módulo queda incluido solo si todos los validadores lo aceptan.
pub trait ModuleValidator: Send + Sync {
    fn validate(&self, module: ModuleKind, step: &dyn Step) -> bool;
}

/// Validador instalado por defecto: exige que los campos requeridos del
/// step estén asignados.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredFieldsValidator;

impl StepValidator for RequiredFieldsValidator {
    fn validate(&self, step: &dyn Step) -> Verdict {
        let missing = step.unset_required_fields();
        if missing.is_empty() {
            Verdict::valid()
        } else {
            Verdict::invalid(format!("step '{}' is missing required fields: {}",
                                     step.name(),
                                     missing.join(", ")))
        }
    }
}
