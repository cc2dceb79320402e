//! Contrato de los steps.

use std::any::Any;

use chrono::{DateTime, Utc};

use crate::browsing::Browser;
use crate::errors::CoreError;
use crate::settings::SettingsSource;

use super::module::ModuleKind;
use super::state::{FailurePolicy, StepState};

/// Metadata de ejecución que el runner mantiene sobre cada step.
#[derive(Debug, Clone, Default)]
pub struct StepMeta {
    pub state: StepState,
    /// Error capturado en el último run fallido (inspectable bajo la
    /// política `Continue`).
    pub last_failure: Option<CoreError>,
    pub failure_policy: FailurePolicy,
    /// Ubicación del caller que pidió el run (archivo:línea).
    pub calling_method: String,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// Unidad de trabajo ejecutable. El dueño es siempre el caller que pidió el
/// run; no se comparte entre ejecuciones concurrentes.
pub trait Step {
    /// Nombre estable del step, usado en diagnósticos y validación.
    fn name(&self) -> &str;

    fn meta(&self) -> &StepMeta;
    fn meta_mut(&mut self) -> &mut StepMeta;

    /// Módulos que este step exige sin importar qué haya registrado.
    fn required_modules(&self) -> &[ModuleKind] {
        &[]
    }

    /// Nombres de campos requeridos que siguen sin asignar; los consume el
    /// validador de campos requeridos.
    fn unset_required_fields(&self) -> Vec<&'static str> {
        Vec::new()
    }

    /// Hook previo del propio step, sin valor de retorno.
    fn pre_execute(&mut self) {}
}

/// Step con operación central. El tipo asociado unifica las dos formas de
/// invocación: `Output = ()` para fire-and-forget, cualquier `Default`
/// para la variante con valor.
pub trait ExecutableStep: Step {
    type Output: Default;

    fn execute(&mut self, ctx: &mut StepContext<'_>) -> Result<Self::Output, CoreError>;
}

/// Vista del contexto de test entregada a `ExecutableStep::execute`.
///
/// El handle del driver es opaco (`Any`); la capa web sabe bajarlo a su
/// contrato concreto.
pub struct StepContext<'a> {
    pub browser: Browser,
    pub settings: Option<&'a dyn SettingsSource>,
    pub driver: Option<&'a mut (dyn Any + Send)>,
}

impl<'a> StepContext<'a> {
    /// Referencia tipada a los settings, si hay y son del tipo pedido.
    pub fn settings_as<S: SettingsSource>(&self) -> Option<&S> {
        self.settings.and_then(|s| s.as_any().downcast_ref::<S>())
    }
}
