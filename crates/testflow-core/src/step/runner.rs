//! Runner de steps: la máquina de estados de un run completo.
//!
//! En la implementación por defecto el executor crea un runner nuevo para
//! cada step: el snapshot fija la lista de módulos al arrancar y ningún
//! registro posterior aparece a mitad de run.

use chrono::Utc;
use log::{debug, warn};

use crate::errors::CoreError;
use crate::registry::RunnerSnapshot;

use super::definition::{ExecutableStep, StepContext};
use super::pipeline;
use super::state::{FailurePolicy, StepState};

/// Acción de set up aplicada al step antes de validarlo.
pub type SetupAction<S> = Box<dyn FnOnce(&mut S) -> Result<(), CoreError>>;

pub struct StepRunner {
    snapshot: RunnerSnapshot,
}

impl StepRunner {
    pub fn new(snapshot: RunnerSnapshot) -> Self {
        Self { snapshot }
    }

    /// Corre un step completo:
    ///
    /// 1. liga política de fallo y ubicación del caller al step;
    /// 2. corre el set up; un error se envuelve en `StepSetUp` y propaga
    ///    siempre, sin importar la política;
    /// 3. si `validate`, corre los validadores de step; el primer veredicto
    ///    inválido aborta con `StepValidation` antes de cualquier hook;
    /// 4. hook `pre_execute` del step;
    /// 5. resuelve módulos (filtro + requeridos) e invoca los hooks
    ///    previos;
    /// 6. ejecuta la operación central y transiciona:
    ///    éxito -> `Executed`, hooks posteriores, devuelve el valor;
    ///    fallo -> captura el error, `Failed`, hooks posteriores, y según
    ///    la política relanza o devuelve el valor por defecto.
    pub fn run<S>(&mut self,
                  ctx: &mut StepContext<'_>,
                  step: &mut S,
                  setup: Option<SetupAction<S>>,
                  policy: FailurePolicy,
                  validate: bool,
                  calling_method: &str)
                  -> Result<S::Output, CoreError>
        where S: ExecutableStep
    {
        if step.meta().state.is_terminal() {
            return Err(CoreError::StepAlreadyTerminal);
        }

        {
            let meta = step.meta_mut();
            meta.failure_policy = policy;
            meta.calling_method = calling_method.to_string();
        }

        if let Some(setup) = setup {
            setup(step).map_err(|e| CoreError::StepSetUp { step: step.name().to_string(),
                                                           reason: e.to_string() })?;
        }

        if validate {
            for validator in &self.snapshot.step_validators {
                let verdict = validator.validate(step);
                if !verdict.is_valid {
                    return Err(CoreError::StepValidation(verdict.message));
                }
            }
        }

        step.pre_execute();

        let mut modules = pipeline::contextual_modules(&self.snapshot, step);
        let extra = pipeline::absent_required_modules(step, &modules, &self.snapshot.catalog)?;
        modules.extend(extra);

        pipeline::run_before_hooks(step, &modules)?;
        step.meta_mut().started_at = Some(Utc::now());

        match step.execute(ctx) {
            Ok(value) => {
                let meta = step.meta_mut();
                meta.state = StepState::Executed;
                meta.finished_at = Some(Utc::now());
                pipeline::run_after_hooks(step, StepState::Executed, &modules)?;
                debug!("step '{}' ejecutado", step.name());
                Ok(value)
            }
            Err(error) => {
                let meta = step.meta_mut();
                meta.last_failure = Some(error.clone());
                meta.state = StepState::Failed;
                meta.finished_at = Some(Utc::now());
                pipeline::run_after_hooks(step, StepState::Failed, &modules)?;
                match policy {
                    FailurePolicy::Rethrow => Err(error),
                    FailurePolicy::Continue => {
                        warn!("step '{}' falló bajo política Continue: {error}", step.name());
                        Ok(<S::Output as Default>::default())
                    }
                }
            }
        }
    }
}
