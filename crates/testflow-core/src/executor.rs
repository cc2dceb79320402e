//! Superficie de ejecución del contexto: la familia `run_*`.
//!
//! Cada run crea su propio `StepRunner` con un snapshot del scope activo
//! (igual que la implementación por defecto del modelo original, que
//! recreaba el runner por cada step). La ubicación del caller se captura
//! con `#[track_caller]` y queda en la metadata del step.

use std::panic::Location;

use crate::context::TestContext;
use crate::errors::CoreError;
use crate::step::{ExecutableStep, FailurePolicy, InlineStep, ModuleKind, SetupAction, Step, StepContext,
                  StepModule, StepRunner};

/// Opciones de un run de step.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub failure_policy: FailurePolicy,
    pub validate: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { failure_policy: FailurePolicy::Rethrow,
               validate: true }
    }
}

impl RunOptions {
    /// Tragar el error de ejecución y devolver el valor por defecto.
    pub fn continue_on_failure() -> Self {
        Self { failure_policy: FailurePolicy::Continue,
               ..Self::default() }
    }

    /// Saltear los validadores de step.
    pub fn without_validation() -> Self {
        Self { validate: false,
               ..Self::default() }
    }
}

fn caller_label(location: &Location<'_>) -> String {
    format!("{}:{}", location.file(), location.line())
}

impl TestContext {
    // --- registración de módulos (scope global del contexto) ---

    /// Instala la fábrica de un módulo en el catálogo del contexto.
    pub fn install_step_module<F>(&mut self, factory: F) -> ModuleKind
        where F: Fn() -> Box<dyn StepModule> + Send + Sync + 'static
    {
        self.registry.install(factory)
    }

    /// Registra un módulo instalado en el scope global.
    pub fn register_step_module(&mut self, kind: ModuleKind, reusable: bool) -> Result<(), CoreError> {
        let scope = crate::registry::ScopeKey::Global;
        self.registry.register_module(&scope, kind, reusable)
    }

    pub fn register_step_modules(&mut self, reusable: bool, kinds: &[ModuleKind]) -> Result<(), CoreError> {
        let scope = crate::registry::ScopeKey::Global;
        self.registry.register_modules(&scope, reusable, kinds)
    }

    pub fn unregister_step_module(&mut self, kind: &ModuleKind) {
        let scope = crate::registry::ScopeKey::Global;
        self.registry.unregister_module(&scope, kind);
    }

    // --- runs de steps declarados ---

    /// Corre un step con las opciones por defecto (Rethrow, con
    /// validación).
    #[track_caller]
    pub fn run_step<S: ExecutableStep>(&mut self, step: &mut S) -> Result<S::Output, CoreError> {
        let caller = caller_label(Location::caller());
        self.run_step_inner(step, None, RunOptions::default(), caller)
    }

    #[track_caller]
    pub fn run_step_opts<S: ExecutableStep>(&mut self,
                                            step: &mut S,
                                            opts: RunOptions)
                                            -> Result<S::Output, CoreError> {
        let caller = caller_label(Location::caller());
        self.run_step_inner(step, None, opts, caller)
    }

    /// Corre un step con una acción de set up previa. Un error del set up
    /// envuelve en `StepSetUp` y propaga siempre.
    #[track_caller]
    pub fn run_step_configured<S, F>(&mut self,
                                     step: &mut S,
                                     setup: F,
                                     opts: RunOptions)
                                     -> Result<S::Output, CoreError>
        where S: ExecutableStep,
              F: FnOnce(&mut S) -> Result<(), CoreError> + 'static
    {
        let caller = caller_label(Location::caller());
        self.run_step_inner(step, Some(Box::new(setup)), opts, caller)
    }

    // --- operaciones ad hoc por el mismo pipeline ---

    /// Corre una operación sin valor de retorno como step inline (sin
    /// validación de step, como todo inline).
    #[track_caller]
    pub fn run_inline<F>(&mut self, op: F) -> Result<(), CoreError>
        where F: FnOnce(&mut StepContext<'_>) -> Result<(), CoreError>
    {
        let caller = caller_label(Location::caller());
        self.run_inline_inner(op, FailurePolicy::Rethrow, caller)
    }

    #[track_caller]
    pub fn run_inline_with<F>(&mut self, op: F, policy: FailurePolicy) -> Result<(), CoreError>
        where F: FnOnce(&mut StepContext<'_>) -> Result<(), CoreError>
    {
        let caller = caller_label(Location::caller());
        self.run_inline_inner(op, policy, caller)
    }

    /// Variante con valor de retorno.
    #[track_caller]
    pub fn run_inline_returning<T, F>(&mut self, op: F) -> Result<T, CoreError>
        where T: Default,
              F: FnOnce(&mut StepContext<'_>) -> Result<T, CoreError>
    {
        let caller = caller_label(Location::caller());
        self.run_inline_inner(op, FailurePolicy::Rethrow, caller)
    }

    #[track_caller]
    pub fn run_inline_returning_with<T, F>(&mut self, op: F, policy: FailurePolicy) -> Result<T, CoreError>
        where T: Default,
              F: FnOnce(&mut StepContext<'_>) -> Result<T, CoreError>
    {
        let caller = caller_label(Location::caller());
        self.run_inline_inner(op, policy, caller)
    }

    /// Construye un step y lo deja configurado sin correrlo.
    pub fn prepare_step<S, F>(&self, setup: F) -> S
        where S: Step + Default,
              F: FnOnce(&mut S)
    {
        let mut step = S::default();
        setup(&mut step);
        step
    }

    // --- internos ---

    fn run_inline_inner<T, F>(&mut self, op: F, policy: FailurePolicy, caller: String) -> Result<T, CoreError>
        where T: Default,
              F: FnOnce(&mut StepContext<'_>) -> Result<T, CoreError>
    {
        let mut step = InlineStep::new(op);
        let opts = RunOptions { failure_policy: policy,
                                validate: false };
        self.run_step_inner(&mut step, None, opts, caller)
    }

    fn run_step_inner<S: ExecutableStep>(&mut self,
                                         step: &mut S,
                                         setup: Option<SetupAction<S>>,
                                         opts: RunOptions,
                                         caller: String)
                                         -> Result<S::Output, CoreError> {
        let snapshot = self.registry.snapshot(self.active_scope());
        let mut runner = StepRunner::new(snapshot);
        let mut step_ctx = StepContext { browser: self.browser,
                                         settings: self.settings.as_deref(),
                                         driver: self.driver.as_deref_mut() };
        runner.run(&mut step_ctx, step, setup, opts.failure_policy, opts.validate, &caller)
    }
}
