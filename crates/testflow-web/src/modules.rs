//! Módulos observadores de la capa web.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use log::debug;

use testflow_core::errors::CoreError;
use testflow_core::step::{ModuleKind, Step, StepModule, StepState};

pub const NAVIGATION_LOG: ModuleKind = ModuleKind("navigation_log");
pub const COUNTER: ModuleKind = ModuleKind("counter");

/// Deja rastro en el log de cada step web que corre.
#[derive(Debug, Clone, Copy, Default)]
pub struct NavigationLogModule;

impl StepModule for NavigationLogModule {
    fn kind(&self) -> ModuleKind {
        NAVIGATION_LOG
    }

    fn before_execution(&mut self, step: &mut dyn Step) -> Result<(), CoreError> {
        debug!("step '{}' por ejecutar (desde {})", step.name(), step.meta().calling_method);
        Ok(())
    }

    fn after_execution(&mut self, step: &mut dyn Step, state: StepState) -> Result<(), CoreError> {
        debug!("step '{}' terminó en {state:?}", step.name());
        Ok(())
    }
}

/// Cuenta desenlaces de steps. Pensado para registrarse como reusable y
/// observarse desde afuera a través de los contadores compartidos.
#[derive(Debug, Clone, Default)]
pub struct CounterModule {
    executed: Arc<AtomicU32>,
    failed: Arc<AtomicU32>,
}

impl CounterModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn executed_counter(&self) -> Arc<AtomicU32> {
        self.executed.clone()
    }

    pub fn failed_counter(&self) -> Arc<AtomicU32> {
        self.failed.clone()
    }
}

impl StepModule for CounterModule {
    fn kind(&self) -> ModuleKind {
        COUNTER
    }

    fn before_execution(&mut self, _step: &mut dyn Step) -> Result<(), CoreError> {
        Ok(())
    }

    fn after_execution(&mut self, _step: &mut dyn Step, state: StepState) -> Result<(), CoreError> {
        match state {
            StepState::Executed => {
                self.executed.fetch_add(1, Ordering::SeqCst);
            }
            StepState::Failed => {
                self.failed.fetch_add(1, Ordering::SeqCst);
            }
            StepState::Created => {}
        }
        Ok(())
    }
}
