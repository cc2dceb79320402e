//! Contrato del driver de automatización web.
//!
//! El core transporta el driver como handle opaco (`Any`); esta capa define
//! el contrato angosto que consumen los steps web y los helpers para
//! guardar/recuperar el driver a través de ese handle.

use testflow_core::errors::CoreError;
use testflow_core::step::StepContext;
use testflow_core::TestContext;

/// Contrato mínimo de un driver de browser. El framework nunca lo
/// inspecciona más allá de esto; cualquier cliente real (remoto o local) lo
/// implementa por fuera.
pub trait WebDriver: Send {
    fn navigate(&mut self, url: &str) -> Result<(), CoreError>;

    fn current_url(&self) -> Option<String>;

    fn quit(&mut self) -> Result<(), CoreError>;
}

/// Ata un driver al contexto detrás del handle opaco del core.
pub fn attach_driver(ctx: &mut TestContext, driver: impl WebDriver + 'static) {
    let boxed: Box<dyn WebDriver> = Box::new(driver);
    ctx.attach_driver_handle(Box::new(boxed));
}

/// Recupera el driver desde la vista de contexto de un step.
pub fn driver_mut<'a>(ctx: &'a mut StepContext<'_>) -> Result<&'a mut dyn WebDriver, CoreError> {
    let slot = ctx.driver.as_deref_mut().ok_or(CoreError::DriverNotAttached)?;
    let boxed = slot.downcast_mut::<Box<dyn WebDriver>>()
                    .ok_or(CoreError::DriverNotAttached)?;
    Ok(boxed.as_mut())
}

/// Driver en memoria que registra las navegaciones; suficiente para tests
/// del pipeline sin un browser real.
pub struct RecordingDriver {
    visited: std::sync::Arc<std::sync::Mutex<Vec<String>>>,
    current: Option<String>,
    quit: bool,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self { visited: std::sync::Arc::new(std::sync::Mutex::new(Vec::new())),
               current: None,
               quit: false }
    }

    /// Handle compartido al log de navegación, para inspección posterior.
    pub fn visited_log(&self) -> std::sync::Arc<std::sync::Mutex<Vec<String>>> {
        self.visited.clone()
    }
}

impl Default for RecordingDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl WebDriver for RecordingDriver {
    fn navigate(&mut self, url: &str) -> Result<(), CoreError> {
        if self.quit {
            return Err(CoreError::StepExecution("driver already quit".to_string()));
        }
        self.visited
            .lock()
            .map_err(|_| CoreError::Internal("visited log poisoned".to_string()))?
            .push(url.to_string());
        self.current = Some(url.to_string());
        Ok(())
    }

    fn current_url(&self) -> Option<String> {
        self.current.clone()
    }

    fn quit(&mut self) -> Result<(), CoreError> {
        self.quit = true;
        Ok(())
    }
}
