//! Errores del core del framework.
//!
//! Un solo enum cubre la taxonomía completa (configuración, set up,
//! validación, ejecución). Es `Clone + Serialize` para poder guardar el
//! error capturado dentro del `StepMeta` y relanzarlo después según la
//! política de fallo.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum CoreError {
    // --- configuración (siempre fatales) ---
    #[error("marker target '{0}' is outside the customizable context hierarchy")]
    MarkerTargetNotCustomizable(String),
    #[error("marker '{kind}' cannot customize a context of type '{target}'")]
    MarkerSourceMismatch { kind: String, target: String },
    #[error("no module factory installed for '{0}'")]
    UnknownModule(String),
    #[error("settings could not be loaded: {0}")]
    SettingsLoad(String),
    #[error("browser '{0}' is not recognized")]
    UnknownBrowser(String),
    #[error("browser '{0}' is forbidden for this test")]
    BrowserNotAllowed(String),
    #[error("every known browser is forbidden")]
    NoAllowedBrowsers,
    #[error("no web driver attached to the context")]
    DriverNotAttached,

    // --- set up (siempre propaga, sin importar la política) ---
    #[error("unexpected error during set up of step '{step}': {reason}")]
    StepSetUp { step: String, reason: String },

    // --- validación (propaga antes de cualquier hook) ---
    #[error("step validation failed: {0}")]
    StepValidation(String),

    // --- ejecución (sujeta a la política de fallo) ---
    #[error("step execution failed: {0}")]
    StepExecution(String),
    #[error("step already reached a terminal state")]
    StepAlreadyTerminal,

    #[error("internal: {0}")]
    Internal(String),
}
