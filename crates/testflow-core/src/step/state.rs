//! Estado de un step en tiempo de ejecución.
//!
//! Las transiciones válidas son:
//! - `Created` -> `Executed`
//! - `Created` -> `Failed`
//!
//! `Executed` y `Failed` son terminales; el runner rechaza re-ejecutar un
//! step terminal.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepState {
    /// El step fue construido y todavía no corrió.
    #[default]
    Created,
    /// La operación central terminó correctamente.
    Executed,
    /// La operación central falló; el error quedó capturado en el step.
    Failed,
}

impl StepState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepState::Executed | StepState::Failed)
    }
}

/// Política de propagación del error de ejecución (y solo de ese).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Propagar el error capturado después de los hooks posteriores.
    #[default]
    Rethrow,
    /// Tragar el error: el run devuelve el valor por defecto y el error
    /// queda inspectable en el step.
    Continue,
}
