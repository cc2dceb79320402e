//! Subsistema de ejecución de steps.
//!
//! Un step es una unidad de trabajo con ciclo de vida definido
//! (Created -> Executed | Failed) y desenlace capturado. Este módulo
//! define:
//! - `Step` / `ExecutableStep`: el contrato neutral que consume el runner.
//! - `StepModule` y el pipeline de hooks previos/posteriores.
//! - Validadores de step y de módulo.
//! - `StepRunner`: la máquina de estados de un run.
//! - `InlineStep` para operaciones ad hoc.
//! - `declare_step!` para declarar steps sin boilerplate.

mod definition;
mod inline;
pub mod macros;
mod module;
pub(crate) mod pipeline;
mod runner;
mod state;
mod validator;

pub use definition::{ExecutableStep, Step, StepContext, StepMeta};
pub use inline::InlineStep;
pub use module::{ModuleBinding, ModuleFactory, ModuleKind, ModuleSet, ResolvedModule, SharedModule, StepModule};
pub use runner::{SetupAction, StepRunner};
pub use state::{FailurePolicy, StepState};
pub use validator::{ModuleValidator, RequiredFieldsValidator, StepValidator, Verdict};
