//! testflow-core: motor de orquestación de tests de browser.
//!
//! Dos subsistemas acoplados hacen el trabajo real:
//! - el engine de resolución de customización (orden, filtrado,
//!   deduplicación y aplicación idempotente de markers declarativos), y
//! - el engine de ejecución de steps (ciclo de vida por step, validación,
//!   pipeline de módulos con hooks y manejo configurable de fallos).
pub mod browsing;
pub mod constants;
pub mod context;
pub mod errors;
mod executor;
pub mod marker;
pub mod registry;
pub mod session;
pub mod settings;
pub mod step;

pub use browsing::{Browser, DefaultBrowser, ForbiddenBrowsers};
pub use context::{expect_context, targets, CustomTarget, TargetType, TestContext};
pub use errors::CoreError;
pub use executor::RunOptions;
pub use marker::{apply_customization, order_markers, ApplicationRecord, Marker, MarkerKind};
pub use registry::{Registry, RunnerSnapshot, ScopeKey};
pub use session::{SessionBuilder, SessionPlugin};
pub use settings::{NoSettings, SettingsSource, UseSettings};
pub use step::{ExecutableStep, FailurePolicy, InlineStep, ModuleKind, ModuleSet, ModuleValidator,
               RequiredFieldsValidator, ResolvedModule, SetupAction, SharedModule, Step, StepContext, StepMeta,
               StepModule, StepRunner, StepState, StepValidator, Verdict};
