//! TestFlow: framework de orquestación de tests de browser.
//!
//! Este crate actúa como facade del workspace:
//! - `testflow-core` trae el engine de customización por markers y el
//!   engine de ejecución de steps con su pipeline de módulos.
//! - `testflow-web` trae la capa de adaptación web (driver opaco, steps y
//!   markers web).
//!
//! Puede usarse directamente desde suites de test o por otros crates.

pub use testflow_core::{browsing, constants, context, errors, marker, registry, session, settings, step};

pub use testflow_core::declare_step;
pub use testflow_core::{apply_customization, expect_context, order_markers, targets, ApplicationRecord, Browser,
                        CoreError, CustomTarget, DefaultBrowser, ExecutableStep, FailurePolicy, ForbiddenBrowsers,
                        InlineStep, Marker, MarkerKind, ModuleKind, ModuleValidator, NoSettings, Registry,
                        RunOptions, ScopeKey, SessionPlugin, SettingsSource, Step, StepContext, StepModule,
                        StepRunner, StepState, StepValidator, TargetType, TestContext, UseSettings, Verdict};

pub use testflow_web::{attach_driver, driver_mut, CounterModule, DetectBrowser, NavigationLogModule, OpenUrlStep,
                       QuitDriverStep, ReadUrlStep, RecordingDriver, WebDriver};
