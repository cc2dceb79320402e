//! testflow-web: capa de adaptación web sobre testflow-core.
//!
//! Este crate provee:
//! - El contrato angosto `WebDriver` y los helpers para atar/recuperar el
//!   driver a través del handle opaco del contexto.
//! - `RecordingDriver`, un driver en memoria para ejercitar el pipeline
//!   sin browser real.
//! - Steps web incluidos (`OpenUrlStep`, `ReadUrlStep`, `QuitDriverStep`).
//! - El marker `DetectBrowser` y módulos observadores.
//!
//! Nota: el core solo conoce el handle como `Any`; toda la semántica web
//! vive aquí.

pub mod driver;
pub mod markers;
pub mod modules;
pub mod steps;

pub use driver::{attach_driver, driver_mut, RecordingDriver, WebDriver};
pub use markers::DetectBrowser;
pub use modules::{CounterModule, NavigationLogModule, COUNTER, NAVIGATION_LOG};
pub use steps::{OpenUrlStep, QuitDriverStep, ReadUrlStep};
