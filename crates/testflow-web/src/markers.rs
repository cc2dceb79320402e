//! Markers de la capa web.

use log::warn;

use testflow_core::browsing::Browser;
use testflow_core::constants::{self, priorities};
use testflow_core::context::{expect_context, targets, CustomTarget, TargetType, TestContext};
use testflow_core::errors::CoreError;
use testflow_core::marker::{Marker, MarkerKind};

pub const DETECT_BROWSER_KIND: MarkerKind = MarkerKind("detect_browser");

/// Detecta un override del browser por argumento de línea de comandos o
/// variable de entorno y lo aplica sobre la elección ya configurada.
///
/// Un valor que no parsea a un browser conocido se ignora con un warning;
/// el browser vigente se conserva.
#[derive(Debug, Clone, Default)]
pub struct DetectBrowser {
    override_value: Option<String>,
}

impl DetectBrowser {
    /// Usa el override del proceso (`--tf-browser` / `TESTFLOW_BROWSER`).
    pub fn new() -> Self {
        Self { override_value: None }
    }

    /// Valor explícito, por encima del proceso (útil en tests).
    pub fn with_value(value: impl Into<String>) -> Self {
        Self { override_value: Some(value.into()) }
    }

    fn resolve(&self) -> Option<String> {
        self.override_value
            .clone()
            .or_else(|| constants::BROWSER_OVERRIDE.clone())
    }
}

impl Marker for DetectBrowser {
    fn kind(&self) -> MarkerKind {
        DETECT_BROWSER_KIND
    }

    fn target(&self) -> TargetType {
        targets::WEB_DRIVEN
    }

    fn priority(&self) -> u16 {
        priorities::DETECT_BROWSER
    }

    fn customize(&self, ctx: &mut dyn CustomTarget) -> Result<(), CoreError> {
        let ctx = expect_context::<TestContext>(ctx, self.kind())?;
        if let Some(raw) = self.resolve() {
            match raw.parse::<Browser>() {
                Ok(browser) => ctx.browser = browser,
                Err(_) => warn!("browser override '{raw}' no reconocido, se conserva {}", ctx.browser),
            }
        }
        Ok(())
    }
}
