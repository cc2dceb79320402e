//! Selección de browser y sus markers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::priorities;
use crate::context::{expect_context, targets, CustomTarget, TargetType, TestContext};
use crate::errors::CoreError;
use crate::marker::{Marker, MarkerKind};

/// Browsers soportados por el framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Browser {
    #[default]
    Firefox,
    Chrome,
    Edge,
    InternetExplorer,
    Safari,
}

impl Browser {
    pub const ALL: [Browser; 5] =
        [Browser::Firefox, Browser::Chrome, Browser::Edge, Browser::InternetExplorer, Browser::Safari];
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Browser::Firefox => "firefox",
            Browser::Chrome => "chrome",
            Browser::Edge => "edge",
            Browser::InternetExplorer => "internet_explorer",
            Browser::Safari => "safari",
        };
        f.write_str(name)
    }
}

impl FromStr for Browser {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "firefox" => Ok(Browser::Firefox),
            "chrome" => Ok(Browser::Chrome),
            "edge" => Ok(Browser::Edge),
            "ie" | "internet_explorer" => Ok(Browser::InternetExplorer),
            "safari" => Ok(Browser::Safari),
            other => Err(CoreError::UnknownBrowser(other.to_string())),
        }
    }
}

pub const DEFAULT_BROWSER_KIND: MarkerKind = MarkerKind("default_browser");
pub const FORBIDDEN_BROWSERS_KIND: MarkerKind = MarkerKind("forbidden_browsers");

/// Fija el browser por defecto del contexto.
#[derive(Debug, Clone)]
pub struct DefaultBrowser {
    pub browser: Browser,
}

impl DefaultBrowser {
    pub fn new(browser: Browser) -> Self {
        Self { browser }
    }
}

impl Marker for DefaultBrowser {
    fn kind(&self) -> MarkerKind {
        DEFAULT_BROWSER_KIND
    }

    fn target(&self) -> TargetType {
        targets::WEB_DRIVEN
    }

    fn priority(&self) -> u16 {
        priorities::DEFAULT_BROWSER
    }

    fn customize(&self, ctx: &mut dyn CustomTarget) -> Result<(), CoreError> {
        let ctx = expect_context::<TestContext>(ctx, self.kind())?;
        ctx.browser = self.browser;
        Ok(())
    }
}

/// Rechaza el browser ya elegido si pertenece a la lista prohibida.
///
/// Corre con prioridad 0 (al final), cuando los demás markers ya decidieron
/// el browser efectivo.
#[derive(Debug, Clone)]
pub struct ForbiddenBrowsers {
    browsers: Vec<Browser>,
}

impl ForbiddenBrowsers {
    pub fn new(browsers: impl Into<Vec<Browser>>) -> Self {
        Self { browsers: browsers.into() }
    }
}

impl Marker for ForbiddenBrowsers {
    fn kind(&self) -> MarkerKind {
        FORBIDDEN_BROWSERS_KIND
    }

    fn target(&self) -> TargetType {
        targets::WEB_DRIVEN
    }

    fn priority(&self) -> u16 {
        priorities::FORBIDDEN_BROWSERS
    }

    fn customize(&self, ctx: &mut dyn CustomTarget) -> Result<(), CoreError> {
        let ctx = expect_context::<TestContext>(ctx, self.kind())?;
        if Browser::ALL.iter().all(|b| self.browsers.contains(b)) {
            return Err(CoreError::NoAllowedBrowsers);
        }
        if self.browsers.contains(&ctx.browser) {
            return Err(CoreError::BrowserNotAllowed(ctx.browser.to_string()));
        }
        Ok(())
    }
}
