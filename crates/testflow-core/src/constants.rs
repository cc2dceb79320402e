//! Constantes del framework: argumentos reconocidos, prioridades de los
//! markers incluidos y overrides de proceso evaluados una sola vez.

use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;

/// Argumento de línea de comandos con la ruta del archivo de settings.
pub const SETTINGS_ARG: &str = "--tf-settings";
/// Variable de entorno equivalente a [`SETTINGS_ARG`].
pub const SETTINGS_ENV: &str = "TESTFLOW_SETTINGS";
/// Ruta por defecto cuando no hay override.
pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

/// Argumento de línea de comandos que fuerza el browser a usar.
pub const BROWSER_ARG: &str = "--tf-browser";
/// Variable de entorno equivalente a [`BROWSER_ARG`].
pub const BROWSER_ENV: &str = "TESTFLOW_BROWSER";

/// Prioridades de los markers incluidos en el framework.
///
/// Prioridad 0 significa "aplicar al final dentro de su clase"; el resto se
/// aplica en orden ascendente.
pub mod priorities {
    pub const NO_SETTINGS: u16 = 1;
    pub const SETTINGS: u16 = 2;
    pub const DEFAULT_BROWSER: u16 = 3;
    pub const DETECT_BROWSER: u16 = 4;
    /// Al final: valida el browser ya elegido por los demás markers.
    pub const FORBIDDEN_BROWSERS: u16 = 0;
}

/// Busca `flag` en los argumentos del proceso y devuelve el valor siguiente.
pub fn arg_value(flag: &str) -> Option<String> {
    let args: Vec<String> = env::args().collect();
    args.iter()
        .position(|a| a == flag)
        .and_then(|pos| args.get(pos + 1))
        .cloned()
}

/// Override de la ruta de settings (argumento, o variable de entorno).
/// Carga `.env` una única vez antes de consultar el entorno.
pub static SETTINGS_PATH_OVERRIDE: Lazy<Option<String>> = Lazy::new(|| {
    dotenvy::dotenv().ok();
    arg_value(SETTINGS_ARG).or_else(|| env::var(SETTINGS_ENV).ok())
});

/// Override del browser (argumento, o variable de entorno).
pub static BROWSER_OVERRIDE: Lazy<Option<String>> = Lazy::new(|| {
    dotenvy::dotenv().ok();
    arg_value(BROWSER_ARG).or_else(|| env::var(BROWSER_ENV).ok())
});

/// Ruta efectiva del archivo de settings.
pub fn settings_path() -> PathBuf {
    SETTINGS_PATH_OVERRIDE.clone()
                          .map(PathBuf::from)
                          .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE))
}
