//! Settings del test y sus markers.
//!
//! El core trata el payload de settings como opaco: el colaborador de
//! persistencia (aquí, un archivo JSON) lo deserializa y el contexto lo
//! guarda detrás de `SettingsSource`. El marker `UseSettings<S>` reproduce
//! la semántica completa de carga: ruta con override por argumento o
//! entorno, carga opcional desde archivo y creación del archivo con los
//! defaults serializados cuando no existe.

use std::any::Any;
use std::fs;
use std::marker::PhantomData;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::constants::{self, priorities};
use crate::context::{expect_context, targets, CustomTarget, TargetType, TestContext};
use crate::errors::CoreError;
use crate::marker::{Marker, MarkerKind};

/// Payload de configuración opaco para el core.
pub trait SettingsSource: Any + Send {
    /// Hook posterior a la deserialización (normalizaciones, derivados).
    fn post_load(&mut self) -> Result<(), CoreError> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any;
}

pub const USE_SETTINGS_KIND: MarkerKind = MarkerKind("use_settings");
pub const NO_SETTINGS_KIND: MarkerKind = MarkerKind("no_settings");

/// Marker sin efecto cuya sola invocación cancela la carga de settings.
#[derive(Debug, Clone, Default)]
pub struct NoSettings;

impl Marker for NoSettings {
    fn kind(&self) -> MarkerKind {
        NO_SETTINGS_KIND
    }

    fn target(&self) -> TargetType {
        targets::SETTINGS_DRIVEN
    }

    fn priority(&self) -> u16 {
        priorities::NO_SETTINGS
    }

    fn customize(&self, _ctx: &mut dyn CustomTarget) -> Result<(), CoreError> {
        Ok(())
    }
}

/// Carga settings de tipo `S` desde un archivo JSON y los instala en el
/// contexto.
///
/// Ruta: override explícito del marker, o el argumento/variable de entorno
/// reconocidos, o `settings.json`. Pertenece al grupo de exclusividad
/// `settings` (sobrevive el último declarado) y se cancela si `NoSettings`
/// ya fue invocado.
pub struct UseSettings<S> {
    load_from_file: bool,
    create_if_missing: bool,
    path: Option<PathBuf>,
    _settings: PhantomData<fn() -> S>,
}

impl<S> UseSettings<S> {
    pub fn new() -> Self {
        Self { load_from_file: true,
               create_if_missing: true,
               path: None,
               _settings: PhantomData }
    }

    /// Desactiva la lectura del archivo (se usan los defaults de `S`).
    pub fn skip_file(mut self) -> Self {
        self.load_from_file = false;
        self
    }

    /// No crear el archivo cuando falta.
    pub fn without_create(mut self) -> Self {
        self.create_if_missing = false;
        self
    }

    /// Ruta explícita, por encima de argumento/entorno.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    fn resolve_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(constants::settings_path)
    }
}

impl<S> Default for UseSettings<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Marker for UseSettings<S>
    where S: SettingsSource + Serialize + DeserializeOwned + Default + 'static
{
    fn kind(&self) -> MarkerKind {
        USE_SETTINGS_KIND
    }

    fn target(&self) -> TargetType {
        targets::SETTINGS_DRIVEN
    }

    fn priority(&self) -> u16 {
        priorities::SETTINGS
    }

    fn cancellation_set(&self) -> &[MarkerKind] {
        &[NO_SETTINGS_KIND]
    }

    fn exclusivity_group(&self) -> Option<&str> {
        Some("settings")
    }

    fn customize(&self, ctx: &mut dyn CustomTarget) -> Result<(), CoreError> {
        let ctx = expect_context::<TestContext>(ctx, self.kind())?;
        let path = self.resolve_path();

        let mut settings: S = if path.exists() {
            if self.load_from_file {
                let raw = fs::read_to_string(&path)
                    .map_err(|e| CoreError::SettingsLoad(format!("{}: {e}", path.display())))?;
                serde_json::from_str(&raw)
                    .map_err(|e| CoreError::SettingsLoad(format!("{}: {e}", path.display())))?
            } else {
                S::default()
            }
        } else if self.create_if_missing {
            let defaults = S::default();
            let raw = serde_json::to_string_pretty(&defaults)
                .map_err(|e| CoreError::SettingsLoad(e.to_string()))?;
            fs::write(&path, raw).map_err(|e| CoreError::SettingsLoad(format!("{}: {e}", path.display())))?;
            defaults
        } else {
            S::default()
        };

        settings.post_load()?;
        ctx.set_settings(Box::new(settings));
        Ok(())
    }
}
