//! Instancia de contexto de test.

use std::any::Any;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::browsing::Browser;
use crate::errors::CoreError;
use crate::marker::{self, ApplicationRecord, Marker};
use crate::registry::{Registry, ScopeKey};
use crate::settings::SettingsSource;

use super::{CustomTarget, TargetType};

/// Sello de una sesión activa en el registro del contexto.
#[derive(Debug, Clone)]
pub(crate) struct SessionStamp {
    pub started_at: DateTime<Utc>,
}

/// El objeto que los markers configuran y contra el que corren los steps.
///
/// La jerarquía de "tests derivados" del modelo original se aplana en una
/// sola estructura: el `TargetType` declara hasta qué capa llega esta
/// instancia, y los markers que apuntan a capas superiores aplican igual.
/// El handle del driver es opaco: el core nunca lo inspecciona, solo lo
/// pasa a los steps.
pub struct TestContext {
    target: TargetType,
    markers: Vec<Arc<dyn Marker>>,
    record: ApplicationRecord,
    pub registry: Registry,
    pub browser: Browser,
    pub(crate) settings: Option<Box<dyn SettingsSource>>,
    pub(crate) driver: Option<Box<dyn Any + Send>>,
    active_scope: ScopeKey,
    pub(crate) sessions: DashMap<Uuid, SessionStamp>,
}

impl TestContext {
    pub fn new(target: TargetType) -> Self {
        Self { target,
               markers: Vec::new(),
               record: ApplicationRecord::default(),
               registry: Registry::new(),
               browser: Browser::default(),
               settings: None,
               driver: None,
               active_scope: ScopeKey::Global,
               sessions: DashMap::new() }
    }

    /// Declara un marker; el orden de declaración es semántico (empates del
    /// sort y política de exclusividad lo respetan).
    pub fn declare_marker(&mut self, marker: impl Marker + 'static) -> &mut Self {
        self.markers.push(Arc::new(marker));
        self
    }

    pub fn declared_markers(&self) -> &[Arc<dyn Marker>] {
        &self.markers
    }

    /// Corre el driver de customización contra esta instancia usando su
    /// propio tipo como target.
    pub fn apply_customization(&mut self) -> Result<(), CoreError> {
        self.apply_customization_as(self.target)
    }

    /// Variante con target explícito, para aplicar solo las capas
    /// superiores de la jerarquía.
    pub fn apply_customization_as(&mut self, target: TargetType) -> Result<(), CoreError> {
        let markers = self.markers.clone();
        // El record sale temporalmente de la instancia para que el driver
        // pueda mutar contexto y record a la vez.
        let mut record = std::mem::take(&mut self.record);
        let result = marker::apply_customization(self, &markers, &mut record, Some(target));
        self.record = record;
        result
    }

    /// Registro de markers aplicados/suprimidos de esta instancia.
    pub fn applied_customizations(&self) -> &ApplicationRecord {
        &self.record
    }

    // --- settings ---

    pub fn set_settings(&mut self, settings: Box<dyn SettingsSource>) {
        self.settings = Some(settings);
    }

    pub fn has_settings(&self) -> bool {
        self.settings.is_some()
    }

    /// Referencia tipada al payload de settings, si hay y es del tipo pedido.
    pub fn settings_as<S: SettingsSource>(&self) -> Option<&S> {
        self.settings
            .as_deref()
            .and_then(|s| s.as_any().downcast_ref::<S>())
    }

    // --- driver opaco ---

    /// Guarda el handle opaco del driver de automatización. El core no lo
    /// inspecciona.
    pub fn attach_driver_handle(&mut self, handle: Box<dyn Any + Send>) {
        self.driver = Some(handle);
    }

    pub fn has_driver(&self) -> bool {
        self.driver.is_some()
    }

    pub fn take_driver_handle(&mut self) -> Option<Box<dyn Any + Send>> {
        self.driver.take()
    }

    // --- scope activo ---

    pub fn active_scope(&self) -> &ScopeKey {
        &self.active_scope
    }

    pub(crate) fn swap_active_scope(&mut self, scope: ScopeKey) -> ScopeKey {
        std::mem::replace(&mut self.active_scope, scope)
    }

    /// Ids de las sesiones actualmente en curso.
    pub fn active_sessions(&self) -> Vec<Uuid> {
        self.sessions.iter().map(|e| *e.key()).collect()
    }
}

impl CustomTarget for TestContext {
    fn target_type(&self) -> TargetType {
        self.target
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
