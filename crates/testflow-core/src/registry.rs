//! Registro de resolución: catálogo de módulos, sets por scope y
//! validadores.
//!
//! Es el colaborador de resolución de dependencias reducido a su contrato:
//! instalar fábricas de módulos, registrarlas por scope y producir
//! snapshots inmutables para un run. Un run ve siempre la lista de módulos
//! con la que arrancó, aunque el registro mute después.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use indexmap::IndexMap;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::step::{ModuleBinding, ModuleFactory, ModuleKind, ModuleSet, ModuleValidator, RequiredFieldsValidator,
                  ResolvedModule, StepModule, StepValidator};

/// Frontera de resolución para registraciones de módulos.
///
/// Una sesión resuelve únicamente sus propias registraciones: una sesión
/// sin módulos registrados no ve los globales.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ScopeKey {
    #[default]
    Global,
    Session(Uuid),
}

/// Snapshot inmutable que fija la resolución para un run completo.
pub struct RunnerSnapshot {
    pub(crate) modules: Vec<ResolvedModule>,
    pub(crate) catalog: IndexMap<ModuleKind, ModuleFactory>,
    pub(crate) module_validators: Vec<Arc<dyn ModuleValidator>>,
    pub(crate) step_validators: Vec<Arc<dyn StepValidator>>,
}

pub struct Registry {
    catalog: IndexMap<ModuleKind, ModuleFactory>,
    scopes: HashMap<ScopeKey, ModuleSet>,
    module_validators: Vec<Arc<dyn ModuleValidator>>,
    step_validators: Vec<Arc<dyn StepValidator>>,
}

impl Default for Registry {
    fn default() -> Self {
        // El validador de campos requeridos viene instalado de fábrica.
        Self { catalog: IndexMap::new(),
               scopes: HashMap::new(),
               module_validators: Vec::new(),
               step_validators: vec![Arc::new(RequiredFieldsValidator)] }
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instala la fábrica de un módulo en el catálogo y devuelve su kind.
    /// Instalar no registra: el módulo queda disponible para registración
    /// por scope y para la resolución transitoria de `required_modules`.
    pub fn install<F>(&mut self, factory: F) -> ModuleKind
        where F: Fn() -> Box<dyn StepModule> + Send + Sync + 'static
    {
        let probe = factory();
        let kind = probe.kind();
        drop(probe);
        self.catalog.insert(kind, Arc::new(factory));
        kind
    }

    pub fn is_installed(&self, kind: &ModuleKind) -> bool {
        self.catalog.contains_key(kind)
    }

    /// Registra un módulo instalado dentro de un scope. `reusable` crea la
    /// instancia singleton ahora; si no, cada snapshot construye la suya.
    pub fn register_module(&mut self, scope: &ScopeKey, kind: ModuleKind, reusable: bool) -> Result<(), CoreError> {
        let factory = self.catalog
                          .get(&kind)
                          .cloned()
                          .ok_or_else(|| CoreError::UnknownModule(kind.to_string()))?;
        let shared = if reusable { Some(Arc::new(Mutex::new(factory()))) } else { None };
        self.scopes
            .entry(scope.clone())
            .or_default()
            .register(ModuleBinding { kind, reusable, shared });
        Ok(())
    }

    pub fn register_modules(&mut self, scope: &ScopeKey, reusable: bool, kinds: &[ModuleKind]) -> Result<(), CoreError> {
        for kind in kinds {
            self.register_module(scope, *kind, reusable)?;
        }
        Ok(())
    }

    pub fn unregister_module(&mut self, scope: &ScopeKey, kind: &ModuleKind) {
        if let Some(set) = self.scopes.get_mut(scope) {
            set.unregister(kind);
        }
    }

    /// Elimina todas las registraciones de un scope (fin de sesión).
    pub fn retire_scope(&mut self, scope: &ScopeKey) {
        self.scopes.remove(scope);
    }

    /// Kinds registrados en un scope, en orden de registro.
    pub fn registered(&self, scope: &ScopeKey) -> Vec<ModuleKind> {
        self.scopes.get(scope).map(|s| s.kinds()).unwrap_or_default()
    }

    pub fn add_module_validator(&mut self, validator: impl ModuleValidator + 'static) {
        self.module_validators.push(Arc::new(validator));
    }

    pub fn add_step_validator(&mut self, validator: impl StepValidator + 'static) {
        self.step_validators.push(Arc::new(validator));
    }

    /// Resuelve el scope a un snapshot: los reusables comparten su
    /// singleton, los transitorios se construyen frescos para este run.
    pub fn snapshot(&self, scope: &ScopeKey) -> RunnerSnapshot {
        let modules = self.scopes
                          .get(scope)
                          .map(|set| {
                              set.iter()
                                 .filter_map(|binding| match (&binding.shared, self.catalog.get(&binding.kind)) {
                                     (Some(shared), _) => Some(ResolvedModule { kind: binding.kind,
                                                                                instance: shared.clone() }),
                                     (None, Some(factory)) => Some(ResolvedModule::fresh(binding.kind, factory)),
                                     (None, None) => None,
                                 })
                                 .collect()
                          })
                          .unwrap_or_default();

        RunnerSnapshot { modules,
                         catalog: self.catalog.clone(),
                         module_validators: self.module_validators.clone(),
                         step_validators: self.step_validators.clone() }
    }
}
