//! Módulos de step: observadores/augmentadores con hooks alrededor de la
//! ejecución.

use std::fmt;
use std::sync::{Arc, Mutex};

use indexmap::IndexMap;

use crate::errors::CoreError;

use super::definition::Step;
use super::state::StepState;

/// Identificador estable de una clase de módulo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModuleKind(pub &'static str);

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Observador de la ejecución de steps.
///
/// `after_execution` corre exactamente una vez por run, tanto en éxito como
/// en fallo; un error de un hook escala de inmediato y corta los hooks
/// restantes.
pub trait StepModule: Send {
    fn kind(&self) -> ModuleKind;

    fn before_execution(&mut self, step: &mut dyn Step) -> Result<(), CoreError>;

    fn after_execution(&mut self, step: &mut dyn Step, state: StepState) -> Result<(), CoreError>;
}

/// Instancia compartible de un módulo (singleton reusable, o transitoria
/// resuelta para un solo run).
pub type SharedModule = Arc<Mutex<Box<dyn StepModule>>>;

/// Constructor de instancias de un módulo.
pub type ModuleFactory = Arc<dyn Fn() -> Box<dyn StepModule> + Send + Sync>;

/// Registración de un módulo dentro de un scope.
#[derive(Clone)]
pub struct ModuleBinding {
    pub kind: ModuleKind,
    /// `true`: instancia singleton compartida por todos los runs del scope;
    /// `false`: instancia nueva por cada snapshot de runner.
    pub reusable: bool,
    pub(crate) shared: Option<SharedModule>,
}

/// Colección ordenada de registraciones de un scope. El orden de registro
/// es el orden de invocación de los hooks. Se muta solo por
/// register/unregister; los runs la leen vía snapshot.
#[derive(Clone, Default)]
pub struct ModuleSet {
    entries: IndexMap<ModuleKind, ModuleBinding>,
}

impl ModuleSet {
    /// Registra (o reemplaza, conservando posición) un binding.
    pub fn register(&mut self, binding: ModuleBinding) {
        self.entries.insert(binding.kind, binding);
    }

    /// Quita un binding conservando el orden del resto.
    pub fn unregister(&mut self, kind: &ModuleKind) {
        self.entries.shift_remove(kind);
    }

    pub fn contains(&self, kind: &ModuleKind) -> bool {
        self.entries.contains_key(kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleBinding> {
        self.entries.values()
    }

    pub fn kinds(&self) -> Vec<ModuleKind> {
        self.entries.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Módulo ya resuelto para un run concreto.
#[derive(Clone)]
pub struct ResolvedModule {
    pub kind: ModuleKind,
    pub instance: SharedModule,
}

impl ResolvedModule {
    pub(crate) fn fresh(kind: ModuleKind, factory: &ModuleFactory) -> Self {
        Self { kind,
               instance: Arc::new(Mutex::new(factory())) }
    }
}
