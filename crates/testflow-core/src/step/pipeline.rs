//! Pipeline de módulos: resolución en dos fases e invocación ordenada de
//! hooks.

use log::debug;

use crate::errors::CoreError;
use crate::registry::RunnerSnapshot;

use super::definition::Step;
use super::module::{ModuleFactory, ModuleKind, ResolvedModule};
use super::state::StepState;

use indexmap::IndexMap;

/// Fase (a): filtro contextual. Un módulo del snapshot participa solo si
/// todos los validadores de módulo lo aceptan para este step. El orden de
/// registro se conserva.
pub(crate) fn contextual_modules(snapshot: &RunnerSnapshot, step: &dyn Step) -> Vec<ResolvedModule> {
    snapshot.modules
            .iter()
            .filter(|module| {
                snapshot.module_validators
                        .iter()
                        .all(|v| v.validate(module.kind, step))
            })
            .cloned()
            .collect()
}

/// Fase (b): augmentación declarada por el step. Los `required_modules`
/// ausentes del set filtrado se construyen transitoriamente desde el
/// catálogo (instancia fresca, un solo uso, nunca entra al ModuleSet
/// compartido) y se agregan al final, en orden de declaración.
pub(crate) fn absent_required_modules(step: &dyn Step,
                                      present: &[ResolvedModule],
                                      catalog: &IndexMap<ModuleKind, ModuleFactory>)
                                      -> Result<Vec<ResolvedModule>, CoreError> {
    let mut extra = Vec::new();
    for kind in step.required_modules() {
        if present.iter().any(|m| m.kind == *kind) {
            continue;
        }
        let factory = catalog.get(kind)
                             .ok_or_else(|| CoreError::UnknownModule(kind.to_string()))?;
        debug!("módulo requerido '{kind}' resuelto transitoriamente para el step '{}'",
               step.name());
        extra.push(ResolvedModule::fresh(*kind, factory));
    }
    Ok(extra)
}

/// Invoca `before_execution` sobre cada módulo resuelto, en orden,
/// estrictamente antes de la operación central.
pub(crate) fn run_before_hooks(step: &mut dyn Step, modules: &[ResolvedModule]) -> Result<(), CoreError> {
    for module in modules {
        lock(module)?.before_execution(step)?;
    }
    Ok(())
}

/// Invoca `after_execution(step, estado_final)` sobre cada módulo, en el
/// mismo orden, estrictamente después de conocer el desenlace (en éxito y
/// en fallo por igual). Un hook que falla escala de inmediato.
pub(crate) fn run_after_hooks(step: &mut dyn Step,
                              state: StepState,
                              modules: &[ResolvedModule])
                              -> Result<(), CoreError> {
    for module in modules {
        lock(module)?.after_execution(step, state)?;
    }
    Ok(())
}

fn lock(module: &ResolvedModule)
        -> Result<std::sync::MutexGuard<'_, Box<dyn super::module::StepModule>>, CoreError> {
    module.instance
          .lock()
          .map_err(|_| CoreError::Internal(format!("step module '{}' mutex poisoned", module.kind)))
}
