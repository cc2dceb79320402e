//! Sesiones: fronteras explícitas de resolución con plugins de ciclo de
//! vida.
//!
//! Una sesión registra módulos bajo su propio scope, corre sus operaciones
//! y garantiza el cierre (plugins `on_end` + retiro del scope) aunque el
//! cuerpo falle. El scope activo del contexto se restaura al salir.

use chrono::Utc;
use log::debug;
use uuid::Uuid;

use crate::context::{SessionStamp, TestContext};
use crate::errors::CoreError;
use crate::registry::ScopeKey;
use crate::step::ModuleKind;

/// Plugin de sesión: hooks al inicio y al final.
pub trait SessionPlugin {
    fn on_start(&mut self, ctx: &mut TestContext) -> Result<(), CoreError>;

    fn on_end(&mut self, ctx: &mut TestContext) -> Result<(), CoreError>;
}

/// Builder de una sesión sobre un contexto.
pub struct SessionBuilder<'t> {
    ctx: &'t mut TestContext,
    id: Uuid,
    plugins: Vec<Box<dyn SessionPlugin>>,
}

impl TestContext {
    /// Abre el builder de una sesión nueva.
    pub fn session(&mut self) -> SessionBuilder<'_> {
        SessionBuilder { ctx: self,
                         id: Uuid::new_v4(),
                         plugins: Vec::new() }
    }
}

impl<'t> SessionBuilder<'t> {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Suma un plugin a la sesión.
    pub fn using(mut self, plugin: impl SessionPlugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Registra un módulo instalado bajo el scope de esta sesión.
    /// Una sesión resuelve solo sus propias registraciones.
    pub fn include(self, kind: ModuleKind, reusable: bool) -> Result<Self, CoreError> {
        let scope = ScopeKey::Session(self.id);
        self.ctx.registry.register_module(&scope, kind, reusable)?;
        Ok(self)
    }

    /// Corre la sesión: `on_start` de cada plugin, las operaciones, y
    /// siempre el cierre (`on_end`, retiro del scope, restauración del
    /// scope previo), falle o no el cuerpo. El primer error observado gana.
    pub fn start<F>(self, ops: F) -> Result<(), CoreError>
        where F: FnOnce(&mut TestContext) -> Result<(), CoreError>
    {
        let SessionBuilder { ctx, id, mut plugins } = self;
        let scope = ScopeKey::Session(id);
        let previous = ctx.swap_active_scope(scope.clone());
        ctx.sessions.insert(id, SessionStamp { started_at: Utc::now() });
        debug!("sesión {id} iniciada");

        let body = (|| -> Result<(), CoreError> {
            for plugin in plugins.iter_mut() {
                plugin.on_start(ctx)?;
            }
            ops(ctx)
        })();

        let mut end_error = None;
        for plugin in plugins.iter_mut() {
            if let Err(e) = plugin.on_end(ctx) {
                end_error.get_or_insert(e);
            }
        }
        ctx.registry.retire_scope(&scope);
        if let Some((_, stamp)) = ctx.sessions.remove(&id) {
            let elapsed = Utc::now() - stamp.started_at;
            debug!("sesión {id} cerrada después de {}ms", elapsed.num_milliseconds());
        }
        ctx.swap_active_scope(previous);

        match (body, end_error) {
            (Err(e), _) => Err(e),
            (Ok(()), Some(e)) => Err(e),
            (Ok(()), None) => Ok(()),
        }
    }
}
