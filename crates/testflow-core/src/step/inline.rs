//! Step inline: envuelve una operación arbitraria de cero argumentos para
//! que el trabajo ad hoc pase por el mismo pipeline validado y con hooks
//! que un step declarado.

use std::marker::PhantomData;

use crate::errors::CoreError;

use super::definition::{ExecutableStep, Step, StepContext, StepMeta};

/// Step sintético alrededor de un closure (con o sin valor de retorno; la
/// variante sin valor usa `Output = ()`).
pub struct InlineStep<T, F> {
    meta: StepMeta,
    op: Option<F>,
    _out: PhantomData<fn() -> T>,
}

impl<T, F> InlineStep<T, F>
    where T: Default,
          F: FnOnce(&mut StepContext<'_>) -> Result<T, CoreError>
{
    pub fn new(op: F) -> Self {
        Self { meta: StepMeta::default(),
               op: Some(op),
               _out: PhantomData }
    }
}

impl<T, F> Step for InlineStep<T, F> {
    fn name(&self) -> &str {
        "inline"
    }

    fn meta(&self) -> &StepMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut StepMeta {
        &mut self.meta
    }
}

impl<T, F> ExecutableStep for InlineStep<T, F>
    where T: Default,
          F: FnOnce(&mut StepContext<'_>) -> Result<T, CoreError>
{
    type Output = T;

    fn execute(&mut self, ctx: &mut StepContext<'_>) -> Result<T, CoreError> {
        let op = self.op
                     .take()
                     .ok_or_else(|| CoreError::Internal("inline step executed twice".to_string()))?;
        op(ctx)
    }
}
