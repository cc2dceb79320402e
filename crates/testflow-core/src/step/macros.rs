//! Macro utilitaria para reducir boilerplate al declarar steps.
//!
//! Exportada en la raíz del crate para poder usarla como:
//!   use testflow_core::declare_step;

/// Declara un step con su struct, ctor, `Step` y `ExecutableStep`.
///
/// Forma general:
/// - `fields { ... }` es opcional; los campos deben implementar `Default`.
/// - `required [campo, ...]` es opcional; los campos requeridos deben ser
///   `Option<T>` y alimentan al validador de campos requeridos.
/// - `modules [KIND, ...]` es opcional; deben ser constantes `ModuleKind`.
/// - el cuerpo de `run` devuelve `Result<output, CoreError>`.
///
/// ```ignore
/// declare_step! {
///     step OpenUrlStep {
///         name: "open_url",
///         output: (),
///         fields { url: Option<String> },
///         required [url],
///         run(this, ctx) { /* this: &mut Self */ }
///     }
/// }
/// ```
#[macro_export]
macro_rules! declare_step {
    (
        step $name:ident {
            name: $sname:expr,
            output: $out:ty,
            $(fields { $($fname:ident : $fty:ty),+ $(,)? },)?
            $(required [$($rf:ident),+ $(,)?],)?
            $(modules [$($mk:expr),+ $(,)?],)?
            run($self_ident:ident, $ctx_ident:ident) $body:block
        }
    ) => {
        #[derive(Debug, Default)]
        pub struct $name {
            pub meta: $crate::step::StepMeta,
            $($(pub $fname: $fty,)+)?
        }

        impl $name {
            pub fn new() -> Self {
                <Self as Default>::default()
            }
        }

        impl $crate::step::Step for $name {
            fn name(&self) -> &str {
                $sname
            }

            fn meta(&self) -> &$crate::step::StepMeta {
                &self.meta
            }

            fn meta_mut(&mut self) -> &mut $crate::step::StepMeta {
                &mut self.meta
            }

            $(
                fn required_modules(&self) -> &[$crate::step::ModuleKind] {
                    const REQUIRED: &[$crate::step::ModuleKind] = &[$($mk),+];
                    REQUIRED
                }
            )?

            $(
                fn unset_required_fields(&self) -> Vec<&'static str> {
                    let mut missing = Vec::new();
                    $(
                        if self.$rf.is_none() {
                            missing.push(stringify!($rf));
                        }
                    )+
                    missing
                }
            )?
        }

        impl $crate::step::ExecutableStep for $name {
            type Output = $out;

            fn execute(&mut self,
                       $ctx_ident: &mut $crate::step::StepContext<'_>)
                       -> Result<$out, $crate::errors::CoreError> {
                let $self_ident = self;
                $body
            }
        }
    };
}
