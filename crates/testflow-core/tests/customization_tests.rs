//! Tests del driver de customización y su registro de aplicación.

use std::any::Any;
use std::sync::{Arc, Mutex};

use testflow_core::context::{targets, CustomTarget, TargetType, TestContext};
use testflow_core::errors::CoreError;
use testflow_core::marker::{apply_customization, ApplicationRecord, Marker, MarkerKind};
use testflow_core::{Browser, DefaultBrowser};

type Trace = Arc<Mutex<Vec<String>>>;

/// Marker que deja rastro de sus dos fases de efecto.
struct TracingMarker {
    kind: MarkerKind,
    priority: u16,
    visible: bool,
    cancellation: Vec<MarkerKind>,
    fail_on_customize: bool,
    trace: Trace,
}

impl TracingMarker {
    fn new(kind: &'static str, priority: u16, trace: &Trace) -> Self {
        Self { kind: MarkerKind(kind),
               priority,
               visible: true,
               cancellation: Vec::new(),
               fail_on_customize: false,
               trace: trace.clone() }
    }

    fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    fn cancelled_by(mut self, kinds: &[MarkerKind]) -> Self {
        self.cancellation = kinds.to_vec();
        self
    }

    fn failing(mut self) -> Self {
        self.fail_on_customize = true;
        self
    }
}

impl Marker for TracingMarker {
    fn kind(&self) -> MarkerKind {
        self.kind
    }

    fn target(&self) -> TargetType {
        targets::SETTINGS_DRIVEN
    }

    fn priority(&self) -> u16 {
        self.priority
    }

    fn visible(&self) -> bool {
        self.visible
    }

    fn cancellation_set(&self) -> &[MarkerKind] {
        &self.cancellation
    }

    fn customize(&self, _ctx: &mut dyn CustomTarget) -> Result<(), CoreError> {
        if self.fail_on_customize {
            return Err(CoreError::Internal(format!("{} exploded", self.kind)));
        }
        self.trace.lock().unwrap().push(format!("customize:{}", self.kind));
        Ok(())
    }

    fn post_customize(&self, _ctx: &mut dyn CustomTarget) -> Result<(), CoreError> {
        self.trace.lock().unwrap().push(format!("post:{}", self.kind));
        Ok(())
    }
}

fn new_trace() -> Trace {
    Arc::new(Mutex::new(Vec::new()))
}

#[test]
fn primary_effect_runs_before_post_effect_in_order() {
    let trace = new_trace();
    let mut ctx = TestContext::new(targets::SETTINGS_DRIVEN);
    ctx.declare_marker(TracingMarker::new("beta", 2, &trace));
    ctx.declare_marker(TracingMarker::new("alfa", 1, &trace));

    ctx.apply_customization().expect("apply");

    assert_eq!(*trace.lock().unwrap(),
               vec!["customize:alfa", "post:alfa", "customize:beta", "post:beta"]);
    assert!(ctx.applied_customizations().is_invoked(&MarkerKind("alfa")));
    assert!(ctx.applied_customizations().is_invoked(&MarkerKind("beta")));
}

#[test]
fn double_application_is_idempotent() {
    let trace = new_trace();
    let mut ctx = TestContext::new(targets::SETTINGS_DRIVEN);
    ctx.declare_marker(TracingMarker::new("alfa", 1, &trace));
    ctx.declare_marker(TracingMarker::new("beta", 2, &trace).hidden());

    ctx.apply_customization().expect("first");
    let after_first = trace.lock().unwrap().len();
    let record_first: Vec<_> = ctx.applied_customizations().invoked().copied().collect();

    ctx.apply_customization().expect("second");

    // La segunda pasada no produce efectos nuevos ni altera el registro.
    assert_eq!(trace.lock().unwrap().len(), after_first);
    let record_second: Vec<_> = ctx.applied_customizations().invoked().copied().collect();
    assert_eq!(record_first, record_second);
    assert!(ctx.applied_customizations().is_suppressed(&MarkerKind("beta")));
}

#[test]
fn invisible_markers_are_recorded_as_suppressed() {
    let trace = new_trace();
    let mut ctx = TestContext::new(targets::SETTINGS_DRIVEN);
    ctx.declare_marker(TracingMarker::new("fantasma", 1, &trace).hidden());

    ctx.apply_customization().expect("apply");

    let record = ctx.applied_customizations();
    assert!(record.is_suppressed(&MarkerKind("fantasma")));
    assert!(!record.is_invoked(&MarkerKind("fantasma")));
    // El efecto corre igual: suprimido no es cancelado.
    assert_eq!(trace.lock().unwrap().len(), 2);
}

#[test]
fn cancellation_triggers_only_on_invoked_kinds() {
    let n = MarkerKind("n");

    // Caso 1: N invocado -> M se suprime sin efectos.
    let trace = new_trace();
    let mut ctx = TestContext::new(targets::SETTINGS_DRIVEN);
    ctx.declare_marker(TracingMarker::new("n", 1, &trace));
    ctx.declare_marker(TracingMarker::new("m", 2, &trace).cancelled_by(&[n]));
    ctx.apply_customization().expect("apply");

    assert!(ctx.applied_customizations().is_suppressed(&MarkerKind("m")));
    assert!(!trace.lock().unwrap().iter().any(|e| e.ends_with(":m")));

    // Caso 2: N solo suprimido (no visible) -> M aplica normalmente.
    let trace = new_trace();
    let mut ctx = TestContext::new(targets::SETTINGS_DRIVEN);
    ctx.declare_marker(TracingMarker::new("n", 1, &trace).hidden());
    ctx.declare_marker(TracingMarker::new("m", 2, &trace).cancelled_by(&[n]));
    ctx.apply_customization().expect("apply");

    assert!(ctx.applied_customizations().is_invoked(&MarkerKind("m")));
    assert!(trace.lock().unwrap().contains(&"customize:m".to_string()));
}

#[test]
fn vetoed_markers_are_never_reconsidered() {
    let n = MarkerKind("n");
    let trace = new_trace();
    let mut ctx = TestContext::new(targets::SETTINGS_DRIVEN);
    ctx.declare_marker(TracingMarker::new("n", 1, &trace));
    ctx.declare_marker(TracingMarker::new("m", 2, &trace).cancelled_by(&[n]));

    ctx.apply_customization().expect("first");
    let len = trace.lock().unwrap().len();
    ctx.apply_customization().expect("second");

    assert_eq!(trace.lock().unwrap().len(), len);
    assert!(ctx.applied_customizations().is_suppressed(&MarkerKind("m")));
}

#[test]
fn wrong_context_type_is_a_marker_precondition_violation() {
    // Un contexto propio dentro de la jerarquía, pero de otro tipo concreto:
    // el downcast del marker falla y eso es un error de configuración.
    struct ForeignContext;

    impl CustomTarget for ForeignContext {
        fn target_type(&self) -> TargetType {
            targets::WEB_DRIVEN
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    let mut foreign = ForeignContext;
    let markers: Vec<Arc<dyn Marker>> = vec![Arc::new(DefaultBrowser::new(Browser::Chrome))];
    let mut record = ApplicationRecord::default();

    let err = apply_customization(&mut foreign, &markers, &mut record, None).unwrap_err();
    assert!(matches!(err, CoreError::MarkerSourceMismatch { .. }));
    assert!(record.is_empty());
}

#[test]
fn marker_effect_errors_propagate_untranslated() {
    let trace = new_trace();
    let mut ctx = TestContext::new(targets::SETTINGS_DRIVEN);
    ctx.declare_marker(TracingMarker::new("bomba", 1, &trace).failing());
    ctx.declare_marker(TracingMarker::new("despues", 2, &trace));

    let err = ctx.apply_customization().unwrap_err();
    assert_eq!(err, CoreError::Internal("bomba exploded".to_string()));
    // El marker que falló no queda registrado y el posterior no corre.
    assert!(ctx.applied_customizations().is_empty());
    assert!(trace.lock().unwrap().is_empty());
}
