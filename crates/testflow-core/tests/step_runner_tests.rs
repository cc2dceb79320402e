//! Tests de la máquina de estados del runner de steps.

use std::sync::{Arc, Mutex};

use testflow_core::context::{targets, TestContext};
use testflow_core::declare_step;
use testflow_core::errors::CoreError;
use testflow_core::step::{FailurePolicy, ModuleKind, Step, StepModule, StepState, StepValidator, Verdict};
use testflow_core::RunOptions;

type Trace = Arc<Mutex<Vec<String>>>;

struct TraceModule {
    kind: ModuleKind,
    trace: Trace,
}

impl StepModule for TraceModule {
    fn kind(&self) -> ModuleKind {
        self.kind
    }

    fn before_execution(&mut self, _step: &mut dyn Step) -> Result<(), CoreError> {
        self.trace.lock().unwrap().push(format!("before:{}", self.kind));
        Ok(())
    }

    fn after_execution(&mut self, _step: &mut dyn Step, state: StepState) -> Result<(), CoreError> {
        self.trace.lock().unwrap().push(format!("after:{}:{state:?}", self.kind));
        Ok(())
    }
}

declare_step! {
    step SumStep {
        name: "sum",
        output: u32,
        fields { lhs: u32, rhs: u32 },
        run(this, _ctx) {
            Ok(this.lhs + this.rhs)
        }
    }
}

declare_step! {
    step ExplodingStep {
        name: "exploding",
        output: u32,
        run(_this, _ctx) {
            Err(CoreError::StepExecution("boom".to_string()))
        }
    }
}

fn context_with_modules(trace: &Trace, names: &[&'static str]) -> TestContext {
    let mut ctx = TestContext::new(targets::STEP_DRIVEN);
    for name in names {
        let t = trace.clone();
        let kind = ModuleKind(name);
        let installed = ctx.install_step_module(move || {
                               Box::new(TraceModule { kind,
                                                      trace: t.clone() })
                           });
        ctx.register_step_module(installed, false).expect("register");
    }
    ctx
}

#[test]
fn hooks_run_in_registration_order_on_both_phases() {
    let trace: Trace = Arc::new(Mutex::new(Vec::new()));
    let mut ctx = context_with_modules(&trace, &["logger", "counter", "auditor"]);

    let mut step = SumStep::new();
    step.lhs = 20;
    step.rhs = 22;
    let value = ctx.run_step(&mut step).expect("run");

    assert_eq!(value, 42);
    assert_eq!(*trace.lock().unwrap(),
               vec!["before:logger",
                    "before:counter",
                    "before:auditor",
                    "after:logger:Executed",
                    "after:counter:Executed",
                    "after:auditor:Executed"]);
}

#[test]
fn after_hooks_run_exactly_once_on_failure_before_propagation() {
    let trace: Trace = Arc::new(Mutex::new(Vec::new()));
    let mut ctx = context_with_modules(&trace, &["logger"]);

    let mut step = ExplodingStep::new();
    let err = ctx.run_step(&mut step).unwrap_err();

    assert_eq!(err, CoreError::StepExecution("boom".to_string()));
    assert_eq!(step.meta.state, StepState::Failed);
    let trace = trace.lock().unwrap();
    assert_eq!(*trace, vec!["before:logger", "after:logger:Failed"]);
}

#[test]
fn continue_policy_swallows_and_records_the_error() {
    let mut ctx = TestContext::new(targets::STEP_DRIVEN);
    let mut step = ExplodingStep::new();

    let value = ctx.run_step_opts(&mut step, RunOptions::continue_on_failure())
                   .expect("continue devuelve el default");

    assert_eq!(value, u32::default());
    assert_eq!(step.meta.state, StepState::Failed);
    assert_eq!(step.meta.last_failure,
               Some(CoreError::StepExecution("boom".to_string())));
}

#[test]
fn rethrow_policy_propagates_the_captured_error() {
    let mut ctx = TestContext::new(targets::STEP_DRIVEN);
    let mut step = ExplodingStep::new();

    let err = ctx.run_step_opts(&mut step, RunOptions::default()).unwrap_err();
    assert_eq!(err, CoreError::StepExecution("boom".to_string()));
    assert_eq!(step.meta.last_failure, Some(err));
}

#[test]
fn setup_errors_always_propagate_even_under_continue() {
    let trace: Trace = Arc::new(Mutex::new(Vec::new()));
    let mut ctx = context_with_modules(&trace, &["logger"]);

    let mut step = SumStep::new();
    let err = ctx.run_step_configured(&mut step,
                                      |_s| Err(CoreError::Internal("bad setup".to_string())),
                                      RunOptions::continue_on_failure())
                 .unwrap_err();

    match err {
        CoreError::StepSetUp { step, reason } => {
            assert_eq!(step, "sum");
            assert!(reason.contains("bad setup"));
        }
        other => panic!("se esperaba StepSetUp, vino {other:?}"),
    }
    // Ningún hook corre cuando el set up falla.
    assert!(trace.lock().unwrap().is_empty());
}

#[test]
fn validator_rejection_carries_its_message_and_blocks_hooks() {
    struct MissingFieldValidator;

    impl StepValidator for MissingFieldValidator {
        fn validate(&self, _step: &dyn Step) -> Verdict {
            Verdict::invalid("missing field X")
        }
    }

    let trace: Trace = Arc::new(Mutex::new(Vec::new()));
    let mut ctx = context_with_modules(&trace, &["logger"]);
    ctx.registry.add_step_validator(MissingFieldValidator);

    let mut step = SumStep::new();
    let err = ctx.run_step(&mut step).unwrap_err();

    assert_eq!(err, CoreError::StepValidation("missing field X".to_string()));
    assert_eq!(step.meta.state, StepState::Created);
    assert!(trace.lock().unwrap().is_empty());
}

#[test]
fn validation_can_be_skipped_per_run() {
    struct RejectEverything;

    impl StepValidator for RejectEverything {
        fn validate(&self, _step: &dyn Step) -> Verdict {
            Verdict::invalid("always invalid")
        }
    }

    let mut ctx = TestContext::new(targets::STEP_DRIVEN);
    ctx.registry.add_step_validator(RejectEverything);

    let mut step = SumStep::new();
    step.lhs = 1;
    step.rhs = 2;
    let value = ctx.run_step_opts(&mut step, RunOptions::without_validation())
                   .expect("sin validación el step corre");
    assert_eq!(value, 3);
}

#[test]
fn terminal_steps_cannot_run_again() {
    let mut ctx = TestContext::new(targets::STEP_DRIVEN);
    let mut step = SumStep::new();
    ctx.run_step(&mut step).expect("first run");

    let err = ctx.run_step(&mut step).unwrap_err();
    assert_eq!(err, CoreError::StepAlreadyTerminal);
}

#[test]
fn a_failing_after_hook_escalates_and_short_circuits_the_rest() {
    struct FailingAfterModule {
        trace: Trace,
    }

    impl StepModule for FailingAfterModule {
        fn kind(&self) -> ModuleKind {
            ModuleKind("failing")
        }

        fn before_execution(&mut self, _step: &mut dyn Step) -> Result<(), CoreError> {
            self.trace.lock().unwrap().push("before:failing".to_string());
            Ok(())
        }

        fn after_execution(&mut self, _step: &mut dyn Step, _state: StepState) -> Result<(), CoreError> {
            Err(CoreError::Internal("hook down".to_string()))
        }
    }

    let trace: Trace = Arc::new(Mutex::new(Vec::new()));
    let mut ctx = TestContext::new(targets::STEP_DRIVEN);
    let t = trace.clone();
    let failing = ctx.install_step_module(move || {
                         Box::new(FailingAfterModule { trace: t.clone() })
                     });
    ctx.register_step_module(failing, false).expect("register failing");
    let t = trace.clone();
    let logger = ctx.install_step_module(move || {
                        Box::new(TraceModule { kind: ModuleKind("logger"),
                                               trace: t.clone() })
                    });
    ctx.register_step_module(logger, false).expect("register logger");

    let mut step = SumStep::new();
    let err = ctx.run_step(&mut step).unwrap_err();

    assert_eq!(err, CoreError::Internal("hook down".to_string()));
    // El step ya había transicionado; el hook que vino después no corrió.
    assert_eq!(step.meta.state, StepState::Executed);
    let trace = trace.lock().unwrap();
    assert!(trace.contains(&"before:failing".to_string()));
    assert!(trace.contains(&"before:logger".to_string()));
    assert!(!trace.iter().any(|e| e == "after:logger:Executed"));
}

#[test]
fn caller_location_is_bound_to_the_step() {
    let mut ctx = TestContext::new(targets::STEP_DRIVEN);
    let mut step = SumStep::new();
    ctx.run_step(&mut step).expect("run");

    assert!(step.meta.calling_method.contains("step_runner_tests.rs"));
}

#[test]
fn inline_failure_respects_the_policy() {
    let mut ctx = TestContext::new(targets::STEP_DRIVEN);

    let value: u32 = ctx.run_inline_returning_with(|_ctx| Err(CoreError::StepExecution("ad hoc".to_string())),
                                                   FailurePolicy::Continue)
                        .expect("continue");
    assert_eq!(value, 0);

    let err = ctx.run_inline(|_ctx| Err(CoreError::StepExecution("ad hoc".to_string())))
                 .unwrap_err();
    assert_eq!(err, CoreError::StepExecution("ad hoc".to_string()));
}
