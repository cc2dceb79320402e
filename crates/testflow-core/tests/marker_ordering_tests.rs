//! Tests del engine de ordenamiento de markers.

use std::sync::Arc;

use testflow_core::context::{targets, CustomTarget, TargetType};
use testflow_core::errors::CoreError;
use testflow_core::marker::{order_markers, Marker, MarkerKind};

/// Marker inerte y configurable, suficiente para ejercitar el comparador.
struct RuleMarker {
    kind: MarkerKind,
    target: TargetType,
    priority: u16,
    group: Option<&'static str>,
}

impl RuleMarker {
    fn new(kind: &'static str, target: TargetType, priority: u16) -> Self {
        Self { kind: MarkerKind(kind),
               target,
               priority,
               group: None }
    }

    fn grouped(kind: &'static str, target: TargetType, priority: u16, group: &'static str) -> Self {
        Self { kind: MarkerKind(kind),
               target,
               priority,
               group: Some(group) }
    }
}

impl Marker for RuleMarker {
    fn kind(&self) -> MarkerKind {
        self.kind
    }

    fn target(&self) -> TargetType {
        self.target
    }

    fn priority(&self) -> u16 {
        self.priority
    }

    fn exclusivity_group(&self) -> Option<&str> {
        self.group
    }

    fn customize(&self, _ctx: &mut dyn CustomTarget) -> Result<(), CoreError> {
        Ok(())
    }
}

fn kinds(ordered: &[Arc<dyn Marker>]) -> Vec<&'static str> {
    ordered.iter().map(|m| m.kind().0).collect()
}

#[test]
fn nonzero_priorities_sort_ascending_and_zero_goes_last() {
    let declared: Vec<Arc<dyn Marker>> = vec![
        Arc::new(RuleMarker::new("last", targets::SETTINGS_DRIVEN, 0)),
        Arc::new(RuleMarker::new("second", targets::SETTINGS_DRIVEN, 5)),
        Arc::new(RuleMarker::new("first", targets::SETTINGS_DRIVEN, 1)),
    ];

    let ordered = order_markers(&declared, &targets::SETTINGS_DRIVEN).expect("order");
    assert_eq!(kinds(&ordered), vec!["first", "second", "last"]);
}

#[test]
fn ordering_is_deterministic_and_stable_for_ties() {
    let declared: Vec<Arc<dyn Marker>> = vec![
        Arc::new(RuleMarker::new("a", targets::SETTINGS_DRIVEN, 3)),
        Arc::new(RuleMarker::new("b", targets::SETTINGS_DRIVEN, 3)),
        Arc::new(RuleMarker::new("c", targets::SETTINGS_DRIVEN, 3)),
    ];

    for _ in 0..10 {
        let ordered = order_markers(&declared, &targets::SETTINGS_DRIVEN).expect("order");
        assert_eq!(kinds(&ordered), vec!["a", "b", "c"]);
    }
}

#[test]
fn more_specific_target_sorts_first_over_priority() {
    // El target más específico gana aunque su prioridad numérica sea mayor.
    let declared: Vec<Arc<dyn Marker>> = vec![
        Arc::new(RuleMarker::new("broad", targets::SETTINGS_DRIVEN, 1)),
        Arc::new(RuleMarker::new("narrow", targets::WEB_DRIVEN, 9)),
    ];

    let ordered = order_markers(&declared, &targets::WEB_DRIVEN).expect("order");
    assert_eq!(kinds(&ordered), vec!["narrow", "broad"]);
}

#[test]
fn markers_for_subtypes_of_the_context_are_filtered_out() {
    // Un marker que apunta a una capa más profunda que el contexto no aplica.
    let declared: Vec<Arc<dyn Marker>> = vec![
        Arc::new(RuleMarker::new("web_only", targets::WEB_DRIVEN, 1)),
        Arc::new(RuleMarker::new("settings", targets::SETTINGS_DRIVEN, 1)),
    ];

    let ordered = order_markers(&declared, &targets::SETTINGS_DRIVEN).expect("order");
    assert_eq!(kinds(&ordered), vec!["settings"]);
}

#[test]
fn exclusivity_group_keeps_only_the_last_declared() {
    let declared: Vec<Arc<dyn Marker>> = vec![
        Arc::new(RuleMarker::grouped("a", targets::SETTINGS_DRIVEN, 1, "fam")),
        Arc::new(RuleMarker::grouped("b", targets::SETTINGS_DRIVEN, 2, "fam")),
        Arc::new(RuleMarker::grouped("c", targets::SETTINGS_DRIVEN, 3, "fam")),
        Arc::new(RuleMarker::new("other", targets::SETTINGS_DRIVEN, 1)),
    ];

    let ordered = order_markers(&declared, &targets::SETTINGS_DRIVEN).expect("order");
    assert_eq!(kinds(&ordered), vec!["other", "c"]);
}

#[test]
fn foreign_marker_target_is_a_configuration_error() {
    let foreign = TargetType::new(&["external", "fixture"]);
    let declared: Vec<Arc<dyn Marker>> = vec![Arc::new(RuleMarker::new("alien", foreign, 1))];

    let err = order_markers(&declared, &targets::SETTINGS_DRIVEN).unwrap_err();
    assert!(matches!(err, CoreError::MarkerTargetNotCustomizable(_)));
}

#[test]
fn foreign_context_target_is_a_configuration_error() {
    let foreign = TargetType::new(&["external", "fixture"]);
    let err = order_markers(&[], &foreign).unwrap_err();
    assert!(matches!(err, CoreError::MarkerTargetNotCustomizable(_)));
}
