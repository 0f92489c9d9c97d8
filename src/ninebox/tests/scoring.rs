use super::common::*;
use crate::ninebox::domain::{
    Axis, BiasRisk, RawSourceKind, SignalCategory, SourceKind, SourceMapping,
};
use crate::ninebox::scoring::{AxisDataStatus, AxisScorer};

fn score_axis(fixture: &Fixture, employee: &crate::ninebox::domain::EmployeeId, axis: Axis) -> crate::ninebox::scoring::AxisScore {
    let registry = registry_with_defaults();
    let mappings = registry.active_mappings(&tenant(), axis);
    AxisScorer::new(REVIEW_THRESHOLD)
        .score_axis(
            &*fixture.signals,
            &*fixture.raw_sources,
            employee,
            axis,
            &mappings,
        )
        .expect("in-memory adapters never fail")
}

#[test]
fn appraisal_and_goal_scenario_renormalizes_over_present_sources() {
    let fixture = fixture();
    let emp = employee("emp-1");
    fixture
        .raw_sources
        .set(emp.clone(), RawSourceKind::Appraisal, 4.2);
    fixture
        .raw_sources
        .set(emp.clone(), RawSourceKind::GoalProgress, 78.3);
    // collaboration signal (weight 0.2) intentionally absent

    let outcome = score_axis(&fixture, &emp, Axis::Performance);

    let expected = ((4.2 / 5.0) * 0.5 + 0.783 * 0.3) / 0.8;
    assert!((outcome.score - expected).abs() < 1e-12);
    assert!((outcome.confidence - 0.8).abs() < 1e-12);
    assert_eq!(outcome.status, AxisDataStatus::Ok);
    assert_eq!(outcome.sources.len(), 2);
}

#[test]
fn absent_sources_never_drag_the_weighted_average() {
    let fixture = fixture();
    let emp = employee("emp-2");
    fixture
        .raw_sources
        .set(emp.clone(), RawSourceKind::Appraisal, 4.0);

    let outcome = score_axis(&fixture, &emp, Axis::Performance);

    // Only the appraisal resolved, so the score is exactly its normalized
    // value regardless of the other configured weights.
    assert!((outcome.score - 0.8).abs() < 1e-12);
    assert!((outcome.confidence - 0.5).abs() < 1e-12);
}

#[test]
fn no_resolvable_data_is_insufficient_not_a_low_rating() {
    let fixture = fixture();
    let emp = employee("emp-3");

    let outcome = score_axis(&fixture, &emp, Axis::Performance);

    assert_eq!(outcome.score, 0.0);
    assert_eq!(outcome.confidence, 0.0);
    assert_eq!(outcome.status, AxisDataStatus::InsufficientData);
    assert!(outcome.sources.is_empty());
}

#[test]
fn confidence_below_threshold_flags_review() {
    let fixture = fixture();
    let emp = employee("emp-4");
    fixture
        .raw_sources
        .set(emp.clone(), RawSourceKind::GoalProgress, 90.0);

    let outcome = score_axis(&fixture, &emp, Axis::Performance);

    assert!((outcome.confidence - 0.3).abs() < 1e-12);
    assert_eq!(outcome.status, AxisDataStatus::NeedsReview);
}

#[test]
fn low_confidence_signals_are_excluded_by_the_mapping_floor() {
    let fixture = fixture();
    let emp = employee("emp-5");
    // leadership mapping requires confidence >= 0.6
    fixture
        .signals
        .insert(emp.clone(), snapshot("leadership", 0.9, 0.4, BiasRisk::Low));

    let outcome = score_axis(&fixture, &emp, Axis::Potential);

    assert_eq!(outcome.status, AxisDataStatus::InsufficientData);
}

#[test]
fn bias_dampening_scales_high_risk_signals_by_point_seven() {
    let low_fixture = fixture();
    let high_fixture = fixture();
    let emp = employee("emp-6");
    low_fixture
        .signals
        .insert(emp.clone(), snapshot("leadership", 0.8, 0.9, BiasRisk::Low));
    high_fixture
        .signals
        .insert(emp.clone(), snapshot("leadership", 0.8, 0.9, BiasRisk::High));

    let low = score_axis(&low_fixture, &emp, Axis::Potential);
    let high = score_axis(&high_fixture, &emp, Axis::Potential);

    assert!(high.score < low.score);
    assert!((high.score / low.score - 0.7).abs() < 1e-12);
}

#[test]
fn same_category_snapshots_average_after_bias_adjustment() {
    let fixture = fixture();
    let emp = employee("emp-7");
    fixture
        .signals
        .insert(emp.clone(), snapshot("leadership", 0.82, 0.9, BiasRisk::Low));
    fixture.signals.insert(
        emp.clone(),
        snapshot("leadership", 0.75, 0.8, BiasRisk::Medium),
    );

    let outcome = score_axis(&fixture, &emp, Axis::Potential);

    let leadership = outcome
        .sources
        .iter()
        .find(|source| source.source == SourceKind::Signal(SignalCategory::new("leadership")))
        .expect("leadership contributes");
    let expected = (0.82 + 0.75 * 0.85) / 2.0;
    assert!((leadership.value - expected).abs() < 1e-12);
    assert!((leadership.confidence - 0.85).abs() < 1e-12);
}

#[test]
fn fully_resolved_mappings_reach_full_confidence() {
    let fixture = fixture();
    let emp = employee("emp-10");
    fixture
        .raw_sources
        .set(emp.clone(), RawSourceKind::Appraisal, 4.2);
    fixture
        .raw_sources
        .set(emp.clone(), RawSourceKind::GoalProgress, 78.3);
    fixture.signals.insert(
        emp.clone(),
        snapshot("collaboration", 0.9, 0.9, BiasRisk::Low),
    );

    let outcome = score_axis(&fixture, &emp, Axis::Performance);

    assert!((outcome.confidence - 1.0).abs() < 1e-12);
    assert_eq!(outcome.status, AxisDataStatus::Ok);
    assert_eq!(outcome.sources.len(), 3);
}

#[test]
fn confidence_caps_at_one_when_resolved_weights_exceed_it() {
    let fixture = fixture();
    let emp = employee("emp-11");
    fixture
        .raw_sources
        .set(emp.clone(), RawSourceKind::Appraisal, 4.2);
    fixture
        .raw_sources
        .set(emp.clone(), RawSourceKind::GoalProgress, 78.3);
    fixture.signals.insert(
        emp.clone(),
        snapshot("collaboration", 0.9, 0.9, BiasRisk::Low),
    );
    fixture
        .signals
        .insert(emp.clone(), snapshot("initiative", 0.6, 0.8, BiasRisk::Low));

    // Extra active mapping pushes the resolvable weight mass to 1.5.
    let registry = registry_with_defaults();
    registry
        .upsert_mapping(SourceMapping {
            tenant: tenant(),
            axis: Axis::Performance,
            source: SourceKind::Signal(SignalCategory::new("initiative")),
            weight: 0.5,
            priority: 4,
            active: true,
            minimum_confidence: None,
        })
        .expect("extra mapping accepted");
    let mappings = registry.active_mappings(&tenant(), Axis::Performance);

    let outcome = AxisScorer::new(REVIEW_THRESHOLD)
        .score_axis(
            &*fixture.signals,
            &*fixture.raw_sources,
            &emp,
            Axis::Performance,
            &mappings,
        )
        .expect("in-memory adapters never fail");

    // The score stays the weighted average over the true weight mass; only
    // the confidence is capped.
    let expected =
        ((4.2 / 5.0) * 0.5 + 0.783 * 0.3 + 0.9 * 0.2 + 0.6 * 0.5) / (0.5 + 0.3 + 0.2 + 0.5);
    assert!((outcome.score - expected).abs() < 1e-12);
    assert_eq!(outcome.confidence, 1.0);
    assert_eq!(outcome.status, AxisDataStatus::Ok);
    assert_eq!(outcome.sources.len(), 4);
}

#[test]
fn out_of_scale_raw_values_clamp_to_one() {
    let fixture = fixture();
    let emp = employee("emp-8");
    fixture
        .raw_sources
        .set(emp.clone(), RawSourceKind::Appraisal, 6.3);

    let outcome = score_axis(&fixture, &emp, Axis::Performance);

    let appraisal = outcome
        .sources
        .iter()
        .find(|source| source.source == SourceKind::Raw(RawSourceKind::Appraisal))
        .expect("appraisal contributes");
    assert_eq!(appraisal.value, 1.0);
}

#[test]
fn stale_snapshots_do_not_participate() {
    let fixture = fixture();
    let emp = employee("emp-9");
    let mut old = snapshot("leadership", 0.95, 0.9, BiasRisk::Low);
    old.is_current = false;
    fixture.signals.insert(emp.clone(), old);

    let outcome = score_axis(&fixture, &emp, Axis::Potential);

    assert_eq!(outcome.status, AxisDataStatus::InsufficientData);
}
