//! Axis scoring: weighted aggregation of mapped sources with renormalization
//! under missing data and bias-risk dampening.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::domain::{Axis, EmployeeId, SourceKind, SourceMapping};
use super::signals::{RawSourceProvider, SignalStore, SignalStoreError};

/// Distinguishes a genuinely computed score from one produced with thin or
/// absent data. Consumers must never render `InsufficientData` as a low
/// rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisDataStatus {
    Ok,
    /// Confidence landed below the configured review threshold.
    NeedsReview,
    /// No mapped source resolved a value.
    InsufficientData,
}

/// One resolved source, retained for evidence capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributingSource {
    pub source: SourceKind,
    pub source_ref: Option<String>,
    /// Normalized, bias-adjusted value on [0, 1].
    pub value: f64,
    pub weight: f64,
    pub confidence: f64,
    pub label: String,
}

/// Result of scoring one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisScore {
    pub axis: Axis,
    pub score: f64,
    pub confidence: f64,
    pub status: AxisDataStatus,
    pub sources: Vec<ContributingSource>,
}

/// Stateless scorer applying the mapping configuration to one employee.
#[derive(Debug, Clone, Copy)]
pub struct AxisScorer {
    review_threshold: f64,
}

impl AxisScorer {
    pub fn new(review_threshold: f64) -> Self {
        Self { review_threshold }
    }

    /// Score one axis from the active mappings, in priority order.
    ///
    /// Mappings whose source has no current data simply drop out; the
    /// remaining weights are renormalized so the score stays a weighted
    /// average over what was actually present. Confidence degrades with the
    /// missing weight mass: `min(total_resolved_weight, 1)`.
    pub fn score_axis<S, P>(
        &self,
        signals: &S,
        raw_sources: &P,
        employee: &EmployeeId,
        axis: Axis,
        mappings: &[SourceMapping],
    ) -> Result<AxisScore, SignalStoreError>
    where
        S: SignalStore + ?Sized,
        P: RawSourceProvider + ?Sized,
    {
        let mut total_score = 0.0;
        let mut total_weight = 0.0;
        let mut sources = Vec::new();

        for mapping in mappings {
            if !mapping.active {
                continue;
            }
            let resolved = match &mapping.source {
                SourceKind::Raw(kind) => raw_sources
                    .latest_value(employee, *kind)?
                    .map(|value| {
                        let normalized = value / kind.scale_divisor();
                        let clamped = if (0.0..=1.0).contains(&normalized) {
                            normalized
                        } else {
                            warn!(
                                source = kind.label(),
                                raw = value,
                                normalized,
                                "raw source value outside its documented scale, clamping"
                            );
                            normalized.clamp(0.0, 1.0)
                        };
                        (clamped, 1.0, None)
                    }),
                SourceKind::Signal(category) => {
                    let snapshots = signals.current_signals(employee, category)?;
                    let floor = mapping.minimum_confidence.unwrap_or(0.0);
                    let eligible: Vec<_> = snapshots
                        .iter()
                        .filter(|snapshot| snapshot.confidence >= floor)
                        .collect();
                    if eligible.is_empty() {
                        None
                    } else {
                        // Several feedback channels can report the same
                        // category; average their bias-adjusted values.
                        let count = eligible.len() as f64;
                        let value = eligible
                            .iter()
                            .map(|snapshot| snapshot.score * snapshot.bias_risk.dampening())
                            .sum::<f64>()
                            / count;
                        let confidence = eligible
                            .iter()
                            .map(|snapshot| snapshot.confidence)
                            .sum::<f64>()
                            / count;
                        Some((value, confidence, Some(category.0.clone())))
                    }
                }
                SourceKind::ManualOverride => None,
            };

            if let Some((value, confidence, source_ref)) = resolved {
                total_score += value * mapping.weight;
                total_weight += mapping.weight;
                sources.push(ContributingSource {
                    source: mapping.source.clone(),
                    source_ref,
                    value,
                    weight: mapping.weight,
                    confidence,
                    label: mapping.source.label(),
                });
            }
        }

        let score = if total_weight > 0.0 {
            total_score / total_weight
        } else {
            0.0
        };
        let confidence = total_weight.min(1.0);
        let status = if sources.is_empty() {
            AxisDataStatus::InsufficientData
        } else if confidence < self.review_threshold {
            AxisDataStatus::NeedsReview
        } else {
            AxisDataStatus::Ok
        };

        debug!(
            employee = %employee.0,
            axis = axis.label(),
            score,
            confidence,
            resolved = sources.len(),
            "axis scored"
        );

        Ok(AxisScore {
            axis,
            score,
            confidence,
            status,
            sources,
        })
    }
}
