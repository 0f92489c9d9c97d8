//! Evidence capture: one immutable record per source that contributed to an
//! assessment, including manual overrides.

use chrono::{DateTime, Utc};

use super::domain::{AssessmentId, Axis, EvidenceRecord, SourceKind};
use super::scoring::AxisScore;

/// Fallback summary when an override arrives without reason text. The
/// service boundary rejects such saves before they reach this point.
pub const OVERRIDE_FALLBACK_SUMMARY: &str = "Override: Manual adjustment";

/// How one axis's final rating was produced for a save.
#[derive(Debug, Clone)]
pub enum AxisResolution {
    /// Rating taken from the scorer; evidence is the contributing sources.
    Auto(AxisScore),
    /// Rating chosen by the assessor; evidence is a single override record.
    Override { rating: u8, reason: String },
}

/// Build the complete evidence set for one save.
///
/// The returned records form a full, consistent snapshot: the repository
/// replaces any prior evidence for the assessment id with exactly this set,
/// all-or-nothing.
pub fn records_for_save(
    assessment_id: AssessmentId,
    resolutions: &[(Axis, AxisResolution)],
    recorded_at: DateTime<Utc>,
) -> Vec<EvidenceRecord> {
    let mut records = Vec::new();
    let mut ordinal: u32 = 0;

    for (axis, resolution) in resolutions {
        match resolution {
            AxisResolution::Auto(outcome) => {
                for source in &outcome.sources {
                    records.push(EvidenceRecord {
                        assessment_id,
                        axis: *axis,
                        source: source.source.clone(),
                        source_ref: source.source_ref.clone(),
                        value: source.value,
                        weight: source.weight,
                        confidence: source.confidence,
                        summary: format!("Auto-calculated from {}", source.label),
                        ordinal,
                        recorded_at,
                    });
                    ordinal += 1;
                }
            }
            AxisResolution::Override { rating, reason } => {
                let summary = if reason.trim().is_empty() {
                    OVERRIDE_FALLBACK_SUMMARY.to_string()
                } else {
                    format!("Override: {}", reason.trim())
                };
                records.push(EvidenceRecord {
                    assessment_id,
                    axis: *axis,
                    source: SourceKind::ManualOverride,
                    source_ref: None,
                    // Keep override values on the same 0-1 scale as the
                    // auto-calculated rows.
                    value: f64::from(*rating) / 3.0,
                    weight: 1.0,
                    confidence: 1.0,
                    summary,
                    ordinal,
                    recorded_at,
                });
                ordinal += 1;
            }
        }
    }

    records
}
