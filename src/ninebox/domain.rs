use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper scoping configuration and assessments to one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(pub String);

/// Identifier wrapper for the employee being rated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmployeeId(pub String);

/// Identifier for one saved assessment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssessmentId(pub u64);

/// The two independent nine-box dimensions, each rated 1-3.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Performance,
    Potential,
}

impl Axis {
    pub fn label(&self) -> &'static str {
        match self {
            Axis::Performance => "performance",
            Axis::Potential => "potential",
        }
    }
}

/// Dampening applied to signals flagged with a high rater-bias risk.
pub const HIGH_BIAS_DAMPENING: f64 = 0.7;
/// Dampening applied to signals flagged with a medium rater-bias risk.
pub const MEDIUM_BIAS_DAMPENING: f64 = 0.85;
/// Low or unset bias risk contributes at face value.
pub const LOW_BIAS_DAMPENING: f64 = 1.0;

/// Estimated likelihood that a signal's value is distorted by rater bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasRisk {
    #[default]
    Low,
    Medium,
    High,
}

impl BiasRisk {
    /// Multiplier applied to a signal score before it enters the weighted sum.
    pub fn dampening(self) -> f64 {
        match self {
            BiasRisk::Low => LOW_BIAS_DAMPENING,
            BiasRisk::Medium => MEDIUM_BIAS_DAMPENING,
            BiasRisk::High => HIGH_BIAS_DAMPENING,
        }
    }
}

/// Behavioral signal category (e.g. "leadership", "collaboration").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SignalCategory(pub String);

impl SignalCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Read-only observation from the external signal store. Scores arrive
/// already normalized to [0, 1]; only current snapshots participate in
/// scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSnapshot {
    pub category: SignalCategory,
    pub score: f64,
    pub confidence: f64,
    pub bias_risk: BiasRisk,
    pub is_current: bool,
}

/// Raw source systems with a fixed, documented scale per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawSourceKind {
    /// Annual appraisal score on a 1-5 scale.
    Appraisal,
    /// Goal progress average expressed as a 0-100 percentage.
    GoalProgress,
    /// Potential-assessment rating on a 1-5 scale.
    AssessmentRating,
}

impl RawSourceKind {
    /// Divisor normalizing the raw value into [0, 1].
    pub fn scale_divisor(self) -> f64 {
        match self {
            RawSourceKind::Appraisal => 5.0,
            RawSourceKind::GoalProgress => 100.0,
            RawSourceKind::AssessmentRating => 5.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RawSourceKind::Appraisal => "appraisal score",
            RawSourceKind::GoalProgress => "goal progress",
            RawSourceKind::AssessmentRating => "potential assessment rating",
        }
    }
}

/// A data source that can be bound to an axis, or the manual-override
/// pseudo-source that appears only in evidence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Raw(RawSourceKind),
    Signal(SignalCategory),
    ManualOverride,
}

impl SourceKind {
    pub fn label(&self) -> String {
        match self {
            SourceKind::Raw(kind) => kind.label().to_string(),
            SourceKind::Signal(category) => format!("{} signals", category.0),
            SourceKind::ManualOverride => "manual override".to_string(),
        }
    }
}

/// Configuration row binding one source to one axis for a tenant.
///
/// Weights across an axis need not sum to 1; the scorer renormalizes by the
/// weight mass of the sources that actually resolved a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMapping {
    pub tenant: TenantId,
    pub axis: Axis,
    pub source: SourceKind,
    pub weight: f64,
    pub priority: u32,
    pub active: bool,
    /// Signal mappings only: snapshots below this confidence are excluded.
    pub minimum_confidence: Option<f64>,
}

impl SourceMapping {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&self.weight) {
            return Err(ValidationError::WeightOutOfRange { found: self.weight });
        }
        if let Some(threshold) = self.minimum_confidence {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(ValidationError::ThresholdOutOfRange { found: threshold });
            }
        }
        if self.source == SourceKind::ManualOverride {
            return Err(ValidationError::UnmappableSource);
        }
        Ok(())
    }
}

/// Display metadata for one of the nine grid cells. Pure presentation; the
/// engine only performs the lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadrantLabel {
    pub performance_level: u8,
    pub potential_level: u8,
    pub default_label: String,
    pub custom_label: Option<String>,
    pub use_custom: bool,
    pub description: String,
    pub suggested_actions: Vec<String>,
    pub color: String,
}

impl QuadrantLabel {
    /// Resolves the custom-label toggle.
    pub fn display_label(&self) -> &str {
        match (&self.custom_label, self.use_custom) {
            (Some(custom), true) => custom,
            _ => &self.default_label,
        }
    }
}

/// One employee rating event. At most one record per (tenant, employee) is
/// current; all others are historical and retained indefinitely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: AssessmentId,
    pub tenant: TenantId,
    pub employee: EmployeeId,
    pub performance_rating: u8,
    pub potential_rating: u8,
    pub performance_justification: Option<String>,
    pub potential_justification: Option<String>,
    pub notes: Option<String>,
    pub is_current: bool,
    pub assessor: String,
    pub assessed_on: NaiveDate,
}

/// Immutable row linking one assessment to one contributing source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    pub assessment_id: AssessmentId,
    pub axis: Axis,
    pub source: SourceKind,
    pub source_ref: Option<String>,
    pub value: f64,
    pub weight: f64,
    pub confidence: f64,
    pub summary: String,
    /// Creation order within one save, used for stable audit ordering.
    pub ordinal: u32,
    pub recorded_at: DateTime<Utc>,
}

/// Validates a 1-3 grid rating.
pub fn validate_rating(value: u8) -> Result<u8, ValidationError> {
    if (1..=3).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::RatingOutOfRange { found: value })
    }
}

/// Synchronous validation failures surfaced directly to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("{} axis override requires a non-empty justification", .axis.label())]
    MissingJustification { axis: Axis },
    #[error("source weight {found} outside [0, 1]")]
    WeightOutOfRange { found: f64 },
    #[error("minimum confidence {found} outside [0, 1]")]
    ThresholdOutOfRange { found: f64 },
    #[error("rating {found} outside the 1-3 grid range")]
    RatingOutOfRange { found: u8 },
    #[error("manual override cannot be configured as a source mapping")]
    UnmappableSource,
    #[error("quadrant level {found} outside the 1-3 grid range")]
    QuadrantLevelOutOfRange { found: u8 },
}
