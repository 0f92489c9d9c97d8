//! Assessment manager: orchestrates both axes, enforces override
//! justification, and drives the current/historical lifecycle through the
//! repository's atomic save.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::{
    validate_rating, Assessment, AssessmentId, Axis, EmployeeId, EvidenceRecord, QuadrantLabel,
    TenantId, ValidationError,
};
use super::evidence::{records_for_save, AxisResolution};
use super::rating::rating_for_score;
use super::registry::MappingRegistry;
use super::repository::{AssessmentRepository, StoreError};
use super::scoring::{AxisDataStatus, AxisScore, AxisScorer};
use super::signals::{RawSourceProvider, SignalStore, SignalStoreError};

static ASSESSMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_assessment_id() -> AssessmentId {
    AssessmentId(ASSESSMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed))
}

/// Caller's decision for one axis of a save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisDecision {
    /// Grid rating 1-3. Only authoritative when `overridden` is set; for
    /// auto axes the service recomputes and uses the computed rating, so
    /// the field may be omitted.
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub overridden: bool,
    #[serde(default)]
    pub justification: Option<String>,
}

/// Full input for one `save_assessment` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveAssessmentRequest {
    pub employee: EmployeeId,
    pub performance: AxisDecision,
    pub potential: AxisDecision,
    #[serde(default)]
    pub notes: Option<String>,
    pub assessor: String,
    #[serde(default)]
    pub assessed_on: Option<NaiveDate>,
}

/// One axis of a suggestion: score, confidence, the derived rating, and the
/// contributing-source detail the UI shows alongside it.
#[derive(Debug, Clone, Serialize)]
pub struct SuggestedAxis {
    pub axis: Axis,
    pub score: f64,
    pub confidence: f64,
    pub rating: u8,
    pub status: AxisDataStatus,
    pub sources: Vec<super::scoring::ContributingSource>,
}

impl SuggestedAxis {
    fn from_score(outcome: &AxisScore) -> Self {
        Self {
            axis: outcome.axis,
            score: outcome.score,
            confidence: outcome.confidence,
            rating: rating_for_score(outcome.score),
            status: outcome.status,
            sources: outcome.sources.clone(),
        }
    }
}

/// Non-persisting suggestion for both axes plus the grid cell it lands in.
#[derive(Debug, Clone, Serialize)]
pub struct SuggestedRatings {
    pub employee: EmployeeId,
    pub performance: SuggestedAxis,
    pub potential: SuggestedAxis,
    pub quadrant: Option<QuadrantLabel>,
}

/// An assessment paired with the evidence stored at its save time. History
/// always replays stored evidence; it is never recomputed from live sources.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentWithEvidence {
    pub assessment: Assessment,
    pub evidence: Vec<EvidenceRecord>,
}

/// Service composing the mapping registry, signal adapters, scorer, and
/// repository.
pub struct AssessmentService<R, S, P> {
    registry: Arc<MappingRegistry>,
    signals: Arc<S>,
    raw_sources: Arc<P>,
    repository: Arc<R>,
    scorer: AxisScorer,
}

impl<R, S, P> AssessmentService<R, S, P>
where
    R: AssessmentRepository + 'static,
    S: SignalStore + 'static,
    P: RawSourceProvider + 'static,
{
    pub fn new(
        registry: Arc<MappingRegistry>,
        signals: Arc<S>,
        raw_sources: Arc<P>,
        repository: Arc<R>,
        review_threshold: f64,
    ) -> Self {
        Self {
            registry,
            signals,
            raw_sources,
            repository,
            scorer: AxisScorer::new(review_threshold),
        }
    }

    fn score_axis(
        &self,
        tenant: &TenantId,
        employee: &EmployeeId,
        axis: Axis,
    ) -> Result<AxisScore, AssessmentServiceError> {
        let mappings = self.registry.active_mappings(tenant, axis);
        Ok(self
            .scorer
            .score_axis(&*self.signals, &*self.raw_sources, employee, axis, &mappings)?)
    }

    /// Run the scorer and rating conversion for both axes. No persistence.
    pub fn compute_suggested_ratings(
        &self,
        tenant: &TenantId,
        employee: &EmployeeId,
    ) -> Result<SuggestedRatings, AssessmentServiceError> {
        let performance = SuggestedAxis::from_score(&self.score_axis(
            tenant,
            employee,
            Axis::Performance,
        )?);
        let potential =
            SuggestedAxis::from_score(&self.score_axis(tenant, employee, Axis::Potential)?);

        let quadrant = self
            .registry
            .quadrant_label(tenant, performance.rating, potential.rating);

        Ok(SuggestedRatings {
            employee: employee.clone(),
            performance,
            potential,
            quadrant,
        })
    }

    /// Persist a new current assessment with its full evidence snapshot.
    ///
    /// Overridden axes must carry a non-empty justification; auto axes are
    /// recomputed here so the stored rating and evidence always reflect the
    /// data used by this save. The repository applies the current-flag flip,
    /// the insert, and the evidence replacement as one unit of work.
    pub fn save_assessment(
        &self,
        tenant: &TenantId,
        request: SaveAssessmentRequest,
    ) -> Result<Assessment, AssessmentServiceError> {
        let decisions = [
            (Axis::Performance, &request.performance),
            (Axis::Potential, &request.potential),
        ];
        for (axis, decision) in decisions {
            if decision.overridden {
                validate_rating(decision.rating)?;
                let justified = decision
                    .justification
                    .as_deref()
                    .is_some_and(|text| !text.trim().is_empty());
                if !justified {
                    return Err(ValidationError::MissingJustification { axis }.into());
                }
            }
        }

        let mut resolutions = Vec::with_capacity(2);
        let mut ratings = [0u8; 2];
        for (index, (axis, decision)) in decisions.into_iter().enumerate() {
            if decision.overridden {
                ratings[index] = decision.rating;
                resolutions.push((
                    axis,
                    AxisResolution::Override {
                        rating: decision.rating,
                        reason: decision.justification.clone().unwrap_or_default(),
                    },
                ));
            } else {
                let outcome = self.score_axis(tenant, &request.employee, axis)?;
                if outcome.status == AxisDataStatus::InsufficientData {
                    return Err(AssessmentServiceError::InsufficientData { axis });
                }
                ratings[index] = rating_for_score(outcome.score);
                resolutions.push((axis, AxisResolution::Auto(outcome)));
            }
        }

        let id = next_assessment_id();
        let assessed_on = request
            .assessed_on
            .unwrap_or_else(|| Utc::now().date_naive());
        let assessment = Assessment {
            id,
            tenant: tenant.clone(),
            employee: request.employee.clone(),
            performance_rating: ratings[0],
            potential_rating: ratings[1],
            performance_justification: request.performance.justification.clone(),
            potential_justification: request.potential.justification.clone(),
            notes: request.notes.clone(),
            is_current: true,
            assessor: request.assessor.clone(),
            assessed_on,
        };
        let evidence = records_for_save(id, &resolutions, Utc::now());

        let saved = self.repository.save(assessment, evidence)?;
        info!(
            employee = %saved.employee.0,
            assessment = saved.id.0,
            performance = saved.performance_rating,
            potential = saved.potential_rating,
            "assessment saved"
        );
        Ok(saved)
    }

    /// The employee's single current assessment, if one exists. Downstream
    /// consumers (succession planning, talent pools) key off this record.
    pub fn get_current(
        &self,
        tenant: &TenantId,
        employee: &EmployeeId,
    ) -> Result<Option<Assessment>, AssessmentServiceError> {
        Ok(self.repository.current(tenant, employee)?)
    }

    /// All assessments for the employee, newest first, each with the
    /// evidence stored when it was saved.
    pub fn get_history(
        &self,
        tenant: &TenantId,
        employee: &EmployeeId,
    ) -> Result<Vec<AssessmentWithEvidence>, AssessmentServiceError> {
        let assessments = self.repository.history(tenant, employee)?;
        let mut history = Vec::with_capacity(assessments.len());
        for assessment in assessments {
            let evidence = self.repository.evidence(assessment.id)?;
            history.push(AssessmentWithEvidence {
                assessment,
                evidence,
            });
        }
        Ok(history)
    }

    /// Stored evidence for one assessment, ordered by axis then creation
    /// order.
    pub fn get_evidence(
        &self,
        assessment_id: AssessmentId,
    ) -> Result<Vec<EvidenceRecord>, AssessmentServiceError> {
        Ok(self.repository.evidence(assessment_id)?)
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Distinct from a computed low rating: the axis had zero contributing
    /// sources, so no auto rating exists to save.
    #[error("insufficient data to rate the {} axis; save with an override and justification", .axis.label())]
    InsufficientData { axis: Axis },
    #[error(transparent)]
    Signals(#[from] SignalStoreError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
