//! Persistence seam for assessments and their evidence.
//!
//! The trait keeps the storage technology swappable; the in-memory
//! implementation gives the same guarantees the engine expects from a
//! database: one atomic unit of work per save, serialized saves per
//! employee, and a hard at-most-one-current check that fails closed.

use std::collections::HashMap;
use std::sync::Mutex;

use super::domain::{Assessment, AssessmentId, EmployeeId, EvidenceRecord, TenantId};

/// Storage failures. `ConsistencyViolation` indicates a broken invariant and
/// is never auto-corrected.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("assessment not found")]
    NotFound,
    #[error("assessment store unavailable: {0}")]
    Unavailable(String),
    #[error("assessment store integrity violation: {0}")]
    ConsistencyViolation(String),
}

/// Storage abstraction so the service can be exercised in isolation.
pub trait AssessmentRepository: Send + Sync {
    /// Persist a new current assessment and its full evidence set in one
    /// atomic unit of work: flip the employee's previous current record to
    /// historical, insert the new record as current, and replace any
    /// evidence stored under the new assessment id.
    fn save(
        &self,
        assessment: Assessment,
        evidence: Vec<EvidenceRecord>,
    ) -> Result<Assessment, StoreError>;

    fn current(
        &self,
        tenant: &TenantId,
        employee: &EmployeeId,
    ) -> Result<Option<Assessment>, StoreError>;

    /// All assessments for the employee, newest first.
    fn history(
        &self,
        tenant: &TenantId,
        employee: &EmployeeId,
    ) -> Result<Vec<Assessment>, StoreError>;

    /// Stored evidence for one assessment, ordered by axis then creation
    /// order.
    fn evidence(&self, assessment_id: AssessmentId) -> Result<Vec<EvidenceRecord>, StoreError>;
}

#[derive(Debug, Default)]
struct StoreState {
    assessments: Vec<Assessment>,
    evidence: HashMap<AssessmentId, Vec<EvidenceRecord>>,
}

/// In-memory store. The single mutex serializes concurrent saves, which is
/// what keeps two racing saves for the same employee from both inserting as
/// current; reads take the same lock and therefore always observe either the
/// pre- or post-save state, never a torn mix.
#[derive(Debug, Default)]
pub struct InMemoryAssessmentStore {
    inner: Mutex<StoreState>,
}

impl InMemoryAssessmentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AssessmentRepository for InMemoryAssessmentStore {
    fn save(
        &self,
        mut assessment: Assessment,
        mut evidence: Vec<EvidenceRecord>,
    ) -> Result<Assessment, StoreError> {
        let mut state = self.inner.lock().expect("assessment store poisoned");

        let currents = state
            .assessments
            .iter()
            .filter(|row| {
                row.tenant == assessment.tenant
                    && row.employee == assessment.employee
                    && row.is_current
            })
            .count();
        if currents > 1 {
            return Err(StoreError::ConsistencyViolation(format!(
                "{currents} current assessments for employee {}",
                assessment.employee.0
            )));
        }
        if state.assessments.iter().any(|row| row.id == assessment.id) {
            return Err(StoreError::ConsistencyViolation(format!(
                "assessment id {} already persisted",
                assessment.id.0
            )));
        }

        // Everything below this point is infallible, so the whole save
        // commits or none of it does.
        for row in state
            .assessments
            .iter_mut()
            .filter(|row| row.tenant == assessment.tenant && row.employee == assessment.employee)
        {
            row.is_current = false;
        }

        assessment.is_current = true;
        for record in &mut evidence {
            record.assessment_id = assessment.id;
        }
        state.evidence.insert(assessment.id, evidence);
        state.assessments.push(assessment.clone());

        Ok(assessment)
    }

    fn current(
        &self,
        tenant: &TenantId,
        employee: &EmployeeId,
    ) -> Result<Option<Assessment>, StoreError> {
        let state = self.inner.lock().expect("assessment store poisoned");
        Ok(state
            .assessments
            .iter()
            .find(|row| row.tenant == *tenant && row.employee == *employee && row.is_current)
            .cloned())
    }

    fn history(
        &self,
        tenant: &TenantId,
        employee: &EmployeeId,
    ) -> Result<Vec<Assessment>, StoreError> {
        let state = self.inner.lock().expect("assessment store poisoned");
        let mut rows: Vec<Assessment> = state
            .assessments
            .iter()
            .filter(|row| row.tenant == *tenant && row.employee == *employee)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.assessed_on
                .cmp(&a.assessed_on)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(rows)
    }

    fn evidence(&self, assessment_id: AssessmentId) -> Result<Vec<EvidenceRecord>, StoreError> {
        let state = self.inner.lock().expect("assessment store poisoned");
        if !state.assessments.iter().any(|row| row.id == assessment_id) {
            return Err(StoreError::NotFound);
        }
        let mut records = state
            .evidence
            .get(&assessment_id)
            .cloned()
            .unwrap_or_default();
        records.sort_by(|a, b| a.axis.cmp(&b.axis).then_with(|| a.ordinal.cmp(&b.ordinal)));
        Ok(records)
    }
}
