use std::sync::Arc;

use crate::ninebox::assessment::{AssessmentService, AxisDecision, SaveAssessmentRequest};
use crate::ninebox::domain::{
    Assessment, AssessmentId, BiasRisk, EmployeeId, EvidenceRecord, RawSourceKind, SignalCategory,
    SignalSnapshot, TenantId,
};
use crate::ninebox::registry::MappingRegistry;
use crate::ninebox::repository::{AssessmentRepository, InMemoryAssessmentStore, StoreError};
use crate::ninebox::signals::{InMemoryRawSources, InMemorySignalStore};

pub(super) const REVIEW_THRESHOLD: f64 = 0.5;

pub(super) type MemoryService =
    AssessmentService<InMemoryAssessmentStore, InMemorySignalStore, InMemoryRawSources>;

pub(super) fn tenant() -> TenantId {
    TenantId("acme".to_string())
}

pub(super) fn employee(id: &str) -> EmployeeId {
    EmployeeId(id.to_string())
}

pub(super) fn registry_with_defaults() -> Arc<MappingRegistry> {
    let registry = Arc::new(MappingRegistry::new());
    registry
        .initialize_defaults(&tenant())
        .expect("default configuration seeds");
    registry
}

pub(super) fn snapshot(
    category: &str,
    score: f64,
    confidence: f64,
    bias_risk: BiasRisk,
) -> SignalSnapshot {
    SignalSnapshot {
        category: SignalCategory::new(category),
        score,
        confidence,
        bias_risk,
        is_current: true,
    }
}

pub(super) struct Fixture {
    pub service: Arc<MemoryService>,
    pub signals: Arc<InMemorySignalStore>,
    pub raw_sources: Arc<InMemoryRawSources>,
    pub store: Arc<InMemoryAssessmentStore>,
}

pub(super) fn fixture() -> Fixture {
    let signals = Arc::new(InMemorySignalStore::new());
    let raw_sources = Arc::new(InMemoryRawSources::new());
    let store = Arc::new(InMemoryAssessmentStore::new());
    let service = Arc::new(AssessmentService::new(
        registry_with_defaults(),
        signals.clone(),
        raw_sources.clone(),
        store.clone(),
        REVIEW_THRESHOLD,
    ));
    Fixture {
        service,
        signals,
        raw_sources,
        store,
    }
}

/// Seed the appraisal 4.2 / goal progress 78.3% scenario (collaboration
/// signal absent) plus enough potential data to make both axes rateable.
pub(super) fn seed_scenario_employee(fixture: &Fixture, employee: &EmployeeId) {
    fixture
        .raw_sources
        .set(employee.clone(), RawSourceKind::Appraisal, 4.2);
    fixture
        .raw_sources
        .set(employee.clone(), RawSourceKind::GoalProgress, 78.3);
    fixture
        .raw_sources
        .set(employee.clone(), RawSourceKind::AssessmentRating, 3.5);
    fixture.signals.insert(
        employee.clone(),
        snapshot("leadership", 0.82, 0.9, BiasRisk::Low),
    );
}

pub(super) fn auto_decision(rating: u8) -> AxisDecision {
    AxisDecision {
        rating,
        overridden: false,
        justification: None,
    }
}

pub(super) fn override_decision(rating: u8, reason: Option<&str>) -> AxisDecision {
    AxisDecision {
        rating,
        overridden: true,
        justification: reason.map(|text| text.to_string()),
    }
}

pub(super) fn auto_save_request(employee: &EmployeeId) -> SaveAssessmentRequest {
    SaveAssessmentRequest {
        employee: employee.clone(),
        performance: auto_decision(0),
        potential: auto_decision(0),
        notes: None,
        assessor: "mgr-1".to_string(),
        assessed_on: None,
    }
}

/// Repository double that always reports a transient outage.
pub(super) struct UnavailableStore;

impl AssessmentRepository for UnavailableStore {
    fn save(
        &self,
        _assessment: Assessment,
        _evidence: Vec<EvidenceRecord>,
    ) -> Result<Assessment, StoreError> {
        Err(StoreError::Unavailable("maintenance window".to_string()))
    }

    fn current(
        &self,
        _tenant: &TenantId,
        _employee: &EmployeeId,
    ) -> Result<Option<Assessment>, StoreError> {
        Err(StoreError::Unavailable("maintenance window".to_string()))
    }

    fn history(
        &self,
        _tenant: &TenantId,
        _employee: &EmployeeId,
    ) -> Result<Vec<Assessment>, StoreError> {
        Err(StoreError::Unavailable("maintenance window".to_string()))
    }

    fn evidence(&self, _assessment_id: AssessmentId) -> Result<Vec<EvidenceRecord>, StoreError> {
        Err(StoreError::Unavailable("maintenance window".to_string()))
    }
}
