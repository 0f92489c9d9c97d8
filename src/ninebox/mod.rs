//! Talent nine-box rating engine: axis scoring, rating conversion,
//! assessment lifecycle, and the immutable evidence trail.

pub mod assessment;
pub mod domain;
pub mod evidence;
pub mod export;
pub mod rating;
pub mod registry;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod signals;

#[cfg(test)]
mod tests;

pub use assessment::{
    AssessmentService, AssessmentServiceError, AssessmentWithEvidence, AxisDecision,
    SaveAssessmentRequest, SuggestedAxis, SuggestedRatings,
};
pub use domain::{
    Assessment, AssessmentId, Axis, BiasRisk, EmployeeId, EvidenceRecord, QuadrantLabel,
    RawSourceKind, SignalCategory, SignalSnapshot, SourceKind, SourceMapping, TenantId,
    ValidationError,
};
pub use registry::MappingRegistry;
pub use repository::{AssessmentRepository, InMemoryAssessmentStore, StoreError};
pub use router::ninebox_router;
pub use scoring::{AxisDataStatus, AxisScore, AxisScorer, ContributingSource};
pub use signals::{
    InMemoryRawSources, InMemorySignalStore, RawSourceProvider, SignalStore, SignalStoreError,
};
