//! HTTP boundary for the nine-box engine.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use super::assessment::{
    AssessmentService, AssessmentServiceError, AxisDecision, SaveAssessmentRequest,
};
use super::domain::{AssessmentId, EmployeeId, TenantId};
use super::repository::{AssessmentRepository, StoreError};
use super::signals::{RawSourceProvider, SignalStore};

/// Shared handler state: the service plus the tenant this deployment serves.
pub struct NineboxState<R, S, P> {
    pub service: Arc<AssessmentService<R, S, P>>,
    pub tenant: TenantId,
}

impl<R, S, P> Clone for NineboxState<R, S, P> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            tenant: self.tenant.clone(),
        }
    }
}

/// Request body for the save endpoint; the employee id comes from the path.
#[derive(Debug, Deserialize)]
pub struct SaveAssessmentBody {
    pub performance: AxisDecision,
    pub potential: AxisDecision,
    #[serde(default)]
    pub notes: Option<String>,
    pub assessor: String,
    #[serde(default)]
    pub assessed_on: Option<NaiveDate>,
}

/// Router builder exposing the assessment service boundary.
pub fn ninebox_router<R, S, P>(
    service: Arc<AssessmentService<R, S, P>>,
    tenant: TenantId,
) -> Router
where
    R: AssessmentRepository + 'static,
    S: SignalStore + 'static,
    P: RawSourceProvider + 'static,
{
    let state = NineboxState { service, tenant };
    Router::new()
        .route(
            "/api/v1/ninebox/employees/:employee_id/suggested",
            get(suggested_handler::<R, S, P>),
        )
        .route(
            "/api/v1/ninebox/employees/:employee_id/assessments",
            post(save_handler::<R, S, P>).get(history_handler::<R, S, P>),
        )
        .route(
            "/api/v1/ninebox/assessments/:assessment_id/evidence",
            get(evidence_handler::<R, S, P>),
        )
        .with_state(state)
}

fn error_response(error: AssessmentServiceError) -> Response {
    match &error {
        AssessmentServiceError::Validation(_) | AssessmentServiceError::InsufficientData { .. } => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        AssessmentServiceError::Store(StoreError::NotFound) => {
            let payload = json!({ "error": "assessment not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        // Fail closed: integrity breaches degrade to a generic error.
        AssessmentServiceError::Store(StoreError::ConsistencyViolation(_)) => {
            let payload = json!({ "error": "internal error" });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
        _ => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn suggested_handler<R, S, P>(
    State(state): State<NineboxState<R, S, P>>,
    Path(employee_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    S: SignalStore + 'static,
    P: RawSourceProvider + 'static,
{
    let employee = EmployeeId(employee_id);
    match state
        .service
        .compute_suggested_ratings(&state.tenant, &employee)
    {
        Ok(suggested) => (StatusCode::OK, axum::Json(suggested)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn save_handler<R, S, P>(
    State(state): State<NineboxState<R, S, P>>,
    Path(employee_id): Path<String>,
    axum::Json(body): axum::Json<SaveAssessmentBody>,
) -> Response
where
    R: AssessmentRepository + 'static,
    S: SignalStore + 'static,
    P: RawSourceProvider + 'static,
{
    let request = SaveAssessmentRequest {
        employee: EmployeeId(employee_id),
        performance: body.performance,
        potential: body.potential,
        notes: body.notes,
        assessor: body.assessor,
        assessed_on: body.assessed_on,
    };
    match state.service.save_assessment(&state.tenant, request) {
        Ok(saved) => (StatusCode::CREATED, axum::Json(saved)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn history_handler<R, S, P>(
    State(state): State<NineboxState<R, S, P>>,
    Path(employee_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    S: SignalStore + 'static,
    P: RawSourceProvider + 'static,
{
    let employee = EmployeeId(employee_id);
    match state.service.get_history(&state.tenant, &employee) {
        Ok(history) => (StatusCode::OK, axum::Json(history)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn evidence_handler<R, S, P>(
    State(state): State<NineboxState<R, S, P>>,
    Path(assessment_id): Path<u64>,
) -> Response
where
    R: AssessmentRepository + 'static,
    S: SignalStore + 'static,
    P: RawSourceProvider + 'static,
{
    match state.service.get_evidence(AssessmentId(assessment_id)) {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(error) => error_response(error),
    }
}
