use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, State},
    http::{request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{
    ApplicantId, ApplicantRegistration, Identity, JobId, JobPosting, WorkPreference,
};
use super::events::EventPublisher;
use super::service::{Registry, RegistryError};

/// Header carrying the identity of the party making the call.
pub const CALLER_HEADER: &str = "x-caller-id";

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ApplyRequest {
    pub applicant_id: ApplicantId,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HireRequest {
    pub applicant_id: ApplicantId,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RatingRequest {
    pub rating: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PreferenceRequest {
    pub work_preference: WorkPreference,
}

/// Numeric record id taken from the path. Malformed ids are rejected with the JSON error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordId(pub u64);

#[async_trait]
impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<u64>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(Self(id)),
            Err(rejection) => {
                let payload = json!({
                    "error": rejection.body_text(),
                    "kind": "invalid_path",
                });
                Err((rejection.status(), axum::Json(payload)).into_response())
            }
        }
    }
}

/// Router builder exposing the registry calls over HTTP.
pub fn registry_router<P>(registry: Arc<Registry<P>>) -> Router
where
    P: EventPublisher + 'static,
{
    Router::new()
        .route(
            "/api/v1/applicants",
            post(add_applicant_handler::<P>).get(list_applicants_handler::<P>),
        )
        .route(
            "/api/v1/applicants/:applicant_id",
            get(get_applicant_handler::<P>),
        )
        .route(
            "/api/v1/applicants/:applicant_id/rating",
            get(get_rating_handler::<P>),
        )
        .route(
            "/api/v1/applicants/:applicant_id/ratings",
            post(provide_rating_handler::<P>),
        )
        .route(
            "/api/v1/applicants/:applicant_id/preference",
            get(get_preference_handler::<P>).put(update_preference_handler::<P>),
        )
        .route(
            "/api/v1/jobs",
            post(add_job_handler::<P>).get(list_jobs_handler::<P>),
        )
        .route("/api/v1/jobs/:job_id", get(get_job_handler::<P>))
        .route(
            "/api/v1/jobs/:job_id/applications",
            post(apply_handler::<P>),
        )
        .route(
            "/api/v1/jobs/:job_id/applications/me",
            get(has_applied_handler::<P>),
        )
        .route("/api/v1/jobs/:job_id/hire", post(hire_handler::<P>))
        .with_state(registry)
}

fn caller_from(headers: &HeaderMap) -> Result<Identity, Response> {
    headers
        .get(CALLER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(Identity::new)
        .ok_or_else(|| {
            let payload = json!({
                "error": format!("missing {CALLER_HEADER} header"),
                "kind": "unauthenticated",
            });
            (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response()
        })
}

pub(crate) fn error_response(error: RegistryError) -> Response {
    let status = match &error {
        RegistryError::Unauthorized { .. } => StatusCode::FORBIDDEN,
        RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
        RegistryError::AlreadyFilled(_) | RegistryError::DuplicateApplication { .. } => {
            StatusCode::CONFLICT
        }
        RegistryError::InvalidRating { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        RegistryError::Notification(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": error.to_string(),
        "kind": error.label(),
    });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn add_applicant_handler<P>(
    State(registry): State<Arc<Registry<P>>>,
    headers: HeaderMap,
    axum::Json(registration): axum::Json<ApplicantRegistration>,
) -> Response
where
    P: EventPublisher + 'static,
{
    let caller = match caller_from(&headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };

    match registry.add_applicant(&caller, registration) {
        Ok(id) => (StatusCode::CREATED, axum::Json(json!({ "applicant_id": id }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn add_job_handler<P>(
    State(registry): State<Arc<Registry<P>>>,
    headers: HeaderMap,
    axum::Json(posting): axum::Json<JobPosting>,
) -> Response
where
    P: EventPublisher + 'static,
{
    let caller = match caller_from(&headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };

    match registry.add_job(&caller, posting) {
        Ok(id) => (StatusCode::CREATED, axum::Json(json!({ "job_id": id }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn apply_handler<P>(
    State(registry): State<Arc<Registry<P>>>,
    RecordId(job_id): RecordId,
    headers: HeaderMap,
    axum::Json(request): axum::Json<ApplyRequest>,
) -> Response
where
    P: EventPublisher + 'static,
{
    let caller = match caller_from(&headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };

    let job_id = JobId(job_id);
    match registry.apply_for_job(&caller, job_id, request.applicant_id) {
        Ok(()) => {
            let payload = json!({
                "job_id": job_id,
                "applicant_id": request.applicant_id,
                "status": "submitted",
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn hire_handler<P>(
    State(registry): State<Arc<Registry<P>>>,
    RecordId(job_id): RecordId,
    headers: HeaderMap,
    axum::Json(request): axum::Json<HireRequest>,
) -> Response
where
    P: EventPublisher + 'static,
{
    let caller = match caller_from(&headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };

    let job_id = JobId(job_id);
    let hired = registry
        .hire_applicant(&caller, job_id, request.applicant_id)
        .and_then(|()| registry.get_job(job_id));
    match hired {
        Ok(job) => (StatusCode::OK, axum::Json(job)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn provide_rating_handler<P>(
    State(registry): State<Arc<Registry<P>>>,
    RecordId(applicant_id): RecordId,
    headers: HeaderMap,
    axum::Json(request): axum::Json<RatingRequest>,
) -> Response
where
    P: EventPublisher + 'static,
{
    let caller = match caller_from(&headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };

    let applicant_id = ApplicantId(applicant_id);
    let rated = registry
        .provide_rating(&caller, applicant_id, request.rating)
        .and_then(|()| registry.get_applicant_rating(applicant_id));
    match rated {
        Ok(total) => {
            let payload = json!({ "applicant_id": applicant_id, "rating": total });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_preference_handler<P>(
    State(registry): State<Arc<Registry<P>>>,
    RecordId(applicant_id): RecordId,
    headers: HeaderMap,
    axum::Json(request): axum::Json<PreferenceRequest>,
) -> Response
where
    P: EventPublisher + 'static,
{
    let caller = match caller_from(&headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };

    let applicant_id = ApplicantId(applicant_id);
    match registry.update_work_preference(&caller, applicant_id, request.work_preference) {
        Ok(()) => {
            let payload = json!({
                "applicant_id": applicant_id,
                "work_preference": request.work_preference,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_applicants_handler<P>(
    State(registry): State<Arc<Registry<P>>>,
) -> Response
where
    P: EventPublisher + 'static,
{
    (StatusCode::OK, axum::Json(registry.list_applicants())).into_response()
}

pub(crate) async fn list_jobs_handler<P>(State(registry): State<Arc<Registry<P>>>) -> Response
where
    P: EventPublisher + 'static,
{
    (StatusCode::OK, axum::Json(registry.list_jobs())).into_response()
}

pub(crate) async fn get_applicant_handler<P>(
    State(registry): State<Arc<Registry<P>>>,
    RecordId(applicant_id): RecordId,
) -> Response
where
    P: EventPublisher + 'static,
{
    match registry.get_applicant(ApplicantId(applicant_id)) {
        Ok(applicant) => (StatusCode::OK, axum::Json(applicant)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_job_handler<P>(
    State(registry): State<Arc<Registry<P>>>,
    RecordId(job_id): RecordId,
) -> Response
where
    P: EventPublisher + 'static,
{
    match registry.get_job(JobId(job_id)) {
        Ok(job) => (StatusCode::OK, axum::Json(job)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_rating_handler<P>(
    State(registry): State<Arc<Registry<P>>>,
    RecordId(applicant_id): RecordId,
) -> Response
where
    P: EventPublisher + 'static,
{
    let applicant_id = ApplicantId(applicant_id);
    match registry.get_applicant_rating(applicant_id) {
        Ok(rating) => {
            let payload = json!({ "applicant_id": applicant_id, "rating": rating });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_preference_handler<P>(
    State(registry): State<Arc<Registry<P>>>,
    RecordId(applicant_id): RecordId,
) -> Response
where
    P: EventPublisher + 'static,
{
    let applicant_id = ApplicantId(applicant_id);
    match registry.get_applicant_type(applicant_id) {
        Ok(preference) => {
            let payload = json!({
                "applicant_id": applicant_id,
                "work_preference": preference,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn has_applied_handler<P>(
    State(registry): State<Arc<Registry<P>>>,
    RecordId(job_id): RecordId,
    headers: HeaderMap,
) -> Response
where
    P: EventPublisher + 'static,
{
    let caller = match caller_from(&headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };

    let job_id = JobId(job_id);
    match registry.has_applied(&caller, job_id) {
        Ok(applied) => {
            let payload = json!({
                "job_id": job_id,
                "caller": caller,
                "applied": applied,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}
