use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::extractors::{Employer, Verified};
use crate::employers::repo::EmployerProfile;
use crate::envelope::Envelope;
use crate::error::{ApiError, JsonBody};
use crate::jobs::dto::{CreateJobRequest, JobListData, JobQuery, ListMeta, UpdateJobRequest};
use crate::jobs::repo::{Job, JobListing};
use crate::state::AppState;

pub fn job_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_jobs))
        .route("/", post(create_job))
        .route("/:job_id", get(get_job))
        .route("/:job_id", put(update_job))
        .route("/:job_id", delete(delete_job))
}

/// The employer profile backing the authenticated employer. Posting
/// without one (should not happen, profiles are created at signup) reads
/// as not-found rather than a server error.
async fn owned_profile(state: &AppState, user_id: Uuid) -> Result<EmployerProfile, ApiError> {
    EmployerProfile::find_by_user_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("employer profile"))
}

#[instrument(skip(state))]
async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobQuery>,
) -> Result<Envelope<JobListData>, ApiError> {
    let filters = query.validate()?;
    let page = filters.page;
    let (jobs, count) = Job::list(&state.db, &filters).await?;
    Ok(Envelope::success(
        "jobs fetched successfully",
        JobListData {
            meta_data: ListMeta::new(count, page),
            jobs,
        },
    ))
}

#[instrument(skip(state))]
async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Envelope<JobListing>, ApiError> {
    let job = Job::get(&state.db, job_id).await?;
    Ok(Envelope::success("job fetched successfully", job))
}

#[instrument(skip(state, payload))]
async fn create_job(
    State(state): State<AppState>,
    Employer(claims): Employer,
    Verified(_): Verified,
    JsonBody(payload): JsonBody<CreateJobRequest>,
) -> Result<(StatusCode, Envelope<Job>), ApiError> {
    let profile = owned_profile(&state, claims.sub).await?;
    let new = payload.validate()?;
    let job = Job::create(&state.db, profile.id, &new).await?;
    info!(employer_id = %profile.id, job_id = %job.id, "job created");
    Ok((StatusCode::CREATED, Envelope::success("job created successfully", job)))
}

#[instrument(skip(state, payload))]
async fn update_job(
    State(state): State<AppState>,
    Employer(claims): Employer,
    Verified(_): Verified,
    Path(job_id): Path<Uuid>,
    JsonBody(payload): JsonBody<UpdateJobRequest>,
) -> Result<Envelope<Job>, ApiError> {
    let profile = owned_profile(&state, claims.sub).await?;
    let changes = payload.validate()?;
    let job = Job::update(&state.db, job_id, profile.id, &changes).await?;
    Ok(Envelope::success("job updated successfully", job))
}

#[instrument(skip(state))]
async fn delete_job(
    State(state): State<AppState>,
    Employer(claims): Employer,
    Verified(_): Verified,
    Path(job_id): Path<Uuid>,
) -> Result<Envelope<Job>, ApiError> {
    let profile = owned_profile(&state, claims.sub).await?;
    let job = Job::delete(&state.db, job_id, profile.id).await?;
    info!(employer_id = %profile.id, job_id = %job_id, "job deleted");
    Ok(Envelope::success("job deleted successfully", job))
}
