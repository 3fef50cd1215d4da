use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::extractors::Seeker;
use crate::envelope::Envelope;
use crate::error::{ApiError, JsonBody};
use crate::seekers::dto::{
    CreateEducationRequest, CreateExperienceRequest, SeekerProfileData, UpdateEducationRequest,
    UpdateExperienceRequest, UpdateSeekerProfileRequest,
};
use crate::seekers::repo::{Education, Experience, SeekerProfile};
use crate::state::AppState;

pub fn seeker_routes() -> Router<AppState> {
    Router::new()
        .route("/seeker-profile", get(get_profile))
        .route("/seeker-profile", put(update_profile))
        .route("/seeker-profile/education", get(list_education))
        .route("/seeker-profile/education", post(add_education))
        .route("/seeker-profile/education/:education_id", put(update_education))
        .route("/seeker-profile/education/:education_id", delete(delete_education))
        .route("/seeker-profile/experience", get(list_experience))
        .route("/seeker-profile/experience", post(add_experience))
        .route("/seeker-profile/experience/:experience_id", put(update_experience))
        .route("/seeker-profile/experience/:experience_id", delete(delete_experience))
}

async fn owned_profile(state: &AppState, user_id: Uuid) -> Result<SeekerProfile, ApiError> {
    SeekerProfile::find_by_user_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("seeker profile"))
}

#[instrument(skip(state))]
async fn get_profile(
    State(state): State<AppState>,
    Seeker(claims): Seeker,
) -> Result<Envelope<SeekerProfileData>, ApiError> {
    let profile = owned_profile(&state, claims.sub).await?;
    let education = Education::list(&state.db, profile.id).await?;
    let experience = Experience::list(&state.db, profile.id).await?;
    Ok(Envelope::success(
        "seeker profile fetched successfully",
        SeekerProfileData { profile, education, experience },
    ))
}

#[instrument(skip(state, payload))]
async fn update_profile(
    State(state): State<AppState>,
    Seeker(claims): Seeker,
    JsonBody(payload): JsonBody<UpdateSeekerProfileRequest>,
) -> Result<Envelope<SeekerProfile>, ApiError> {
    owned_profile(&state, claims.sub).await?;
    let changes = payload.validate()?;
    let profile = SeekerProfile::update(&state.db, claims.sub, &changes).await?;
    info!(user_id = %claims.sub, "seeker profile updated");
    Ok(Envelope::success("seeker profile updated successfully", profile))
}

#[instrument(skip(state))]
async fn list_education(
    State(state): State<AppState>,
    Seeker(claims): Seeker,
) -> Result<Envelope<Vec<Education>>, ApiError> {
    let profile = owned_profile(&state, claims.sub).await?;
    let education = Education::list(&state.db, profile.id).await?;
    Ok(Envelope::success("seeker education fetched successfully", education))
}

#[instrument(skip(state, payload))]
async fn add_education(
    State(state): State<AppState>,
    Seeker(claims): Seeker,
    JsonBody(payload): JsonBody<CreateEducationRequest>,
) -> Result<(StatusCode, Envelope<Education>), ApiError> {
    let profile = owned_profile(&state, claims.sub).await?;
    let new = payload.validate()?;
    let entry = Education::add(&state.db, profile.id, &new).await?;
    info!(profile_id = %profile.id, education_id = %entry.id, "education added");
    Ok((
        StatusCode::CREATED,
        Envelope::success("seeker education added successfully", entry),
    ))
}

#[instrument(skip(state, payload))]
async fn update_education(
    State(state): State<AppState>,
    Seeker(claims): Seeker,
    Path(education_id): Path<Uuid>,
    JsonBody(payload): JsonBody<UpdateEducationRequest>,
) -> Result<Envelope<Education>, ApiError> {
    let profile = owned_profile(&state, claims.sub).await?;
    let changes = payload.validate()?;
    let entry = Education::update(&state.db, profile.id, education_id, &changes).await?;
    Ok(Envelope::success("seeker education updated successfully", entry))
}

#[instrument(skip(state))]
async fn delete_education(
    State(state): State<AppState>,
    Seeker(claims): Seeker,
    Path(education_id): Path<Uuid>,
) -> Result<Envelope<Education>, ApiError> {
    let profile = owned_profile(&state, claims.sub).await?;
    let entry = Education::delete(&state.db, profile.id, education_id).await?;
    info!(profile_id = %profile.id, education_id = %education_id, "education deleted");
    Ok(Envelope::success("seeker education deleted successfully", entry))
}

#[instrument(skip(state))]
async fn list_experience(
    State(state): State<AppState>,
    Seeker(claims): Seeker,
) -> Result<Envelope<Vec<Experience>>, ApiError> {
    let profile = owned_profile(&state, claims.sub).await?;
    let experience = Experience::list(&state.db, profile.id).await?;
    Ok(Envelope::success("seeker experience fetched successfully", experience))
}

#[instrument(skip(state, payload))]
async fn add_experience(
    State(state): State<AppState>,
    Seeker(claims): Seeker,
    JsonBody(payload): JsonBody<CreateExperienceRequest>,
) -> Result<(StatusCode, Envelope<Experience>), ApiError> {
    let profile = owned_profile(&state, claims.sub).await?;
    let new = payload.validate()?;
    let entry = Experience::add(&state.db, profile.id, &new).await?;
    info!(profile_id = %profile.id, experience_id = %entry.id, "experience added");
    Ok((
        StatusCode::CREATED,
        Envelope::success("seeker experience added successfully", entry),
    ))
}

#[instrument(skip(state, payload))]
async fn update_experience(
    State(state): State<AppState>,
    Seeker(claims): Seeker,
    Path(experience_id): Path<Uuid>,
    JsonBody(payload): JsonBody<UpdateExperienceRequest>,
) -> Result<Envelope<Experience>, ApiError> {
    let profile = owned_profile(&state, claims.sub).await?;
    let changes = payload.validate()?;
    let entry = Experience::update(&state.db, profile.id, experience_id, &changes).await?;
    Ok(Envelope::success("seeker experience updated successfully", entry))
}

#[instrument(skip(state))]
async fn delete_experience(
    State(state): State<AppState>,
    Seeker(claims): Seeker,
    Path(experience_id): Path<Uuid>,
) -> Result<Envelope<Experience>, ApiError> {
    let profile = owned_profile(&state, claims.sub).await?;
    let entry = Experience::delete(&state.db, profile.id, experience_id).await?;
    info!(profile_id = %profile.id, experience_id = %experience_id, "experience deleted");
    Ok(Envelope::success("seeker experience deleted successfully", entry))
}
