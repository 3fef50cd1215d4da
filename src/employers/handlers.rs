use axum::{
    extract::State,
    routing::{get, put},
    Router,
};
use tracing::{info, instrument};

use crate::auth::extractors::Employer;
use crate::employers::dto::UpdateEmployerProfileRequest;
use crate::employers::repo::EmployerProfile;
use crate::envelope::Envelope;
use crate::error::{ApiError, JsonBody};
use crate::state::AppState;

pub fn employer_routes() -> Router<AppState> {
    Router::new()
        .route("/employer-profile", get(get_profile))
        .route("/employer-profile", put(update_profile))
}

#[instrument(skip(state))]
async fn get_profile(
    State(state): State<AppState>,
    Employer(claims): Employer,
) -> Result<Envelope<EmployerProfile>, ApiError> {
    let profile = EmployerProfile::find_by_user_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::not_found("employer profile"))?;
    Ok(Envelope::success("employer profile fetched successfully", profile))
}

#[instrument(skip(state, payload))]
async fn update_profile(
    State(state): State<AppState>,
    Employer(claims): Employer,
    JsonBody(payload): JsonBody<UpdateEmployerProfileRequest>,
) -> Result<Envelope<EmployerProfile>, ApiError> {
    EmployerProfile::find_by_user_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::not_found("employer profile"))?;
    let changes = payload.validate()?;
    let profile = EmployerProfile::update(&state.db, claims.sub, &changes).await?;
    info!(user_id = %claims.sub, "employer profile updated");
    Ok(Envelope::success("employer profile updated successfully", profile))
}
