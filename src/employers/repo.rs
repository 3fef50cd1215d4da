use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EmployerProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_name: String,
    pub company_website: Option<String>,
    pub company_location: Option<String>,
    pub company_description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Default)]
pub struct ProfileChanges {
    pub company_name: Option<String>,
    pub company_website: Option<String>,
    pub company_location: Option<String>,
    pub company_description: Option<String>,
}

const PROFILE_COLUMNS: &str =
    "id, user_id, company_name, company_website, company_location, company_description, created_at";

impl EmployerProfile {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        company_name: &str,
    ) -> Result<EmployerProfile, ApiError> {
        sqlx::query_as::<_, EmployerProfile>(&format!(
            "INSERT INTO employer_profiles (user_id, company_name)
             VALUES ($1, $2)
             RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(user_id)
        .bind(company_name)
        .fetch_one(db)
        .await
        .map_err(|e| ApiError::from_sqlx(e, "employer profile"))
    }

    pub async fn find_by_user_id(
        db: &PgPool,
        user_id: Uuid,
    ) -> Result<Option<EmployerProfile>, ApiError> {
        sqlx::query_as::<_, EmployerProfile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM employer_profiles WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await
        .map_err(|e| ApiError::from_sqlx(e, "employer profile"))
    }

    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        changes: &ProfileChanges,
    ) -> Result<EmployerProfile, ApiError> {
        sqlx::query_as::<_, EmployerProfile>(&format!(
            "UPDATE employer_profiles
             SET company_name = COALESCE($2, company_name),
                 company_website = COALESCE($3, company_website),
                 company_location = COALESCE($4, company_location),
                 company_description = COALESCE($5, company_description)
             WHERE user_id = $1
             RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(user_id)
        .bind(changes.company_name.as_deref())
        .bind(changes.company_website.as_deref())
        .bind(changes.company_location.as_deref())
        .bind(changes.company_description.as_deref())
        .fetch_one(db)
        .await
        .map_err(|e| ApiError::from_sqlx(e, "employer profile"))
    }
}
