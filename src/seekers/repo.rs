use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "gender", rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
    Others,
}

impl FromStr for Gender {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MALE" => Ok(Gender::Male),
            "FEMALE" => Ok(Gender::Female),
            "OTHERS" => Ok(Gender::Others),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SeekerProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub gender: Option<Gender>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: Uuid,
    pub seeker_profile_id: Uuid,
    pub degree: String,
    pub institution: String,
    pub field_of_study: String,
    #[serde(with = "crate::validate::iso_date")]
    pub start_date: Date,
    #[serde(with = "crate::validate::iso_date::option")]
    pub end_date: Option<Date>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: Uuid,
    pub seeker_profile_id: Uuid,
    pub job_title: String,
    pub company_name: String,
    pub description: Option<String>,
    #[serde(with = "crate::validate::iso_date")]
    pub start_date: Date,
    #[serde(with = "crate::validate::iso_date::option")]
    pub end_date: Option<Date>,
}

/// Partial profile update; `None` leaves the column untouched.
#[derive(Debug, Default)]
pub struct ProfileChanges {
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub gender: Option<Gender>,
}

#[derive(Debug)]
pub struct NewEducation {
    pub degree: String,
    pub institution: String,
    pub field_of_study: String,
    pub start_date: Date,
    pub end_date: Option<Date>,
}

#[derive(Debug, Default)]
pub struct EducationChanges {
    pub degree: Option<String>,
    pub institution: Option<String>,
    pub field_of_study: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

#[derive(Debug)]
pub struct NewExperience {
    pub job_title: String,
    pub company_name: String,
    pub description: Option<String>,
    pub start_date: Date,
    pub end_date: Option<Date>,
}

#[derive(Debug, Default)]
pub struct ExperienceChanges {
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

impl SeekerProfile {
    pub async fn create(db: &PgPool, user_id: Uuid) -> Result<SeekerProfile, ApiError> {
        sqlx::query_as::<_, SeekerProfile>(
            "INSERT INTO seeker_profiles (user_id)
             VALUES ($1)
             RETURNING id, user_id, phone, location, bio, gender, created_at",
        )
        .bind(user_id)
        .fetch_one(db)
        .await
        .map_err(|e| ApiError::from_sqlx(e, "seeker profile"))
    }

    pub async fn find_by_user_id(db: &PgPool, user_id: Uuid) -> Result<Option<SeekerProfile>, ApiError> {
        sqlx::query_as::<_, SeekerProfile>(
            "SELECT id, user_id, phone, location, bio, gender, created_at
             FROM seeker_profiles
             WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(db)
        .await
        .map_err(|e| ApiError::from_sqlx(e, "seeker profile"))
    }

    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        changes: &ProfileChanges,
    ) -> Result<SeekerProfile, ApiError> {
        sqlx::query_as::<_, SeekerProfile>(
            "UPDATE seeker_profiles
             SET phone = COALESCE($2, phone),
                 location = COALESCE($3, location),
                 bio = COALESCE($4, bio),
                 gender = COALESCE($5, gender)
             WHERE user_id = $1
             RETURNING id, user_id, phone, location, bio, gender, created_at",
        )
        .bind(user_id)
        .bind(changes.phone.as_deref())
        .bind(changes.location.as_deref())
        .bind(changes.bio.as_deref())
        .bind(changes.gender)
        .fetch_one(db)
        .await
        .map_err(|e| ApiError::from_sqlx(e, "seeker profile"))
    }
}

const EDUCATION_COLUMNS: &str =
    "id, seeker_profile_id, degree, institution, field_of_study, start_date, end_date";

impl Education {
    pub async fn list(db: &PgPool, profile_id: Uuid) -> Result<Vec<Education>, ApiError> {
        sqlx::query_as::<_, Education>(&format!(
            "SELECT {EDUCATION_COLUMNS}
             FROM education
             WHERE seeker_profile_id = $1
             ORDER BY start_date DESC"
        ))
        .bind(profile_id)
        .fetch_all(db)
        .await
        .map_err(|e| ApiError::from_sqlx(e, "education entry"))
    }

    pub async fn add(db: &PgPool, profile_id: Uuid, new: &NewEducation) -> Result<Education, ApiError> {
        sqlx::query_as::<_, Education>(&format!(
            "INSERT INTO education (seeker_profile_id, degree, institution, field_of_study, start_date, end_date)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {EDUCATION_COLUMNS}"
        ))
        .bind(profile_id)
        .bind(&new.degree)
        .bind(&new.institution)
        .bind(&new.field_of_study)
        .bind(new.start_date)
        .bind(new.end_date)
        .fetch_one(db)
        .await
        .map_err(|e| ApiError::from_sqlx(e, "education entry"))
    }

    /// Scoped to the owning profile; a foreign id reads as not-found.
    pub async fn update(
        db: &PgPool,
        profile_id: Uuid,
        education_id: Uuid,
        changes: &EducationChanges,
    ) -> Result<Education, ApiError> {
        sqlx::query_as::<_, Education>(&format!(
            "UPDATE education
             SET degree = COALESCE($3, degree),
                 institution = COALESCE($4, institution),
                 field_of_study = COALESCE($5, field_of_study),
                 start_date = COALESCE($6, start_date),
                 end_date = COALESCE($7, end_date)
             WHERE id = $2 AND seeker_profile_id = $1
             RETURNING {EDUCATION_COLUMNS}"
        ))
        .bind(profile_id)
        .bind(education_id)
        .bind(changes.degree.as_deref())
        .bind(changes.institution.as_deref())
        .bind(changes.field_of_study.as_deref())
        .bind(changes.start_date)
        .bind(changes.end_date)
        .fetch_optional(db)
        .await
        .map_err(|e| ApiError::from_sqlx(e, "education entry"))?
        .ok_or_else(|| ApiError::not_found("education entry"))
    }

    pub async fn delete(
        db: &PgPool,
        profile_id: Uuid,
        education_id: Uuid,
    ) -> Result<Education, ApiError> {
        sqlx::query_as::<_, Education>(&format!(
            "DELETE FROM education
             WHERE id = $2 AND seeker_profile_id = $1
             RETURNING {EDUCATION_COLUMNS}"
        ))
        .bind(profile_id)
        .bind(education_id)
        .fetch_optional(db)
        .await
        .map_err(|e| ApiError::from_sqlx(e, "education entry"))?
        .ok_or_else(|| ApiError::not_found("education entry"))
    }
}

const EXPERIENCE_COLUMNS: &str =
    "id, seeker_profile_id, job_title, company_name, description, start_date, end_date";

impl Experience {
    pub async fn list(db: &PgPool, profile_id: Uuid) -> Result<Vec<Experience>, ApiError> {
        sqlx::query_as::<_, Experience>(&format!(
            "SELECT {EXPERIENCE_COLUMNS}
             FROM experience
             WHERE seeker_profile_id = $1
             ORDER BY start_date DESC"
        ))
        .bind(profile_id)
        .fetch_all(db)
        .await
        .map_err(|e| ApiError::from_sqlx(e, "experience entry"))
    }

    pub async fn add(db: &PgPool, profile_id: Uuid, new: &NewExperience) -> Result<Experience, ApiError> {
        sqlx::query_as::<_, Experience>(&format!(
            "INSERT INTO experience (seeker_profile_id, job_title, company_name, description, start_date, end_date)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {EXPERIENCE_COLUMNS}"
        ))
        .bind(profile_id)
        .bind(&new.job_title)
        .bind(&new.company_name)
        .bind(new.description.as_deref())
        .bind(new.start_date)
        .bind(new.end_date)
        .fetch_one(db)
        .await
        .map_err(|e| ApiError::from_sqlx(e, "experience entry"))
    }

    pub async fn update(
        db: &PgPool,
        profile_id: Uuid,
        experience_id: Uuid,
        changes: &ExperienceChanges,
    ) -> Result<Experience, ApiError> {
        sqlx::query_as::<_, Experience>(&format!(
            "UPDATE experience
             SET job_title = COALESCE($3, job_title),
                 company_name = COALESCE($4, company_name),
                 description = COALESCE($5, description),
                 start_date = COALESCE($6, start_date),
                 end_date = COALESCE($7, end_date)
             WHERE id = $2 AND seeker_profile_id = $1
             RETURNING {EXPERIENCE_COLUMNS}"
        ))
        .bind(profile_id)
        .bind(experience_id)
        .bind(changes.job_title.as_deref())
        .bind(changes.company_name.as_deref())
        .bind(changes.description.as_deref())
        .bind(changes.start_date)
        .bind(changes.end_date)
        .fetch_optional(db)
        .await
        .map_err(|e| ApiError::from_sqlx(e, "experience entry"))?
        .ok_or_else(|| ApiError::not_found("experience entry"))
    }

    pub async fn delete(
        db: &PgPool,
        profile_id: Uuid,
        experience_id: Uuid,
    ) -> Result<Experience, ApiError> {
        sqlx::query_as::<_, Experience>(&format!(
            "DELETE FROM experience
             WHERE id = $2 AND seeker_profile_id = $1
             RETURNING {EXPERIENCE_COLUMNS}"
        ))
        .bind(profile_id)
        .bind(experience_id)
        .fetch_optional(db)
        .await
        .map_err(|e| ApiError::from_sqlx(e, "experience entry"))?
        .ok_or_else(|| ApiError::not_found("experience entry"))
    }
}
