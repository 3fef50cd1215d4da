use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::error::ApiError;

pub const PAGE_SIZE: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "job_category", rename_all = "UPPERCASE")]
pub enum JobCategory {
    Technology,
    Finance,
    Healthcare,
    Education,
    Marketing,
    Hospitality,
    Construction,
    Other,
}

impl FromStr for JobCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TECHNOLOGY" => Ok(Self::Technology),
            "FINANCE" => Ok(Self::Finance),
            "HEALTHCARE" => Ok(Self::Healthcare),
            "EDUCATION" => Ok(Self::Education),
            "MARKETING" => Ok(Self::Marketing),
            "HOSPITALITY" => Ok(Self::Hospitality),
            "CONSTRUCTION" => Ok(Self::Construction),
            "OTHER" => Ok(Self::Other),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "job_type")]
pub enum JobType {
    #[serde(rename = "FULL_TIME")]
    #[sqlx(rename = "FULL_TIME")]
    FullTime,
    #[serde(rename = "PART_TIME")]
    #[sqlx(rename = "PART_TIME")]
    PartTime,
    #[serde(rename = "CONTRACT")]
    #[sqlx(rename = "CONTRACT")]
    Contract,
    #[serde(rename = "INTERNSHIP")]
    #[sqlx(rename = "INTERNSHIP")]
    Internship,
    #[serde(rename = "REMOTE")]
    #[sqlx(rename = "REMOTE")]
    Remote,
}

impl FromStr for JobType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FULL_TIME" => Ok(Self::FullTime),
            "PART_TIME" => Ok(Self::PartTime),
            "CONTRACT" => Ok(Self::Contract),
            "INTERNSHIP" => Ok(Self::Internship),
            "REMOTE" => Ok(Self::Remote),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "job_status", rename_all = "UPPERCASE")]
pub enum JobStatus {
    Active,
    Closed,
    Draft,
}

impl FromStr for JobStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "CLOSED" => Ok(Self::Closed),
            "DRAFT" => Ok(Self::Draft),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub title: String,
    pub description: String,
    pub description_summary: Option<String>,
    pub location: Option<String>,
    pub category: JobCategory,
    pub job_type: JobType,
    pub status: JobStatus,
    pub minimum_salary: Option<i64>,
    pub maximum_salary: Option<i64>,
    #[serde(with = "crate::validate::iso_date")]
    pub deadline: Date,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Listing row with the employer's public company fields joined in.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub title: String,
    pub description: String,
    pub description_summary: Option<String>,
    pub location: Option<String>,
    pub category: JobCategory,
    pub job_type: JobType,
    pub status: JobStatus,
    pub minimum_salary: Option<i64>,
    pub maximum_salary: Option<i64>,
    #[serde(with = "crate::validate::iso_date")]
    pub deadline: Date,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub company_name: String,
    pub company_location: Option<String>,
}

#[derive(Debug)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub description_summary: Option<String>,
    pub location: Option<String>,
    pub category: JobCategory,
    pub job_type: JobType,
    pub status: JobStatus,
    pub minimum_salary: Option<i64>,
    pub maximum_salary: Option<i64>,
    pub deadline: Date,
}

#[derive(Debug, Default)]
pub struct JobChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub description_summary: Option<String>,
    pub location: Option<String>,
    pub category: Option<JobCategory>,
    pub job_type: Option<JobType>,
    pub status: Option<JobStatus>,
    pub minimum_salary: Option<i64>,
    pub maximum_salary: Option<i64>,
    pub deadline: Option<Date>,
}

/// Validated listing query: page is 1-based, sort column comes from a
/// whitelist so it can be spliced into the ORDER BY clause.
#[derive(Debug)]
pub struct JobFilters {
    pub page: i64,
    pub sort_column: &'static str,
    pub sort_desc: bool,
    pub title: Option<String>,
    pub job_type: Option<JobType>,
    pub category: Option<JobCategory>,
}

const JOB_COLUMNS: &str = "id, employer_id, title, description, description_summary, location, \
     category, job_type, status, minimum_salary, maximum_salary, deadline, created_at, updated_at";

const LISTING_COLUMNS: &str = "j.id, j.employer_id, j.title, j.description, j.description_summary, \
     j.location, j.category, j.job_type, j.status, j.minimum_salary, j.maximum_salary, j.deadline, \
     j.created_at, ep.company_name, ep.company_location";

impl Job {
    pub async fn create(db: &PgPool, employer_id: Uuid, new: &NewJob) -> Result<Job, ApiError> {
        sqlx::query_as::<_, Job>(&format!(
            "INSERT INTO jobs (employer_id, title, description, description_summary, location,
                               category, job_type, status, minimum_salary, maximum_salary, deadline)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {JOB_COLUMNS}"
        ))
        .bind(employer_id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.description_summary.as_deref())
        .bind(new.location.as_deref())
        .bind(new.category)
        .bind(new.job_type)
        .bind(new.status)
        .bind(new.minimum_salary)
        .bind(new.maximum_salary)
        .bind(new.deadline)
        .fetch_one(db)
        .await
        .map_err(|e| ApiError::from_sqlx(e, "job"))
    }

    /// Active jobs only, filtered and paginated. Returns the page plus the
    /// total count under the same filters.
    pub async fn list(db: &PgPool, filters: &JobFilters) -> Result<(Vec<JobListing>, i64), ApiError> {
        let direction = if filters.sort_desc { "DESC" } else { "ASC" };
        let query = format!(
            "SELECT {LISTING_COLUMNS}
             FROM jobs j
             JOIN employer_profiles ep ON ep.id = j.employer_id
             WHERE j.status = 'ACTIVE'
               AND ($1::text IS NULL OR j.title ILIKE '%' || $1 || '%')
               AND ($2::job_type IS NULL OR j.job_type = $2)
               AND ($3::job_category IS NULL OR j.category = $3)
             ORDER BY j.{column} {direction}
             LIMIT $4 OFFSET $5",
            column = filters.sort_column,
        );
        let jobs = sqlx::query_as::<_, JobListing>(&query)
            .bind(filters.title.as_deref())
            .bind(filters.job_type)
            .bind(filters.category)
            .bind(PAGE_SIZE)
            .bind((filters.page - 1) * PAGE_SIZE)
            .fetch_all(db)
            .await
            .map_err(|e| ApiError::from_sqlx(e, "job"))?;

        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*)
             FROM jobs j
             WHERE j.status = 'ACTIVE'
               AND ($1::text IS NULL OR j.title ILIKE '%' || $1 || '%')
               AND ($2::job_type IS NULL OR j.job_type = $2)
               AND ($3::job_category IS NULL OR j.category = $3)",
        )
        .bind(filters.title.as_deref())
        .bind(filters.job_type)
        .bind(filters.category)
        .fetch_one(db)
        .await
        .map_err(|e| ApiError::from_sqlx(e, "job"))?;

        Ok((jobs, count))
    }

    pub async fn get(db: &PgPool, id: Uuid) -> Result<JobListing, ApiError> {
        sqlx::query_as::<_, JobListing>(&format!(
            "SELECT {LISTING_COLUMNS}
             FROM jobs j
             JOIN employer_profiles ep ON ep.id = j.employer_id
             WHERE j.id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| ApiError::from_sqlx(e, "job"))?
        .ok_or_else(|| ApiError::not_found("job"))
    }

    /// Scoped to the owning employer; a foreign id reads as not-found.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        employer_id: Uuid,
        changes: &JobChanges,
    ) -> Result<Job, ApiError> {
        sqlx::query_as::<_, Job>(&format!(
            "UPDATE jobs
             SET title = COALESCE($3, title),
                 description = COALESCE($4, description),
                 description_summary = COALESCE($5, description_summary),
                 location = COALESCE($6, location),
                 category = COALESCE($7::job_category, category),
                 job_type = COALESCE($8::job_type, job_type),
                 status = COALESCE($9::job_status, status),
                 minimum_salary = COALESCE($10, minimum_salary),
                 maximum_salary = COALESCE($11, maximum_salary),
                 deadline = COALESCE($12, deadline),
                 updated_at = now()
             WHERE id = $1 AND employer_id = $2
             RETURNING {JOB_COLUMNS}"
        ))
        .bind(id)
        .bind(employer_id)
        .bind(changes.title.as_deref())
        .bind(changes.description.as_deref())
        .bind(changes.description_summary.as_deref())
        .bind(changes.location.as_deref())
        .bind(changes.category)
        .bind(changes.job_type)
        .bind(changes.status)
        .bind(changes.minimum_salary)
        .bind(changes.maximum_salary)
        .bind(changes.deadline)
        .fetch_optional(db)
        .await
        .map_err(|e| ApiError::from_sqlx(e, "job"))?
        .ok_or_else(|| ApiError::not_found("job"))
    }

    pub async fn delete(db: &PgPool, id: Uuid, employer_id: Uuid) -> Result<Job, ApiError> {
        sqlx::query_as::<_, Job>(&format!(
            "DELETE FROM jobs
             WHERE id = $1 AND employer_id = $2
             RETURNING {JOB_COLUMNS}"
        ))
        .bind(id)
        .bind(employer_id)
        .fetch_optional(db)
        .await
        .map_err(|e| ApiError::from_sqlx(e, "job"))?
        .ok_or_else(|| ApiError::not_found("job"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_type_parses_wire_names() {
        assert_eq!("FULL_TIME".parse::<JobType>(), Ok(JobType::FullTime));
        assert_eq!("REMOTE".parse::<JobType>(), Ok(JobType::Remote));
        assert!("full_time".parse::<JobType>().is_err());
    }

    #[test]
    fn job_type_serializes_to_wire_names() {
        assert_eq!(serde_json::to_string(&JobType::PartTime).unwrap(), "\"PART_TIME\"");
        assert_eq!(serde_json::to_string(&JobCategory::Technology).unwrap(), "\"TECHNOLOGY\"");
    }

    #[test]
    fn unknown_category_is_rejected() {
        assert!("GARDENING".parse::<JobCategory>().is_err());
    }
}
