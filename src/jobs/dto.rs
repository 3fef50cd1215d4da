use serde::{Deserialize, Serialize};

use crate::jobs::repo::{
    JobCategory, JobChanges, JobFilters, JobListing, JobStatus, JobType, NewJob, PAGE_SIZE,
};
use crate::validate::{max_len, parse_date, required, today_utc, FieldErrors};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub description_summary: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub job_type: Option<String>,
    pub status: Option<String>,
    pub minimum_salary: Option<i64>,
    pub maximum_salary: Option<i64>,
    pub deadline: Option<String>,
}

impl CreateJobRequest {
    pub fn validate(self) -> Result<NewJob, FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = required(
            &mut errors,
            "title",
            self.title.as_deref().unwrap_or(""),
            "Title is required",
        );
        max_len(&mut errors, "title", &title, 100);

        let description = required(
            &mut errors,
            "description",
            self.description.as_deref().unwrap_or(""),
            "Description is required",
        );
        max_len(&mut errors, "description", &description, 500);

        let description_summary = self.description_summary.map(|s| s.trim().to_string());
        if let Some(summary) = &description_summary {
            max_len(&mut errors, "descriptionSummary", summary, 500);
        }

        let location = match self.location {
            Some(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    errors.push("location", "Location cannot be empty");
                }
                Some(trimmed.to_string())
            }
            None => None,
        };

        let category = match self.category.as_deref() {
            Some(raw) => raw.parse::<JobCategory>().unwrap_or_else(|_| {
                errors.push("category", "Invalid category");
                JobCategory::Other
            }),
            None => {
                errors.push("category", "Category is required");
                JobCategory::Other
            }
        };

        let job_type = match self.job_type.as_deref() {
            Some(raw) => raw.parse::<JobType>().unwrap_or_else(|_| {
                errors.push("jobType", "Invalid job type");
                JobType::FullTime
            }),
            None => {
                errors.push("jobType", "Job type is required");
                JobType::FullTime
            }
        };

        let status = match self.status.as_deref() {
            Some(raw) => raw.parse::<JobStatus>().unwrap_or_else(|_| {
                errors.push("status", "Invalid status");
                JobStatus::Active
            }),
            None => JobStatus::Active,
        };

        check_salaries(&mut errors, self.minimum_salary, self.maximum_salary);

        let deadline = match self.deadline.as_deref() {
            Some(raw) => match parse_date(&mut errors, "deadline", raw) {
                Some(date) => {
                    if date <= today_utc() {
                        errors.push("deadline", "Deadline must be in the future");
                    }
                    date
                }
                None => today_utc(),
            },
            None => {
                errors.push("deadline", "Deadline is required");
                today_utc()
            }
        };

        errors.into_result(NewJob {
            title,
            description,
            description_summary,
            location,
            category,
            job_type,
            status,
            minimum_salary: self.minimum_salary,
            maximum_salary: self.maximum_salary,
            deadline,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub description_summary: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub job_type: Option<String>,
    pub status: Option<String>,
    pub minimum_salary: Option<i64>,
    pub maximum_salary: Option<i64>,
    pub deadline: Option<String>,
}

impl UpdateJobRequest {
    pub fn validate(self) -> Result<JobChanges, FieldErrors> {
        let mut errors = FieldErrors::new();
        let mut changes = JobChanges::default();

        if let Some(title) = self.title {
            let title = required(&mut errors, "title", &title, "Title cannot be empty");
            max_len(&mut errors, "title", &title, 100);
            changes.title = Some(title);
        }
        if let Some(description) = self.description {
            let description =
                required(&mut errors, "description", &description, "Description cannot be empty");
            max_len(&mut errors, "description", &description, 500);
            changes.description = Some(description);
        }
        if let Some(summary) = self.description_summary {
            max_len(&mut errors, "descriptionSummary", &summary, 500);
            changes.description_summary = Some(summary.trim().to_string());
        }
        if let Some(location) = self.location {
            let trimmed = location.trim();
            if trimmed.is_empty() {
                errors.push("location", "Location cannot be empty");
            }
            changes.location = Some(trimmed.to_string());
        }
        if let Some(raw) = self.category.as_deref() {
            match raw.parse::<JobCategory>() {
                Ok(category) => changes.category = Some(category),
                Err(()) => errors.push("category", "Invalid category"),
            }
        }
        if let Some(raw) = self.job_type.as_deref() {
            match raw.parse::<JobType>() {
                Ok(job_type) => changes.job_type = Some(job_type),
                Err(()) => errors.push("jobType", "Invalid job type"),
            }
        }
        if let Some(raw) = self.status.as_deref() {
            match raw.parse::<JobStatus>() {
                Ok(status) => changes.status = Some(status),
                Err(()) => errors.push("status", "Invalid status"),
            }
        }
        check_salaries(&mut errors, self.minimum_salary, self.maximum_salary);
        changes.minimum_salary = self.minimum_salary;
        changes.maximum_salary = self.maximum_salary;
        if let Some(raw) = self.deadline.as_deref() {
            if let Some(date) = parse_date(&mut errors, "deadline", raw) {
                if date <= today_utc() {
                    errors.push("deadline", "Deadline must be in the future");
                }
                changes.deadline = Some(date);
            }
        }

        errors.into_result(changes)
    }
}

fn check_salaries(errors: &mut FieldErrors, minimum: Option<i64>, maximum: Option<i64>) {
    if let Some(min) = minimum {
        if min < 1 {
            errors.push("minimumSalary", "Minimum salary must be at least 1");
        }
    }
    if let Some(max) = maximum {
        if max < 1 {
            errors.push("maximumSalary", "Maximum salary must be at least 1");
        }
    }
    if let (Some(min), Some(max)) = (minimum, maximum) {
        if max < min {
            errors.push("maximumSalary", "Maximum salary must not be below minimum salary");
        }
    }
}

/// Raw listing query string; `sort` takes a column name with an optional
/// leading `-` for descending order.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobQuery {
    pub page: Option<String>,
    pub sort: Option<String>,
    pub title: Option<String>,
    pub job_type: Option<String>,
    pub category: Option<String>,
}

impl JobQuery {
    pub fn validate(self) -> Result<JobFilters, FieldErrors> {
        let mut errors = FieldErrors::new();

        let page = match self.page.as_deref() {
            Some(raw) => match raw.parse::<i64>() {
                Ok(n) if n >= 1 => n,
                _ => {
                    errors.push("page", "Page must be a positive integer");
                    1
                }
            },
            None => 1,
        };

        let (sort_column, sort_desc) = match self.sort.as_deref() {
            Some(raw) => {
                let (name, desc) = match raw.strip_prefix('-') {
                    Some(rest) => (rest, true),
                    None => (raw, false),
                };
                match sort_column(name) {
                    Some(column) => (column, desc),
                    None => {
                        errors.push("sort", "Invalid sort field");
                        ("created_at", true)
                    }
                }
            }
            None => ("created_at", true),
        };

        let job_type = match self.job_type.as_deref() {
            Some(raw) => match raw.parse::<JobType>() {
                Ok(job_type) => Some(job_type),
                Err(()) => {
                    errors.push("jobType", "Invalid job type");
                    None
                }
            },
            None => None,
        };

        let category = match self.category.as_deref() {
            Some(raw) => match raw.parse::<JobCategory>() {
                Ok(category) => Some(category),
                Err(()) => {
                    errors.push("category", "Invalid category");
                    None
                }
            },
            None => None,
        };

        errors.into_result(JobFilters {
            page,
            sort_column,
            sort_desc,
            title: self.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()),
            job_type,
            category,
        })
    }
}

fn sort_column(name: &str) -> Option<&'static str> {
    match name {
        "createdAt" | "created_at" => Some("created_at"),
        "deadline" => Some("deadline"),
        "title" => Some("title"),
        _ => None,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMeta {
    pub count: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl ListMeta {
    pub fn new(count: i64, page: i64) -> ListMeta {
        ListMeta {
            count,
            page,
            limit: PAGE_SIZE,
            total_pages: (count + PAGE_SIZE - 1) / PAGE_SIZE,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListData {
    pub meta_data: ListMeta,
    pub jobs: Vec<JobListing>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request() -> CreateJobRequest {
        CreateJobRequest {
            title: Some("Backend Engineer".into()),
            description: Some("Build and operate the hiring platform".into()),
            category: Some("TECHNOLOGY".into()),
            job_type: Some("FULL_TIME".into()),
            deadline: Some("2099-01-01".into()),
            ..Default::default()
        }
    }

    #[test]
    fn minimal_valid_job_defaults_to_active() {
        let new = base_request().validate().expect("should validate");
        assert_eq!(new.status, JobStatus::Active);
        assert_eq!(new.category, JobCategory::Technology);
    }

    #[test]
    fn missing_required_fields_are_collected() {
        let errors = CreateJobRequest::default().validate().unwrap_err();
        assert_eq!(errors.get("title"), Some("Title is required"));
        assert_eq!(errors.get("category"), Some("Category is required"));
        assert_eq!(errors.get("jobType"), Some("Job type is required"));
        assert_eq!(errors.get("deadline"), Some("Deadline is required"));
    }

    #[test]
    fn past_deadline_is_rejected() {
        let mut req = base_request();
        req.deadline = Some("2020-01-01".into());
        let errors = req.validate().unwrap_err();
        assert_eq!(errors.get("deadline"), Some("Deadline must be in the future"));
    }

    #[test]
    fn unknown_enum_values_are_rejected() {
        let mut req = base_request();
        req.category = Some("GARDENING".into());
        req.job_type = Some("FOUR_DAY_WEEK".into());
        let errors = req.validate().unwrap_err();
        assert_eq!(errors.get("category"), Some("Invalid category"));
        assert_eq!(errors.get("jobType"), Some("Invalid job type"));
    }

    #[test]
    fn inverted_salary_range_is_rejected() {
        let mut req = base_request();
        req.minimum_salary = Some(90_000);
        req.maximum_salary = Some(40_000);
        let errors = req.validate().unwrap_err();
        assert_eq!(
            errors.get("maximumSalary"),
            Some("Maximum salary must not be below minimum salary")
        );
    }

    #[test]
    fn query_defaults_to_first_page_newest_first() {
        let filters = JobQuery::default().validate().expect("should validate");
        assert_eq!(filters.page, 1);
        assert_eq!(filters.sort_column, "created_at");
        assert!(filters.sort_desc);
    }

    #[test]
    fn query_sort_prefix_flips_direction() {
        let query = JobQuery {
            sort: Some("-deadline".into()),
            ..Default::default()
        };
        let filters = query.validate().expect("should validate");
        assert_eq!(filters.sort_column, "deadline");
        assert!(filters.sort_desc);

        let query = JobQuery {
            sort: Some("title".into()),
            ..Default::default()
        };
        let filters = query.validate().expect("should validate");
        assert_eq!(filters.sort_column, "title");
        assert!(!filters.sort_desc);
    }

    #[test]
    fn query_rejects_unknown_sort_and_bad_page() {
        let query = JobQuery {
            page: Some("zero".into()),
            sort: Some("salary".into()),
            ..Default::default()
        };
        let errors = query.validate().unwrap_err();
        assert_eq!(errors.get("page"), Some("Page must be a positive integer"));
        assert_eq!(errors.get("sort"), Some("Invalid sort field"));
    }

    #[test]
    fn update_with_no_fields_is_a_noop() {
        let changes = UpdateJobRequest::default().validate().expect("should validate");
        assert!(changes.title.is_none());
        assert!(changes.deadline.is_none());
    }

    #[test]
    fn meta_rounds_total_pages_up() {
        let meta = ListMeta::new(21, 2);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.limit, PAGE_SIZE);
        let meta = ListMeta::new(0, 1);
        assert_eq!(meta.total_pages, 0);
    }
}
