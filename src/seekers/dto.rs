use serde::{Deserialize, Serialize};

use crate::seekers::repo::{
    Education, EducationChanges, Experience, ExperienceChanges, NewEducation, NewExperience,
    ProfileChanges, SeekerProfile,
};
use crate::validate::{is_valid_phone, max_len, parse_date, required, today_utc, FieldErrors};

#[derive(Debug, Serialize)]
pub struct SeekerProfileData {
    #[serde(flatten)]
    pub profile: SeekerProfile,
    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateSeekerProfileRequest {
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub gender: Option<String>,
}

impl UpdateSeekerProfileRequest {
    pub fn validate(self) -> Result<ProfileChanges, FieldErrors> {
        let mut errors = FieldErrors::new();
        let mut changes = ProfileChanges::default();

        if let Some(phone) = self.phone {
            let phone = phone.trim().to_string();
            if !is_valid_phone(&phone) {
                errors.push("phone", "Invalid phone number");
            }
            changes.phone = Some(phone);
        }
        if let Some(bio) = self.bio {
            max_len(&mut errors, "bio", &bio, 500);
            changes.bio = Some(bio);
        }
        changes.location = self.location;
        if let Some(gender) = self.gender {
            match gender.parse() {
                Ok(g) => changes.gender = Some(g),
                Err(()) => errors.push("gender", "Invalid gender"),
            }
        }

        errors.into_result(changes)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEducationRequest {
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub field_of_study: String,
    #[serde(default)]
    pub start_date: String,
    pub end_date: Option<String>,
}

impl CreateEducationRequest {
    pub fn validate(self) -> Result<NewEducation, FieldErrors> {
        let mut errors = FieldErrors::new();

        let degree = required(&mut errors, "degree", &self.degree, "Degree is required");
        let institution = required(&mut errors, "institution", &self.institution, "Institution is required");
        let field_of_study = required(&mut errors, "fieldOfStudy", &self.field_of_study, "Field of study is required");
        max_len(&mut errors, "degree", &degree, 100);
        max_len(&mut errors, "institution", &institution, 100);

        let start_date = if self.start_date.trim().is_empty() {
            errors.push("startDate", "Start date is required");
            None
        } else {
            parse_date(&mut errors, "startDate", &self.start_date)
        };
        let end_date = self
            .end_date
            .filter(|d| !d.trim().is_empty())
            .and_then(|d| parse_date(&mut errors, "endDate", &d));

        if let Some(start) = start_date {
            if start > today_utc() {
                errors.push("startDate", "Start date cannot be in the future");
            }
            if let Some(end) = end_date {
                if end < start {
                    errors.push("endDate", "End date must not precede start date");
                }
            }
        }

        let Some(start_date) = start_date else {
            return Err(errors);
        };
        errors.into_result(NewEducation {
            degree,
            institution,
            field_of_study,
            start_date,
            end_date,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEducationRequest {
    pub degree: Option<String>,
    pub institution: Option<String>,
    pub field_of_study: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl UpdateEducationRequest {
    pub fn validate(self) -> Result<EducationChanges, FieldErrors> {
        let mut errors = FieldErrors::new();
        let mut changes = EducationChanges::default();

        if let Some(degree) = self.degree {
            let degree = required(&mut errors, "degree", &degree, "Degree cannot be empty");
            max_len(&mut errors, "degree", &degree, 100);
            changes.degree = Some(degree);
        }
        if let Some(institution) = self.institution {
            let institution =
                required(&mut errors, "institution", &institution, "Institution cannot be empty");
            max_len(&mut errors, "institution", &institution, 100);
            changes.institution = Some(institution);
        }
        if let Some(field) = self.field_of_study {
            changes.field_of_study =
                Some(required(&mut errors, "fieldOfStudy", &field, "Field of study cannot be empty"));
        }
        if let Some(start) = self.start_date {
            changes.start_date = parse_date(&mut errors, "startDate", &start);
            if let Some(date) = changes.start_date {
                if date > today_utc() {
                    errors.push("startDate", "Start date cannot be in the future");
                }
            }
        }
        if let Some(end) = self.end_date {
            changes.end_date = parse_date(&mut errors, "endDate", &end);
        }
        if let (Some(start), Some(end)) = (changes.start_date, changes.end_date) {
            if end < start {
                errors.push("endDate", "End date must not precede start date");
            }
        }

        errors.into_result(changes)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExperienceRequest {
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub company_name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: String,
    pub end_date: Option<String>,
}

impl CreateExperienceRequest {
    pub fn validate(self) -> Result<NewExperience, FieldErrors> {
        let mut errors = FieldErrors::new();

        let job_title = required(&mut errors, "jobTitle", &self.job_title, "Job title is required");
        let company_name =
            required(&mut errors, "companyName", &self.company_name, "Company name is required");
        max_len(&mut errors, "jobTitle", &job_title, 100);
        max_len(&mut errors, "companyName", &company_name, 100);
        if let Some(description) = &self.description {
            max_len(&mut errors, "description", description, 500);
        }

        let start_date = if self.start_date.trim().is_empty() {
            errors.push("startDate", "Start date is required");
            None
        } else {
            parse_date(&mut errors, "startDate", &self.start_date)
        };
        let end_date = self
            .end_date
            .filter(|d| !d.trim().is_empty())
            .and_then(|d| parse_date(&mut errors, "endDate", &d));

        if let Some(start) = start_date {
            if start > today_utc() {
                errors.push("startDate", "Start date cannot be in the future");
            }
            if let Some(end) = end_date {
                if end < start {
                    errors.push("endDate", "End date must not precede start date");
                }
            }
        }

        let Some(start_date) = start_date else {
            return Err(errors);
        };
        errors.into_result(NewExperience {
            job_title,
            company_name,
            description: self.description,
            start_date,
            end_date,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExperienceRequest {
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl UpdateExperienceRequest {
    pub fn validate(self) -> Result<ExperienceChanges, FieldErrors> {
        let mut errors = FieldErrors::new();
        let mut changes = ExperienceChanges::default();

        if let Some(title) = self.job_title {
            let title = required(&mut errors, "jobTitle", &title, "Job title cannot be empty");
            max_len(&mut errors, "jobTitle", &title, 100);
            changes.job_title = Some(title);
        }
        if let Some(company) = self.company_name {
            let company =
                required(&mut errors, "companyName", &company, "Company name cannot be empty");
            max_len(&mut errors, "companyName", &company, 100);
            changes.company_name = Some(company);
        }
        if let Some(description) = self.description {
            max_len(&mut errors, "description", &description, 500);
            changes.description = Some(description);
        }
        if let Some(start) = self.start_date {
            changes.start_date = parse_date(&mut errors, "startDate", &start);
            if let Some(date) = changes.start_date {
                if date > today_utc() {
                    errors.push("startDate", "Start date cannot be in the future");
                }
            }
        }
        if let Some(end) = self.end_date {
            changes.end_date = parse_date(&mut errors, "endDate", &end);
        }
        if let (Some(start), Some(end)) = (changes.start_date, changes.end_date) {
            if end < start {
                errors.push("endDate", "End date must not precede start date");
            }
        }

        errors.into_result(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_update_rejects_bad_phone_and_gender() {
        let req = UpdateSeekerProfileRequest {
            phone: Some("12345".into()),
            gender: Some("UNKNOWN".into()),
            ..Default::default()
        };
        let errors = req.validate().unwrap_err();
        assert_eq!(errors.get("phone"), Some("Invalid phone number"));
        assert_eq!(errors.get("gender"), Some("Invalid gender"));
    }

    #[test]
    fn profile_update_accepts_valid_fields() {
        let req = UpdateSeekerProfileRequest {
            phone: Some("9812345678".into()),
            location: Some("Kathmandu".into()),
            bio: Some("Backend engineer".into()),
            gender: Some("FEMALE".into()),
        };
        let changes = req.validate().expect("should validate");
        assert_eq!(changes.phone.as_deref(), Some("9812345678"));
        assert!(changes.gender.is_some());
    }

    #[test]
    fn education_requires_core_fields() {
        let errors = CreateEducationRequest::default().validate().unwrap_err();
        assert_eq!(errors.get("degree"), Some("Degree is required"));
        assert_eq!(errors.get("institution"), Some("Institution is required"));
        assert_eq!(errors.get("startDate"), Some("Start date is required"));
    }

    #[test]
    fn education_end_before_start_is_rejected() {
        let req = CreateEducationRequest {
            degree: "BSc".into(),
            institution: "Tribhuvan University".into(),
            field_of_study: "CS".into(),
            start_date: "2020-01-01".into(),
            end_date: Some("2019-01-01".into()),
        };
        let errors = req.validate().unwrap_err();
        assert_eq!(errors.get("endDate"), Some("End date must not precede start date"));
    }

    #[test]
    fn education_future_start_is_rejected() {
        let req = CreateEducationRequest {
            degree: "BSc".into(),
            institution: "TU".into(),
            field_of_study: "CS".into(),
            start_date: "2999-01-01".into(),
            end_date: None,
        };
        let errors = req.validate().unwrap_err();
        assert_eq!(errors.get("startDate"), Some("Start date cannot be in the future"));
    }

    #[test]
    fn education_valid_payload_passes() {
        let req = CreateEducationRequest {
            degree: "BSc".into(),
            institution: "TU".into(),
            field_of_study: "CS".into(),
            start_date: "2018-09-01".into(),
            end_date: Some("2022-06-30".into()),
        };
        let new = req.validate().expect("should validate");
        assert_eq!(new.degree, "BSc");
        assert!(new.end_date.is_some());
    }

    #[test]
    fn experience_bad_date_format_is_a_field_error() {
        let req = CreateExperienceRequest {
            job_title: "Engineer".into(),
            company_name: "Acme".into(),
            description: None,
            start_date: "01/09/2020".into(),
            end_date: None,
        };
        let errors = req.validate().unwrap_err();
        assert_eq!(errors.get("startDate"), Some("Invalid date, expected YYYY-MM-DD"));
    }

    #[test]
    fn partial_education_update_validates_only_present_fields() {
        let req = UpdateEducationRequest {
            degree: Some("MSc".into()),
            ..Default::default()
        };
        let changes = req.validate().expect("should validate");
        assert_eq!(changes.degree.as_deref(), Some("MSc"));
        assert!(changes.start_date.is_none());
    }
}
