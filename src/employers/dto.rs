use serde::Deserialize;

use crate::employers::repo::ProfileChanges;
use crate::validate::{max_len, required, FieldErrors};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployerProfileRequest {
    pub company_name: Option<String>,
    pub company_website: Option<String>,
    pub company_location: Option<String>,
    pub company_description: Option<String>,
}

impl UpdateEmployerProfileRequest {
    pub fn validate(self) -> Result<ProfileChanges, FieldErrors> {
        let mut errors = FieldErrors::new();
        let mut changes = ProfileChanges::default();

        if let Some(name) = self.company_name {
            let name = required(&mut errors, "companyName", &name, "Company name cannot be empty");
            max_len(&mut errors, "companyName", &name, 100);
            changes.company_name = Some(name);
        }
        if let Some(website) = self.company_website {
            max_len(&mut errors, "companyWebsite", &website, 200);
            changes.company_website = Some(website.trim().to_string());
        }
        changes.company_location = self.company_location;
        if let Some(description) = self.company_description {
            max_len(&mut errors, "companyDescription", &description, 500);
            changes.company_description = Some(description);
        }

        errors.into_result(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_company_name_is_rejected() {
        let req = UpdateEmployerProfileRequest {
            company_name: Some("   ".into()),
            ..Default::default()
        };
        let errors = req.validate().unwrap_err();
        assert_eq!(errors.get("companyName"), Some("Company name cannot be empty"));
    }

    #[test]
    fn valid_update_passes_through() {
        let req = UpdateEmployerProfileRequest {
            company_name: Some("Acme".into()),
            company_website: Some("https://acme.example".into()),
            company_location: Some("Kathmandu".into()),
            company_description: None,
        };
        let changes = req.validate().expect("should validate");
        assert_eq!(changes.company_name.as_deref(), Some("Acme"));
        assert_eq!(changes.company_description, None);
    }
}
