use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::auth::repo::Role;
use crate::validate::{check_password, is_valid_email, required, FieldErrors};

/// Request body for `POST /api/auth/signup`.
#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, rename = "companyName")]
    pub company_name: Option<String>,
}

/// Validated sign-up data, email lowercased.
#[derive(Debug, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub kind: ProfileKind,
}

/// Role-specific profile to create at sign-up. Validation guarantees an
/// employer always carries a company name, so downstream code needs no
/// fallback.
#[derive(Debug, PartialEq)]
pub enum ProfileKind {
    Seeker,
    Employer { company_name: String },
}

impl ProfileKind {
    pub fn role(&self) -> Role {
        match self {
            ProfileKind::Seeker => Role::Seeker,
            ProfileKind::Employer { .. } => Role::Employer,
        }
    }
}

impl SignUpRequest {
    pub fn validate(self) -> Result<NewUser, FieldErrors> {
        let mut errors = FieldErrors::new();

        let email = required(&mut errors, "email", &self.email, "Email is required").to_lowercase();
        if !email.is_empty() && !is_valid_email(&email) {
            errors.push("email", "Invalid email");
        }

        let first_name = required(&mut errors, "first_name", &self.first_name, "First name is required");
        let last_name = required(&mut errors, "last_name", &self.last_name, "Last name is required");

        check_password(&mut errors, &self.password, &[&first_name, &last_name, &email]);

        let role = match self.role.as_deref() {
            None | Some("") => Role::Seeker,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                errors.push("role", "Invalid role");
                Role::Seeker
            }),
        };

        let company_name = self.company_name.map(|c| c.trim().to_string()).filter(|c| !c.is_empty());
        let kind = match role {
            Role::Seeker => ProfileKind::Seeker,
            Role::Employer => match company_name {
                Some(company_name) => ProfileKind::Employer { company_name },
                None => {
                    errors.push("companyName", "Company name is required for employers");
                    ProfileKind::Seeker
                }
            },
        };

        errors.into_result(NewUser {
            email,
            password: self.password,
            first_name,
            last_name,
            kind,
        })
    }
}

/// Request body for `POST /api/auth/signin`.
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl SignInRequest {
    pub fn validate(self) -> Result<(String, String), FieldErrors> {
        let mut errors = FieldErrors::new();
        let email = required(&mut errors, "email", &self.email, "Email is required").to_lowercase();
        if !email.is_empty() && !is_valid_email(&email) {
            errors.push("email", "Invalid email");
        }
        if self.password.is_empty() {
            errors.push("password", "Password is required");
        }
        errors.into_result((email, self.password))
    }
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
}

impl ForgotPasswordRequest {
    pub fn validate(self) -> Result<String, FieldErrors> {
        let mut errors = FieldErrors::new();
        let email = required(&mut errors, "email", &self.email, "Email is required").to_lowercase();
        if !email.is_empty() && !is_valid_email(&email) {
            errors.push("email", "Invalid email");
        }
        errors.into_result(email)
    }
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyAccountQuery {
    pub token: Option<String>,
}

/// User shape returned by the auth endpoints; never carries the hash.
#[derive(Debug, Serialize)]
pub struct UserData {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub is_verified: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<&crate::auth::repo::User> for UserData {
    fn from(user: &crate::auth::repo::User) -> Self {
        Self {
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: user.role,
            is_verified: user.is_verified,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SignInData {
    #[serde(flatten)]
    pub user: UserData,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_signup() -> SignUpRequest {
        SignUpRequest {
            email: "jane@example.com".into(),
            password: "tr0ub4dor&Staple!".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            role: None,
            company_name: None,
        }
    }

    #[test]
    fn signup_defaults_to_seeker() {
        let user = base_signup().validate().expect("should validate");
        assert_eq!(user.kind, ProfileKind::Seeker);
        assert_eq!(user.email, "jane@example.com");
    }

    #[test]
    fn signup_lowercases_email() {
        let mut req = base_signup();
        req.email = "  Jane@Example.COM ".into();
        let user = req.validate().expect("should validate");
        assert_eq!(user.email, "jane@example.com");
    }

    #[test]
    fn employer_without_company_name_fails_on_company_name() {
        let mut req = base_signup();
        req.role = Some("EMPLOYER".into());
        let errors = req.validate().unwrap_err();
        assert_eq!(
            errors.get("companyName"),
            Some("Company name is required for employers")
        );
    }

    #[test]
    fn employer_with_company_name_passes() {
        let mut req = base_signup();
        req.role = Some("EMPLOYER".into());
        req.company_name = Some("Acme".into());
        let user = req.validate().expect("should validate");
        assert_eq!(user.kind.role(), Role::Employer);
        assert_eq!(
            user.kind,
            ProfileKind::Employer { company_name: "Acme".into() }
        );
    }

    #[test]
    fn seeker_ignores_company_name() {
        let mut req = base_signup();
        req.company_name = Some("Acme".into());
        let user = req.validate().expect("should validate");
        assert_eq!(user.kind, ProfileKind::Seeker);
    }

    #[test]
    fn invalid_email_and_short_password_reported_per_field() {
        let mut req = base_signup();
        req.email = "nope".into();
        req.password = "abc".into();
        let errors = req.validate().unwrap_err();
        assert_eq!(errors.get("email"), Some("Invalid email"));
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 8 characters long")
        );
    }

    #[test]
    fn password_built_from_own_name_is_rejected() {
        let mut req = base_signup();
        req.password = "JaneJane12".into();
        let errors = req.validate().unwrap_err();
        assert_eq!(errors.get("password"), Some("Password is too weak"));
    }

    #[test]
    fn unknown_role_is_a_field_error() {
        let mut req = base_signup();
        req.role = Some("ADMIN".into());
        let errors = req.validate().unwrap_err();
        assert_eq!(errors.get("role"), Some("Invalid role"));
    }

    #[test]
    fn signin_requires_both_fields() {
        let errors = SignInRequest { email: "".into(), password: "".into() }
            .validate()
            .unwrap_err();
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.get("password"), Some("Password is required"));
    }
}
