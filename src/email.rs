use serde::Serialize;
use tracing::{debug, error, info};

use crate::config::EmailConfig;

/// Transactional email sender backed by a Resend-compatible HTTP API.
/// Delivery is fire-and-forget; failures are logged, never retried.
#[derive(Clone)]
pub struct EmailClient {
    http: reqwest::Client,
    api_key: Option<String>,
    api_url: String,
    from: String,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    html: &'a str,
}

impl EmailClient {
    pub fn new(cfg: &EmailConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: cfg.api_key.clone(),
            api_url: cfg.api_url.clone(),
            from: cfg.from.clone(),
        }
    }

    pub async fn send(&self, to: &[String], subject: &str, html: &str) {
        let Some(api_key) = &self.api_key else {
            debug!(subject, "email api key not configured, skipping send");
            return;
        };
        let body = SendRequest { from: &self.from, to, subject, html };
        let result = self
            .http
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await;
        match result {
            Ok(response) if response.status().is_success() => {
                info!(subject, "email sent");
            }
            Ok(response) => {
                error!(subject, status = %response.status(), "email send rejected");
            }
            Err(e) => {
                error!(subject, error = %e, "email send failed");
            }
        }
    }

    pub async fn send_welcome(&self, to: &str, public_url: &str, token: &str) {
        let link = format!("{public_url}/api/auth/verify-account?token={token}");
        let html = format!(
            "<h1>Welcome!</h1>\
             <p>Thanks for signing up. Please verify your account:</p>\
             <p><a href=\"{link}\">Verify account</a></p>\
             <p>The link expires shortly, so do not wait too long.</p>"
        );
        self.send(&[to.to_string()], "Welcome - verify your account", &html)
            .await;
    }

    pub async fn send_password_reset(&self, to: &str, token: &str) {
        let html = format!(
            "<h1>Password reset</h1>\
             <p>Use this token to reset your password:</p>\
             <pre>{token}</pre>\
             <p>If you did not request a reset, ignore this email.</p>"
        );
        self.send(&[to.to_string()], "Password reset", &html).await;
    }
}
