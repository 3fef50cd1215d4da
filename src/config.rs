use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    /// Session token lifetime.
    pub ttl_minutes: i64,
    /// Short-lived tokens for account verification and password reset.
    pub verify_ttl_minutes: i64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WindowConfig {
    pub window_secs: u64,
    pub max_requests: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    pub global: WindowConfig,
    pub auth: WindowConfig,
    pub jobs: WindowConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Delivery is skipped (and logged) when no key is configured.
    pub api_key: Option<String>,
    pub api_url: String,
    pub from: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    /// Base URL used in verification links sent by email.
    pub public_url: String,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub email: EmailConfig,
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_u32(name: &str, default: u32) -> u32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24),
            verify_ttl_minutes: std::env::var("JWT_VERIFY_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(15),
        };
        let rate_limit = RateLimitConfig {
            global: WindowConfig {
                window_secs: env_u64("RATE_LIMIT_WINDOW_SECS", 15 * 60),
                max_requests: env_u32("RATE_LIMIT_MAX_REQUESTS", 100),
            },
            auth: WindowConfig {
                window_secs: env_u64("RATE_LIMIT_AUTH_WINDOW_SECS", 15 * 60),
                max_requests: env_u32("RATE_LIMIT_AUTH_MAX_REQUESTS", 20),
            },
            jobs: WindowConfig {
                window_secs: env_u64("RATE_LIMIT_JOBS_WINDOW_SECS", 60),
                max_requests: env_u32("RATE_LIMIT_JOBS_MAX_REQUESTS", 60),
            },
        };
        let email = EmailConfig {
            api_key: std::env::var("RESEND_API_KEY").ok(),
            api_url: std::env::var("RESEND_API_URL")
                .unwrap_or_else(|_| "https://api.resend.com/emails".into()),
            from: std::env::var("RESEND_FROM_EMAIL")
                .unwrap_or_else(|_| "no-reply@jobboard.local".into()),
        };
        Ok(Self {
            database_url,
            public_url: std::env::var("PUBLIC_URL")
                .unwrap_or_else(|_| "http://localhost:8080".into()),
            jwt,
            rate_limit,
            email,
        })
    }
}
