use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

use crate::config::WindowConfig;
use crate::envelope::Envelope;
use crate::state::AppState;

const LIMIT_MESSAGE: &str = "Too many requests from this IP, please try again later.";

/// Keep the key map bounded; stale windows are evicted once we cross this.
const MAX_TRACKED_KEYS: usize = 10_000;

struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window request counter keyed by client IP. Windows are independent
/// per key and reset in place when the window elapses.
pub struct RateLimiter {
    window: Duration,
    max: u32,
    slots: Mutex<HashMap<IpAddr, Window>>,
}

impl RateLimiter {
    pub fn new(cfg: WindowConfig) -> Self {
        Self {
            window: Duration::from_secs(cfg.window_secs),
            max: cfg.max_requests,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Count one request for `key`. Returns the seconds until the window
    /// rolls over when the key is over its limit.
    pub fn check(&self, key: IpAddr) -> Result<(), u64> {
        let now = Instant::now();
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());

        if slots.len() > MAX_TRACKED_KEYS {
            let window = self.window;
            slots.retain(|_, w| now.duration_since(w.started) < window);
        }

        let slot = slots.entry(key).or_insert(Window { started: now, count: 0 });
        if now.duration_since(slot.started) >= self.window {
            slot.started = now;
            slot.count = 0;
        }
        if slot.count >= self.max {
            let elapsed = now.duration_since(slot.started);
            let retry = self.window.saturating_sub(elapsed).as_secs().max(1);
            return Err(retry);
        }
        slot.count += 1;
        Ok(())
    }
}

/// Per-route-group limiters, shared through `AppState`.
pub struct RateLimits {
    pub global: RateLimiter,
    pub auth: RateLimiter,
    pub jobs: RateLimiter,
}

impl RateLimits {
    pub fn new(cfg: &crate::config::RateLimitConfig) -> Self {
        Self {
            global: RateLimiter::new(cfg.global),
            auth: RateLimiter::new(cfg.auth),
            jobs: RateLimiter::new(cfg.jobs),
        }
    }
}

fn client_ip(req: &Request) -> IpAddr {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

async fn enforce(limiter: &RateLimiter, req: Request, next: Next) -> Response {
    let ip = client_ip(&req);
    match limiter.check(ip) {
        Ok(()) => next.run(req).await,
        Err(retry_secs) => {
            warn!(%ip, retry_secs, "rate limit exceeded");
            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                Json(Envelope::error(LIMIT_MESSAGE, None)),
            )
                .into_response();
            if let Ok(value) = HeaderValue::from_str(&retry_secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
            response
        }
    }
}

pub async fn global_limit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    enforce(&state.limits.global, req, next).await
}

pub async fn auth_limit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    enforce(&state.limits.auth, req, next).await
}

pub async fn jobs_limit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    enforce(&state.limits.jobs, req, next).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(window_secs: u64, max_requests: u32) -> RateLimiter {
        RateLimiter::new(WindowConfig { window_secs, max_requests })
    }

    #[test]
    fn allows_up_to_max_then_rejects() {
        let limiter = limiter(60, 3);
        let ip: IpAddr = "10.0.0.1".parse().unwrap();
        for _ in 0..3 {
            assert!(limiter.check(ip).is_ok());
        }
        let retry = limiter.check(ip).unwrap_err();
        assert!(retry >= 1 && retry <= 60);
    }

    #[test]
    fn keys_are_independent() {
        let limiter = limiter(60, 1);
        let a: IpAddr = "10.0.0.1".parse().unwrap();
        let b: IpAddr = "10.0.0.2".parse().unwrap();
        assert!(limiter.check(a).is_ok());
        assert!(limiter.check(a).is_err());
        assert!(limiter.check(b).is_ok());
    }

    #[tokio::test]
    async fn window_rollover_admits_again() {
        let limiter = limiter(1, 1);
        let ip: IpAddr = "10.0.0.3".parse().unwrap();
        assert!(limiter.check(ip).is_ok());
        assert!(limiter.check(ip).is_err());
        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert!(limiter.check(ip).is_ok());
    }
}
