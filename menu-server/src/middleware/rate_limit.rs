//! Fixed-window rate limiting per client and route class

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderName, HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::state::AppState;

const USER_AGENT_MAX_CHARS: usize = 50;

/// Paths that are never limited
const EXEMPT_PATHS: &[&str] = &["/health", "/ready", "/live", "/status", "/api/v1/status"];

/// A limit applied to one class of requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateRule {
    pub name: &'static str,
    pub limit: u32,
}

impl RateRule {
    const UPLOAD: Self = Self { name: "upload", limit: 10 };
    const SEARCH: Self = Self { name: "search", limit: 50 };
    const MENU: Self = Self { name: "menu", limit: 200 };
    const WRITE: Self = Self { name: "write", limit: 30 };
    const DELETE: Self = Self { name: "delete", limit: 20 };
    const DEFAULT: Self = Self { name: "default", limit: 100 };

    /// First matching rule wins: path classes, then method classes, then default
    pub fn for_request(method: &Method, path: &str) -> Self {
        if path.contains("/upload") {
            Self::UPLOAD
        } else if path.contains("/search") {
            Self::SEARCH
        } else if path.contains("/menu") {
            Self::MENU
        } else if *method == Method::POST || *method == Method::PUT {
            Self::WRITE
        } else if *method == Method::DELETE {
            Self::DELETE
        } else {
            Self::DEFAULT
        }
    }
}

/// Outcome of one counter check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Seconds until the window resets
    pub reset_after: u64,
}

struct ClientEntry {
    count: u32,
    window_start: Instant,
}

#[derive(Clone)]
pub struct RateLimiter {
    /// rule name -> (client key -> entry)
    inner: Arc<Mutex<HashMap<&'static str, HashMap<String, ClientEntry>>>>,
    window: Duration,
}

impl RateLimiter {
    pub fn new(window: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            window,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Count one request for `client` under `rule`
    pub async fn check(&self, rule: RateRule, client: &str) -> Decision {
        let mut map = self.inner.lock().await;
        let rule_map = map.entry(rule.name).or_default();
        let now = Instant::now();

        let entry = rule_map.entry(client.to_owned()).or_insert_with(|| ClientEntry {
            count: 0,
            window_start: now,
        });

        // Reset window if expired
        if now.duration_since(entry.window_start) >= self.window {
            entry.count = 0;
            entry.window_start = now;
        }

        entry.count = entry.count.saturating_add(1);
        let elapsed = now.duration_since(entry.window_start);
        let reset_after = self.window.saturating_sub(elapsed).as_secs().max(1);

        Decision {
            allowed: entry.count <= rule.limit,
            limit: rule.limit,
            remaining: rule.limit.saturating_sub(entry.count),
            reset_after,
        }
    }

    /// Remove entries whose window has passed
    pub async fn cleanup(&self) {
        let mut map = self.inner.lock().await;
        let now = Instant::now();
        let window = self.window;

        for rule_map in map.values_mut() {
            rule_map.retain(|_, entry| now.duration_since(entry.window_start) < window);
        }

        map.retain(|_, rule_map| !rule_map.is_empty());
    }
}

/// Client IP: X-Forwarded-For first entry, then X-Real-IP, then peer address
pub fn extract_ip(request: &Request) -> String {
    let headers = request.headers();
    if let Some(forwarded) = headers.get("x-forwarded-for")
        && let Ok(val) = forwarded.to_str()
        && let Some(first) = val.split(',').next()
    {
        let ip = first.trim();
        if !ip.is_empty() {
            return ip.to_owned();
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip")
        && let Ok(val) = real_ip.to_str()
        && !val.trim().is_empty()
    {
        return val.trim().to_owned();
    }

    request
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

/// Counter key: IP plus the first 50 characters of the user agent
pub fn client_key(request: &Request) -> String {
    let user_agent: String = request
        .headers()
        .get(http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .chars()
        .take(USER_AGENT_MAX_CHARS)
        .collect();
    format!("{}|{}", extract_ip(request), user_agent)
}

fn insert_headers(headers: &mut HeaderMap, decision: &Decision, window: Duration) {
    let reset_at = chrono::Utc::now().timestamp() as u64 + decision.reset_after;
    let pairs = [
        ("x-ratelimit-limit", decision.limit.to_string()),
        ("x-ratelimit-remaining", decision.remaining.to_string()),
        ("x-ratelimit-reset", reset_at.to_string()),
        (
            "x-ratelimit-policy",
            format!("{};w={}", decision.limit, window.as_secs()),
        ),
    ];
    for (name, value) in pairs {
        if let Ok(value) = HeaderValue::from_str(&value) {
            headers.insert(HeaderName::from_static(name), value);
        }
    }
}

/// Rate limit middleware applied to the whole router
pub async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();
    if !state.config.rate_limit_enabled || EXEMPT_PATHS.contains(&path) {
        return next.run(request).await;
    }

    let rule = RateRule::for_request(request.method(), path);
    let client = client_key(&request);
    let decision = state.rate_limiter.check(rule, &client).await;
    let window = state.rate_limiter.window();

    if !decision.allowed {
        tracing::warn!(
            client = %client,
            rule = rule.name,
            limit = rule.limit,
            "Rate limit exceeded"
        );
        let mut response = AppError::rate_limited()
            .with_detail("limit", decision.limit)
            .with_detail("retry_after", decision.reset_after)
            .into_response();
        insert_headers(response.headers_mut(), &decision, window);
        if let Ok(v) = HeaderValue::from_str(&decision.reset_after.to_string()) {
            response.headers_mut().insert(http::header::RETRY_AFTER, v);
        }
        return response;
    }

    let mut response = next.run(request).await;
    insert_headers(response.headers_mut(), &decision, window);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_selection() {
        assert_eq!(
            RateRule::for_request(&Method::POST, "/api/v1/upload/image"),
            RateRule::UPLOAD
        );
        assert_eq!(
            RateRule::for_request(&Method::GET, "/api/v1/items/search"),
            RateRule::SEARCH
        );
        assert_eq!(
            RateRule::for_request(&Method::GET, "/api/v1/menu/search"),
            RateRule::SEARCH
        );
        assert_eq!(RateRule::for_request(&Method::GET, "/api/v1/menu"), RateRule::MENU);
        assert_eq!(
            RateRule::for_request(&Method::PUT, "/api/v1/categories/1"),
            RateRule::WRITE
        );
        assert_eq!(
            RateRule::for_request(&Method::DELETE, "/api/v1/items/1"),
            RateRule::DELETE
        );
        assert_eq!(
            RateRule::for_request(&Method::PATCH, "/api/v1/items/1/toggle"),
            RateRule::DEFAULT
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_limit_and_window_reset() {
        let limiter = RateLimiter::new(Duration::from_secs(60));
        let rule = RateRule::UPLOAD;

        for i in 1..=10 {
            let d = limiter.check(rule, "1.2.3.4|curl").await;
            assert!(d.allowed);
            assert_eq!(d.remaining, 10 - i);
        }
        let d = limiter.check(rule, "1.2.3.4|curl").await;
        assert!(!d.allowed);
        assert_eq!(d.remaining, 0);

        // Other clients and rules are independent
        assert!(limiter.check(rule, "5.6.7.8|curl").await.allowed);
        assert!(limiter.check(RateRule::DEFAULT, "1.2.3.4|curl").await.allowed);

        tokio::time::advance(Duration::from_secs(61)).await;
        let d = limiter.check(rule, "1.2.3.4|curl").await;
        assert!(d.allowed);
        assert_eq!(d.remaining, 9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_drops_expired() {
        let limiter = RateLimiter::new(Duration::from_secs(60));
        limiter.check(RateRule::DEFAULT, "a").await;
        tokio::time::advance(Duration::from_secs(30)).await;
        limiter.check(RateRule::MENU, "b").await;
        tokio::time::advance(Duration::from_secs(40)).await;
        limiter.cleanup().await;

        let map = limiter.inner.lock().await;
        assert!(!map.contains_key("default"));
        assert_eq!(map.get("menu").map(|m| m.len()), Some(1));
    }

    #[test]
    fn test_client_key_uses_forwarded_for_and_truncates_agent() {
        let request = Request::builder()
            .uri("/api/v1/items")
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .header("user-agent", "a".repeat(80))
            .body(axum::body::Body::empty())
            .unwrap();
        let key = client_key(&request);
        assert_eq!(key, format!("203.0.113.7|{}", "a".repeat(50)));
    }

    #[test]
    fn test_extract_ip_fallbacks() {
        let request = Request::builder()
            .header("x-real-ip", "198.51.100.2")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(extract_ip(&request), "198.51.100.2");

        let request = Request::builder().body(axum::body::Body::empty()).unwrap();
        assert_eq!(extract_ip(&request), "unknown");
    }
}
