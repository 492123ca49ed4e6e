use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use valkyrie_common::{InvestmentRange, Submission, SubmissionKind};
use valkyrie_store::StoreError;

use crate::AppState;

#[derive(Deserialize, Default)]
pub struct SubmitRequest {
    name: Option<String>,
    email: Option<String>,
    company: Option<String>,
    role: Option<String>,
    message: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    id: Option<String>,
    timestamp: Option<DateTime<Utc>>,
    #[serde(rename = "investmentRange")]
    investment_range: Option<String>,
}

pub const RATE_LIMIT_PER_HOUR: usize = 10;

/// Check rate limit for an IP. Returns true if the request is allowed, false if rate-limited.
/// Prunes expired entries and records the new request if allowed.
pub fn check_rate_limit(entries: &mut Vec<Instant>, now: Instant, max_per_hour: usize) -> bool {
    let cutoff = now - std::time::Duration::from_secs(3600);
    entries.retain(|t| *t > cutoff);
    if entries.len() >= max_per_hour {
        return false;
    }
    entries.push(now);
    true
}

/// Prune empty entries from the rate limiter HashMap to prevent unbounded growth.
pub fn prune_empty_entries(
    limiter: &mut std::collections::HashMap<std::net::IpAddr, Vec<Instant>>,
) {
    let cutoff = Instant::now() - std::time::Duration::from_secs(3600);
    limiter.retain(|_, entries| {
        entries.retain(|t| *t > cutoff);
        !entries.is_empty()
    });
}

/// Turn a raw request body into a validated submission. `now` supplies the
/// timestamp and the generated id when the client did not send them.
pub fn build_submission(body: SubmitRequest, now: DateTime<Utc>) -> Result<Submission, String> {
    let name = required_field(body.name, "name")?;
    let email = required_field(body.email, "email")?;
    let company = required_field(body.company, "company")?;
    let role = required_field(body.role, "role")?;
    let message = required_field(body.message, "message")?;

    let kind: SubmissionKind = required_field(body.kind, "type")?
        .parse()
        .map_err(|_| "Invalid submission type".to_string())?;

    let investment_range = match (kind, body.investment_range) {
        (_, None) => None,
        (SubmissionKind::Investor, Some(raw)) => Some(
            raw.parse::<InvestmentRange>()
                .map_err(|_| "Invalid investment range".to_string())?,
        ),
        (SubmissionKind::EarlyAccess, Some(_)) => {
            return Err("investmentRange is only valid for investor submissions".to_string());
        }
    };

    Ok(Submission {
        id: body
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        kind,
        name,
        email,
        company,
        role,
        message,
        investment_range,
        created_at: body.timestamp.unwrap_or(now),
    })
}

fn required_field(value: Option<String>, field: &str) -> Result<String, String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(format!("Missing required field: {field}")),
    }
}

pub async fn api_submit(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<std::net::SocketAddr>,
    Json(body): Json<SubmitRequest>,
) -> impl IntoResponse {
    // Rate limit: 10 submissions per hour per IP
    let ip = addr.ip();
    {
        let mut limiter = state.rate_limiter.lock().await;
        // Periodically prune empty entries to prevent unbounded HashMap growth
        if limiter.len() > 1000 {
            prune_empty_entries(&mut limiter);
        }
        let entries = limiter.entry(ip).or_default();
        if !check_rate_limit(entries, Instant::now(), RATE_LIMIT_PER_HOUR) {
            return (
                StatusCode::TOO_MANY_REQUESTS,
                Json(serde_json::json!({"error": "Rate limit exceeded: max 10 submissions per hour"})),
            )
                .into_response();
        }
    }

    let submission = match build_submission(body, Utc::now()) {
        Ok(submission) => submission,
        Err(message) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": message})),
            )
                .into_response();
        }
    };

    match state.store.append(&submission).await {
        Ok(()) => {
            // Log without form contents (they carry PII)
            info!(id = %submission.id, kind = %submission.kind, "Waitlist submission received");
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "message": "Submission saved successfully",
                    "id": submission.id,
                })),
            )
                .into_response()
        }
        Err(StoreError::DuplicateId(id)) => (
            StatusCode::CONFLICT,
            Json(
                serde_json::json!({"error": format!("A submission with id {id} already exists")}),
            ),
        )
            .into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to save submission");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Failed to save submission"})),
            )
                .into_response()
        }
    }
}
