use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use valkyrie_common::{Submission, SubmissionKind};

use crate::auth::{constant_time_eq, AdminToken};
use crate::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Deserialize)]
pub struct SubmissionsQuery {
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub investors: usize,
    #[serde(rename = "earlyAccess")]
    pub early_access: usize,
}

/// Counts over the whole store, regardless of any list filter.
pub fn compute_stats(submissions: &[Submission]) -> Stats {
    Stats {
        total: submissions.len(),
        investors: submissions
            .iter()
            .filter(|s| s.kind == SubmissionKind::Investor)
            .count(),
        early_access: submissions
            .iter()
            .filter(|s| s.kind == SubmissionKind::EarlyAccess)
            .count(),
    }
}

/// Pass-through filter: an unrecognized kind value matches nothing rather
/// than erroring.
pub fn filter_by_kind(submissions: Vec<Submission>, kind: Option<&str>) -> Vec<Submission> {
    match kind {
        Some(kind) => submissions
            .into_iter()
            .filter(|s| s.kind.as_str() == kind)
            .collect(),
        None => submissions,
    }
}

/// Exchange the static admin credentials for the shared API token.
pub async fn api_login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> impl IntoResponse {
    let email_ok = constant_time_eq(body.email.as_bytes(), state.admin_email.as_bytes());
    let password_ok = constant_time_eq(body.password.as_bytes(), state.admin_password.as_bytes());

    if email_ok && password_ok {
        info!("Admin login succeeded");
        Json(serde_json::json!({"token": state.admin_token})).into_response()
    } else {
        warn!("Admin login failed");
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"error": "Invalid credentials"})),
        )
            .into_response()
    }
}

pub async fn api_submissions(
    _admin: AdminToken,
    State(state): State<Arc<AppState>>,
    Query(params): Query<SubmissionsQuery>,
) -> impl IntoResponse {
    match state.store.list().await {
        Ok(all) => {
            let stats = compute_stats(&all);
            let submissions = filter_by_kind(all, params.kind.as_deref());
            Json(serde_json::json!({
                "submissions": submissions,
                "stats": stats,
            }))
            .into_response()
        }
        Err(e) => {
            warn!(error = %e, "Failed to fetch submissions");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Failed to fetch submissions"})),
            )
                .into_response()
        }
    }
}

pub async fn api_delete_submission(
    _admin: AdminToken,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.store.delete_by_id(&id).await {
        Ok(()) => {
            info!(id, "Submission deleted");
            Json(serde_json::json!({"message": "Submission deleted successfully"})).into_response()
        }
        Err(e) => {
            warn!(error = %e, id, "Failed to delete submission");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Failed to delete submission"})),
            )
                .into_response()
        }
    }
}

pub async fn api_clear(
    _admin: AdminToken,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    match state.store.clear().await {
        Ok(()) => {
            info!("All submissions cleared");
            Json(serde_json::json!({"message": "All submissions cleared successfully"}))
                .into_response()
        }
        Err(e) => {
            warn!(error = %e, "Failed to clear submissions");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Failed to clear submissions"})),
            )
                .into_response()
        }
    }
}

/// Download the full submission list as a dated JSON file.
pub async fn api_export(_admin: AdminToken, State(state): State<Arc<AppState>>) -> Response {
    let submissions = match state.store.list().await {
        Ok(submissions) => submissions,
        Err(e) => {
            warn!(error = %e, "Failed to export submissions");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Failed to export submissions"})),
            )
                .into_response();
        }
    };

    let body = match serde_json::to_string_pretty(&submissions) {
        Ok(body) => body,
        Err(e) => {
            warn!(error = %e, "Failed to serialize export");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Failed to export submissions"})),
            )
                .into_response();
        }
    };

    let filename = format!("waitlist-submissions-{}.json", Utc::now().format("%Y-%m-%d"));
    (
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}
