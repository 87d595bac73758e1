use crate::AppState;
use crate::metrics_defs::{FLAG_REQUESTS, LEAD_SUBMISSIONS};
use axum::{
    Extension, Json, Router,
    extract::{ConnectInfo, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{SecondsFormat, Utc};
use flags::{ANON_ID_HEADER, FlagsMap, resolve_client_id};
use leads::{Lead, LeadInput, SubmissionContext};
use serde::Serialize;
use shared::counter;
use std::net::SocketAddr;
use subtle::ConstantTimeEq;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/featureflags", get(feature_flags))
        .route("/api/lead", post(capture_lead))
        .route("/api/leads", get(list_leads))
        .with_state(state)
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    #[error("lead storage unavailable")]
    StorageUnavailable,
}

#[derive(Serialize)]
struct ApiErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::StorageUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        };

        let body = Json(ApiErrorResponse {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}

#[derive(Serialize)]
struct FlagsResponse {
    flags: FlagsMap,
}

async fn feature_flags(State(state): State<AppState>, headers: HeaderMap) -> Json<FlagsResponse> {
    let supplied = headers
        .get(ANON_ID_HEADER)
        .and_then(|value| value.to_str().ok());
    counter!(FLAG_REQUESTS, "client_id" => if supplied.is_some() { "supplied" } else { "generated" })
        .increment(1);

    let client_id = resolve_client_id(supplied);
    Json(FlagsResponse {
        flags: state.flags.evaluate(&client_id),
    })
}

#[derive(Serialize, Debug, PartialEq)]
struct LeadResponse {
    success: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    duplicate: bool,
    stored: bool,
}

async fn capture_lead(
    State(state): State<AppState>,
    headers: HeaderMap,
    connect_info: Option<Extension<ConnectInfo<SocketAddr>>>,
    body: Result<Json<LeadInput>, JsonRejection>,
) -> Result<Json<LeadResponse>, ApiError> {
    let Json(input) = body.map_err(|rejection| ApiError::InvalidRequest(rejection.body_text()))?;

    let context = SubmissionContext {
        ip: client_ip(&headers, connect_info.map(|Extension(ConnectInfo(addr))| addr)),
        user_agent: header_str(&headers, header::USER_AGENT.as_str()),
        referrer: header_str(&headers, header::REFERER.as_str()),
    };
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    let lead = input.into_lead(&context, &now).map_err(|err| {
        counter!(LEAD_SUBMISSIONS, "outcome" => "invalid").increment(1);
        ApiError::InvalidRequest(err.to_string())
    })?;

    // A failed duplicate check never blocks the submission.
    let duplicate = match state.leads.email_exists(&lead.email).await {
        Ok(exists) => exists,
        Err(err) => {
            tracing::warn!(error = %err, "could not check for duplicate lead");
            false
        }
    };

    if duplicate {
        counter!(LEAD_SUBMISSIONS, "outcome" => "duplicate").increment(1);
        return Ok(Json(LeadResponse {
            success: true,
            duplicate: true,
            stored: false,
        }));
    }

    let stored = save(&state, &lead).await;
    Ok(Json(LeadResponse {
        success: true,
        duplicate: false,
        stored,
    }))
}

/// Saves the lead, reporting failure instead of surfacing it to the visitor.
async fn save(state: &AppState, lead: &Lead) -> bool {
    match state.leads.save_lead(lead).await {
        Ok(()) => {
            counter!(LEAD_SUBMISSIONS, "outcome" => "stored").increment(1);
            tracing::info!(
                store = state.leads.backend(),
                lead_magnet = %lead.lead_magnet,
                "lead captured"
            );
            true
        }
        Err(err) => {
            counter!(LEAD_SUBMISSIONS, "outcome" => "failed").increment(1);
            tracing::error!(error = %err, "lead could not be stored");
            false
        }
    }
}

async fn list_leads(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Lead>>, ApiError> {
    let Some(expected) = state.admin_token.as_deref() else {
        return Err(ApiError::NotFound);
    };

    let supplied = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));
    if !supplied.is_some_and(|token| token_matches(token, expected)) {
        return Err(ApiError::Unauthorized);
    }

    state.leads.get_all_leads().await.map(Json).map_err(|err| {
        tracing::error!(error = %err, "could not list leads");
        ApiError::StorageUnavailable
    })
}

/// Compares in constant time for equal-length inputs.
fn token_matches(supplied: &str, expected: &str) -> bool {
    supplied.as_bytes().ct_eq(expected.as_bytes()).into()
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// First `X-Forwarded-For` hop, else the peer address.
fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
    header_str(headers, "x-forwarded-for")
        .and_then(|value| {
            value
                .split(',')
                .next()
                .map(|hop| hop.trim().to_string())
                .filter(|hop| !hop.is_empty())
        })
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
}
