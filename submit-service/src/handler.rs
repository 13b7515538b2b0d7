use axum::{body::Bytes, extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};
use shared::{CardSubmission, SubmissionFields};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Public keys the page needs to start the two sign-in flows.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicConfig {
    pub magic_publishable_key: String,
    pub neynar_client_id: String,
}

/// The body is parsed as JSON regardless of the `Content-Type` header.
#[tracing::instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn submit_handler(
    State(state): State<AppState>,
    payload: Bytes,
) -> Result<Json<Value>, ApiError> {
    let body: Value = serde_json::from_slice(&payload).map_err(|e| {
        tracing::warn!(error = %e, "Rejected unreadable submission body");
        shared::record_counter("submissions.malformed", 1);
        ApiError::MalformedBody(e.to_string())
    })?;

    tracing::debug!(body = %body, "Received submission");

    let submission = match validate(&body) {
        Ok(submission) => submission,
        Err(reason) => {
            tracing::info!(reason = %reason, "Submission failed validation");
            shared::record_counter("submissions.rejected", 1);
            return Err(ApiError::MissingFields {
                reason,
                received: body,
            });
        }
    };

    tracing::info!(
        identity = submission.identity().method(),
        card_type = %submission.card_type(),
        "Forwarding submission to record store"
    );

    let store_start = std::time::Instant::now();
    let result = state.store.create_record(&submission.to_fields()).await;
    shared::record_timing("store.create_record", store_start.elapsed().as_secs_f64());

    match result {
        Ok(record) => {
            tracing::info!(record_id = %record.id, "Card submitted");
            shared::record_counter("submissions.accepted", 1);
            Ok(Json(json!({
                "success": true,
                "record": record,
            })))
        }
        Err(err) => {
            tracing::error!(
                error = %err,
                status = ?err.status_code(),
                "Record store failed"
            );
            shared::record_counter("submissions.store_failed", 1);
            Err(ApiError::Store(err))
        }
    }
}

fn validate(body: &Value) -> Result<CardSubmission, String> {
    let raw: SubmissionFields =
        serde_json::from_value(body.clone()).map_err(|e| format!("Unexpected field shape: {}", e))?;

    CardSubmission::from_fields(&raw).map_err(|e| e.to_string())
}

pub async fn config_handler(State(state): State<AppState>) -> Json<PublicConfig> {
    Json(PublicConfig {
        magic_publishable_key: state.identity.magic_publishable_key.clone(),
        neynar_client_id: state.identity.neynar_client_id.clone(),
    })
}

pub async fn health_check() -> &'static str {
    "OK"
}
