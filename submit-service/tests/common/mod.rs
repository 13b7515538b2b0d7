#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{body::Body, http::Request, Router};
use serde_json::Value;
use shared::{IdentityConfig, Result, ServiceError, StoredRecord, SubmissionFields};
use submit_service::{AppState, RecordStore};
use tower::ServiceExt;

/// Records every create call and answers with a fixed outcome.
#[derive(Clone, Default)]
pub struct MemoryStore {
    pub calls: Arc<Mutex<Vec<SubmissionFields>>>,
    pub failure: Option<(Option<u16>, String)>,
}

impl MemoryStore {
    pub fn failing(status: Option<u16>, message: &str) -> Self {
        Self {
            calls: Arc::default(),
            failure: Some((status, message.to_string())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_call(&self) -> Option<SubmissionFields> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn create_record(&self, fields: &SubmissionFields) -> Result<StoredRecord> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(fields.clone());
            calls.len()
        };

        if let Some((status, message)) = &self.failure {
            return Err(ServiceError::Store {
                status: *status,
                message: message.clone(),
                explanation: Some("TEST_FAILURE".to_string()),
            });
        }

        Ok(StoredRecord {
            id: format!("rec{:04}", index),
            created_time: Some("2024-11-02T10:00:00.000Z".to_string()),
            fields: serde_json::to_value(fields).unwrap(),
        })
    }
}

pub fn test_identity() -> IdentityConfig {
    IdentityConfig {
        magic_publishable_key: "pk_live_test".to_string(),
        neynar_client_id: "neynar-client".to_string(),
    }
}

pub fn test_app(store: MemoryStore) -> Router {
    submit_service::api_router(AppState::new(Arc::new(store), test_identity()))
}

pub async fn post_json(app: Router, path: &str, body: String) -> (u16, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();

    send(app, request).await
}

pub async fn send(app: Router, request: Request<Body>) -> (u16, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status().as_u16();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, body)
}
