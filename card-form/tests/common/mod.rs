#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use card_form::{CallbackRegistry, FormController, IdentityProvider, SubmissionTransport};
use shared::{CardSubmission, Result, ServiceError, StoredRecord, SubmissionFields};

/// Email provider whose login outcomes are scripted per call.
#[derive(Default)]
pub struct ScriptedProvider {
    pub preload_error: Option<String>,
    pub outcomes: Mutex<VecDeque<Result<()>>>,
    pub logins: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn with_outcomes(outcomes: Vec<Result<()>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            ..Default::default()
        }
    }

    pub fn login_count(&self) -> usize {
        self.logins.lock().unwrap().len()
    }
}

#[async_trait]
impl IdentityProvider for ScriptedProvider {
    async fn preload(&self) -> Result<()> {
        match &self.preload_error {
            Some(message) => Err(ServiceError::Provider(message.clone())),
            None => Ok(()),
        }
    }

    async fn login_with_email_link(&self, email: &str) -> Result<()> {
        self.logins.lock().unwrap().push(email.to_string());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::Provider("User canceled login".to_string())))
    }
}

/// Transport that records what it was asked to send.
#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<SubmissionFields>>,
    pub failure: Option<ServiceError>,
}

impl RecordingTransport {
    pub fn failing(error: ServiceError) -> Self {
        Self {
            sent: Mutex::default(),
            failure: Some(error),
        }
    }

    pub fn sent(&self) -> Vec<SubmissionFields> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubmissionTransport for RecordingTransport {
    async fn submit(&self, submission: &CardSubmission) -> Result<StoredRecord> {
        let fields = submission.to_fields();
        self.sent.lock().unwrap().push(fields.clone());

        match &self.failure {
            Some(ServiceError::Store { status, message, explanation }) => Err(ServiceError::Store {
                status: *status,
                message: message.clone(),
                explanation: explanation.clone(),
            }),
            Some(other) => Err(ServiceError::Http(other.to_string())),
            None => Ok(StoredRecord {
                id: "recTEST".to_string(),
                created_time: None,
                fields: serde_json::to_value(fields).unwrap(),
            }),
        }
    }
}

pub struct Harness {
    pub controller: FormController,
    pub provider: Arc<ScriptedProvider>,
    pub transport: Arc<RecordingTransport>,
    pub registry: CallbackRegistry,
}

pub async fn started(provider: ScriptedProvider, transport: RecordingTransport) -> Harness {
    let provider = Arc::new(provider);
    let transport = Arc::new(transport);
    let registry = CallbackRegistry::new();

    let mut controller = FormController::new(
        provider.clone(),
        transport.clone(),
        registry.clone(),
        "neynar-client",
    );
    controller.start().await;

    Harness {
        controller,
        provider,
        transport,
        registry,
    }
}
