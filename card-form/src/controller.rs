//! Drives the card form: verification, submission and the screens around them.
//!
//! Long-running calls are split into a `begin_*` step that flips the state used to
//! disable duplicate triggers, and a `finish_*` step that applies the outcome. The
//! async `verify_email` and `submit` wrappers run both halves around the awaited call.

use std::sync::Arc;

use shared::{CardSubmission, ClientConfig, Result, ServiceError, StoredRecord};
use tokio::sync::mpsc;

use crate::client::{HttpSubmitClient, SubmissionTransport};
use crate::form::CardForm;
use crate::identity::IdentityProvider;
use crate::notification::Notifier;
use crate::social::{CallbackRegistry, SignInData, SocialWidget, WidgetMount};
use crate::verification::{VerificationMachine, VerificationState};

pub const MSG_EMAIL_VERIFIED: &str = "Email verified successfully!";
pub const MSG_EMAIL_FAILED: &str = "Error verifying email. Please try again.";
pub const MSG_FARCASTER_VERIFIED: &str = "Farcaster account verified successfully!";
pub const MSG_VERIFY_FIRST: &str = "Please verify your identity using either Email or Farcaster";
pub const MSG_AGREE_FIRST: &str = "Please agree to the terms before submitting";
pub const MSG_SUBMITTED: &str = "Card submitted successfully!";
pub const MSG_SUBMIT_FAILED: &str = "Error submitting form";

pub struct FormController {
    provider: Arc<dyn IdentityProvider>,
    transport: Arc<dyn SubmissionTransport>,
    widget: SocialWidget,
    sign_ins: Option<mpsc::UnboundedReceiver<SignInData>>,
    machine: VerificationMachine,
    notifier: Notifier,
    pub form: CardForm,
    provider_ready: bool,
    is_submitting: bool,
    is_complete: bool,
    last_record: Option<StoredRecord>,
}

impl FormController {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        transport: Arc<dyn SubmissionTransport>,
        registry: CallbackRegistry,
        social_client_id: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            transport,
            widget: SocialWidget::new(social_client_id, registry),
            sign_ins: None,
            machine: VerificationMachine::new(),
            notifier: Notifier::default(),
            form: CardForm::new(),
            provider_ready: false,
            is_submitting: false,
            is_complete: false,
            last_record: None,
        }
    }

    /// Wires the form to the submit endpoint and widget client id from `config`.
    pub fn from_config(
        config: &ClientConfig,
        provider: Arc<dyn IdentityProvider>,
        registry: CallbackRegistry,
    ) -> Result<Self> {
        let transport = HttpSubmitClient::new(config.submit_url.clone())?;
        Ok(Self::new(
            provider,
            Arc::new(transport),
            registry,
            config.identity.neynar_client_id.clone(),
        ))
    }

    /// Preloads the email provider and mounts the sign-in widget.
    pub async fn start(&mut self) {
        match self.provider.preload().await {
            Ok(()) => {
                tracing::info!("Identity provider ready");
                self.provider_ready = true;
            }
            Err(e) => {
                tracing::error!(error = %e, "Identity provider failed to load");
            }
        }

        self.mount_social_widget();
    }

    fn mount_social_widget(&mut self) {
        let (tx, rx) = mpsc::unbounded_channel();
        self.widget.mount(move |data| {
            if tx.send(data).is_err() {
                tracing::debug!("Sign-in arrived after the form stopped listening");
            }
        });
        self.sign_ins = Some(rx);
    }

    fn hide_social_widget(&mut self) {
        self.widget.teardown();
        self.sign_ins = None;
    }

    pub fn state(&self) -> &VerificationState {
        self.machine.state()
    }

    pub fn machine(&self) -> &VerificationMachine {
        &self.machine
    }

    pub fn social_widget(&self) -> Option<&WidgetMount> {
        self.widget.current()
    }

    pub fn notification(&self) -> Option<&str> {
        self.notifier.visible()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn dismiss_notification(&mut self) {
        self.notifier.dismiss();
    }

    pub fn provider_ready(&self) -> bool {
        self.provider_ready
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    pub fn last_record(&self) -> Option<&StoredRecord> {
        self.last_record.as_ref()
    }

    pub fn verify_button_enabled(&self) -> bool {
        self.machine
            .verify_button_enabled(&self.form.email, self.provider_ready)
    }

    pub fn verify_button_label(&self) -> &'static str {
        if self.machine.is_pending() {
            "Verifying..."
        } else if !self.provider_ready {
            "Loading..."
        } else {
            "Verify Email"
        }
    }

    pub fn submit_enabled(&self) -> bool {
        !self.is_submitting && self.form.agreed
    }

    pub fn submit_button_label(&self) -> &'static str {
        if self.is_submitting {
            "Submitting..."
        } else {
            "Submit Card"
        }
    }

    /// Moves to pending email verification. Returns the address to send the link to.
    pub fn begin_email_verification(&mut self) -> Option<String> {
        if !self.verify_button_enabled() {
            return None;
        }

        let email = self.form.email.trim().to_string();
        match self.machine.start_email(&email) {
            Ok(_) => {
                tracing::info!(email = %email, "Starting email verification");
                Some(email)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Email verification not started");
                self.notifier.show(MSG_EMAIL_FAILED);
                None
            }
        }
    }

    pub fn finish_email_verification(&mut self, outcome: Result<()>) {
        match outcome {
            Ok(()) => {
                if self.machine.email_confirmed().is_ok() {
                    self.hide_social_widget();
                    self.notifier.show(MSG_EMAIL_VERIFIED);
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Email verification failed");
                if self.machine.email_failed().is_ok() {
                    self.notifier.show(MSG_EMAIL_FAILED);
                }
            }
        }
    }

    pub async fn verify_email(&mut self) {
        let Some(email) = self.begin_email_verification() else {
            return;
        };

        let outcome = self.provider.login_with_email_link(&email).await;
        self.finish_email_verification(outcome);
    }

    /// Applies sign-ins delivered to the live widget handler. Returns true once verified.
    pub fn pump_social(&mut self) -> bool {
        let mut received = Vec::new();
        if let Some(rx) = self.sign_ins.as_mut() {
            while let Ok(data) = rx.try_recv() {
                received.push(data);
            }
        }

        for data in received {
            let fid = data.fid.to_string();
            match self.machine.social_confirmed(&fid) {
                Ok(_) => {
                    tracing::info!(fid = %fid, "Farcaster sign-in verified");
                    self.hide_social_widget();
                    self.notifier.show(MSG_FARCASTER_VERIFIED);
                    break;
                }
                Err(e) => {
                    tracing::warn!(fid = %fid, error = %e, "Ignoring Farcaster sign-in");
                }
            }
        }

        matches!(self.machine.state(), VerificationState::VerifiedFarcaster(_))
    }

    /// Drops the held identity and offers both methods again. Card inputs are kept.
    pub fn logout(&mut self) {
        tracing::info!(from = self.machine.state().name(), "Logging out");
        self.machine.logout();
        self.mount_social_widget();
    }

    /// Runs the pre-submit checks and marks the form as submitting.
    pub fn begin_submit(&mut self) -> Option<CardSubmission> {
        if self.is_submitting {
            return None;
        }

        let Some(identity) = self.machine.identity() else {
            self.notifier.show(MSG_VERIFY_FIRST);
            return None;
        };

        if !self.form.agreed {
            self.notifier.show(MSG_AGREE_FIRST);
            return None;
        }

        match self.form.assemble(identity) {
            Ok(submission) => {
                self.is_submitting = true;
                Some(submission)
            }
            Err(ServiceError::Validation(message)) => {
                self.notifier.show(message);
                None
            }
            Err(e) => {
                self.notifier.show(e.to_string());
                None
            }
        }
    }

    pub fn finish_submit(&mut self, outcome: Result<StoredRecord>) {
        self.is_submitting = false;

        match outcome {
            Ok(record) => {
                tracing::info!(record_id = %record.id, "Card submitted");
                self.notifier.show(MSG_SUBMITTED);
                self.last_record = Some(record);
                self.is_complete = true;
            }
            Err(e) => {
                tracing::error!(error = %e, "Submission failed");
                let message = match e {
                    ServiceError::Store { message, .. } => message,
                    other => other.to_string(),
                };
                if message.trim().is_empty() {
                    self.notifier.show(MSG_SUBMIT_FAILED);
                } else {
                    self.notifier.show(message);
                }
            }
        }
    }

    pub async fn submit(&mut self) {
        let Some(submission) = self.begin_submit() else {
            return;
        };

        let outcome = self.transport.submit(&submission).await;
        self.finish_submit(outcome);
    }

    /// Clears the form, verification and notification state for a fresh card.
    pub fn submit_another(&mut self) {
        self.form.reset();
        self.machine.logout();
        self.is_submitting = false;
        self.is_complete = false;
        self.last_record = None;
        self.notifier.dismiss();
        self.mount_social_widget();
    }
}
