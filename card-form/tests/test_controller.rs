mod common;

use card_form::controller::{
    MSG_AGREE_FIRST, MSG_EMAIL_FAILED, MSG_EMAIL_VERIFIED, MSG_FARCASTER_VERIFIED,
    MSG_SUBMITTED, MSG_SUBMIT_FAILED, MSG_VERIFY_FIRST,
};
use card_form::{SignInData, VerificationState};
use common::{started, RecordingTransport, ScriptedProvider};
use shared::{CardType, ServiceError};

fn sign_in(fid: u64) -> SignInData {
    SignInData {
        fid,
        signer_uuid: None,
    }
}

#[tokio::test]
async fn test_start_mounts_widget_and_readies_provider() {
    let h = started(ScriptedProvider::default(), RecordingTransport::default()).await;

    assert!(h.controller.provider_ready());
    assert_eq!(h.controller.verify_button_label(), "Verify Email");
    assert_eq!(h.controller.social_widget().unwrap().generation, 1);
    assert_eq!(h.controller.social_widget().unwrap().client_id, "neynar-client");
    assert!(h.registry.has_handler());
}

#[tokio::test]
async fn test_provider_preload_failure_keeps_button_loading() {
    let provider = ScriptedProvider {
        preload_error: Some("network down".to_string()),
        ..Default::default()
    };
    let mut h = started(provider, RecordingTransport::default()).await;
    h.controller.form.email = "a@b.com".to_string();

    assert!(!h.controller.provider_ready());
    assert_eq!(h.controller.verify_button_label(), "Loading...");
    assert!(!h.controller.verify_button_enabled());

    h.controller.verify_email().await;
    assert_eq!(h.provider.login_count(), 0);
    assert_eq!(h.controller.state(), &VerificationState::Unverified);
}

#[tokio::test]
async fn test_email_verification_success() {
    let mut h = started(
        ScriptedProvider::with_outcomes(vec![Ok(())]),
        RecordingTransport::default(),
    )
    .await;
    h.controller.form.email = "a@b.com".to_string();

    h.controller.verify_email().await;

    assert_eq!(
        h.controller.state(),
        &VerificationState::VerifiedEmail("a@b.com".to_string())
    );
    assert_eq!(h.controller.notification(), Some(MSG_EMAIL_VERIFIED));
    assert!(h.controller.social_widget().is_none(), "Social widget hidden");
    assert!(!h.registry.has_handler());
}

#[tokio::test]
async fn test_pending_email_disables_duplicate_attempts() {
    let mut h = started(ScriptedProvider::default(), RecordingTransport::default()).await;
    h.controller.form.email = "a@b.com".to_string();

    let email = h.controller.begin_email_verification().unwrap();
    assert_eq!(email, "a@b.com");
    assert_eq!(h.controller.verify_button_label(), "Verifying...");
    assert!(!h.controller.verify_button_enabled());
    assert!(h.controller.begin_email_verification().is_none());
    assert!(!h.controller.machine().social_widget_visible());

    // A social sign-in racing the email flow is ignored.
    assert!(h.registry.dispatch(sign_in(12)));
    assert!(!h.controller.pump_social());
    assert!(h.controller.machine().is_pending());

    h.controller.finish_email_verification(Ok(()));
    assert!(h.controller.machine().is_verified());
}

#[tokio::test]
async fn test_email_failure_resets_and_keeps_card_fields() {
    let mut h = started(
        ScriptedProvider::with_outcomes(vec![Err(ServiceError::Provider("rejected".into()))]),
        RecordingTransport::default(),
    )
    .await;
    h.controller.form.email = "a@b.com".to_string();
    h.controller.form.select_card_type(CardType::Blame);
    h.controller.form.card_text = "My boss really hated your joke.".to_string();

    h.controller.verify_email().await;

    assert_eq!(h.controller.state(), &VerificationState::Unverified);
    assert_eq!(h.controller.notification(), Some(MSG_EMAIL_FAILED));
    assert_eq!(h.controller.form.card_type(), Some(CardType::Blame));
    assert_eq!(h.controller.form.card_text, "My boss really hated your joke.");
    assert!(h.controller.verify_button_enabled(), "User may retry");
    assert!(h.registry.has_handler(), "Social method still available");
}

#[tokio::test]
async fn test_social_sign_in_verifies_and_hides_email() {
    let mut h = started(ScriptedProvider::default(), RecordingTransport::default()).await;

    assert!(h.registry.dispatch_json(r#"{"fid": 4821}"#).unwrap());
    assert!(h.controller.pump_social());

    assert_eq!(
        h.controller.state(),
        &VerificationState::VerifiedFarcaster("4821".to_string())
    );
    assert_eq!(h.controller.notification(), Some(MSG_FARCASTER_VERIFIED));
    assert!(!h.controller.machine().email_panel_visible());
    assert!(!h.controller.verify_button_enabled());
    assert!(h.controller.social_widget().is_none());
}

#[tokio::test]
async fn test_logout_clears_identity_and_remounts_widget() {
    let mut h = started(ScriptedProvider::default(), RecordingTransport::default()).await;
    h.registry.dispatch(sign_in(7));
    h.controller.pump_social();

    h.controller.logout();

    assert_eq!(h.controller.state(), &VerificationState::Unverified);
    assert_eq!(h.controller.machine().identity(), None);
    assert_eq!(h.controller.social_widget().unwrap().generation, 2);

    h.registry.dispatch(sign_in(8));
    assert!(h.controller.pump_social(), "New handler is live after remount");
    assert_eq!(
        h.controller.state(),
        &VerificationState::VerifiedFarcaster("8".to_string())
    );
}

#[tokio::test]
async fn test_submit_requires_verification_then_terms() {
    let mut h = started(ScriptedProvider::default(), RecordingTransport::default()).await;
    h.controller.form.select_card_type(CardType::Annoy);
    h.controller.form.sub_type = "Duck".to_string();
    h.controller.form.card_text = "hi".to_string();

    h.controller.submit().await;
    assert_eq!(h.controller.notification(), Some(MSG_VERIFY_FIRST));

    h.registry.dispatch(sign_in(5));
    h.controller.pump_social();

    h.controller.submit().await;
    assert_eq!(h.controller.notification(), Some(MSG_AGREE_FIRST));
    assert!(!h.controller.submit_enabled());
    assert!(h.transport.sent().is_empty());
}

#[tokio::test]
async fn test_submit_lists_missing_fields() {
    let mut h = started(ScriptedProvider::default(), RecordingTransport::default()).await;
    h.registry.dispatch(sign_in(5));
    h.controller.pump_social();
    h.controller.form.agreed = true;
    h.controller.form.select_card_type(CardType::Flaw);

    h.controller.submit().await;

    assert_eq!(
        h.controller.notification(),
        Some("Please fill in these required fields: Flaw Type, Card Text, Flaw Name")
    );
    assert!(h.transport.sent().is_empty());
}

#[tokio::test]
async fn test_successful_submission_sends_exactly_one_identity() {
    let mut h = started(
        ScriptedProvider::with_outcomes(vec![Ok(())]),
        RecordingTransport::default(),
    )
    .await;
    h.controller.form.email = "a@b.com".to_string();
    h.controller.verify_email().await;

    h.controller.form.select_card_type(CardType::Flaw);
    h.controller.form.sub_type = "Odd".to_string();
    h.controller.form.flaw_name = "Pot Stirrer".to_string();
    h.controller.form.card_text = "I'd be pissed if I were you.".to_string();
    h.controller.form.agreed = true;

    h.controller.submit().await;

    assert!(h.controller.is_complete());
    assert!(!h.controller.is_submitting());
    assert_eq!(h.controller.notification(), Some(MSG_SUBMITTED));
    assert_eq!(h.controller.last_record().unwrap().id, "recTEST");

    let sent = h.transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].email.as_deref(), Some("a@b.com"));
    assert_eq!(sent[0].farcaster_fid, None);
    assert_eq!(sent[0].sub_type_personality.as_deref(), Some("Odd"));
    assert_eq!(sent[0].flaw_name.as_deref(), Some("Pot Stirrer"));
    assert_eq!(sent[0].sub_type_annoy, None);
}

#[tokio::test]
async fn test_in_flight_submission_blocks_second_submit() {
    let mut h = started(ScriptedProvider::default(), RecordingTransport::default()).await;
    h.registry.dispatch(sign_in(5));
    h.controller.pump_social();
    h.controller.form.select_card_type(CardType::Annoy);
    h.controller.form.sub_type = "Skip".to_string();
    h.controller.form.card_text = "hi".to_string();
    h.controller.form.agreed = true;

    let submission = h.controller.begin_submit().unwrap();
    assert_eq!(submission.to_fields().farcaster_fid.as_deref(), Some("5"));
    assert_eq!(h.controller.submit_button_label(), "Submitting...");
    assert!(!h.controller.submit_enabled());
    assert!(h.controller.begin_submit().is_none());

    h.controller
        .finish_submit(Err(ServiceError::Http("connection reset".to_string())));
    assert_eq!(h.controller.notification(), Some("HTTP error: connection reset"));
    assert!(h.controller.submit_enabled());
    assert!(!h.controller.is_complete());
}

#[tokio::test]
async fn test_server_rejection_message_is_shown() {
    let transport = RecordingTransport::failing(ServiceError::Store {
        status: Some(422),
        message: "Failed to submit card".to_string(),
        explanation: Some("Invalid value".to_string()),
    });
    let mut h = started(ScriptedProvider::default(), transport).await;
    h.registry.dispatch(sign_in(5));
    h.controller.pump_social();
    h.controller.form.select_card_type(CardType::Blame);
    h.controller.form.sub_type = "Arrogant".to_string();
    h.controller.form.card_text = "hi".to_string();
    h.controller.form.agreed = true;

    h.controller.submit().await;

    assert_eq!(h.controller.notification(), Some("Failed to submit card"));
    assert!(!h.controller.is_complete());
    assert_eq!(h.transport.sent().len(), 1);
}

#[tokio::test]
async fn test_blank_failure_message_falls_back_to_generic() {
    let transport = RecordingTransport::failing(ServiceError::Store {
        status: Some(500),
        message: String::new(),
        explanation: None,
    });
    let mut h = started(ScriptedProvider::default(), transport).await;
    h.registry.dispatch(sign_in(5));
    h.controller.pump_social();
    h.controller.form.select_card_type(CardType::Annoy);
    h.controller.form.sub_type = "Undo".to_string();
    h.controller.form.card_text = "hi".to_string();
    h.controller.form.agreed = true;

    h.controller.submit().await;

    assert_eq!(h.controller.notification(), Some(MSG_SUBMIT_FAILED));
    assert!(h.controller.submit_enabled());
}

#[tokio::test]
async fn test_submit_another_resets_everything() {
    let mut h = started(ScriptedProvider::default(), RecordingTransport::default()).await;
    h.registry.dispatch(sign_in(5));
    h.controller.pump_social();
    h.controller.form.select_card_type(CardType::Annoy);
    h.controller.form.sub_type = "Steal".to_string();
    h.controller.form.card_text = "hi".to_string();
    h.controller.form.agreed = true;
    h.controller.submit().await;
    assert!(h.controller.is_complete());

    h.controller.submit_another();

    assert!(!h.controller.is_complete());
    assert_eq!(h.controller.state(), &VerificationState::Unverified);
    assert_eq!(h.controller.form.card_type(), None);
    assert!(!h.controller.form.agreed);
    assert_eq!(h.controller.notification(), None);
    assert!(h.controller.last_record().is_none());
    assert_eq!(h.controller.social_widget().unwrap().generation, 2);
    assert!(h.registry.has_handler());
}
