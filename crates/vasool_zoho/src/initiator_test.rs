// --- File: crates/vasool_zoho/src/initiator_test.rs ---
use std::sync::Arc;
use tokio::sync::Notify;
use vasool_common::models::{DemoConnectionResult, IntegrationKind, OAuthClientCredentials};
use vasool_common::MockNavigator;

use crate::error::ZohoError;
use crate::initiator::{ConnectOutcome, ConnectPhase};
use crate::test_support::{config_missing, state_with, FakeService, AUTH_URL};

fn no_navigation() -> MockNavigator {
    let mut navigator = MockNavigator::new();
    navigator.expect_redirect_top_level().never();
    navigator.expect_schedule_redirect().never();
    navigator
}

#[tokio::test]
async fn test_connect_redirects_top_level_to_exact_url() {
    let fake = Arc::new(FakeService::new());
    let (state, _) = state_with(fake.clone(), Some("tok-1"));

    let mut navigator = MockNavigator::new();
    navigator
        .expect_redirect_top_level()
        .withf(|url| url == AUTH_URL)
        .times(1)
        .return_const(());
    navigator.expect_schedule_redirect().never();

    let outcome = state
        .initiator
        .connect(IntegrationKind::ZohoBooks, None, &navigator)
        .await
        .expect("connect should succeed");

    assert_eq!(
        outcome,
        ConnectOutcome::Redirected {
            auth_url: AUTH_URL.to_string()
        }
    );
    assert_eq!(fake.calls(), vec!["auth_url"]);
    assert_eq!(fake.tokens(), vec!["tok-1"]);
    assert_eq!(state.initiator.phase(), ConnectPhase::Idle);
}

#[tokio::test]
async fn test_unavailable_kind_is_rejected_locally() {
    let fake = Arc::new(FakeService::new());
    let (state, _) = state_with(fake.clone(), Some("tok-1"));

    let err = state
        .initiator
        .connect(IntegrationKind::QuickBooks, None, &no_navigation())
        .await
        .unwrap_err();

    assert!(matches!(err, ZohoError::NotAvailable(IntegrationKind::QuickBooks)));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_connect_without_session_is_not_entered() {
    let fake = Arc::new(FakeService::new());
    let (state, _) = state_with(fake.clone(), None);

    let err = state
        .initiator
        .connect(IntegrationKind::ZohoBooks, None, &no_navigation())
        .await
        .unwrap_err();

    assert!(err.is_auth());
    assert!(fake.calls().is_empty());
    assert_eq!(state.initiator.phase(), ConnectPhase::Idle);
}

#[tokio::test]
async fn test_config_missing_offers_choice_once_without_redirect() {
    let fake = Arc::new(FakeService::new().auth_url_reply(|| Err(config_missing())));
    let (state, _) = state_with(fake.clone(), Some("tok-1"));

    let outcome = state
        .initiator
        .connect(IntegrationKind::ZohoBooks, None, &no_navigation())
        .await
        .expect("config missing is not an error");

    assert!(matches!(
        outcome,
        ConnectOutcome::ConfigChoiceRequired { detail: Some(ref d) } if d.contains("not configured")
    ));
    assert!(matches!(
        state.initiator.phase(),
        ConnectPhase::AwaitingConfigChoice { .. }
    ));
    assert_eq!(fake.count("auth_url"), 1);
}

#[tokio::test]
async fn test_demo_connect_state_comes_from_status_round_trip() {
    let fake = Arc::new(FakeService::new().auth_url_reply(|| Err(config_missing())));
    let (state, _) = state_with(fake.clone(), Some("tok-1"));

    state
        .initiator
        .connect(IntegrationKind::ZohoBooks, None, &no_navigation())
        .await
        .unwrap();
    let connection = state.initiator.choose_demo().await.expect("demo connect");

    assert!(connection.connected);
    assert_eq!(connection.account_label.as_deref(), Some("books@acme.in"));
    assert_eq!(fake.calls(), vec!["auth_url", "demo_connect", "status"]);
    assert_eq!(state.initiator.phase(), ConnectPhase::Idle);
    assert_eq!(state.status.current(), Some(connection));
}

#[tokio::test]
async fn test_rejected_demo_leaves_state_and_returns_to_idle() {
    let fake = Arc::new(
        FakeService::new()
            .auth_url_reply(|| Err(config_missing()))
            .demo_reply(|| Ok(DemoConnectionResult { success: false })),
    );
    let (state, _) = state_with(fake.clone(), Some("tok-1"));

    state
        .initiator
        .connect(IntegrationKind::ZohoBooks, None, &no_navigation())
        .await
        .unwrap();
    let err = state.initiator.choose_demo().await.unwrap_err();

    assert!(matches!(err, ZohoError::Backend { .. }));
    assert_eq!(fake.count("status"), 0);
    assert_eq!(state.initiator.phase(), ConnectPhase::Idle);
}

#[tokio::test]
async fn test_demo_requires_pending_choice() {
    let fake = Arc::new(FakeService::new());
    let (state, _) = state_with(fake.clone(), Some("tok-1"));

    let err = state.initiator.choose_demo().await.unwrap_err();

    assert!(matches!(err, ZohoError::InvalidState("idle")));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_abandon_returns_to_idle() {
    let fake = Arc::new(FakeService::new().auth_url_reply(|| Err(config_missing())));
    let (state, _) = state_with(fake.clone(), Some("tok-1"));

    state
        .initiator
        .connect(IntegrationKind::ZohoBooks, None, &no_navigation())
        .await
        .unwrap();
    state.initiator.abandon().expect("abandon");

    assert_eq!(state.initiator.phase(), ConnectPhase::Idle);
    assert!(matches!(
        state.initiator.abandon(),
        Err(ZohoError::InvalidState("idle"))
    ));
    assert_eq!(fake.count("demo_connect"), 0);
}

#[tokio::test]
async fn test_backend_failure_surfaces_detail_and_returns_to_idle() {
    let fake = Arc::new(FakeService::new().auth_url_reply(|| {
        Err(ZohoError::Backend {
            status: 500,
            detail: Some("Zoho is down".to_string()),
        })
    }));
    let (state, _) = state_with(fake.clone(), Some("tok-1"));

    let err = state
        .initiator
        .connect(IntegrationKind::ZohoBooks, None, &no_navigation())
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Zoho is down");
    assert_eq!(state.initiator.phase(), ConnectPhase::Idle);
    assert_eq!(state.status.current(), None);
}

#[tokio::test]
async fn test_double_connect_issues_one_request() {
    let gate = Arc::new(Notify::new());
    let fake = Arc::new(FakeService::new().gated(gate.clone()));
    let (state, _) = state_with(fake.clone(), Some("tok-1"));

    let initiator = state.initiator.clone();
    let first = tokio::spawn(async move {
        let mut navigator = MockNavigator::new();
        navigator
            .expect_redirect_top_level()
            .times(1)
            .return_const(());
        initiator
            .connect(IntegrationKind::ZohoBooks, None, &navigator)
            .await
    });

    while state.initiator.phase() != ConnectPhase::Requesting {
        tokio::task::yield_now().await;
    }
    let second = state
        .initiator
        .connect(IntegrationKind::ZohoBooks, None, &no_navigation())
        .await;
    gate.notify_one();
    let first = first.await.expect("first connect task");

    assert!(matches!(first, Ok(ConnectOutcome::Redirected { .. })));
    assert!(matches!(second, Err(ZohoError::InProgress)));
    assert_eq!(fake.count("auth_url"), 1);
    assert_eq!(state.initiator.phase(), ConnectPhase::Idle);
}

#[tokio::test]
async fn test_own_oauth_app_is_validated_then_submitted() {
    let fake = Arc::new(FakeService::new());
    let (state, _) = state_with(fake.clone(), Some("tok-1"));

    let blank = OAuthClientCredentials {
        client_id: "1000.ABC".to_string(),
        client_secret: " ".to_string(),
        organization_id: None,
    };
    let err = state
        .initiator
        .connect(IntegrationKind::ZohoBooks, Some(blank), &no_navigation())
        .await
        .unwrap_err();
    assert!(
        matches!(err, ZohoError::Validation(ref m) if m == "Please enter both Client ID and Client Secret")
    );
    assert!(fake.calls().is_empty());

    let mut navigator = MockNavigator::new();
    navigator
        .expect_redirect_top_level()
        .times(1)
        .return_const(());
    let credentials = OAuthClientCredentials {
        client_id: " 1000.ABC ".to_string(),
        client_secret: "s3cret".to_string(),
        organization_id: Some("60001".to_string()),
    };
    state
        .initiator
        .connect(IntegrationKind::ZohoBooks, Some(credentials), &navigator)
        .await
        .expect("own app connect");

    assert_eq!(fake.calls(), vec!["user_oauth_setup"]);
    let submitted = fake.submitted_credentials().expect("credentials sent");
    assert_eq!(submitted.client_id, "1000.ABC");
    assert_eq!(submitted.organization_id.as_deref(), Some("60001"));
}

#[tokio::test]
async fn test_disconnect_refreshes_status() {
    let fake = Arc::new(FakeService::new().connected());
    let (state, _) = state_with(fake.clone(), Some("tok-1"));

    let connection = state.initiator.disconnect().await.expect("disconnect");

    assert!(!connection.connected);
    assert_eq!(fake.calls(), vec!["disconnect", "status"]);
}

#[tokio::test]
async fn test_pending_choice_does_not_survive_sign_out() {
    let fake = Arc::new(FakeService::new().auth_url_reply(|| Err(config_missing())));
    let (state, session) = state_with(fake.clone(), Some("tok-alice"));

    state
        .initiator
        .connect(IntegrationKind::ZohoBooks, None, &no_navigation())
        .await
        .unwrap();
    assert!(matches!(
        state.initiator.phase(),
        ConnectPhase::AwaitingConfigChoice { .. }
    ));

    // Same path the auth collaborator takes on a rejected token: no hooks run
    session.sign_out().unwrap();
    session.sign_in("tok-bob").unwrap();

    assert_eq!(state.initiator.phase(), ConnectPhase::Idle);
    let err = state.initiator.choose_demo().await.unwrap_err();
    assert!(matches!(err, ZohoError::InvalidState("idle")));
    assert!(matches!(
        state.initiator.abandon(),
        Err(ZohoError::InvalidState("idle"))
    ));
    assert_eq!(fake.calls(), vec!["auth_url"]);
    assert_eq!(fake.tokens(), vec!["tok-alice"]);
}

#[tokio::test]
async fn test_new_session_gets_its_own_config_choice() {
    let fake = Arc::new(FakeService::new().auth_url_reply(|| Err(config_missing())));
    let (state, session) = state_with(fake.clone(), Some("tok-alice"));

    state
        .initiator
        .connect(IntegrationKind::ZohoBooks, None, &no_navigation())
        .await
        .unwrap();
    session.sign_out().unwrap();
    session.sign_in("tok-bob").unwrap();

    state
        .initiator
        .connect(IntegrationKind::ZohoBooks, None, &no_navigation())
        .await
        .unwrap();
    state.initiator.choose_demo().await.expect("demo for bob");

    assert_eq!(
        fake.tokens(),
        vec!["tok-alice", "tok-bob", "tok-bob", "tok-bob"]
    );
}

#[tokio::test]
async fn test_reset_drops_pending_choice() {
    let fake = Arc::new(FakeService::new().auth_url_reply(|| Err(config_missing())));
    let (state, _) = state_with(fake.clone(), Some("tok-1"));

    state
        .initiator
        .connect(IntegrationKind::ZohoBooks, None, &no_navigation())
        .await
        .unwrap();
    state.initiator.reset();

    assert_eq!(state.initiator.phase(), ConnectPhase::Idle);
    assert!(matches!(
        state.initiator.choose_demo().await,
        Err(ZohoError::InvalidState("idle"))
    ));
}

#[tokio::test]
async fn test_rejected_own_app_is_a_backend_error_not_a_config_choice() {
    let fake = Arc::new(FakeService::new().user_setup_reply(|| {
        Err(ZohoError::Backend {
            status: 400,
            detail: Some("Invalid client_id".to_string()),
        })
    }));
    let (state, _) = state_with(fake.clone(), Some("tok-1"));

    let credentials = OAuthClientCredentials {
        client_id: "1000.BAD".to_string(),
        client_secret: "s3cret".to_string(),
        organization_id: None,
    };
    let err = state
        .initiator
        .connect(IntegrationKind::ZohoBooks, Some(credentials), &no_navigation())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ZohoError::Backend { status: 400, detail: Some(ref d) } if d == "Invalid client_id"
    ));
    assert_eq!(err.user_message(), "Invalid client_id");
    assert_eq!(state.initiator.phase(), ConnectPhase::Idle);
    assert_eq!(fake.calls(), vec!["user_oauth_setup"]);
}
