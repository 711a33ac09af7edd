//! Login, route gating and logout across a whole console.

#![allow(clippy::unwrap_used)]

use httpmock::prelude::*;
use secrecy::SecretString;
use serde_json::json;

use catalog_admin::api::LoginRole;
use catalog_admin::forms::LoginForm;
use catalog_admin::routing::{LANDING_ROUTE, LOGIN_ROUTE, Screen};
use catalog_admin::screens::{LoginResult, LoginScreen};
use catalog_admin::session::{ADMIN_ID_KEY, AuthState, SessionStore};
use catalog_admin::ConsoleError;
use catalog_admin_integration_tests::TestBackend;

fn form(email: &str, password: &str) -> LoginForm {
    LoginForm::new(email, SecretString::from(password.to_string()))
}

#[tokio::test]
async fn test_login_stores_marker_and_lands_on_dashboard() {
    let backend = TestBackend::start().await;
    let login = backend.server.mock(|when, then| {
        when.method(POST).path("/admin_log_in");
        then.status(200)
            .json_body(json!({"message": "Login successful", "adminid": 42}));
    });
    let console = backend.console().unwrap();
    let mut navigator = console.navigator::<()>();

    let before = navigator.navigate("/home/products-all", None);
    assert_eq!(before.route.screen, Screen::LogIn);
    assert!(before.redirected);

    let result = LoginScreen::new(console.clone(), LoginRole::Admin)
        .submit(&form("admin@x.com", "secret1"))
        .await
        .unwrap();
    let LoginResult::SignedIn { admin_id, landing } = result else {
        panic!("expected sign-in, got {result:?}");
    };
    assert_eq!(admin_id.as_str(), "42");
    assert_eq!(landing, LANDING_ROUTE);
    login.assert();

    let after = navigator.navigate(landing, None);
    assert_eq!(after.route.screen, Screen::Dashboard);
    assert!(!after.redirected);
    assert_eq!(console.admin_id().unwrap().as_str(), "42");
}

#[tokio::test]
async fn test_unconfirmed_email_is_refused() {
    let backend = TestBackend::start().await;
    backend.server.mock(|when, then| {
        when.method(POST).path("/admin_log_in");
        then.status(200)
            .json_body(json!({"message": "Please confirm the email"}));
    });
    let console = backend.console().unwrap();

    let result = LoginScreen::new(console.clone(), LoginRole::Admin)
        .submit(&form("admin@x.com", "secret1"))
        .await
        .unwrap();

    assert!(matches!(result, LoginResult::Refused(_)));
    assert_eq!(console.gate().state(), AuthState::Unauthenticated);
    assert!(matches!(
        console.enter("/home/users"),
        Err(ConsoleError::Unauthenticated)
    ));
}

#[tokio::test]
async fn test_invalid_form_never_reaches_backend() {
    let backend = TestBackend::start().await;
    let login = backend.server.mock(|when, then| {
        when.method(POST).path("/admin_log_in");
        then.status(200)
            .json_body(json!({"message": "Login successful", "adminid": 1}));
    });
    let screen = LoginScreen::new(backend.console().unwrap(), LoginRole::Admin);

    let bad_email = screen.submit(&form("not-an-email", "secret1")).await;
    let short_password = screen.submit(&form("admin@x.com", "12345")).await;

    assert!(matches!(bad_email, Err(ConsoleError::Validation(_))));
    assert!(matches!(short_password, Err(ConsoleError::Validation(_))));
    login.assert_hits(0);
}

#[tokio::test]
async fn test_server_error_keeps_login_screen() {
    let backend = TestBackend::start().await;
    backend.server.mock(|when, then| {
        when.method(POST).path("/admin_log_in");
        then.status(500).body("boom");
    });
    let console = backend.console().unwrap();

    let result = LoginScreen::new(console.clone(), LoginRole::Admin)
        .submit(&form("admin@x.com", "secret1"))
        .await;

    let err = result.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(err.user_message(), "Server error. Please try again.");
    assert!(console.admin_id().is_err());
}

#[tokio::test]
async fn test_logout_clears_session_and_gates_again() {
    let backend = TestBackend::start().await;
    let console = backend.signed_in("7").unwrap();
    assert!(console.enter("/home/reviews-all").is_ok());

    let next = console.logout().unwrap();

    assert_eq!(next, LOGIN_ROUTE);
    assert!(console.admin_id().is_err());
    assert!(matches!(
        console.enter("/home/reviews-all"),
        Err(ConsoleError::Unauthenticated)
    ));
    assert!(console.enter(LOGIN_ROUTE).is_ok());
}

#[tokio::test]
async fn test_marker_survives_a_restart_in_a_session_file() {
    let backend = TestBackend::start().await;
    backend.server.mock(|when, then| {
        when.method(POST).path("/admin_log_in");
        then.status(200)
            .json_body(json!({"message": "Login successful", "adminid": "a-9"}));
    });
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let first = backend.console_with_file(&path).unwrap();
    LoginScreen::new(first, LoginRole::Admin)
        .submit(&form("admin@x.com", "secret1"))
        .await
        .unwrap();

    let second = backend.console_with_file(&path).unwrap();
    assert_eq!(second.admin_id().unwrap().as_str(), "a-9");
    assert!(second.enter("/home/category").is_ok());

    second.logout().unwrap();
    let third = backend.console_with_file(&path).unwrap();
    assert!(third.admin_id().is_err());
}

#[tokio::test]
async fn test_unknown_paths_fall_through() {
    let backend = TestBackend::start().await;
    let console = backend.signed_in("1").unwrap();
    let mut navigator = console.navigator::<()>();

    let unknown = navigator.navigate("/home/nowhere", None);
    assert_eq!(unknown.route.screen, Screen::PageNotFound);

    let home = navigator.navigate("/home", None);
    assert_eq!(home.route.screen, Screen::Dashboard);

    assert!(matches!(
        console.enter("/completely/unknown"),
        Err(ConsoleError::NotAllowed(_))
    ));
}

#[test]
fn test_marker_key_matches_storage() {
    let store = catalog_admin::session::MemorySessionStore::new();
    store.set(ADMIN_ID_KEY, "3").unwrap();
    assert_eq!(store.get("adminid").unwrap().as_deref(), Some("3"));
}
