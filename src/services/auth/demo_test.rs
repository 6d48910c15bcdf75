use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

fn signed_in() -> Credentials {
    Credentials { demo_signed_in: true, ..Credentials::default() }
}

// =============================================================================
// Email sign-in policy
// =============================================================================

#[tokio::test]
async fn reserved_email_signs_in_with_any_password() {
    let reply = DemoAuth.sign_in_with_email(DEMO_EMAIL, "x").await;
    assert!(reply.response.is_ok());
    assert_eq!(reply.session, SessionUpdate::SignInDemo);
    assert_eq!(reply.response.data.unwrap().user.email, DEMO_EMAIL);
}

#[tokio::test]
async fn other_email_needs_six_chars() {
    let ok = DemoAuth.sign_in_with_email("someone@example.com", "hunter2").await;
    assert!(ok.response.is_ok());
    // Identity is the demo record with the supplied email.
    let user = ok.response.data.unwrap().user;
    assert_eq!(user.email, "someone@example.com");
    assert_eq!(user.id, "demo-user-id");

    let short = DemoAuth.sign_in_with_email("someone@example.com", "12345").await;
    assert!(!short.response.is_ok());
    assert_eq!(short.session, SessionUpdate::None);
    assert_eq!(short.response.error.unwrap().message, SIGNIN_HINT);
}

#[tokio::test]
async fn six_char_boundary_is_inclusive() {
    let reply = DemoAuth.sign_in_with_email("a@b.c", "123456").await;
    assert!(reply.response.is_ok());
}

// =============================================================================
// Sign-up policy
// =============================================================================

#[tokio::test]
async fn sign_up_enforces_password_length_only() {
    let ok = DemoAuth.sign_up_with_email("new@example.com", "longenough", "http://localhost:3000").await;
    assert!(ok.response.is_ok());
    assert_eq!(ok.session, SessionUpdate::SignInDemo);

    let short = DemoAuth.sign_up_with_email("new@example.com", "short", "http://localhost:3000").await;
    assert!(!short.response.is_ok());
    assert_eq!(short.response.error.unwrap().message, SIGNUP_HINT);
}

// =============================================================================
// Reset, sign-out, current user
// =============================================================================

#[tokio::test]
async fn reset_always_succeeds() {
    let reply = DemoAuth.reset_password("anything@example.com", "http://localhost:3000").await;
    assert!(reply.response.is_ok());
    assert_eq!(reply.session, SessionUpdate::None);
}

#[tokio::test]
async fn sign_out_clears_the_flag() {
    let reply = DemoAuth.sign_out(&signed_in()).await;
    assert!(reply.response.is_ok());
    assert_eq!(reply.session, SessionUpdate::SignOutDemo);
}

#[tokio::test]
async fn current_user_tracks_the_flag() {
    assert_eq!(DemoAuth.current_user(&signed_in()).await, Some(demo_user()));
    assert_eq!(DemoAuth.current_user(&Credentials::default()).await, None);
}

#[tokio::test]
async fn oauth_sign_in_sets_flag_and_points_at_dashboard() {
    let reply = DemoAuth.sign_in_with_oauth("google", "http://localhost:3000").await;
    assert_eq!(reply.session, SessionUpdate::SignInDemo);
    let payload = reply.response.data.unwrap();
    assert_eq!(payload.provider, "google");
    assert_eq!(payload.url, "/dashboard");
}

// =============================================================================
// Auth-state subscription
// =============================================================================

#[tokio::test]
async fn subscription_fires_exactly_once_with_demo_identity() {
    let fired = Arc::new(AtomicUsize::new(0));
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    let fired_in_cb = fired.clone();
    let sub = DemoAuth.on_auth_state_change(
        &Credentials::default(),
        Box::new(move |event, user| {
            fired_in_cb.fetch_add(1, Ordering::SeqCst);
            let _ = tx.send((event, user));
        }),
    );

    let (event, user) = tokio::time::timeout(std::time::Duration::from_secs(1), rx.recv())
        .await
        .expect("event should arrive")
        .expect("channel open");
    assert_eq!(event, AuthEvent::SignedIn);
    assert_eq!(user, Some(demo_user()));

    // No second event within a generous window.
    tokio::time::sleep(std::time::Duration::from_millis(300)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    sub.unsubscribe();
}
