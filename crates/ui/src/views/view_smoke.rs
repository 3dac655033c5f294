use exam_core::model::{FinalAnswer, FinalizedAnswers, QuestionId, SubmissionRecord};
use exam_core::time::fixed_now;
use storage::repository::{SubmissionRepository, UserRepository};

use super::test_harness::{GateSeed, ViewKind, ada, seeded_storage, setup_view_harness};

fn signed_in_as_ada() -> GateSeed {
    GateSeed {
        identity: Some(ada()),
        admin: false,
    }
}

fn admin() -> GateSeed {
    GateSeed {
        identity: None,
        admin: true,
    }
}

#[tokio::test(flavor = "current_thread")]
async fn login_view_smoke_renders_form() {
    let mut harness = setup_view_harness(ViewKind::Login, seeded_storage().await, GateSeed::default());
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("login-email"), "missing email field in {html}");
    assert!(html.contains("Start test"), "missing submit button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn test_view_smoke_renders_first_question() {
    let storage = seeded_storage().await;
    storage
        .users
        .record_login(&ada(), fixed_now())
        .await
        .expect("record login");
    let mut harness = setup_view_harness(ViewKind::Test, storage, signed_in_as_ada());

    harness.rebuild();
    let html = harness.render_until("Question 1 of 4").await;

    assert!(html.contains("Question 1 of 4"), "missing progress in {html}");
    assert!(html.contains("What does CPU stand for?"), "missing prompt in {html}");
    assert!(html.contains("Time left: 30:00"), "missing timer in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn test_view_smoke_blocks_unknown_participant() {
    let mut harness =
        setup_view_harness(ViewKind::Test, seeded_storage().await, signed_in_as_ada());

    harness.rebuild();
    let html = harness.render_until("could not be loaded").await;

    assert!(html.contains("could not be loaded"), "missing load error in {html}");
    assert!(html.contains("not logged in"), "missing reason in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn admin_dashboard_smoke_lists_users_and_submissions() {
    let storage = seeded_storage().await;
    storage
        .users
        .record_login(&ada(), fixed_now())
        .await
        .expect("record login");
    let answers: FinalizedAnswers = [
        (QuestionId::new(1), FinalAnswer::Selected("Central Processing Unit".into())),
        (QuestionId::new(2), FinalAnswer::Skipped),
    ]
    .into_iter()
    .collect();
    storage
        .submissions
        .append_submission(&SubmissionRecord::new(&ada(), answers, fixed_now()))
        .await
        .expect("append submission");

    let mut harness = setup_view_harness(ViewKind::AdminDashboard, storage, admin());

    harness.rebuild();
    let html = harness.render_until("Q2: (skipped)").await;

    assert!(html.contains("ada@example.com"), "missing user in {html}");
    assert!(
        html.contains("Q1: Central Processing Unit"),
        "missing answer line in {html}"
    );
    assert!(html.contains("Q2: (skipped)"), "missing skipped line in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn admin_dashboard_smoke_shows_empty_states() {
    let mut harness =
        setup_view_harness(ViewKind::AdminDashboard, seeded_storage().await, admin());

    harness.rebuild();
    let html = harness.render_until("No submissions yet.").await;

    assert!(html.contains("No users yet."), "missing users empty state in {html}");
    assert!(html.contains("No submissions yet."), "missing empty state in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn header_follows_sign_in_and_logout() {
    let mut harness =
        setup_view_harness(ViewKind::Login, seeded_storage().await, GateSeed::default());
    harness.rebuild();
    let html = harness.render();
    assert!(!html.contains("topbar-user"), "unexpected user in {html}");
    assert!(!html.contains("Log out"), "unexpected logout in {html}");

    harness.with_gate(|gate| gate.sign_in(ada()));
    let html = harness.render_until("Log out").await;
    assert!(html.contains("topbar-user"), "missing user in {html}");
    assert!(html.contains("Ada"), "missing name in {html}");
    assert!(html.contains("Log out"), "missing logout in {html}");

    harness.with_gate(|gate| gate.logout());
    for _ in 0..5 {
        harness.drive_async().await;
    }
    let html = harness.render();
    assert!(!html.contains("Log out"), "stale logout in {html}");
    assert!(!html.contains("topbar-user"), "stale user in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn header_switches_admin_link_with_grant() {
    let mut harness =
        setup_view_harness(ViewKind::Login, seeded_storage().await, GateSeed::default());
    harness.rebuild();
    assert!(!harness.render().contains("Dashboard"));

    harness.with_gate(|gate| gate.grant_admin());
    let html = harness.render_until("Dashboard").await;
    assert!(html.contains("Dashboard"), "missing dashboard link in {html}");

    harness.with_gate(|gate| gate.revoke_admin());
    for _ in 0..5 {
        harness.drive_async().await;
    }
    assert!(!harness.render().contains("Dashboard"));
}
