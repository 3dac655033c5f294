use dioxus::prelude::*;
use dioxus_router::use_navigator;

use crate::context::{AppContext, use_session_gate};
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{SubmissionRowVm, UserRowVm, map_submission_rows, map_user_rows};

#[component]
pub fn AdminDashboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let gate = use_session_gate();
    let allowed = gate.is_admin();

    use_effect(move || {
        if !gate.is_admin() {
            navigator.replace(Route::AdminLogin {});
        }
    });

    let users_resource = {
        let admin = ctx.admin();
        use_resource(move || {
            let admin = admin.clone();
            let allowed = gate.is_admin();
            async move {
                if !allowed {
                    return Err(ViewError::Unknown);
                }
                let users = admin.list_users().await.map_err(|err| {
                    tracing::warn!(error = %err, "failed to list users");
                    ViewError::Unknown
                })?;
                Ok(map_user_rows(&users))
            }
        })
    };
    let submissions_resource = {
        let admin = ctx.admin();
        use_resource(move || {
            let admin = admin.clone();
            let allowed = gate.is_admin();
            async move {
                if !allowed {
                    return Err(ViewError::Unknown);
                }
                let submissions = admin.list_submissions().await.map_err(|err| {
                    tracing::warn!(error = %err, "failed to list submissions");
                    ViewError::Unknown
                })?;
                Ok(map_submission_rows(&submissions))
            }
        })
    };

    if !allowed {
        return rsx! { p { "Redirecting..." } };
    }

    let users = view_state_from_resource(&users_resource);
    let submissions = view_state_from_resource(&submissions_resource);
    let error_message = ViewError::message();

    rsx! {
        div { class: "page dashboard",
            div { class: "dashboard-header",
                h2 { "Admin Dashboard" }
                button {
                    r#type: "button",
                    class: "link-button",
                    onclick: move |_| {
                        gate.revoke_admin();
                        navigator.push(Route::AdminLogin {});
                    },
                    "Leave dashboard"
                }
            }

            section {
                h3 { "Users" }
                match users {
                    ViewState::Idle | ViewState::Loading => rsx! { p { "Loading users..." } },
                    ViewState::Error(_) => rsx! { p { class: "error", "{error_message}" } },
                    ViewState::Ready(rows) if rows.is_empty() => rsx! { p { "No users yet." } },
                    ViewState::Ready(rows) => rsx! { UsersTable { rows } },
                }
            }

            section {
                h3 { "Submissions" }
                match submissions {
                    ViewState::Idle | ViewState::Loading => rsx! { p { "Loading submissions..." } },
                    ViewState::Error(_) => rsx! { p { class: "error", "{error_message}" } },
                    ViewState::Ready(rows) if rows.is_empty() => rsx! { p { "No submissions yet." } },
                    ViewState::Ready(rows) => rsx! { SubmissionsTable { rows } },
                }
            }
        }
    }
}

#[component]
fn UsersTable(rows: Vec<UserRowVm>) -> Element {
    rsx! {
        table {
            thead {
                tr {
                    th { "Name" }
                    th { "Email" }
                    th { "Last login" }
                }
            }
            tbody {
                for row in rows {
                    tr { key: "{row.email}",
                        td { "{row.name}" }
                        td { "{row.email}" }
                        td { "{row.last_login_str}" }
                    }
                }
            }
        }
    }
}

#[component]
fn SubmissionsTable(rows: Vec<SubmissionRowVm>) -> Element {
    rsx! {
        table {
            thead {
                tr {
                    th { "Name" }
                    th { "Email" }
                    th { "Submitted" }
                    th { "Answers" }
                }
            }
            tbody {
                for row in rows {
                    tr { key: "{row.key}",
                        td { "{row.name}" }
                        td { "{row.email}" }
                        td { "{row.submitted_at_str}" }
                        td {
                            ul { class: "answers",
                                for line in row.answer_lines {
                                    li { "{line}" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
