use dioxus::prelude::*;
use dioxus_router::use_navigator;

use crate::context::{AppContext, use_session_gate};
use crate::routes::Route;

#[component]
pub fn AdminLoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let gate = use_session_gate();
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| false);

    let on_submit = use_callback(move |()| {
        let input = password.read().clone();
        match ctx.admin().verify_password(&input) {
            Ok(_grant) => {
                gate.grant_admin();
                error.set(false);
                password.set(String::new());
                navigator.push(Route::AdminDashboard {});
            }
            Err(_) => error.set(true),
        }
    });

    rsx! {
        div { class: "page login-page",
            h2 { "Admin" }
            form {
                class: "stack",
                onsubmit: move |evt: FormEvent| {
                    evt.prevent_default();
                    on_submit.call(());
                },
                label { "Password"
                    input {
                        id: "admin-password",
                        r#type: "password",
                        value: "{password}",
                        oninput: move |evt| password.set(evt.value()),
                    }
                }
                if error() {
                    p { class: "error", "Incorrect password." }
                }
                button { r#type: "submit", "Enter dashboard" }
            }
        }
    }
}
