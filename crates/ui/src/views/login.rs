use dioxus::prelude::*;
use dioxus_router::use_navigator;

use services::LoginError;

use crate::context::{AppContext, use_session_gate};
use crate::routes::Route;

fn login_error_message(err: &LoginError) -> &'static str {
    match err {
        LoginError::MissingField => "Name and email are required.",
        LoginError::InvalidEmail(_) => "Please enter a valid email address.",
        _ => "Login failed. Please try again.",
    }
}

#[component]
pub fn LoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let gate = use_session_gate();
    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut error = use_signal(|| None::<&'static str>);
    let mut busy = use_signal(|| false);

    let on_submit = {
        let ctx = ctx.clone();
        use_callback(move |()| {
            if busy() {
                return;
            }
            let login = ctx.login();
            let (name_input, email_input) = (name.read().clone(), email.read().clone());
            spawn(async move {
                busy.set(true);
                let result = login.login(&name_input, &email_input).await;
                busy.set(false);
                match result {
                    Ok(identity) => {
                        error.set(None);
                        gate.sign_in(identity);
                        navigator.push(Route::Test {});
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "login failed");
                        error.set(Some(login_error_message(&err)));
                    }
                }
            });
        })
    };

    rsx! {
        div { class: "page login-page",
            h2 { "Login" }
            form {
                class: "stack",
                onsubmit: move |evt: FormEvent| {
                    evt.prevent_default();
                    on_submit.call(());
                },
                label { "Name"
                    input {
                        id: "login-name",
                        r#type: "text",
                        value: "{name}",
                        oninput: move |evt| name.set(evt.value()),
                    }
                }
                label { "Email"
                    input {
                        id: "login-email",
                        r#type: "email",
                        value: "{email}",
                        oninput: move |evt| email.set(evt.value()),
                    }
                }
                if let Some(message) = error() {
                    p { class: "error", "{message}" }
                }
                button { r#type: "submit", disabled: busy(), "Start test" }
            }
        }
    }
}
