use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable, use_navigator};

use crate::context::use_session_gate;
use crate::views::{AdminDashboardView, AdminLoginView, LoginView, TestView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", TestView)] Test {},
        #[route("/login", LoginView)] Login {},
        #[route("/admin", AdminLoginView)] AdminLogin {},
        #[route("/admin-dashboard", AdminDashboardView)] AdminDashboard {},
    #[end_layout]
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Header {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
pub(crate) fn Header() -> Element {
    let navigator = use_navigator();
    let gate = use_session_gate();
    let signed_in = gate.identity().map(|identity| identity.display_name().to_string());
    let is_admin = gate.is_admin();

    rsx! {
        header { class: "topbar",
            h1 { "Online Test" }
            nav {
                if let Some(name) = signed_in {
                    span { class: "topbar-user", "{name}" }
                    button {
                        r#type: "button",
                        class: "link-button",
                        onclick: move |_| {
                            gate.logout();
                            navigator.push(Route::Login {});
                        },
                        "Log out"
                    }
                } else {
                    Link { to: Route::Login {}, "Login" }
                }
                if is_admin {
                    Link { to: Route::AdminDashboard {}, "Dashboard" }
                } else {
                    Link { to: Route::AdminLogin {}, "Admin" }
                }
            }
        }
    }
}

#[component]
fn NotFound(segments: Vec<String>) -> Element {
    let navigator = use_navigator();
    tracing::debug!(path = %segments.join("/"), "unknown route");
    use_effect(move || {
        navigator.replace(Route::Test {});
    });
    rsx! {
        p { "Redirecting..." }
    }
}
