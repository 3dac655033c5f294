use std::time::Duration;

use dioxus::prelude::*;
use dioxus_router::use_navigator;

use exam_core::model::{Identity, SessionPhase};
use services::{PendingSubmission, SessionView};

use crate::context::{AppContext, use_session_gate};
use crate::routes::Route;
use crate::vm::{TestIntent, TestVm};

#[component]
pub fn TestView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let gate = use_session_gate();
    let signed_in = gate.identity().is_some();

    use_effect(move || {
        if gate.identity().is_none() {
            navigator.replace(Route::Login {});
        }
    });

    let vm = use_signal(|| None::<TestVm>);
    let exam = ctx.exam();
    let gateway = exam.gateway();

    // Reruns when the participant changes, so a new sign-in gets a fresh session.
    let _loader = use_resource({
        let exam = exam.clone();
        move || {
            let exam = exam.clone();
            let identity = gate.identity();
            let mut vm = vm;
            async move {
                let Some(identity) = identity else {
                    vm.set(None);
                    return;
                };
                let session = exam.start_session(identity).await;
                vm.set(Some(TestVm::new(session)));
            }
        }
    });

    let send = {
        let gateway = gateway.clone();
        use_callback(move |pending: PendingSubmission| {
            let gateway = gateway.clone();
            let mut vm = vm;
            spawn(async move {
                let result = gateway.submit(&pending).await;
                if let Some(vm) = vm.write().as_mut() {
                    vm.complete_submit(result);
                }
            });
        })
    };

    use_future(move || async move {
        loop {
            tokio::time::sleep(Duration::from_secs(1)).await;
            let mut vm = vm;
            let pending = vm.write().as_mut().and_then(TestVm::poll);
            if let Some(pending) = pending {
                send.call(pending);
            }
        }
    });

    let dispatch = use_callback(move |intent: TestIntent| {
        let mut vm = vm;
        let pending = vm.write().as_mut().and_then(|vm| vm.apply(intent));
        if let Some(pending) = pending {
            send.call(pending);
        }
    });

    if !signed_in {
        return rsx! { p { "Redirecting..." } };
    }

    let vm_guard = vm.read();
    let Some(current) = vm_guard.as_ref() else {
        return rsx! {
            div { class: "page",
                p { "Loading questions..." }
            }
        };
    };
    let view = current.view();
    let confirming = current.is_confirming();
    let retry_in = current.retry_in();
    let load_error = view.last_error.clone().unwrap_or_default();

    rsx! {
        div { class: "page test-page",
            match view.phase {
                SessionPhase::Loading => rsx! { p { "Loading questions..." } },
                SessionPhase::Failed => rsx! {
                    div { class: "blocking-error",
                        h2 { "The test could not be loaded" }
                        p { class: "error", "{load_error}" }
                    }
                },
                SessionPhase::Submitted => rsx! {
                    Submitted { identity: current.session().identity().clone() }
                },
                SessionPhase::InProgress | SessionPhase::Submitting => rsx! {
                    QuestionPanel {
                        view: view.clone(),
                        confirming,
                        retry_in,
                        on_intent: dispatch,
                    }
                },
            }
        }
    }
}

#[component]
fn QuestionPanel(
    view: SessionView,
    confirming: bool,
    retry_in: Option<u32>,
    on_intent: Callback<TestIntent>,
) -> Element {
    let Some(question) = view.current_question.clone() else {
        return rsx! {};
    };
    let prompt = question.prompt().to_string();
    let in_progress = view.phase == SessionPhase::InProgress;
    let submitting = view.phase == SessionPhase::Submitting;

    rsx! {
        div { class: "test-header",
            span { class: "progress", "Question {view.question_number} of {view.question_count}" }
            span { class: "timer", "Time left: {view.minutes_seconds}" }
        }

        div { class: "question",
            h3 { "{prompt}" }
            div { class: "options",
                for option in question.options().iter().cloned() {
                    OptionRow {
                        key: "{option}",
                        checked: view.selected_option_for_current.as_deref() == Some(option.as_str()),
                        disabled: !in_progress,
                        option,
                        on_select: move |option: String| on_intent.call(TestIntent::Select(option)),
                    }
                }
            }
        }

        if in_progress {
            if let Some(message) = view.last_error.clone() {
                p { class: "error", "{message}. You can try submitting again." }
            }
        }

        div { class: "actions",
            button {
                r#type: "button",
                disabled: !in_progress || view.is_first,
                onclick: move |_| on_intent.call(TestIntent::Previous),
                "Previous"
            }
            button {
                r#type: "button",
                disabled: !in_progress,
                onclick: move |_| on_intent.call(TestIntent::Skip),
                "Skip"
            }
            if view.can_submit {
                button {
                    r#type: "button",
                    class: "primary",
                    onclick: move |_| on_intent.call(TestIntent::RequestSubmit),
                    "Submit"
                }
            } else {
                button {
                    r#type: "button",
                    class: "primary",
                    disabled: !view.can_go_next,
                    onclick: move |_| on_intent.call(TestIntent::Next),
                    "Next"
                }
            }
        }

        if confirming && in_progress {
            div { class: "confirm",
                p { "Submit your answers? Unanswered questions will be marked as skipped." }
                button {
                    r#type: "button",
                    class: "primary",
                    onclick: move |_| on_intent.call(TestIntent::ConfirmSubmit),
                    "Yes, submit"
                }
                button {
                    r#type: "button",
                    onclick: move |_| on_intent.call(TestIntent::CancelSubmit),
                    "Keep answering"
                }
            }
        }

        if submitting {
            if view.submit_pending_retry {
                div { class: "pending",
                    p { "Time is up. Submission pending, will retry" }
                    if let Some(secs) = retry_in {
                        p { "Retrying in {secs}s" }
                    }
                    button {
                        r#type: "button",
                        onclick: move |_| on_intent.call(TestIntent::Retry),
                        "Retry now"
                    }
                }
            } else {
                p { class: "pending", "Submitting..." }
            }
        }
    }
}

#[component]
fn OptionRow(option: String, checked: bool, disabled: bool, on_select: Callback<String>) -> Element {
    let value = option.clone();
    rsx! {
        label { class: "option",
            input {
                r#type: "radio",
                name: "answer",
                value: "{option}",
                checked,
                disabled,
                onchange: move |_| on_select.call(value.clone()),
            }
            span { "{option}" }
        }
    }
}

#[component]
fn Submitted(identity: Identity) -> Element {
    let name = identity.display_name().as_str().to_string();
    rsx! {
        div { class: "submitted",
            h2 { "Thank you, {name}!" }
            p { "Your answers have been submitted." }
        }
    }
}
