use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use exam_core::model::{AdminSettings, ExamSettings, Identity};
use exam_core::time::fixed_now;
use services::{AdminService, AppServices, Clock, ExamLoopService, LoginService};
use storage::answer_cache::InMemoryAnswerCache;
use storage::question_bank::{import_questions, sample_questions};
use storage::repository::Storage;

use crate::context::{AppContext, SessionGate, UiApp, build_app_context};
use crate::routes::Header;
use crate::views::{AdminDashboardView, LoginView, TestView};

struct TestApp {
    services: AppServices,
}

impl UiApp for TestApp {
    fn login(&self) -> Arc<LoginService> {
        self.services.login()
    }

    fn admin(&self) -> Arc<AdminService> {
        self.services.admin()
    }

    fn exam(&self) -> Arc<ExamLoopService> {
        self.services.exam()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Login,
    AdminDashboard,
    Test,
}

/// Gate state the view starts with.
#[derive(Clone, Default)]
pub struct GateSeed {
    pub identity: Option<Identity>,
    pub admin: bool,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    context: AppContext,
    view: ViewKind,
    seed: GateSeed,
    gate_slot: Rc<Cell<Option<SessionGate>>>,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    use_context_provider(|| props.context.clone());
    use_context_provider(|| props.view);
    let seed = props.seed.clone();
    let gate = use_context_provider(move || SessionGate::with_state(seed.identity, seed.admin));
    props.gate_slot.set(Some(gate));
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    let body = match view {
        ViewKind::Login => rsx! { LoginView {} },
        ViewKind::AdminDashboard => rsx! { AdminDashboardView {} },
        ViewKind::Test => rsx! { TestView {} },
    };
    rsx! {
        Header {}
        main { class: "content", {body} }
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
    pub context: AppContext,
    gate_slot: Rc<Cell<Option<SessionGate>>>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Drive until `needle` shows up or the attempts run out; returns the last render.
    pub async fn render_until(&mut self, needle: &str) -> String {
        for _ in 0..20 {
            let html = self.render();
            if html.contains(needle) {
                return html;
            }
            self.drive_async().await;
        }
        self.render()
    }

    /// Run `f` against the gate the view tree is using. Call after [`Self::rebuild`].
    pub fn with_gate<O>(&self, f: impl FnOnce(SessionGate) -> O) -> O {
        let gate = self.gate_slot.get().expect("gate is provided on first render");
        self.dom.in_runtime(|| f(gate))
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn ada() -> Identity {
    Identity::parse("Ada", "ada@example.com").unwrap()
}

/// Storage with the sample bank loaded; nobody logged in yet.
pub async fn seeded_storage() -> Storage {
    let storage = Storage::in_memory();
    import_questions(storage.questions.as_ref(), &sample_questions())
        .await
        .expect("import questions");
    storage
}

pub fn setup_view_harness(view: ViewKind, storage: Storage, seed: GateSeed) -> ViewHarness {
    let services = AppServices::from_storage(
        &storage,
        Clock::fixed(fixed_now()),
        ExamSettings::default(),
        AdminSettings::default(),
        Arc::new(InMemoryAnswerCache::new()),
    );
    let app: Arc<dyn UiApp> = Arc::new(TestApp { services });
    let context = build_app_context(&app);
    let gate_slot = Rc::new(Cell::new(None));

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            context: context.clone(),
            view,
            seed,
            gate_slot: Rc::clone(&gate_slot),
        },
    );

    ViewHarness {
        dom,
        storage,
        context,
        gate_slot,
    }
}
