use std::sync::Arc;

use dioxus::prelude::*;
use exam_core::model::Identity;
use services::{AdminService, ExamLoopService, LoginService};

pub trait UiApp: Send + Sync {
    fn login(&self) -> Arc<LoginService>;
    fn admin(&self) -> Arc<AdminService>;
    fn exam(&self) -> Arc<ExamLoopService>;
}

/// Who is using the window right now.
///
/// The participant identity and the admin flag are independent; the admin
/// flag is only ever set after a password check. Both live in signals, so any
/// component that reads them rerenders when they change. Create it inside a
/// component (see [`use_session_gate_provider`]); the signals belong to that scope.
#[derive(Clone, Copy)]
pub struct SessionGate {
    identity: Signal<Option<Identity>>,
    admin: Signal<bool>,
}

impl SessionGate {
    #[must_use]
    pub fn new() -> Self {
        Self::with_state(None, false)
    }

    #[must_use]
    pub fn with_state(identity: Option<Identity>, admin: bool) -> Self {
        Self {
            identity: Signal::new(identity),
            admin: Signal::new(admin),
        }
    }

    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.identity.read().clone()
    }

    pub fn sign_in(&self, identity: Identity) {
        let mut slot = self.identity;
        slot.set(Some(identity));
    }

    /// Forget the participant. Any running test view is torn down by the
    /// navigation that follows.
    pub fn logout(&self) {
        let mut slot = self.identity;
        slot.set(None);
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        *self.admin.read()
    }

    pub fn grant_admin(&self) {
        let mut admin = self.admin;
        admin.set(true);
    }

    pub fn revoke_admin(&self) {
        let mut admin = self.admin;
        admin.set(false);
    }
}

impl Default for SessionGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Provide an empty gate to the subtree.
pub fn use_session_gate_provider() -> SessionGate {
    use_context_provider(SessionGate::new)
}

#[must_use]
pub fn use_session_gate() -> SessionGate {
    use_context::<SessionGate>()
}

#[derive(Clone)]
pub struct AppContext {
    login: Arc<LoginService>,
    admin: Arc<AdminService>,
    exam: Arc<ExamLoopService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            login: app.login(),
            admin: app.admin(),
            exam: app.exam(),
        }
    }

    #[must_use]
    pub fn login(&self) -> Arc<LoginService> {
        Arc::clone(&self.login)
    }

    #[must_use]
    pub fn admin(&self) -> Arc<AdminService> {
        Arc::clone(&self.admin)
    }

    #[must_use]
    pub fn exam(&self) -> Arc<ExamLoopService> {
        Arc::clone(&self.exam)
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
