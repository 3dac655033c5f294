pub mod app;
pub mod context;
pub mod routes;
pub mod vm;
pub mod views;

pub use app::App;
pub use context::{
    AppContext, SessionGate, UiApp, build_app_context, use_session_gate, use_session_gate_provider,
};
