mod admin_dashboard;
mod admin_login;
mod exam;
mod login;
mod state;

pub use admin_dashboard::AdminDashboardView;
pub use admin_login::AdminLoginView;
pub use exam::TestView;
pub use login::LoginView;
pub use state::{ViewError, ViewState, view_state_from_resource};

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;
