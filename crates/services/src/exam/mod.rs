mod engine;
mod view;
mod workflow;

pub use engine::TestSession;
pub use view::{SessionView, format_minutes_seconds};
pub use workflow::ExamLoopService;
