mod admin_vm;
mod test_vm;
mod time_fmt;

pub use admin_vm::{SubmissionRowVm, UserRowVm, map_submission_rows, map_user_rows};
pub use test_vm::{RETRY_INTERVAL_SECS, TestIntent, TestVm};
pub use time_fmt::format_datetime;
