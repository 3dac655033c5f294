#![forbid(unsafe_code)]

pub mod admin_service;
pub mod answer_store;
pub mod app_services;
pub mod countdown;
pub mod error;
pub mod exam;
pub mod gateway;
pub mod login_service;

pub use exam_core::Clock;

pub use admin_service::{AdminGrant, AdminService};
pub use answer_store::AnswerStore;
pub use app_services::AppServices;
pub use countdown::{Countdown, Tick};
pub use error::{AdminError, AppServicesError, LoadError, LoginError, SubmitError};
pub use exam::{ExamLoopService, SessionView, TestSession, format_minutes_seconds};
pub use gateway::{
    PendingSubmission, QuestionSource, StorageQuestionSource, StorageSubmissionGateway,
    SubmissionGateway, SubmissionReceipt,
};
pub use login_service::LoginService;
