//! Exam-scheduling wizard: date/hour selection with per-date overrides,
//! step navigation, and submission to the external scheduling endpoint.

pub mod command;
pub mod domain;
pub mod gateway;
pub mod hours;
pub mod router;
pub mod selection;
pub mod service;
pub mod session;
pub mod submission;

#[cfg(test)]
mod tests;

pub use command::ScheduleCommand;
pub use domain::{ExamLocation, LocationId, WizardStep};
pub use gateway::{HttpScheduleGateway, ScheduleGateway, SubmissionReceipt};
pub use hours::{HourOfDay, HourParseError};
pub use router::{schedule_router, ROLE_HEADER};
pub use selection::ScheduleSelection;
pub use service::{ScheduleWizardService, SessionSnapshot, WizardError};
pub use session::{InMemorySessionStore, SessionId, SessionStore, StoreError};
pub use submission::{
    DateView, ScheduleSlotRow, ScheduleSubmission, ScheduleView, ScheduledDate, SubmissionError,
};
