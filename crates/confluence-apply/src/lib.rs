//! Confluence Apply — the applicant-facing side of the network.
//!
//! Hosts the membership application submission flow (a small state
//! machine: fill the form, authenticate, done) and the dashboard view
//! an applicant sees after signing in.

pub mod dashboard;
pub mod error;
pub mod flow;

pub use dashboard::{Dashboard, DashboardView};
pub use error::FlowError;
pub use flow::{FlowState, SubmissionFlow, SubmissionOutcome};
