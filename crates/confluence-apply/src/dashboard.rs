//! Applicant dashboard view.
//!
//! The dashboard is event-driven: it renders from the latest identity
//! notification and one `get_by_user` query, with no polling. A signed
//! -in identity without an application gets the "No Application Yet"
//! empty state rather than an error.

use chrono::{DateTime, Utc};
use confluence_core::error::ConfluenceResult;
use confluence_core::models::application::Application;
use confluence_core::models::identity::{Identity, IdentityEvent};
use confluence_core::repository::ApplicationRepository;
use serde::Serialize;

/// What the applicant sees.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum DashboardView {
    SignedOut,
    NoApplication {
        identity: Identity,
    },
    Application {
        identity: Identity,
        application: Application,
        /// Human status label, e.g. "Pending Review".
        status_label: &'static str,
        /// Submission date formatted for display, e.g. "5 Mar 2024".
        submitted_on: String,
    },
}

/// Builds dashboard views from identity events.
#[derive(Clone)]
pub struct Dashboard<A: ApplicationRepository> {
    applications: A,
}

impl<A: ApplicationRepository> Dashboard<A> {
    pub fn new(applications: A) -> Self {
        Self { applications }
    }

    /// The view to render after an identity notification.
    pub async fn view_for(&self, event: &IdentityEvent) -> ConfluenceResult<DashboardView> {
        match event {
            IdentityEvent::SignedOut => Ok(DashboardView::SignedOut),
            IdentityEvent::SignedIn(identity) => self.view_for_identity(identity).await,
        }
    }

    /// The view for a known signed-in identity.
    pub async fn view_for_identity(&self, identity: &Identity) -> ConfluenceResult<DashboardView> {
        match self.applications.get_by_user(identity.id).await? {
            None => Ok(DashboardView::NoApplication {
                identity: identity.clone(),
            }),
            Some(application) => Ok(DashboardView::Application {
                identity: identity.clone(),
                status_label: application.status.label(),
                submitted_on: format_submission_date(application.created_at),
                application,
            }),
        }
    }
}

/// Day-month-year without zero padding on the day.
pub fn format_submission_date(date: DateTime<Utc>) -> String {
    date.format("%-d %b %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn submission_date_has_no_day_padding() {
        let date = Utc.with_ymd_and_hms(2024, 3, 5, 10, 30, 0).unwrap();
        assert_eq!(format_submission_date(date), "5 Mar 2024");

        let date = Utc.with_ymd_and_hms(2024, 12, 25, 0, 0, 0).unwrap();
        assert_eq!(format_submission_date(date), "25 Dec 2024");
    }
}
