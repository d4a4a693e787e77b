//! Spreadsheet export of the application list.
//!
//! Takes its own filter set, independent of what the console is
//! currently showing, and serializes the matching rows with the `csv`
//! crate in a fixed column order. Cells that do not apply to the
//! applicant's type hold "-"; cells the applicant left blank hold
//! "N/A".

use chrono::NaiveDate;
use confluence_core::error::{ConfluenceError, ConfluenceResult};
use confluence_core::models::application::{ApplicantProfile, Application, YesNo};

use crate::filter::ConsoleFilter;

pub const EXPORT_COLUMNS: [&str; 14] = [
    "Date",
    "Name",
    "Email",
    "Phone",
    "Type",
    "LinkedIn",
    "Startup Name",
    "Startup Stage",
    "Startup Location",
    "Raised Funding",
    "Individual/Firm",
    "IIT Alumni",
    "Location",
    "Status",
];

const NOT_APPLICABLE: &str = "-";
const MISSING: &str = "N/A";

fn missing_if_none(value: Option<String>) -> String {
    value.unwrap_or_else(|| MISSING.to_string())
}

fn missing_if_empty(value: &str) -> String {
    if value.trim().is_empty() {
        MISSING.to_string()
    } else {
        value.to_string()
    }
}

fn row(app: &Application) -> [String; 14] {
    let (startup_name, startup_stage, startup_location, raised_funding) = match &app.profile {
        ApplicantProfile::Entrepreneur(p) => (
            missing_if_empty(&p.startup_name),
            missing_if_none(p.startup_stage.map(|s| s.as_str().to_string())),
            missing_if_none(p.startup_location.clone()),
            missing_if_none(p.raised_funding.map(|f| f.as_str().to_string())),
        ),
        ApplicantProfile::Investor(_) => (
            NOT_APPLICABLE.to_string(),
            NOT_APPLICABLE.to_string(),
            NOT_APPLICABLE.to_string(),
            NOT_APPLICABLE.to_string(),
        ),
    };

    let (individual_or_firm, iit_alumni) = match &app.profile {
        ApplicantProfile::Entrepreneur(_) => {
            (NOT_APPLICABLE.to_string(), NOT_APPLICABLE.to_string())
        }
        ApplicantProfile::Investor(p) => (
            missing_if_none(p.individual_or_firm.map(|k| k.as_str().to_string())),
            missing_if_none(p.is_iit_alumnus.map(|v| {
                match v {
                    YesNo::Yes => "Yes",
                    YesNo::No => "No",
                }
                .to_string()
            })),
        ),
    };

    [
        app.created_at.format("%Y-%m-%d").to_string(),
        app.name.clone(),
        app.email.clone(),
        app.phone.clone(),
        app.kind().display_label().to_string(),
        app.linkedin.clone(),
        startup_name,
        startup_stage,
        startup_location,
        raised_funding,
        individual_or_firm,
        iit_alumni,
        missing_if_none(app.location.clone()),
        app.status.label().to_string(),
    ]
}

/// Serialize the applications matching `filter` as a CSV document.
pub fn export_csv(apps: &[Application], filter: &ConsoleFilter) -> ConfluenceResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(EXPORT_COLUMNS)
        .map_err(|e| ConfluenceError::Internal(format!("csv write: {e}")))?;

    for app in apps.iter().filter(|a| filter.matches(a)) {
        writer
            .write_record(row(app))
            .map_err(|e| ConfluenceError::Internal(format!("csv write: {e}")))?;
    }

    writer
        .into_inner()
        .map_err(|e| ConfluenceError::Internal(format!("csv flush: {e}")))
}

/// Download filename describing the export date and active filters.
pub fn export_filename(filter: &ConsoleFilter, date: NaiveDate) -> String {
    let mut name = format!("Confluence_Applications_{}", date.format("%Y-%m-%d"));
    if let Some(status) = filter.status {
        name.push('_');
        name.push_str(status.as_str());
    }
    if let Some(kind) = filter.kind {
        name.push('_');
        name.push_str(kind.filter_token());
    }
    if !filter.search.trim().is_empty() {
        name.push_str("_filtered");
    }
    name.push_str(".csv");
    name
}
