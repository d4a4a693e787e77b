//! Tests for the spreadsheet export shaping.

use chrono::{TimeZone, Utc};
use confluence_console::export::{EXPORT_COLUMNS, export_csv};
use confluence_console::filter::ConsoleFilter;
use confluence_core::models::application::{
    ApplicantProfile, Application, ApplicationStatus, EntrepreneurProfile, InvestorKind,
    InvestorProfile, StartupStage, YesNo,
};
use uuid::Uuid;

fn base(name: &str, profile: ApplicantProfile) -> Application {
    Application {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        name: name.into(),
        phone: "+91 98765 43210".into(),
        email: "someone@example.com".into(),
        linkedin: "https://linkedin.com/in/someone".into(),
        location: None,
        bio: None,
        profile,
        status: ApplicationStatus::Pending,
        created_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        updated_at: None,
    }
}

fn parse(bytes: Vec<u8>) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(bytes.as_slice());
    reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect()
}

#[test]
fn header_row_uses_the_fixed_column_order() {
    let rows = parse(export_csv(&[], &ConsoleFilter::default()).unwrap());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0], EXPORT_COLUMNS);
}

#[test]
fn entrepreneur_rows_dash_out_investor_columns() {
    let app = base(
        "Asha Rao",
        ApplicantProfile::Entrepreneur(EntrepreneurProfile {
            startup_name: "Acme Robotics".into(),
            startup_stage: Some(StartupStage::Mvp),
            startup_location: None,
            ..Default::default()
        }),
    );

    let rows = parse(export_csv(&[app], &ConsoleFilter::default()).unwrap());
    let row = &rows[1];

    assert_eq!(row[0], "2024-06-01");
    assert_eq!(row[4], "Founder");
    assert_eq!(row[6], "Acme Robotics");
    assert_eq!(row[7], "mvp");
    // Blank optional fields read "N/A".
    assert_eq!(row[8], "N/A");
    assert_eq!(row[9], "N/A");
    // Investor-only columns read "-".
    assert_eq!(row[10], "-");
    assert_eq!(row[11], "-");
    assert_eq!(row[12], "N/A");
    assert_eq!(row[13], "Pending Review");
}

#[test]
fn investor_rows_dash_out_startup_columns() {
    let mut app = base(
        "Vikram Shah",
        ApplicantProfile::Investor(InvestorProfile {
            is_iit_alumnus: Some(YesNo::Yes),
            individual_or_firm: Some(InvestorKind::Firm),
            ..Default::default()
        }),
    );
    app.status = ApplicationStatus::Rejected;
    app.location = Some("Delhi".into());

    let rows = parse(export_csv(&[app], &ConsoleFilter::default()).unwrap());
    let row = &rows[1];

    assert_eq!(row[4], "Investor");
    for col in 6..=9 {
        assert_eq!(row[col], "-", "column {col}");
    }
    assert_eq!(row[10], "firm");
    assert_eq!(row[11], "Yes");
    assert_eq!(row[12], "Delhi");
    assert_eq!(row[13], "Not Approved");
}

#[test]
fn export_filter_is_independent_of_row_order() {
    let asha = base(
        "Asha Rao",
        ApplicantProfile::Entrepreneur(EntrepreneurProfile {
            startup_name: "Acme Robotics".into(),
            ..Default::default()
        }),
    );
    let vikram = base(
        "Vikram Shah",
        ApplicantProfile::Investor(InvestorProfile::default()),
    );

    let filter = ConsoleFilter {
        search: "acme".into(),
        ..Default::default()
    };
    let rows = parse(export_csv(&[vikram, asha], &filter).unwrap());

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1][1], "Asha Rao");
}
