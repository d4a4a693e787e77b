//! Application domain model.
//!
//! An application is the single record an applicant submits: shared
//! contact fields plus a typed profile (entrepreneur or investor),
//! modelled as a tagged union keyed by `type`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ConfluenceError, ConfluenceResult};

/// Review outcome of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Label shown to applicants on the dashboard.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending Review",
            Self::Approved => "Approved",
            Self::Rejected => "Not Approved",
        }
    }

    /// Whether this status is a legal review decision target.
    /// Only pending applications can transition, and only to a decision.
    pub fn is_decision(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

/// Which shaped field set an application carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicantKind {
    Entrepreneur,
    Investor,
}

impl ApplicantKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entrepreneur => "entrepreneur",
            Self::Investor => "investor",
        }
    }

    /// Token used by the console filters and export filenames.
    /// Entrepreneurs are labelled "founder" everywhere they are shown.
    pub fn filter_token(&self) -> &'static str {
        match self {
            Self::Entrepreneur => "founder",
            Self::Investor => "investor",
        }
    }

    pub fn display_label(&self) -> &'static str {
        match self {
            Self::Entrepreneur => "Founder",
            Self::Investor => "Investor",
        }
    }

    /// Parse a console filter token ("founder" or "investor").
    pub fn parse_filter(s: &str) -> Option<Self> {
        match s {
            "founder" => Some(Self::Entrepreneur),
            "investor" => Some(Self::Investor),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartupStage {
    Idea,
    Mvp,
    Early,
    Growth,
    Scaleup,
}

impl StartupStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idea => "idea",
            Self::Mvp => "mvp",
            Self::Early => "early",
            Self::Growth => "growth",
            Self::Scaleup => "scaleup",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "idea" => Some(Self::Idea),
            "mvp" => Some(Self::Mvp),
            "early" => Some(Self::Early),
            "growth" => Some(Self::Growth),
            "scaleup" => Some(Self::Scaleup),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RaisedFunding {
    #[serde(rename = "no")]
    No,
    #[serde(rename = "angel")]
    Angel,
    #[serde(rename = "seriesA")]
    SeriesA,
    #[serde(rename = "seriesB+")]
    SeriesBPlus,
}

impl RaisedFunding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::No => "no",
            Self::Angel => "angel",
            Self::SeriesA => "seriesA",
            Self::SeriesBPlus => "seriesB+",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "no" => Some(Self::No),
            "angel" => Some(Self::Angel),
            "seriesA" => Some(Self::SeriesA),
            "seriesB+" => Some(Self::SeriesBPlus),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "yes" => Some(Self::Yes),
            "no" => Some(Self::No),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelWillingness {
    Yes,
    No,
    Maybe,
}

impl TravelWillingness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::Maybe => "maybe",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "yes" => Some(Self::Yes),
            "no" => Some(Self::No),
            "maybe" => Some(Self::Maybe),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvestorKind {
    #[serde(rename = "individual")]
    Individual,
    #[serde(rename = "firm")]
    Firm,
    #[serde(rename = "family-office")]
    FamilyOffice,
}

impl InvestorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Firm => "firm",
            Self::FamilyOffice => "family-office",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "individual" => Some(Self::Individual),
            "firm" => Some(Self::Firm),
            "family-office" => Some(Self::FamilyOffice),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentorWillingness {
    Yes,
    No,
    Occasionally,
}

impl MentorWillingness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::Occasionally => "occasionally",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "yes" => Some(Self::Yes),
            "no" => Some(Self::No),
            "occasionally" => Some(Self::Occasionally),
            _ => None,
        }
    }
}

/// Entrepreneur-only fields. Only the startup name is collected as a
/// required form field; everything else is best-effort applicant input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrepreneurProfile {
    pub startup_name: String,
    pub startup_stage: Option<StartupStage>,
    pub raised_funding: Option<RaisedFunding>,
    pub startup_location: Option<String>,
    pub website_link: Option<String>,
    pub founding_year: Option<String>,
    pub team_size: Option<String>,
    pub what_do_you_expect: Option<String>,
    pub what_can_you_offer: Option<String>,
    pub college: Option<String>,
    pub graduation_year: Option<String>,
}

/// Investor-only fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestorProfile {
    pub is_iit_alumnus: Option<YesNo>,
    pub willing_to_travel_ncr: Option<TravelWillingness>,
    pub individual_or_firm: Option<InvestorKind>,
    pub startup_interests: Option<String>,
    pub willing_to_mentor: Option<MentorWillingness>,
}

/// Typed profile of an applicant, tagged by `type` on the wire so the
/// serialized form stays flat alongside the shared fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ApplicantProfile {
    Entrepreneur(EntrepreneurProfile),
    Investor(InvestorProfile),
}

impl ApplicantProfile {
    pub fn kind(&self) -> ApplicantKind {
        match self {
            Self::Entrepreneur(_) => ApplicantKind::Entrepreneur,
            Self::Investor(_) => ApplicantKind::Investor,
        }
    }

    pub fn startup_name(&self) -> Option<&str> {
        match self {
            Self::Entrepreneur(p) => Some(p.startup_name.as_str()),
            Self::Investor(_) => None,
        }
    }

    pub fn individual_or_firm(&self) -> Option<InvestorKind> {
        match self {
            Self::Entrepreneur(_) => None,
            Self::Investor(p) => p.individual_or_firm,
        }
    }
}

/// A submitted application document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    /// Owning identity. A foreign reference into the identity table,
    /// not an ownership pointer.
    pub user_id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub linkedin: String,
    pub location: Option<String>,
    pub bio: Option<String>,
    #[serde(flatten)]
    pub profile: ApplicantProfile,
    pub status: ApplicationStatus,
    /// Server-assigned at creation; immutable afterwards.
    pub created_at: DateTime<Utc>,
    /// Set only on status transition.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Application {
    pub fn kind(&self) -> ApplicantKind {
        self.profile.kind()
    }
}

/// The in-memory form record collected client-side before submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDraft {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub linkedin: String,
    pub location: Option<String>,
    pub bio: Option<String>,
    #[serde(flatten)]
    pub profile: ApplicantProfile,
}

impl ApplicationDraft {
    /// Submission guard. Only the three shared fields are enforced;
    /// everything else may be left blank by the applicant.
    pub fn validate(&self) -> ConfluenceResult<()> {
        if self.name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.linkedin.trim().is_empty()
        {
            return Err(ConfluenceError::Validation {
                message: "Please fill in all required fields".into(),
            });
        }
        Ok(())
    }

    pub fn kind(&self) -> ApplicantKind {
        self.profile.kind()
    }
}

/// Input for creating an application. Status and timestamps are
/// assigned by the store, never by the caller.
#[derive(Debug, Clone)]
pub struct CreateApplication {
    pub user_id: Uuid,
    pub draft: ApplicationDraft,
}
