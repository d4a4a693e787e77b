//! SurrealDB implementation of [`ApplicationRepository`].
//!
//! Applications are stored flat: shared fields plus the optional
//! fields of both profile shapes, with `kind` as the discriminant.
//! The tagged-union domain model is assembled on read.

use chrono::{DateTime, Utc};
use confluence_core::error::ConfluenceResult;
use confluence_core::models::application::{
    ApplicantProfile, Application, ApplicationStatus, CreateApplication, EntrepreneurProfile,
    InvestorKind, InvestorProfile, MentorWillingness, RaisedFunding, StartupStage,
    TravelWillingness, YesNo,
};
use confluence_core::repository::ApplicationRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct ApplicationRow {
    user_id: String,
    kind: String,
    name: String,
    phone: String,
    email: String,
    linkedin: String,
    location: Option<String>,
    bio: Option<String>,
    startup_name: Option<String>,
    startup_stage: Option<String>,
    raised_funding: Option<String>,
    startup_location: Option<String>,
    website_link: Option<String>,
    founding_year: Option<String>,
    team_size: Option<String>,
    what_do_you_expect: Option<String>,
    what_can_you_offer: Option<String>,
    college: Option<String>,
    graduation_year: Option<String>,
    is_iit_alumnus: Option<String>,
    willing_to_travel_ncr: Option<String>,
    individual_or_firm: Option<String>,
    startup_interests: Option<String>,
    willing_to_mentor: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct ApplicationRowWithId {
    record_id: String,
    user_id: String,
    kind: String,
    name: String,
    phone: String,
    email: String,
    linkedin: String,
    location: Option<String>,
    bio: Option<String>,
    startup_name: Option<String>,
    startup_stage: Option<String>,
    raised_funding: Option<String>,
    startup_location: Option<String>,
    website_link: Option<String>,
    founding_year: Option<String>,
    team_size: Option<String>,
    what_do_you_expect: Option<String>,
    what_can_you_offer: Option<String>,
    college: Option<String>,
    graduation_year: Option<String>,
    is_iit_alumnus: Option<String>,
    willing_to_travel_ncr: Option<String>,
    individual_or_firm: Option<String>,
    startup_interests: Option<String>,
    willing_to_mentor: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

fn parse_status(s: &str) -> Result<ApplicationStatus, DbError> {
    ApplicationStatus::parse(s)
        .ok_or_else(|| DbError::Decode(format!("unknown application status: {s}")))
}

fn parse_opt<T>(
    value: Option<String>,
    field: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, DbError> {
    match value {
        None => Ok(None),
        Some(s) => parse(&s)
            .map(Some)
            .ok_or_else(|| DbError::Decode(format!("unknown {field} value: {s}"))),
    }
}

impl ApplicationRow {
    fn into_application(self, id: Uuid) -> Result<Application, DbError> {
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| DbError::Decode(format!("invalid user UUID: {e}")))?;

        let profile = match self.kind.as_str() {
            "entrepreneur" => ApplicantProfile::Entrepreneur(EntrepreneurProfile {
                startup_name: self.startup_name.unwrap_or_default(),
                startup_stage: parse_opt(self.startup_stage, "startup_stage", StartupStage::parse)?,
                raised_funding: parse_opt(
                    self.raised_funding,
                    "raised_funding",
                    RaisedFunding::parse,
                )?,
                startup_location: self.startup_location,
                website_link: self.website_link,
                founding_year: self.founding_year,
                team_size: self.team_size,
                what_do_you_expect: self.what_do_you_expect,
                what_can_you_offer: self.what_can_you_offer,
                college: self.college,
                graduation_year: self.graduation_year,
            }),
            "investor" => ApplicantProfile::Investor(InvestorProfile {
                is_iit_alumnus: parse_opt(self.is_iit_alumnus, "is_iit_alumnus", YesNo::parse)?,
                willing_to_travel_ncr: parse_opt(
                    self.willing_to_travel_ncr,
                    "willing_to_travel_ncr",
                    TravelWillingness::parse,
                )?,
                individual_or_firm: parse_opt(
                    self.individual_or_firm,
                    "individual_or_firm",
                    InvestorKind::parse,
                )?,
                startup_interests: self.startup_interests,
                willing_to_mentor: parse_opt(
                    self.willing_to_mentor,
                    "willing_to_mentor",
                    MentorWillingness::parse,
                )?,
            }),
            other => {
                return Err(DbError::Decode(format!("unknown applicant kind: {other}")));
            }
        };

        Ok(Application {
            id,
            user_id,
            name: self.name,
            phone: self.phone,
            email: self.email,
            linkedin: self.linkedin,
            location: self.location,
            bio: self.bio,
            profile,
            status: parse_status(&self.status)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl ApplicationRowWithId {
    fn try_into_application(self) -> Result<Application, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        let row = ApplicationRow {
            user_id: self.user_id,
            kind: self.kind,
            name: self.name,
            phone: self.phone,
            email: self.email,
            linkedin: self.linkedin,
            location: self.location,
            bio: self.bio,
            startup_name: self.startup_name,
            startup_stage: self.startup_stage,
            raised_funding: self.raised_funding,
            startup_location: self.startup_location,
            website_link: self.website_link,
            founding_year: self.founding_year,
            team_size: self.team_size,
            what_do_you_expect: self.what_do_you_expect,
            what_can_you_offer: self.what_can_you_offer,
            college: self.college,
            graduation_year: self.graduation_year,
            is_iit_alumnus: self.is_iit_alumnus,
            willing_to_travel_ncr: self.willing_to_travel_ncr,
            individual_or_firm: self.individual_or_firm,
            startup_interests: self.startup_interests,
            willing_to_mentor: self.willing_to_mentor,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        row.into_application(id)
    }
}

/// Flattened write-side view of a draft, matching the storage layout.
struct DraftColumns {
    kind: &'static str,
    startup_name: Option<String>,
    startup_stage: Option<String>,
    raised_funding: Option<String>,
    startup_location: Option<String>,
    website_link: Option<String>,
    founding_year: Option<String>,
    team_size: Option<String>,
    what_do_you_expect: Option<String>,
    what_can_you_offer: Option<String>,
    college: Option<String>,
    graduation_year: Option<String>,
    is_iit_alumnus: Option<String>,
    willing_to_travel_ncr: Option<String>,
    individual_or_firm: Option<String>,
    startup_interests: Option<String>,
    willing_to_mentor: Option<String>,
}

fn flatten_profile(profile: &ApplicantProfile) -> DraftColumns {
    let mut cols = DraftColumns {
        kind: profile.kind().as_str(),
        startup_name: None,
        startup_stage: None,
        raised_funding: None,
        startup_location: None,
        website_link: None,
        founding_year: None,
        team_size: None,
        what_do_you_expect: None,
        what_can_you_offer: None,
        college: None,
        graduation_year: None,
        is_iit_alumnus: None,
        willing_to_travel_ncr: None,
        individual_or_firm: None,
        startup_interests: None,
        willing_to_mentor: None,
    };

    match profile {
        ApplicantProfile::Entrepreneur(p) => {
            cols.startup_name = Some(p.startup_name.clone());
            cols.startup_stage = p.startup_stage.map(|v| v.as_str().to_string());
            cols.raised_funding = p.raised_funding.map(|v| v.as_str().to_string());
            cols.startup_location = p.startup_location.clone();
            cols.website_link = p.website_link.clone();
            cols.founding_year = p.founding_year.clone();
            cols.team_size = p.team_size.clone();
            cols.what_do_you_expect = p.what_do_you_expect.clone();
            cols.what_can_you_offer = p.what_can_you_offer.clone();
            cols.college = p.college.clone();
            cols.graduation_year = p.graduation_year.clone();
        }
        ApplicantProfile::Investor(p) => {
            cols.is_iit_alumnus = p.is_iit_alumnus.map(|v| v.as_str().to_string());
            cols.willing_to_travel_ncr = p.willing_to_travel_ncr.map(|v| v.as_str().to_string());
            cols.individual_or_firm = p.individual_or_firm.map(|v| v.as_str().to_string());
            cols.startup_interests = p.startup_interests.clone();
            cols.willing_to_mentor = p.willing_to_mentor.map(|v| v.as_str().to_string());
        }
    }

    cols
}

/// SurrealDB implementation of the Application repository.
#[derive(Clone)]
pub struct SurrealApplicationRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealApplicationRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ApplicationRepository for SurrealApplicationRepository<C> {
    async fn create(&self, input: CreateApplication) -> ConfluenceResult<Application> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let cols = flatten_profile(&input.draft.profile);

        // Status is forced to pending and created_at is assigned by
        // the store, regardless of what the caller holds in memory.
        let result = self
            .db
            .query(
                "CREATE type::record('application', $id) SET \
                 user_id = $user_id, \
                 kind = $kind, \
                 name = $name, phone = $phone, \
                 email = $email, linkedin = $linkedin, \
                 location = $location, bio = $bio, \
                 startup_name = $startup_name, \
                 startup_stage = $startup_stage, \
                 raised_funding = $raised_funding, \
                 startup_location = $startup_location, \
                 website_link = $website_link, \
                 founding_year = $founding_year, \
                 team_size = $team_size, \
                 what_do_you_expect = $what_do_you_expect, \
                 what_can_you_offer = $what_can_you_offer, \
                 college = $college, \
                 graduation_year = $graduation_year, \
                 is_iit_alumnus = $is_iit_alumnus, \
                 willing_to_travel_ncr = $willing_to_travel_ncr, \
                 individual_or_firm = $individual_or_firm, \
                 startup_interests = $startup_interests, \
                 willing_to_mentor = $willing_to_mentor, \
                 status = 'pending', \
                 updated_at = NONE",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("kind", cols.kind.to_string()))
            .bind(("name", input.draft.name))
            .bind(("phone", input.draft.phone))
            .bind(("email", input.draft.email))
            .bind(("linkedin", input.draft.linkedin))
            .bind(("location", input.draft.location))
            .bind(("bio", input.draft.bio))
            .bind(("startup_name", cols.startup_name))
            .bind(("startup_stage", cols.startup_stage))
            .bind(("raised_funding", cols.raised_funding))
            .bind(("startup_location", cols.startup_location))
            .bind(("website_link", cols.website_link))
            .bind(("founding_year", cols.founding_year))
            .bind(("team_size", cols.team_size))
            .bind(("what_do_you_expect", cols.what_do_you_expect))
            .bind(("what_can_you_offer", cols.what_can_you_offer))
            .bind(("college", cols.college))
            .bind(("graduation_year", cols.graduation_year))
            .bind(("is_iit_alumnus", cols.is_iit_alumnus))
            .bind(("willing_to_travel_ncr", cols.willing_to_travel_ncr))
            .bind(("individual_or_firm", cols.individual_or_firm))
            .bind(("startup_interests", cols.startup_interests))
            .bind(("willing_to_mentor", cols.willing_to_mentor))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<ApplicationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "application".into(),
            id: id_str,
        })?;

        Ok(row.into_application(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> ConfluenceResult<Application> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('application', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ApplicationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "application".into(),
            id: id_str,
        })?;

        Ok(row.into_application(id)?)
    }

    async fn get_by_user(&self, user_id: Uuid) -> ConfluenceResult<Option<Application>> {
        // At most one application per identity is expected, but the
        // store does not enforce it; the most recent wins.
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM application \
                 WHERE user_id = $user_id \
                 ORDER BY created_at DESC",
            )
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ApplicationRowWithId> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.try_into_application()?)),
            None => Ok(None),
        }
    }

    async fn list_all(&self) -> ConfluenceResult<Vec<Application>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM application \
                 ORDER BY created_at DESC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ApplicationRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_application())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }

    async fn set_status(
        &self,
        id: Uuid,
        target: ApplicationStatus,
    ) -> ConfluenceResult<Application> {
        let current = self.get_by_id(id).await?;

        if !target.is_decision() || current.status != ApplicationStatus::Pending {
            return Err(DbError::InvalidTransition {
                from: current.status.as_str().into(),
                to: target.as_str().into(),
            }
            .into());
        }

        // The status guard runs inside the UPDATE itself, so two
        // racing decisions resolve to whichever commits first.
        let id_str = id.to_string();
        let result = self
            .db
            .query(
                "UPDATE type::record('application', $id) SET \
                 status = $status, updated_at = time::now() \
                 WHERE status = 'pending'",
            )
            .bind(("id", id_str))
            .bind(("status", target.as_str().to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<ApplicationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| {
            DbError::InvalidTransition {
                from: ApplicationStatus::Pending.as_str().into(),
                to: target.as_str().into(),
            }
        })?;

        Ok(row.into_application(id)?)
    }
}
