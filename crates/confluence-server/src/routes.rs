//! HTTP route handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use confluence_apply::flow::SubmissionFlow;
use confluence_console::console::AdminConsole;
use confluence_console::export::{export_csv, export_filename};
use confluence_console::filter::{ConsoleFilter, SortKey};
use confluence_core::models::application::{
    ApplicantKind, Application, ApplicationDraft, ApplicationStatus,
};
use confluence_core::models::identity::Identity;
use confluence_core::repository::ApplicationRepository;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

type SharedState = Arc<AppState>;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/auth/signup", post(signup_handler))
        .route("/api/auth/signin", post(signin_handler))
        .route("/api/auth/signout", post(signout_handler))
        .route("/api/applications", post(submit_handler))
        .route("/api/applications/me", get(me_handler))
        .route("/api/admin/login", post(admin_login_handler))
        .route("/api/admin/applications", get(admin_list_handler))
        .route("/api/admin/applications/{id}", get(admin_detail_handler))
        .route(
            "/api/admin/applications/{id}/status",
            post(admin_decide_handler),
        )
        .route("/api/admin/export", get(admin_export_handler))
        .with_state(state)
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AppError::MissingToken)
}

#[derive(Deserialize)]
struct SignUpRequest {
    email: String,
    password: String,
    display_name: Option<String>,
}

#[derive(Deserialize)]
struct SignInRequest {
    email: String,
    password: String,
}

#[derive(Serialize)]
struct SessionResponse {
    token: String,
    expires_at: DateTime<Utc>,
    identity: Identity,
}

async fn signup_handler(
    State(state): State<SharedState>,
    Json(req): Json<SignUpRequest>,
) -> Result<impl IntoResponse, AppError> {
    let out = state
        .auth
        .sign_up_with_password(&req.email, &req.password, req.display_name)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            token: out.session_token,
            expires_at: out.expires_at,
            identity: out.identity,
        }),
    ))
}

async fn signin_handler(
    State(state): State<SharedState>,
    Json(req): Json<SignInRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let out = state
        .auth
        .sign_in_with_password(&req.email, &req.password)
        .await?;
    Ok(Json(SessionResponse {
        token: out.session_token,
        expires_at: out.expires_at,
        identity: out.identity,
    }))
}

async fn signout_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let token = bearer_token(&headers)?;
    state.auth.sign_out(token).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
struct SubmitRequest {
    draft: ApplicationDraft,
    password: String,
}

#[derive(Serialize)]
struct SubmitResponse {
    application: Application,
    token: String,
    expires_at: DateTime<Utc>,
}

/// The submission flow end to end: form guard, password registration
/// under the form's email, document create.
async fn submit_handler(
    State(state): State<SharedState>,
    Json(req): Json<SubmitRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut flow = SubmissionFlow::new(state.auth.clone(), state.applications.clone());
    let email = req.draft.email.clone();

    flow.submit_form(req.draft)?;
    let outcome = flow.register_with_password(&email, &req.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            application: outcome.application,
            token: outcome.auth.session_token,
            expires_at: outcome.auth.expires_at,
        }),
    ))
}

async fn me_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let token = bearer_token(&headers)?;
    let identity = state.auth.authenticate(token).await?;
    let view = state.dashboard.view_for_identity(&identity).await?;
    Ok(Json(view))
}

#[derive(Deserialize)]
struct AdminLoginRequest {
    username: String,
    password: String,
}

#[derive(Serialize)]
struct AdminTokenResponse {
    token: String,
    expires_at: DateTime<Utc>,
}

async fn admin_login_handler(
    State(state): State<SharedState>,
    Json(req): Json<AdminLoginRequest>,
) -> Result<Json<AdminTokenResponse>, AppError> {
    let issued = state.gate.login(&req.username, &req.password).await?;
    Ok(Json(AdminTokenResponse {
        token: issued.token,
        expires_at: issued.expires_at,
    }))
}

#[derive(Deserialize)]
struct ConsoleQuery {
    status: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    search: Option<String>,
    sort: Option<String>,
    page: Option<usize>,
}

impl ConsoleQuery {
    fn filter(&self) -> Result<ConsoleFilter, AppError> {
        let status = self
            .status
            .as_deref()
            .map(|s| {
                ApplicationStatus::parse(s)
                    .ok_or_else(|| AppError::MalformedPayload(format!("unknown status '{s}'")))
            })
            .transpose()?;
        let kind = self
            .kind
            .as_deref()
            .map(|s| {
                ApplicantKind::parse_filter(s)
                    .ok_or_else(|| AppError::MalformedPayload(format!("unknown type '{s}'")))
            })
            .transpose()?;
        Ok(ConsoleFilter {
            status,
            kind,
            search: self.search.clone().unwrap_or_default(),
        })
    }

    fn sort(&self) -> Result<SortKey, AppError> {
        match self.sort.as_deref() {
            None => Ok(SortKey::default()),
            Some(s) => SortKey::parse(s)
                .ok_or_else(|| AppError::MalformedPayload(format!("unknown sort '{s}'"))),
        }
    }
}

#[derive(Serialize)]
struct PageResponse {
    items: Vec<Application>,
    page: usize,
    total_pages: usize,
    total: usize,
}

async fn admin_list_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<ConsoleQuery>,
) -> Result<Json<PageResponse>, AppError> {
    state.gate.validate(bearer_token(&headers)?).await?;

    let mut console = AdminConsole::new(state.applications.clone());
    console.refresh().await?;
    console.set_filter(query.filter()?);
    console.set_sort(query.sort()?);
    console.set_page(query.page.unwrap_or(1));

    let view = console.visible();
    Ok(Json(PageResponse {
        items: view.items,
        page: view.page,
        total_pages: view.total_pages,
        total: view.total,
    }))
}

async fn admin_detail_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Application>, AppError> {
    state.gate.validate(bearer_token(&headers)?).await?;
    let application = state.applications.get_by_id(id).await?;
    Ok(Json(application))
}

#[derive(Deserialize)]
struct DecideRequest {
    status: String,
    #[serde(default)]
    confirm: bool,
}

async fn admin_decide_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<DecideRequest>,
) -> Result<Json<Application>, AppError> {
    state.gate.validate(bearer_token(&headers)?).await?;

    if !req.confirm {
        return Err(AppError::ConfirmationRequired);
    }

    let target = ApplicationStatus::parse(&req.status)
        .filter(|s| s.is_decision())
        .ok_or_else(|| AppError::MalformedPayload(format!("'{}' is not a decision", req.status)))?;

    let updated = state.applications.set_status(id, target).await?;
    tracing::info!(application_id = %id, status = target.as_str(), "decision recorded");
    Ok(Json(updated))
}

async fn admin_export_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<ConsoleQuery>,
) -> Result<impl IntoResponse, AppError> {
    state.gate.validate(bearer_token(&headers)?).await?;

    let filter = query.filter()?;
    let applications = state.applications.list_all().await?;
    let bytes = export_csv(&applications, &filter)?;
    let filename = export_filename(&filter, Utc::now().date_naive());

    Ok((
        [
            (header::CONTENT_TYPE.as_str(), "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION.as_str(),
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    ))
}
