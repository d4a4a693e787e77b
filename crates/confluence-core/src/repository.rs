//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async request/response calls with no
//! retry policy; a failed call surfaces its error to the caller
//! exactly once.

use uuid::Uuid;

use crate::error::ConfluenceResult;
use crate::models::{
    application::{Application, ApplicationStatus, CreateApplication},
    identity::{CreateIdentity, Identity},
    session::{CreateSession, Session},
};

/// The `applications` document collection.
pub trait ApplicationRepository: Send + Sync {
    /// Create a new application document. The store forces
    /// `status = pending` and assigns the creation timestamp.
    fn create(
        &self,
        input: CreateApplication,
    ) -> impl Future<Output = ConfluenceResult<Application>> + Send;

    fn get_by_id(&self, id: Uuid) -> impl Future<Output = ConfluenceResult<Application>> + Send;

    /// The application owned by an identity, or `None`. At most one is
    /// expected per identity; when duplicates exist the most recent by
    /// creation time is returned.
    fn get_by_user(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = ConfluenceResult<Option<Application>>> + Send;

    /// All applications, ordered by creation time descending.
    fn list_all(&self) -> impl Future<Output = ConfluenceResult<Vec<Application>>> + Send;

    /// Transition a pending application to a decision, setting
    /// `updated_at`. Fails with `NotFound` for an unknown id and
    /// `InvalidTransition` when the prior status is not pending or the
    /// target is not a decision; no other document is touched.
    fn set_status(
        &self,
        id: Uuid,
        target: ApplicationStatus,
    ) -> impl Future<Output = ConfluenceResult<Application>> + Send;
}

pub trait IdentityRepository: Send + Sync {
    fn create(
        &self,
        input: CreateIdentity,
    ) -> impl Future<Output = ConfluenceResult<Identity>> + Send;

    fn get_by_id(&self, id: Uuid) -> impl Future<Output = ConfluenceResult<Identity>> + Send;

    fn get_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = ConfluenceResult<Option<Identity>>> + Send;

    /// The stored password hash for an identity, if it is a password
    /// account.
    fn password_hash(
        &self,
        id: Uuid,
    ) -> impl Future<Output = ConfluenceResult<Option<String>>> + Send;
}

pub trait SessionRepository: Send + Sync {
    fn create(&self, input: CreateSession)
    -> impl Future<Output = ConfluenceResult<Session>> + Send;

    fn get_by_token_hash(
        &self,
        token_hash: &str,
    ) -> impl Future<Output = ConfluenceResult<Session>> + Send;

    /// Invalidate a single session (sign-out).
    fn invalidate(&self, id: Uuid) -> impl Future<Output = ConfluenceResult<()>> + Send;
}
