//! Application submission flow.
//!
//! A three-step state machine: the applicant fills the form, then
//! authenticates (registering a password account or signing in with a
//! federated provider), and the application document is created the
//! moment authentication succeeds. `Success` is terminal; `back()` is
//! only legal from `Authenticate`.

use confluence_auth::federated::FederatedProvider;
use confluence_auth::service::{AuthOutput, IdentityService};
use confluence_core::error::ConfluenceResult;
use confluence_core::models::application::{Application, ApplicationDraft, CreateApplication};
use confluence_core::repository::{ApplicationRepository, IdentityRepository, SessionRepository};

use crate::error::FlowError;

/// Where the applicant currently is in the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Form,
    Authenticate,
    Success,
}

/// Result of a completed submission.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub application: Application,
    pub auth: AuthOutput,
}

/// One applicant's pass through the submission flow.
///
/// Holds the draft and the last visible error in memory; `close()`
/// discards both. Authentication failures and write failures keep the
/// flow in `Authenticate` — an identity created by a successful
/// registration whose document write then fails stays signed in.
pub struct SubmissionFlow<I, S, A>
where
    I: IdentityRepository + Clone,
    S: SessionRepository + Clone,
    A: ApplicationRepository,
{
    auth: IdentityService<I, S>,
    applications: A,
    state: FlowState,
    draft: Option<ApplicationDraft>,
    error: Option<String>,
}

impl<I, S, A> SubmissionFlow<I, S, A>
where
    I: IdentityRepository + Clone,
    S: SessionRepository + Clone,
    A: ApplicationRepository,
{
    pub fn new(auth: IdentityService<I, S>, applications: A) -> Self {
        Self {
            auth,
            applications,
            state: FlowState::Form,
            draft: None,
            error: None,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn draft(&self) -> Option<&ApplicationDraft> {
        self.draft.as_ref()
    }

    /// The last error to show inline, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Validate and accept the form, moving on to authentication.
    ///
    /// An invalid draft records a visible error and stays in `Form`.
    pub fn submit_form(&mut self, draft: ApplicationDraft) -> ConfluenceResult<()> {
        self.ensure_state(FlowState::Form, "submitting the form")?;

        if let Err(e) = draft.validate() {
            self.error = Some(e.to_string());
            return Err(e);
        }

        self.error = None;
        self.draft = Some(draft);
        self.state = FlowState::Authenticate;
        Ok(())
    }

    /// Return from authentication to the form, keeping the draft for
    /// editing.
    pub fn back(&mut self) -> ConfluenceResult<()> {
        self.ensure_state(FlowState::Authenticate, "going back")?;
        self.error = None;
        self.state = FlowState::Form;
        Ok(())
    }

    /// Register a new password account and submit the application.
    pub async fn register_with_password(
        &mut self,
        email: &str,
        password: &str,
    ) -> ConfluenceResult<SubmissionOutcome> {
        self.ensure_state(FlowState::Authenticate, "registration")?;
        let display_name = self.draft.as_ref().map(|d| d.name.clone());

        let auth = match self
            .auth
            .sign_up_with_password(email, password, display_name)
            .await
        {
            Ok(out) => out,
            Err(e) => {
                self.error = Some(e.to_string());
                return Err(e);
            }
        };

        self.finish(auth).await
    }

    /// Sign in with a federated provider and submit the application.
    pub async fn sign_in_federated<P: FederatedProvider>(
        &mut self,
        provider: &P,
        user_agent: &str,
    ) -> ConfluenceResult<SubmissionOutcome> {
        self.ensure_state(FlowState::Authenticate, "federated sign-in")?;

        let auth = match self.auth.sign_in_federated(provider, user_agent).await {
            Ok(out) => out,
            Err(e) => {
                self.error = Some(e.to_string());
                return Err(e);
            }
        };

        self.finish(auth).await
    }

    /// Discard all in-memory form state.
    pub fn close(&mut self) {
        self.state = FlowState::Form;
        self.draft = None;
        self.error = None;
    }

    /// Create the application document for a freshly signed-in
    /// identity. A write failure stays in `Authenticate` with the
    /// identity still signed in; there is no rollback.
    async fn finish(&mut self, auth: AuthOutput) -> ConfluenceResult<SubmissionOutcome> {
        // submit_form always stores a draft before Authenticate.
        let draft = self.draft.clone().ok_or(FlowError::WrongState {
            operation: "submission",
        })?;

        let application = match self
            .applications
            .create(CreateApplication {
                user_id: auth.identity.id,
                draft,
            })
            .await
        {
            Ok(app) => app,
            Err(e) => {
                self.error = Some(e.to_string());
                return Err(e);
            }
        };

        tracing::info!(
            application_id = %application.id,
            identity_id = %auth.identity.id,
            "application submitted"
        );

        self.error = None;
        self.state = FlowState::Success;
        Ok(SubmissionOutcome { application, auth })
    }

    fn ensure_state(&self, expected: FlowState, operation: &'static str) -> Result<(), FlowError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(FlowError::WrongState { operation })
        }
    }
}
