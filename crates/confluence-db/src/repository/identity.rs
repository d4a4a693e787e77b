//! SurrealDB implementation of [`IdentityRepository`].

use chrono::{DateTime, Utc};
use confluence_core::error::ConfluenceResult;
use confluence_core::models::identity::{CreateIdentity, Identity, IdentityProvider};
use confluence_core::repository::IdentityRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct IdentityRow {
    provider: String,
    display_name: Option<String>,
    email: Option<String>,
    avatar_url: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct IdentityRowWithId {
    record_id: String,
    provider: String,
    display_name: Option<String>,
    email: Option<String>,
    avatar_url: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct PasswordHashRow {
    password_hash: Option<String>,
}

fn parse_provider(s: &str) -> Result<IdentityProvider, DbError> {
    IdentityProvider::parse(s)
        .ok_or_else(|| DbError::Decode(format!("unknown identity provider: {s}")))
}

impl IdentityRow {
    fn into_identity(self, id: Uuid) -> Result<Identity, DbError> {
        Ok(Identity {
            id,
            provider: parse_provider(&self.provider)?,
            display_name: self.display_name,
            email: self.email,
            avatar_url: self.avatar_url,
            created_at: self.created_at,
        })
    }
}

impl IdentityRowWithId {
    fn try_into_identity(self) -> Result<Identity, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        Ok(Identity {
            id,
            provider: parse_provider(&self.provider)?,
            display_name: self.display_name,
            email: self.email,
            avatar_url: self.avatar_url,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the Identity repository.
///
/// Password hashes never leave this layer except through the
/// dedicated [`IdentityRepository::password_hash`] accessor.
#[derive(Clone)]
pub struct SurrealIdentityRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealIdentityRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> IdentityRepository for SurrealIdentityRepository<C> {
    async fn create(&self, input: CreateIdentity) -> ConfluenceResult<Identity> {
        // New-account-only semantics: an email already bound to an
        // identity cannot be registered again.
        if let Some(ref email) = input.email {
            if self.get_by_email(email).await?.is_some() {
                return Err(DbError::AlreadyExists {
                    entity: "identity".into(),
                }
                .into());
            }
        }

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('identity', $id) SET \
                 provider = $provider, \
                 display_name = $display_name, \
                 email = $email, \
                 avatar_url = $avatar_url, \
                 password_hash = $password_hash",
            )
            .bind(("id", id_str.clone()))
            .bind(("provider", input.provider.as_str().to_string()))
            .bind(("display_name", input.display_name))
            .bind(("email", input.email))
            .bind(("avatar_url", input.avatar_url))
            .bind(("password_hash", input.password_hash))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<IdentityRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "identity".into(),
            id: id_str,
        })?;

        Ok(row.into_identity(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> ConfluenceResult<Identity> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('identity', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<IdentityRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "identity".into(),
            id: id_str,
        })?;

        Ok(row.into_identity(id)?)
    }

    async fn get_by_email(&self, email: &str) -> ConfluenceResult<Option<Identity>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM identity \
                 WHERE email = $email",
            )
            .bind(("email", email.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<IdentityRowWithId> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.try_into_identity()?)),
            None => Ok(None),
        }
    }

    async fn password_hash(&self, id: Uuid) -> ConfluenceResult<Option<String>> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT password_hash FROM type::record('identity', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PasswordHashRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "identity".into(),
            id: id_str,
        })?;

        Ok(row.password_hash)
    }
}
