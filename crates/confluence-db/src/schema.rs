//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as their wire
//! strings with ASSERT constraints for validation. Applications are
//! stored flat, one document per application; the `kind` field is the
//! type discriminant (the original document shape calls it `type`,
//! which is a reserved word in SurrealQL).

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Identities
-- =======================================================================
DEFINE TABLE identity SCHEMAFULL;
DEFINE FIELD provider ON TABLE identity TYPE string \
    ASSERT $value IN ['password', 'federated', 'anonymous'];
DEFINE FIELD display_name ON TABLE identity TYPE option<string>;
DEFINE FIELD email ON TABLE identity TYPE option<string>;
DEFINE FIELD avatar_url ON TABLE identity TYPE option<string>;
DEFINE FIELD password_hash ON TABLE identity TYPE option<string>;
DEFINE FIELD created_at ON TABLE identity TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_identity_email ON TABLE identity COLUMNS email;

-- =======================================================================
-- Sessions (applicant and admin)
-- =======================================================================
DEFINE TABLE session SCHEMAFULL;
DEFINE FIELD kind ON TABLE session TYPE string \
    ASSERT $value IN ['applicant', 'admin'];
DEFINE FIELD identity_id ON TABLE session TYPE option<string>;
DEFINE FIELD token_hash ON TABLE session TYPE string;
DEFINE FIELD expires_at ON TABLE session TYPE datetime;
DEFINE FIELD created_at ON TABLE session TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_session_token ON TABLE session \
    COLUMNS token_hash UNIQUE;

-- =======================================================================
-- Applications (flat, one document per application)
-- =======================================================================
DEFINE TABLE application SCHEMAFULL;
DEFINE FIELD user_id ON TABLE application TYPE string;
DEFINE FIELD kind ON TABLE application TYPE string \
    ASSERT $value IN ['entrepreneur', 'investor'];
DEFINE FIELD name ON TABLE application TYPE string;
DEFINE FIELD phone ON TABLE application TYPE string;
DEFINE FIELD email ON TABLE application TYPE string;
DEFINE FIELD linkedin ON TABLE application TYPE string;
DEFINE FIELD location ON TABLE application TYPE option<string>;
DEFINE FIELD bio ON TABLE application TYPE option<string>;
-- Entrepreneur-only fields
DEFINE FIELD startup_name ON TABLE application TYPE option<string>;
DEFINE FIELD startup_stage ON TABLE application TYPE option<string>;
DEFINE FIELD raised_funding ON TABLE application TYPE option<string>;
DEFINE FIELD startup_location ON TABLE application TYPE option<string>;
DEFINE FIELD website_link ON TABLE application TYPE option<string>;
DEFINE FIELD founding_year ON TABLE application TYPE option<string>;
DEFINE FIELD team_size ON TABLE application TYPE option<string>;
DEFINE FIELD what_do_you_expect ON TABLE application TYPE option<string>;
DEFINE FIELD what_can_you_offer ON TABLE application TYPE option<string>;
DEFINE FIELD college ON TABLE application TYPE option<string>;
DEFINE FIELD graduation_year ON TABLE application TYPE option<string>;
-- Investor-only fields
DEFINE FIELD is_iit_alumnus ON TABLE application TYPE option<string>;
DEFINE FIELD willing_to_travel_ncr ON TABLE application \
    TYPE option<string>;
DEFINE FIELD individual_or_firm ON TABLE application \
    TYPE option<string>;
DEFINE FIELD startup_interests ON TABLE application \
    TYPE option<string>;
DEFINE FIELD willing_to_mentor ON TABLE application \
    TYPE option<string>;
-- Review lifecycle
DEFINE FIELD status ON TABLE application TYPE string \
    ASSERT $value IN ['pending', 'approved', 'rejected'];
DEFINE FIELD created_at ON TABLE application TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE application TYPE option<datetime>;
-- No uniqueness constraint on user_id: one application per identity
-- is enforced by convention, not by the store.
DEFINE INDEX idx_application_user ON TABLE application COLUMNS user_id;
DEFINE INDEX idx_application_status ON TABLE application COLUMNS status;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}
