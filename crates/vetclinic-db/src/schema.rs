//! Clinic schema and its versioned migrations.
//!
//! All table definitions use SCHEMAFULL mode. UUIDs and calendar dates
//! are stored as strings; the specialty enum is stored as its display
//! label with an ASSERT constraint.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::{debug, info};

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
// Schema v1
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Clients
-- =======================================================================
DEFINE TABLE client SCHEMAFULL;
DEFINE FIELD name ON TABLE client TYPE string;
DEFINE FIELD phone ON TABLE client TYPE string;
DEFINE FIELD email ON TABLE client TYPE string;
DEFINE FIELD address ON TABLE client TYPE option<string>;
DEFINE FIELD created_at ON TABLE client TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE client TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Providers
-- =======================================================================
DEFINE TABLE provider SCHEMAFULL;
DEFINE FIELD name ON TABLE provider TYPE string;
DEFINE FIELD email ON TABLE provider TYPE string;
DEFINE FIELD address ON TABLE provider TYPE option<string>;
DEFINE FIELD created_at ON TABLE provider TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE provider TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Vets
-- =======================================================================
DEFINE TABLE vet SCHEMAFULL;
DEFINE FIELD name ON TABLE vet TYPE string;
DEFINE FIELD phone ON TABLE vet TYPE string;
DEFINE FIELD email ON TABLE vet TYPE string;
DEFINE FIELD specialty ON TABLE vet TYPE string \
    ASSERT $value IN ['General', 'Cirugía', 'Dermatología', \
    'Ortopedia', 'Cardiología', 'Oftalmología', 'Neurología'];
DEFINE FIELD created_at ON TABLE vet TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE vet TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Products (provider reference cleared when the provider goes away)
-- =======================================================================
DEFINE TABLE product SCHEMAFULL;
DEFINE FIELD name ON TABLE product TYPE string;
DEFINE FIELD product_type ON TABLE product TYPE string;
DEFINE FIELD price ON TABLE product TYPE float;
DEFINE FIELD provider_id ON TABLE product TYPE option<string>;
DEFINE FIELD created_at ON TABLE product TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE product TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_product_provider ON TABLE product \
    COLUMNS provider_id;

-- =======================================================================
-- Medicines
-- =======================================================================
DEFINE TABLE medicine SCHEMAFULL;
DEFINE FIELD name ON TABLE medicine TYPE string;
DEFINE FIELD description ON TABLE medicine TYPE string;
DEFINE FIELD dose ON TABLE medicine TYPE float;
DEFINE FIELD created_at ON TABLE medicine TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE medicine TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Pets (owned by a client)
-- =======================================================================
DEFINE TABLE pet SCHEMAFULL;
DEFINE FIELD name ON TABLE pet TYPE string;
DEFINE FIELD breed ON TABLE pet TYPE string;
DEFINE FIELD birthday ON TABLE pet TYPE string;
DEFINE FIELD weight ON TABLE pet TYPE float;
DEFINE FIELD client_id ON TABLE pet TYPE string;
DEFINE FIELD created_at ON TABLE pet TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE pet TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_pet_client ON TABLE pet COLUMNS client_id;

-- =======================================================================
-- Graph Edge Tables (relations)
-- =======================================================================

-- Pet -> Medicine prescriptions
DEFINE TABLE prescribed TYPE RELATION SCHEMAFULL;
DEFINE INDEX idx_prescribed_pair ON TABLE prescribed \
    COLUMNS in, out UNIQUE;

-- Pet -> Vet care assignments
DEFINE TABLE attended_by TYPE RELATION SCHEMAFULL;
DEFINE INDEX idx_attended_by_pair ON TABLE attended_by \
    COLUMNS in, out UNIQUE;

-- Client -> Product purchases
DEFINE TABLE purchased TYPE RELATION SCHEMAFULL;
DEFINE INDEX idx_purchased_pair ON TABLE purchased \
    COLUMNS in, out UNIQUE;
";

// -----------------------------------------------------------------------
// Runner
// -----------------------------------------------------------------------

/// Highest applied migration version, `0` for a fresh database.
async fn applied_version<C: Connection>(db: &Surreal<C>) -> Result<u32, DbError> {
    let mut result = db
        .query("SELECT version FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    Ok(records.first().map(|m| m.version).unwrap_or(0))
}

/// Apply one migration together with its `_migration` row.
async fn apply<C: Connection>(db: &Surreal<C>, migration: &Migration) -> Result<(), DbError> {
    let sql = format!(
        "BEGIN TRANSACTION;\n{}\n\
         CREATE _migration SET version = $version, name = $name;\n\
         COMMIT TRANSACTION;",
        migration.sql
    );
    db.query(sql)
        .bind(("version", migration.version))
        .bind(("name", migration.name))
        .await?
        .check()
        .map_err(|e| {
            DbError::Migration(format!(
                "v{} '{}': {e}",
                migration.version, migration.name
            ))
        })?;
    Ok(())
}

/// Bring the clinic schema up to date and return its version.
pub(crate) async fn migrate<C: Connection>(db: &Surreal<C>) -> Result<u32, DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let from = applied_version(db).await?;
    let mut version = from;
    for migration in MIGRATIONS.iter().filter(|m| m.version > from) {
        debug!(version = migration.version, name = migration.name, "Applying migration");
        apply(db, migration).await?;
        version = migration.version;
    }

    if version == from {
        debug!(version, "Clinic schema up to date");
    } else {
        info!(from, to = version, "Clinic schema migrated");
    }
    Ok(version)
}
