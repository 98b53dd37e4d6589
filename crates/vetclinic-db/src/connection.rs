//! Opening the clinic database: connect, select, migrate.
//!
//! A [`ClinicDb`] only exists once its schema is current, so every
//! [`SurrealClinicStore`] handed out by it works against migrated tables.

use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use surrealdb::{Connection, Surreal};
use tracing::info;

use crate::error::DbError;
use crate::schema;
use crate::store::SurrealClinicStore;

/// Where the clinic records live and how to sign in.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// WebSocket address, e.g. `127.0.0.1:8000`.
    pub url: String,
    pub namespace: String,
    pub database: String,
    /// Root credentials.
    pub username: String,
    pub password: String,
}

/// A SurrealDB handle whose clinic schema is up to date.
#[derive(Clone)]
pub struct ClinicDb<C: Connection> {
    db: Surreal<C>,
    schema_version: u32,
}

impl ClinicDb<Client> {
    /// Connect over WebSocket as root, select the configured namespace
    /// and database, then migrate.
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        let db = Surreal::new::<Ws>(&config.url).await?;
        db.signin(Root {
            username: config.username.clone(),
            password: config.password.clone(),
        })
        .await?;
        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await?;

        let clinic = Self::prepare(db).await?;
        info!(
            url = %config.url,
            namespace = %config.namespace,
            database = %config.database,
            schema_version = clinic.schema_version,
            "Clinic database ready"
        );
        Ok(clinic)
    }
}

impl<C: Connection> ClinicDb<C> {
    /// Migrate an already selected database.
    pub async fn prepare(db: Surreal<C>) -> Result<Self, DbError> {
        let schema_version = schema::migrate(&db).await?;
        Ok(Self { db, schema_version })
    }

    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    /// Repositories over this database.
    pub fn store(&self) -> SurrealClinicStore<C> {
        SurrealClinicStore::new(self.db.clone())
    }
}
