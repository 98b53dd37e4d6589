//! SurrealDB implementation of [`ProviderRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use vetclinic_core::error::ClinicResult;
use vetclinic_core::models::provider::{CreateProvider, Provider, UpdateProvider};
use vetclinic_core::repository::{PaginatedResult, Pagination, ProviderRepository};

use super::{count, ensure_exists, parse_uuid};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ProviderRow {
    name: String,
    email: String,
    address: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProviderRow {
    fn into_provider(self, id: Uuid) -> Provider {
        Provider {
            id,
            name: self.name,
            email: self.email,
            address: self.address,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, SurrealValue)]
struct ProviderRowWithId {
    record_id: String,
    name: String,
    email: String,
    address: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProviderRowWithId {
    fn try_into_provider(self) -> Result<Provider, DbError> {
        Ok(Provider {
            id: parse_uuid(&self.record_id, "provider")?,
            name: self.name,
            email: self.email,
            address: self.address,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Provider repository.
#[derive(Clone)]
pub struct SurrealProviderRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealProviderRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ProviderRepository for SurrealProviderRepository<C> {
    async fn create(&self, input: CreateProvider) -> ClinicResult<Provider> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('provider', $id) SET \
                 name = $name, email = $email, address = $address",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("email", input.email))
            .bind(("address", input.address))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<ProviderRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("provider", id_str))?;

        Ok(row.into_provider(id))
    }

    async fn get_by_id(&self, id: Uuid) -> ClinicResult<Provider> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('provider', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProviderRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("provider", id_str))?;

        Ok(row.into_provider(id))
    }

    async fn update(&self, id: Uuid, input: UpdateProvider) -> ClinicResult<Provider> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.email.is_some() {
            sets.push("email = $email");
        }
        if input.address.is_some() {
            sets.push("address = $address");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('provider', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(email) = input.email {
            builder = builder.bind(("email", email));
        }
        if let Some(address) = input.address {
            builder = builder.bind(("address", address));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<ProviderRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("provider", id_str))?;

        Ok(row.into_provider(id))
    }

    async fn delete(&self, id: Uuid) -> ClinicResult<()> {
        ensure_exists(&self.db, "provider", id).await?;

        // Products outlive their provider.
        self.db
            .query(
                "UPDATE product SET provider_id = NONE WHERE provider_id = $id; \
                 DELETE type::record('provider', $id);",
            )
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> ClinicResult<PaginatedResult<Provider>> {
        let total = count(&self.db, "provider").await?;

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM provider \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProviderRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_provider())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
