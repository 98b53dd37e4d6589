//! SurrealDB implementation of [`ClientRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use vetclinic_core::error::ClinicResult;
use vetclinic_core::models::client::{Client, CreateClient, UpdateClient};
use vetclinic_core::models::product::Product;
use vetclinic_core::repository::{ClientRepository, PaginatedResult, Pagination};

use super::product::ProductRowWithId;
use super::{ATTENDED_BY, PRESCRIBED, PURCHASED, count, ensure_exists, parse_uuid};
use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct ClientRow {
    name: String,
    phone: String,
    email: String,
    address: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ClientRow {
    fn into_client(self, id: Uuid) -> Client {
        Client {
            id,
            name: self.name,
            phone: self.phone,
            email: self.email,
            address: self.address,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct ClientRowWithId {
    record_id: String,
    name: String,
    phone: String,
    email: String,
    address: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ClientRowWithId {
    fn try_into_client(self) -> Result<Client, DbError> {
        Ok(Client {
            id: parse_uuid(&self.record_id, "client")?,
            name: self.name,
            phone: self.phone,
            email: self.email,
            address: self.address,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Client repository.
#[derive(Clone)]
pub struct SurrealClientRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealClientRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ClientRepository for SurrealClientRepository<C> {
    async fn create(&self, input: CreateClient) -> ClinicResult<Client> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('client', $id) SET \
                 name = $name, phone = $phone, email = $email, \
                 address = $address",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("phone", input.phone))
            .bind(("email", input.email))
            .bind(("address", input.address))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<ClientRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("client", id_str))?;

        Ok(row.into_client(id))
    }

    async fn get_by_id(&self, id: Uuid) -> ClinicResult<Client> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('client', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ClientRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("client", id_str))?;

        Ok(row.into_client(id))
    }

    async fn update(&self, id: Uuid, input: UpdateClient) -> ClinicResult<Client> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.phone.is_some() {
            sets.push("phone = $phone");
        }
        if input.email.is_some() {
            sets.push("email = $email");
        }
        if input.address.is_some() {
            sets.push("address = $address");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('client', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(phone) = input.phone {
            builder = builder.bind(("phone", phone));
        }
        if let Some(email) = input.email {
            builder = builder.bind(("email", email));
        }
        if let Some(address) = input.address {
            builder = builder.bind(("address", address));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<ClientRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("client", id_str))?;

        Ok(row.into_client(id))
    }

    async fn delete(&self, id: Uuid) -> ClinicResult<()> {
        ensure_exists(&self.db, "client", id).await?;

        // Detach and delete the client's pets, then its purchases, then
        // the client itself.
        let pets = "(SELECT VALUE id FROM pet WHERE client_id = $id)";
        let query = format!(
            "DELETE {prescribed} WHERE in IN {pets}; \
             DELETE {attended_by} WHERE in IN {pets}; \
             DELETE pet WHERE client_id = $id; \
             {purchases} \
             DELETE type::record('client', $id);",
            prescribed = PRESCRIBED.relation,
            attended_by = ATTENDED_BY.relation,
            purchases = PURCHASED.detach_statement("client"),
        );

        self.db
            .query(query)
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> ClinicResult<PaginatedResult<Client>> {
        let total = count(&self.db, "client").await?;

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM client \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ClientRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_client())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn add_product(&self, client_id: Uuid, product_id: Uuid) -> ClinicResult<()> {
        PURCHASED.link(&self.db, client_id, product_id).await?;
        Ok(())
    }

    async fn remove_products(&self, client_id: Uuid, product_ids: &[Uuid]) -> ClinicResult<()> {
        PURCHASED.unlink(&self.db, client_id, product_ids).await?;
        Ok(())
    }

    async fn get_products(&self, client_id: Uuid) -> ClinicResult<Vec<Product>> {
        let mut result = self
            .db
            .query(PURCHASED.targets_query())
            .bind(("in_id", client_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProductRowWithId> = result.take(0).map_err(DbError::from)?;

        let products = rows
            .into_iter()
            .map(|row| row.try_into_product())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(products)
    }
}
