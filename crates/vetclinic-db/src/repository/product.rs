//! SurrealDB implementation of [`ProductRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use vetclinic_core::error::ClinicResult;
use vetclinic_core::models::product::{CreateProduct, Product, UpdateProduct};
use vetclinic_core::repository::{PaginatedResult, Pagination, ProductRepository};

use super::{PURCHASED, count, ensure_exists, parse_uuid};
use crate::error::DbError;

fn parse_provider(raw: Option<String>) -> Result<Option<Uuid>, DbError> {
    raw.as_deref()
        .map(|p| parse_uuid(p, "provider"))
        .transpose()
}

#[derive(Debug, SurrealValue)]
struct ProductRow {
    name: String,
    product_type: String,
    price: f64,
    provider_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductRow {
    fn try_into_product(self, id: Uuid) -> Result<Product, DbError> {
        Ok(Product {
            id,
            name: self.name,
            kind: self.product_type,
            price: self.price,
            provider_id: parse_provider(self.provider_id)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Also read by the client repository when listing purchases.
#[derive(Debug, SurrealValue)]
pub(crate) struct ProductRowWithId {
    record_id: String,
    name: String,
    product_type: String,
    price: f64,
    provider_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductRowWithId {
    pub(crate) fn try_into_product(self) -> Result<Product, DbError> {
        Ok(Product {
            id: parse_uuid(&self.record_id, "product")?,
            name: self.name,
            kind: self.product_type,
            price: self.price,
            provider_id: parse_provider(self.provider_id)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Product repository.
#[derive(Clone)]
pub struct SurrealProductRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealProductRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ProductRepository for SurrealProductRepository<C> {
    async fn create(&self, input: CreateProduct) -> ClinicResult<Product> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let provider_id = input.provider_id.map(|p| p.to_string());

        let result = self
            .db
            .query(
                "CREATE type::record('product', $id) SET \
                 name = $name, product_type = $product_type, \
                 price = $price, provider_id = $provider_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("product_type", input.kind))
            .bind(("price", input.price))
            .bind(("provider_id", provider_id))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<ProductRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("product", id_str))?;

        Ok(row.try_into_product(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> ClinicResult<Product> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('product', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProductRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("product", id_str))?;

        Ok(row.try_into_product(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdateProduct) -> ClinicResult<Product> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.kind.is_some() {
            sets.push("product_type = $product_type");
        }
        if input.price.is_some() {
            sets.push("price = $price");
        }
        if input.provider_id.is_some() {
            sets.push("provider_id = $provider_id");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('product', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(kind) = input.kind {
            builder = builder.bind(("product_type", kind));
        }
        if let Some(price) = input.price {
            builder = builder.bind(("price", price));
        }
        if let Some(provider_id) = input.provider_id {
            builder = builder.bind(("provider_id", provider_id.to_string()));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<ProductRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("product", id_str))?;

        Ok(row.try_into_product(id)?)
    }

    async fn delete(&self, id: Uuid) -> ClinicResult<()> {
        ensure_exists(&self.db, "product", id).await?;

        let query = format!(
            "{} DELETE type::record('product', $id);",
            PURCHASED.detach_statement("product"),
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

    async fn list(&self, pagination: Pagination) -> ClinicResult<PaginatedResult<Product>> {
        let total = count(&self.db, "product").await?;

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM product \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProductRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_product())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn list_by_provider(&self, provider_id: Uuid) -> ClinicResult<Vec<Product>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM product \
                 WHERE provider_id = $provider_id \
                 ORDER BY created_at ASC",
            )
            .bind(("provider_id", provider_id.to_string()))
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
