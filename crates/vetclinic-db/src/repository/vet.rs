//! SurrealDB implementation of [`VetRepository`].
//!
//! The specialty is stored as its display label and parsed back on read.

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use vetclinic_core::error::ClinicResult;
use vetclinic_core::models::vet::{CreateVet, Specialty, UpdateVet, Vet};
use vetclinic_core::repository::{PaginatedResult, Pagination, VetRepository};

use super::{ATTENDED_BY, count, ensure_exists, parse_uuid};
use crate::error::DbError;

fn parse_specialty(raw: &str) -> Result<Specialty, DbError> {
    raw.parse()
        .map_err(|e| DbError::Corrupt(format!("invalid vet specialty: {e}")))
}

#[derive(Debug, SurrealValue)]
struct VetRow {
    name: String,
    phone: String,
    email: String,
    specialty: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl VetRow {
    fn try_into_vet(self, id: Uuid) -> Result<Vet, DbError> {
        Ok(Vet {
            id,
            name: self.name,
            phone: self.phone,
            email: self.email,
            specialty: parse_specialty(&self.specialty)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Also read by the pet repository when listing assigned vets.
#[derive(Debug, SurrealValue)]
pub(crate) struct VetRowWithId {
    record_id: String,
    name: String,
    phone: String,
    email: String,
    specialty: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl VetRowWithId {
    pub(crate) fn try_into_vet(self) -> Result<Vet, DbError> {
        Ok(Vet {
            id: parse_uuid(&self.record_id, "vet")?,
            name: self.name,
            phone: self.phone,
            email: self.email,
            specialty: parse_specialty(&self.specialty)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Vet repository.
#[derive(Clone)]
pub struct SurrealVetRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealVetRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> VetRepository for SurrealVetRepository<C> {
    async fn create(&self, input: CreateVet) -> ClinicResult<Vet> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('vet', $id) SET \
                 name = $name, phone = $phone, email = $email, \
                 specialty = $specialty",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("phone", input.phone))
            .bind(("email", input.email))
            .bind(("specialty", input.specialty.label()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<VetRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("vet", id_str))?;

        Ok(row.try_into_vet(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> ClinicResult<Vet> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('vet', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<VetRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("vet", id_str))?;

        Ok(row.try_into_vet(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdateVet) -> ClinicResult<Vet> {
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
        if input.specialty.is_some() {
            sets.push("specialty = $specialty");
        }
        sets.push("updated_at = time::now()");

        let query = format!("UPDATE type::record('vet', $id) SET {}", sets.join(", "));

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
        if let Some(specialty) = input.specialty {
            builder = builder.bind(("specialty", specialty.label()));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<VetRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("vet", id_str))?;

        Ok(row.try_into_vet(id)?)
    }

    async fn delete(&self, id: Uuid) -> ClinicResult<()> {
        ensure_exists(&self.db, "vet", id).await?;

        let query = format!(
            "{} DELETE type::record('vet', $id);",
            ATTENDED_BY.detach_statement("vet"),
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

    async fn list(&self, pagination: Pagination) -> ClinicResult<PaginatedResult<Vet>> {
        let total = count(&self.db, "vet").await?;

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM vet \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<VetRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_vet())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
