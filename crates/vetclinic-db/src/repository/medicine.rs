//! SurrealDB implementation of [`MedicineRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use vetclinic_core::error::ClinicResult;
use vetclinic_core::models::medicine::{CreateMedicine, Medicine, UpdateMedicine};
use vetclinic_core::repository::{MedicineRepository, PaginatedResult, Pagination};

use super::{PRESCRIBED, count, ensure_exists, parse_uuid};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct MedicineRow {
    name: String,
    description: String,
    dose: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MedicineRow {
    fn into_medicine(self, id: Uuid) -> Medicine {
        Medicine {
            id,
            name: self.name,
            description: self.description,
            dose: self.dose,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Also read by the pet repository when listing prescriptions.
#[derive(Debug, SurrealValue)]
pub(crate) struct MedicineRowWithId {
    record_id: String,
    name: String,
    description: String,
    dose: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MedicineRowWithId {
    pub(crate) fn try_into_medicine(self) -> Result<Medicine, DbError> {
        Ok(Medicine {
            id: parse_uuid(&self.record_id, "medicine")?,
            name: self.name,
            description: self.description,
            dose: self.dose,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Medicine repository.
#[derive(Clone)]
pub struct SurrealMedicineRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealMedicineRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> MedicineRepository for SurrealMedicineRepository<C> {
    async fn create(&self, input: CreateMedicine) -> ClinicResult<Medicine> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('medicine', $id) SET \
                 name = $name, description = $description, dose = $dose",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("description", input.description))
            .bind(("dose", input.dose))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<MedicineRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("medicine", id_str))?;

        Ok(row.into_medicine(id))
    }

    async fn get_by_id(&self, id: Uuid) -> ClinicResult<Medicine> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('medicine', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MedicineRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("medicine", id_str))?;

        Ok(row.into_medicine(id))
    }

    async fn update(&self, id: Uuid, input: UpdateMedicine) -> ClinicResult<Medicine> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.dose.is_some() {
            sets.push("dose = $dose");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('medicine', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(dose) = input.dose {
            builder = builder.bind(("dose", dose));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<MedicineRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("medicine", id_str))?;

        Ok(row.into_medicine(id))
    }

    async fn delete(&self, id: Uuid) -> ClinicResult<()> {
        ensure_exists(&self.db, "medicine", id).await?;

        let query = format!(
            "{} DELETE type::record('medicine', $id);",
            PRESCRIBED.detach_statement("medicine"),
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

    async fn list(&self, pagination: Pagination) -> ClinicResult<PaginatedResult<Medicine>> {
        let total = count(&self.db, "medicine").await?;

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM medicine \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MedicineRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_medicine())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
