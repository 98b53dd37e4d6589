//! SurrealDB implementation of [`PetRepository`].
//!
//! Birthdays are stored as `YYYY-MM-DD` strings and the owning client as
//! its UUID string. Prescriptions and vet assignments are graph edges
//! (`prescribed`, `attended_by`) going out from the pet.

use chrono::{DateTime, NaiveDate, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use vetclinic_core::error::ClinicResult;
use vetclinic_core::models::medicine::Medicine;
use vetclinic_core::models::pet::{CreatePet, Pet, UpdatePet};
use vetclinic_core::models::vet::Vet;
use vetclinic_core::repository::{PaginatedResult, Pagination, PetRepository};

use super::medicine::MedicineRowWithId;
use super::vet::VetRowWithId;
use super::{ATTENDED_BY, PRESCRIBED, count, ensure_exists, parse_uuid};
use crate::error::DbError;

const BIRTHDAY_FORMAT: &str = "%Y-%m-%d";

fn parse_birthday(raw: &str) -> Result<NaiveDate, DbError> {
    NaiveDate::parse_from_str(raw, BIRTHDAY_FORMAT)
        .map_err(|e| DbError::Corrupt(format!("invalid pet birthday '{raw}': {e}")))
}

fn format_birthday(date: NaiveDate) -> String {
    date.format(BIRTHDAY_FORMAT).to_string()
}

#[derive(Debug, SurrealValue)]
struct PetRow {
    name: String,
    breed: String,
    birthday: String,
    weight: f64,
    client_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PetRow {
    fn try_into_pet(self, id: Uuid) -> Result<Pet, DbError> {
        Ok(Pet {
            id,
            name: self.name,
            breed: self.breed,
            birthday: parse_birthday(&self.birthday)?,
            weight: self.weight,
            client_id: parse_uuid(&self.client_id, "client")?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct PetRowWithId {
    record_id: String,
    name: String,
    breed: String,
    birthday: String,
    weight: f64,
    client_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PetRowWithId {
    fn try_into_pet(self) -> Result<Pet, DbError> {
        let id = parse_uuid(&self.record_id, "pet")?;
        PetRow {
            name: self.name,
            breed: self.breed,
            birthday: self.birthday,
            weight: self.weight,
            client_id: self.client_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .try_into_pet(id)
    }
}

/// SurrealDB implementation of the Pet repository.
#[derive(Clone)]
pub struct SurrealPetRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealPetRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> PetRepository for SurrealPetRepository<C> {
    async fn create(&self, input: CreatePet) -> ClinicResult<Pet> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('pet', $id) SET \
                 name = $name, breed = $breed, birthday = $birthday, \
                 weight = $weight, client_id = $client_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("breed", input.breed))
            .bind(("birthday", format_birthday(input.birthday)))
            .bind(("weight", input.weight))
            .bind(("client_id", input.client_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<PetRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("pet", id_str))?;

        Ok(row.try_into_pet(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> ClinicResult<Pet> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('pet', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PetRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("pet", id_str))?;

        Ok(row.try_into_pet(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdatePet) -> ClinicResult<Pet> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.breed.is_some() {
            sets.push("breed = $breed");
        }
        if input.birthday.is_some() {
            sets.push("birthday = $birthday");
        }
        if input.weight.is_some() {
            sets.push("weight = $weight");
        }
        if input.client_id.is_some() {
            sets.push("client_id = $client_id");
        }
        sets.push("updated_at = time::now()");

        let query = format!("UPDATE type::record('pet', $id) SET {}", sets.join(", "));

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(breed) = input.breed {
            builder = builder.bind(("breed", breed));
        }
        if let Some(birthday) = input.birthday {
            builder = builder.bind(("birthday", format_birthday(birthday)));
        }
        if let Some(weight) = input.weight {
            builder = builder.bind(("weight", weight));
        }
        if let Some(client_id) = input.client_id {
            builder = builder.bind(("client_id", client_id.to_string()));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<PetRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("pet", id_str))?;

        Ok(row.try_into_pet(id)?)
    }

    async fn delete(&self, id: Uuid) -> ClinicResult<()> {
        ensure_exists(&self.db, "pet", id).await?;

        let query = format!(
            "{} {} DELETE type::record('pet', $id);",
            PRESCRIBED.detach_statement("pet"),
            ATTENDED_BY.detach_statement("pet"),
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

    async fn list(&self, pagination: Pagination) -> ClinicResult<PaginatedResult<Pet>> {
        let total = count(&self.db, "pet").await?;

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM pet \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PetRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_pet())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn list_by_client(&self, client_id: Uuid) -> ClinicResult<Vec<Pet>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM pet \
                 WHERE client_id = $client_id \
                 ORDER BY created_at ASC",
            )
            .bind(("client_id", client_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PetRowWithId> = result.take(0).map_err(DbError::from)?;

        let pets = rows
            .into_iter()
            .map(|row| row.try_into_pet())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(pets)
    }

    async fn add_medicine(&self, pet_id: Uuid, medicine_id: Uuid) -> ClinicResult<()> {
        PRESCRIBED.link(&self.db, pet_id, medicine_id).await?;
        Ok(())
    }

    async fn remove_medicines(&self, pet_id: Uuid, medicine_ids: &[Uuid]) -> ClinicResult<()> {
        PRESCRIBED.unlink(&self.db, pet_id, medicine_ids).await?;
        Ok(())
    }

    async fn get_medicines(&self, pet_id: Uuid) -> ClinicResult<Vec<Medicine>> {
        let mut result = self
            .db
            .query(PRESCRIBED.targets_query())
            .bind(("in_id", pet_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MedicineRowWithId> = result.take(0).map_err(DbError::from)?;

        let medicines = rows
            .into_iter()
            .map(|row| row.try_into_medicine())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(medicines)
    }

    async fn add_vet(&self, pet_id: Uuid, vet_id: Uuid) -> ClinicResult<()> {
        ATTENDED_BY.link(&self.db, pet_id, vet_id).await?;
        Ok(())
    }

    async fn remove_vets(&self, pet_id: Uuid, vet_ids: &[Uuid]) -> ClinicResult<()> {
        ATTENDED_BY.unlink(&self.db, pet_id, vet_ids).await?;
        Ok(())
    }

    async fn get_vets(&self, pet_id: Uuid) -> ClinicResult<Vec<Vet>> {
        let mut result = self
            .db
            .query(ATTENDED_BY.targets_query())
            .bind(("in_id", pet_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<VetRowWithId> = result.take(0).map_err(DbError::from)?;

        let vets = rows
            .into_iter()
            .map(|row| row.try_into_vet())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(vets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn birthday_storage_format() {
        let date = NaiveDate::from_ymd_opt(2020, 3, 7).unwrap();
        assert_eq!(format_birthday(date), "2020-03-07");
        assert_eq!(parse_birthday("2020-03-07").unwrap(), date);
        assert!(matches!(parse_birthday("07/03/2020"), Err(DbError::Corrupt(_))));
    }
}
