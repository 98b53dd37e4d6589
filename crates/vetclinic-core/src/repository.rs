//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. `get_by_id`, `update` and
//! `delete` fail with [`ClinicError::NotFound`](crate::ClinicError)
//! when the id does not resolve. Link operations treat links as sets.

use uuid::Uuid;

use crate::error::ClinicResult;
use crate::models::{
    client::{Client, CreateClient, UpdateClient},
    medicine::{CreateMedicine, Medicine, UpdateMedicine},
    pet::{CreatePet, Pet, UpdatePet},
    product::{CreateProduct, Product, UpdateProduct},
    provider::{CreateProvider, Provider, UpdateProvider},
    vet::{CreateVet, UpdateVet, Vet},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Owners and suppliers
// ---------------------------------------------------------------------------

pub trait ClientRepository: Send + Sync {
    fn create(&self, input: CreateClient) -> impl Future<Output = ClinicResult<Client>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = ClinicResult<Client>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateClient,
    ) -> impl Future<Output = ClinicResult<Client>> + Send;
    /// Also deletes the client's pets and every link touching them.
    fn delete(&self, id: Uuid) -> impl Future<Output = ClinicResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = ClinicResult<PaginatedResult<Client>>> + Send;

    /// Record that a client bought a product (creates a `purchased`
    /// edge). A no-op when the link already exists.
    fn add_product(
        &self,
        client_id: Uuid,
        product_id: Uuid,
    ) -> impl Future<Output = ClinicResult<()>> + Send;

    /// Remove the named product links. Ids not linked are ignored.
    fn remove_products(
        &self,
        client_id: Uuid,
        product_ids: &[Uuid],
    ) -> impl Future<Output = ClinicResult<()>> + Send;

    fn get_products(
        &self,
        client_id: Uuid,
    ) -> impl Future<Output = ClinicResult<Vec<Product>>> + Send;
}

pub trait ProviderRepository: Send + Sync {
    fn create(
        &self,
        input: CreateProvider,
    ) -> impl Future<Output = ClinicResult<Provider>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = ClinicResult<Provider>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateProvider,
    ) -> impl Future<Output = ClinicResult<Provider>> + Send;
    /// Products keep existing with their provider cleared.
    fn delete(&self, id: Uuid) -> impl Future<Output = ClinicResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = ClinicResult<PaginatedResult<Provider>>> + Send;
}

pub trait ProductRepository: Send + Sync {
    fn create(
        &self,
        input: CreateProduct,
    ) -> impl Future<Output = ClinicResult<Product>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = ClinicResult<Product>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateProduct,
    ) -> impl Future<Output = ClinicResult<Product>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = ClinicResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = ClinicResult<PaginatedResult<Product>>> + Send;
    fn list_by_provider(
        &self,
        provider_id: Uuid,
    ) -> impl Future<Output = ClinicResult<Vec<Product>>> + Send;
}

// ---------------------------------------------------------------------------
// Clinical records
// ---------------------------------------------------------------------------

pub trait VetRepository: Send + Sync {
    fn create(&self, input: CreateVet) -> impl Future<Output = ClinicResult<Vet>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = ClinicResult<Vet>> + Send;
    fn update(&self, id: Uuid, input: UpdateVet)
    -> impl Future<Output = ClinicResult<Vet>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = ClinicResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = ClinicResult<PaginatedResult<Vet>>> + Send;
}

pub trait MedicineRepository: Send + Sync {
    fn create(
        &self,
        input: CreateMedicine,
    ) -> impl Future<Output = ClinicResult<Medicine>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = ClinicResult<Medicine>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateMedicine,
    ) -> impl Future<Output = ClinicResult<Medicine>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = ClinicResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = ClinicResult<PaginatedResult<Medicine>>> + Send;
}

pub trait PetRepository: Send + Sync {
    fn create(&self, input: CreatePet) -> impl Future<Output = ClinicResult<Pet>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = ClinicResult<Pet>> + Send;
    fn update(&self, id: Uuid, input: UpdatePet)
    -> impl Future<Output = ClinicResult<Pet>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = ClinicResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = ClinicResult<PaginatedResult<Pet>>> + Send;
    fn list_by_client(
        &self,
        client_id: Uuid,
    ) -> impl Future<Output = ClinicResult<Vec<Pet>>> + Send;

    /// Prescribe a medicine to a pet (creates a `prescribed` edge).
    fn add_medicine(
        &self,
        pet_id: Uuid,
        medicine_id: Uuid,
    ) -> impl Future<Output = ClinicResult<()>> + Send;
    fn remove_medicines(
        &self,
        pet_id: Uuid,
        medicine_ids: &[Uuid],
    ) -> impl Future<Output = ClinicResult<()>> + Send;
    fn get_medicines(
        &self,
        pet_id: Uuid,
    ) -> impl Future<Output = ClinicResult<Vec<Medicine>>> + Send;

    /// Assign a vet to a pet (creates an `attended_by` edge).
    fn add_vet(
        &self,
        pet_id: Uuid,
        vet_id: Uuid,
    ) -> impl Future<Output = ClinicResult<()>> + Send;
    fn remove_vets(
        &self,
        pet_id: Uuid,
        vet_ids: &[Uuid],
    ) -> impl Future<Output = ClinicResult<()>> + Send;
    fn get_vets(&self, pet_id: Uuid) -> impl Future<Output = ClinicResult<Vec<Vet>>> + Send;
}
