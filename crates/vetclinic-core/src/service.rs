//! Clinic service: create/update/delete orchestration and link
//! management on top of the repository traits.
//!
//! Creating validates the submitted form and resolves its references
//! in one pass, so a reference to a missing client or provider comes
//! back as an ordinary field error next to any other failing field.

use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{ClinicError, ClinicResult};
use crate::models::{
    client::{Client, ClientForm},
    medicine::{Medicine, MedicineForm},
    pet::{Pet, PetForm},
    product::{Product, ProductForm},
    provider::{Provider, ProviderForm},
    vet::{Vet, VetForm},
};
use crate::repository::{
    ClientRepository, MedicineRepository, PaginatedResult, Pagination, PetRepository,
    ProductRepository, ProviderRepository, VetRepository,
};
use crate::validation::{FieldErrors, ValidationRules, fields, messages};

/// The full set of repositories a [`ClinicService`] works against.
pub trait ClinicStore: Send + Sync {
    type Clients: ClientRepository;
    type Providers: ProviderRepository;
    type Vets: VetRepository;
    type Products: ProductRepository;
    type Medicines: MedicineRepository;
    type Pets: PetRepository;

    fn clients(&self) -> &Self::Clients;
    fn providers(&self) -> &Self::Providers;
    fn vets(&self) -> &Self::Vets;
    fn products(&self) -> &Self::Products;
    fn medicines(&self) -> &Self::Medicines;
    fn pets(&self) -> &Self::Pets;
}

/// Clinic service.
///
/// Generic over the store so that the domain layer has no dependency
/// on the database crate.
pub struct ClinicService<S: ClinicStore> {
    store: S,
    rules: ValidationRules,
}

/// Turn a missing row into `false`, pass every other failure through.
fn exists<T>(lookup: ClinicResult<T>) -> ClinicResult<bool> {
    match lookup {
        Ok(_) => Ok(true),
        Err(ClinicError::NotFound { .. }) => Ok(false),
        Err(e) => Err(e),
    }
}

impl<S: ClinicStore> ClinicService<S> {
    pub fn new(store: S, rules: ValidationRules) -> Self {
        Self { store, rules }
    }

    // -------------------------------------------------------------------
    // Clients
    // -------------------------------------------------------------------

    pub async fn create_client(&self, form: ClientForm) -> ClinicResult<Client> {
        let input = form.parse()?;
        let client = self.store.clients().create(input).await?;
        info!(client_id = %client.id, "Client created");
        Ok(client)
    }

    pub async fn get_client(&self, id: Uuid) -> ClinicResult<Client> {
        self.store.clients().get_by_id(id).await
    }

    pub async fn list_clients(
        &self,
        pagination: Pagination,
    ) -> ClinicResult<PaginatedResult<Client>> {
        self.store.clients().list(pagination).await
    }

    pub async fn update_client(&self, id: Uuid, form: ClientForm) -> ClinicResult<Client> {
        let client = self.store.clients().update(id, form.into_update()).await?;
        debug!(client_id = %id, "Client updated");
        Ok(client)
    }

    pub async fn delete_client(&self, id: Uuid) -> ClinicResult<()> {
        self.store.clients().delete(id).await?;
        info!(client_id = %id, "Client deleted with its pets");
        Ok(())
    }

    pub async fn client_pets(&self, client_id: Uuid) -> ClinicResult<Vec<Pet>> {
        self.store.clients().get_by_id(client_id).await?;
        self.store.pets().list_by_client(client_id).await
    }

    pub async fn add_product_to_client(
        &self,
        client_id: Uuid,
        product_id: Uuid,
    ) -> ClinicResult<()> {
        self.store.clients().add_product(client_id, product_id).await?;
        debug!(%client_id, %product_id, "Product linked to client");
        Ok(())
    }

    pub async fn remove_products_from_client(
        &self,
        client_id: Uuid,
        product_ids: &[Uuid],
    ) -> ClinicResult<()> {
        self.store.clients().get_by_id(client_id).await?;
        self.store
            .clients()
            .remove_products(client_id, product_ids)
            .await
    }

    pub async fn client_products(&self, client_id: Uuid) -> ClinicResult<Vec<Product>> {
        self.store.clients().get_by_id(client_id).await?;
        self.store.clients().get_products(client_id).await
    }

    // -------------------------------------------------------------------
    // Providers
    // -------------------------------------------------------------------

    pub async fn create_provider(&self, form: ProviderForm) -> ClinicResult<Provider> {
        let input = form.parse()?;
        let provider = self.store.providers().create(input).await?;
        info!(provider_id = %provider.id, "Provider created");
        Ok(provider)
    }

    pub async fn get_provider(&self, id: Uuid) -> ClinicResult<Provider> {
        self.store.providers().get_by_id(id).await
    }

    pub async fn list_providers(
        &self,
        pagination: Pagination,
    ) -> ClinicResult<PaginatedResult<Provider>> {
        self.store.providers().list(pagination).await
    }

    pub async fn update_provider(&self, id: Uuid, form: ProviderForm) -> ClinicResult<Provider> {
        let provider = self.store.providers().update(id, form.into_update()).await?;
        debug!(provider_id = %id, "Provider updated");
        Ok(provider)
    }

    pub async fn delete_provider(&self, id: Uuid) -> ClinicResult<()> {
        self.store.providers().delete(id).await?;
        info!(provider_id = %id, "Provider deleted");
        Ok(())
    }

    pub async fn provider_products(&self, provider_id: Uuid) -> ClinicResult<Vec<Product>> {
        self.store.providers().get_by_id(provider_id).await?;
        self.store.products().list_by_provider(provider_id).await
    }

    // -------------------------------------------------------------------
    // Vets
    // -------------------------------------------------------------------

    pub async fn create_vet(&self, form: VetForm) -> ClinicResult<Vet> {
        let input = form.parse(&self.rules)?;
        let vet = self.store.vets().create(input).await?;
        info!(vet_id = %vet.id, specialty = %vet.specialty, "Vet created");
        Ok(vet)
    }

    pub async fn get_vet(&self, id: Uuid) -> ClinicResult<Vet> {
        self.store.vets().get_by_id(id).await
    }

    pub async fn list_vets(&self, pagination: Pagination) -> ClinicResult<PaginatedResult<Vet>> {
        self.store.vets().list(pagination).await
    }

    pub async fn update_vet(&self, id: Uuid, form: VetForm) -> ClinicResult<Vet> {
        let vet = self.store.vets().update(id, form.into_update()).await?;
        debug!(vet_id = %id, "Vet updated");
        Ok(vet)
    }

    pub async fn delete_vet(&self, id: Uuid) -> ClinicResult<()> {
        self.store.vets().delete(id).await?;
        info!(vet_id = %id, "Vet deleted");
        Ok(())
    }

    // -------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------

    pub async fn create_product(&self, form: ProductForm) -> ClinicResult<Product> {
        let provider_missing = match form.provider_id() {
            Some(id) => !exists(self.store.providers().get_by_id(id).await)?,
            None => false,
        };
        let mut parsed = form.parse();
        if provider_missing {
            parsed = FieldErrors::reject(parsed, fields::PROVIDER, messages::PROVIDER_MISSING);
        }
        let product = self.store.products().create(parsed?).await?;
        info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    pub async fn get_product(&self, id: Uuid) -> ClinicResult<Product> {
        self.store.products().get_by_id(id).await
    }

    pub async fn list_products(
        &self,
        pagination: Pagination,
    ) -> ClinicResult<PaginatedResult<Product>> {
        self.store.products().list(pagination).await
    }

    /// A provider reference that does not resolve is dropped like any
    /// other unparsable update value.
    pub async fn update_product(&self, id: Uuid, form: ProductForm) -> ClinicResult<Product> {
        let mut input = form.into_update();
        if let Some(provider_id) = input.provider_id {
            if !exists(self.store.providers().get_by_id(provider_id).await)? {
                debug!(%provider_id, "Ignoring update to missing provider");
                input.provider_id = None;
            }
        }
        let product = self.store.products().update(id, input).await?;
        debug!(product_id = %id, "Product updated");
        Ok(product)
    }

    pub async fn delete_product(&self, id: Uuid) -> ClinicResult<()> {
        self.store.products().delete(id).await?;
        info!(product_id = %id, "Product deleted");
        Ok(())
    }

    // -------------------------------------------------------------------
    // Medicines
    // -------------------------------------------------------------------

    pub async fn create_medicine(&self, form: MedicineForm) -> ClinicResult<Medicine> {
        let input = form.parse()?;
        let medicine = self.store.medicines().create(input).await?;
        info!(medicine_id = %medicine.id, "Medicine created");
        Ok(medicine)
    }

    pub async fn get_medicine(&self, id: Uuid) -> ClinicResult<Medicine> {
        self.store.medicines().get_by_id(id).await
    }

    pub async fn list_medicines(
        &self,
        pagination: Pagination,
    ) -> ClinicResult<PaginatedResult<Medicine>> {
        self.store.medicines().list(pagination).await
    }

    pub async fn update_medicine(&self, id: Uuid, form: MedicineForm) -> ClinicResult<Medicine> {
        let medicine = self.store.medicines().update(id, form.into_update()).await?;
        debug!(medicine_id = %id, "Medicine updated");
        Ok(medicine)
    }

    pub async fn delete_medicine(&self, id: Uuid) -> ClinicResult<()> {
        self.store.medicines().delete(id).await?;
        info!(medicine_id = %id, "Medicine deleted");
        Ok(())
    }

    // -------------------------------------------------------------------
    // Pets
    // -------------------------------------------------------------------

    pub async fn create_pet(&self, form: PetForm) -> ClinicResult<Pet> {
        let client_missing = match form.client_id() {
            Some(id) => !exists(self.store.clients().get_by_id(id).await)?,
            None => false,
        };
        let mut parsed = form.parse();
        if client_missing {
            parsed = FieldErrors::reject(parsed, fields::CLIENT, messages::CLIENT_MISSING);
        }
        let pet = self.store.pets().create(parsed?).await?;
        info!(pet_id = %pet.id, client_id = %pet.client_id, "Pet created");
        Ok(pet)
    }

    pub async fn get_pet(&self, id: Uuid) -> ClinicResult<Pet> {
        self.store.pets().get_by_id(id).await
    }

    pub async fn list_pets(&self, pagination: Pagination) -> ClinicResult<PaginatedResult<Pet>> {
        self.store.pets().list(pagination).await
    }

    /// An owner reference that does not resolve is dropped like any
    /// other unparsable update value.
    pub async fn update_pet(&self, id: Uuid, form: PetForm) -> ClinicResult<Pet> {
        let mut input = form.into_update();
        if let Some(client_id) = input.client_id {
            if !exists(self.store.clients().get_by_id(client_id).await)? {
                debug!(%client_id, "Ignoring update to missing client");
                input.client_id = None;
            }
        }
        let pet = self.store.pets().update(id, input).await?;
        debug!(pet_id = %id, "Pet updated");
        Ok(pet)
    }

    pub async fn delete_pet(&self, id: Uuid) -> ClinicResult<()> {
        self.store.pets().delete(id).await?;
        info!(pet_id = %id, "Pet deleted");
        Ok(())
    }

    pub async fn add_medicine_to_pet(&self, pet_id: Uuid, medicine_id: Uuid) -> ClinicResult<()> {
        self.store.pets().add_medicine(pet_id, medicine_id).await?;
        debug!(%pet_id, %medicine_id, "Medicine linked to pet");
        Ok(())
    }

    pub async fn remove_medicines_from_pet(
        &self,
        pet_id: Uuid,
        medicine_ids: &[Uuid],
    ) -> ClinicResult<()> {
        self.store.pets().get_by_id(pet_id).await?;
        self.store.pets().remove_medicines(pet_id, medicine_ids).await
    }

    pub async fn pet_medicines(&self, pet_id: Uuid) -> ClinicResult<Vec<Medicine>> {
        self.store.pets().get_by_id(pet_id).await?;
        self.store.pets().get_medicines(pet_id).await
    }

    pub async fn add_vet_to_pet(&self, pet_id: Uuid, vet_id: Uuid) -> ClinicResult<()> {
        self.store.pets().add_vet(pet_id, vet_id).await?;
        debug!(%pet_id, %vet_id, "Vet linked to pet");
        Ok(())
    }

    pub async fn remove_vets_from_pet(&self, pet_id: Uuid, vet_ids: &[Uuid]) -> ClinicResult<()> {
        self.store.pets().get_by_id(pet_id).await?;
        self.store.pets().remove_vets(pet_id, vet_ids).await
    }

    pub async fn pet_vets(&self, pet_id: Uuid) -> ClinicResult<Vec<Vet>> {
        self.store.pets().get_by_id(pet_id).await?;
        self.store.pets().get_vets(pet_id).await
    }
}
