//! All SurrealDB repositories bundled behind [`ClinicStore`].

use surrealdb::{Connection, Surreal};
use vetclinic_core::service::ClinicStore;

use crate::repository::{
    SurrealClientRepository, SurrealMedicineRepository, SurrealPetRepository,
    SurrealProductRepository, SurrealProviderRepository, SurrealVetRepository,
};

/// Repositories sharing one SurrealDB handle.
#[derive(Clone)]
pub struct SurrealClinicStore<C: Connection> {
    clients: SurrealClientRepository<C>,
    providers: SurrealProviderRepository<C>,
    vets: SurrealVetRepository<C>,
    products: SurrealProductRepository<C>,
    medicines: SurrealMedicineRepository<C>,
    pets: SurrealPetRepository<C>,
}

impl<C: Connection> SurrealClinicStore<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self {
            clients: SurrealClientRepository::new(db.clone()),
            providers: SurrealProviderRepository::new(db.clone()),
            vets: SurrealVetRepository::new(db.clone()),
            products: SurrealProductRepository::new(db.clone()),
            medicines: SurrealMedicineRepository::new(db.clone()),
            pets: SurrealPetRepository::new(db),
        }
    }
}

impl<C: Connection> ClinicStore for SurrealClinicStore<C> {
    type Clients = SurrealClientRepository<C>;
    type Providers = SurrealProviderRepository<C>;
    type Vets = SurrealVetRepository<C>;
    type Products = SurrealProductRepository<C>;
    type Medicines = SurrealMedicineRepository<C>;
    type Pets = SurrealPetRepository<C>;

    fn clients(&self) -> &Self::Clients {
        &self.clients
    }

    fn providers(&self) -> &Self::Providers {
        &self.providers
    }

    fn vets(&self) -> &Self::Vets {
        &self.vets
    }

    fn products(&self) -> &Self::Products {
        &self.products
    }

    fn medicines(&self) -> &Self::Medicines {
        &self.medicines
    }

    fn pets(&self) -> &Self::Pets {
        &self.pets
    }
}
