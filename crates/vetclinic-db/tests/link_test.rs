//! Integration tests for relation edges and delete cascades.

use chrono::NaiveDate;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;
use vetclinic_core::ClinicError;
use vetclinic_core::models::client::CreateClient;
use vetclinic_core::models::medicine::CreateMedicine;
use vetclinic_core::models::pet::CreatePet;
use vetclinic_core::models::product::CreateProduct;
use vetclinic_core::models::vet::{CreateVet, Specialty};
use vetclinic_core::repository::{
    ClientRepository, MedicineRepository, PetRepository, ProductRepository, VetRepository,
};
use vetclinic_db::ClinicDb;
use vetclinic_db::repository::{
    SurrealClientRepository, SurrealMedicineRepository, SurrealPetRepository,
    SurrealProductRepository, SurrealVetRepository,
};

struct Fixture {
    clients: SurrealClientRepository<Db>,
    pets: SurrealPetRepository<Db>,
    medicines: SurrealMedicineRepository<Db>,
    vets: SurrealVetRepository<Db>,
    products: SurrealProductRepository<Db>,
    client_id: Uuid,
    pet_id: Uuid,
}

/// Helper: in-memory DB with migrations, one client and one pet.
async fn setup() -> Fixture {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    ClinicDb::prepare(db.clone()).await.unwrap();

    let clients = SurrealClientRepository::new(db.clone());
    let pets = SurrealPetRepository::new(db.clone());

    let client = clients
        .create(CreateClient {
            name: "Juan".into(),
            phone: "2284123456".into(),
            email: "juan@mail.com".into(),
            address: None,
        })
        .await
        .unwrap();
    let pet = pets
        .create(CreatePet {
            name: "Firulais".into(),
            breed: "Caniche".into(),
            birthday: NaiveDate::from_ymd_opt(2020, 3, 7).unwrap(),
            weight: 8.0,
            client_id: client.id,
        })
        .await
        .unwrap();

    Fixture {
        clients,
        pets,
        medicines: SurrealMedicineRepository::new(db.clone()),
        vets: SurrealVetRepository::new(db.clone()),
        products: SurrealProductRepository::new(db),
        client_id: client.id,
        pet_id: pet.id,
    }
}

async fn medicine(f: &Fixture, name: &str) -> Uuid {
    f.medicines
        .create(CreateMedicine {
            name: name.into(),
            description: "antiinflamatorio".into(),
            dose: 4.0,
        })
        .await
        .unwrap()
        .id
}

async fn vet(f: &Fixture, name: &str) -> Uuid {
    f.vets
        .create(CreateVet {
            name: name.into(),
            phone: "2284563542".into(),
            email: format!("{name}@vet.com"),
            specialty: Specialty::General,
        })
        .await
        .unwrap()
        .id
}

async fn product(f: &Fixture, name: &str) -> Uuid {
    f.products
        .create(CreateProduct {
            name: name.into(),
            kind: "Alimento".into(),
            price: 10.0,
            provider_id: None,
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn linking_twice_keeps_one_link() {
    let f = setup().await;
    let ibuprofeno = medicine(&f, "ibuprofeno").await;

    f.pets.add_medicine(f.pet_id, ibuprofeno).await.unwrap();
    f.pets.add_medicine(f.pet_id, ibuprofeno).await.unwrap();

    let medicines = f.pets.get_medicines(f.pet_id).await.unwrap();
    assert_eq!(medicines.len(), 1);
    assert_eq!(medicines[0].id, ibuprofeno);
    assert_eq!(medicines[0].dose, 4.0);
}

#[tokio::test]
async fn link_to_missing_record_is_not_found() {
    let f = setup().await;

    let result = f.pets.add_vet(f.pet_id, Uuid::new_v4()).await;
    assert!(matches!(result, Err(ClinicError::NotFound { .. })));

    let ana = vet(&f, "ana").await;
    let result = f.pets.add_vet(Uuid::new_v4(), ana).await;
    assert!(matches!(result, Err(ClinicError::NotFound { .. })));
}

#[tokio::test]
async fn unlink_ignores_ids_not_linked() {
    let f = setup().await;
    let ana = vet(&f, "ana").await;
    let luis = vet(&f, "luis").await;
    let unrelated = vet(&f, "pedro").await;

    f.pets.add_vet(f.pet_id, ana).await.unwrap();
    f.pets.add_vet(f.pet_id, luis).await.unwrap();

    f.pets
        .remove_vets(f.pet_id, &[ana, unrelated, Uuid::new_v4()])
        .await
        .unwrap();

    let vets = f.pets.get_vets(f.pet_id).await.unwrap();
    assert_eq!(vets.len(), 1);
    assert_eq!(vets[0].id, luis);

    f.pets.remove_vets(f.pet_id, &[]).await.unwrap();
    assert_eq!(f.pets.get_vets(f.pet_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn client_products_are_a_set() {
    let f = setup().await;
    let food = product(&f, "Balanceado").await;
    let collar = product(&f, "Collar").await;

    f.clients.add_product(f.client_id, food).await.unwrap();
    f.clients.add_product(f.client_id, collar).await.unwrap();
    f.clients.add_product(f.client_id, food).await.unwrap();

    let products = f.clients.get_products(f.client_id).await.unwrap();
    assert_eq!(products.len(), 2);

    f.clients
        .remove_products(f.client_id, &[food])
        .await
        .unwrap();
    let products = f.clients.get_products(f.client_id).await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id, collar);
}

#[tokio::test]
async fn deleting_linked_records_removes_links() {
    let f = setup().await;
    let ibuprofeno = medicine(&f, "ibuprofeno").await;
    let ana = vet(&f, "ana").await;
    let food = product(&f, "Balanceado").await;

    f.pets.add_medicine(f.pet_id, ibuprofeno).await.unwrap();
    f.pets.add_vet(f.pet_id, ana).await.unwrap();
    f.clients.add_product(f.client_id, food).await.unwrap();

    f.medicines.delete(ibuprofeno).await.unwrap();
    f.vets.delete(ana).await.unwrap();
    f.products.delete(food).await.unwrap();

    assert!(f.pets.get_medicines(f.pet_id).await.unwrap().is_empty());
    assert!(f.pets.get_vets(f.pet_id).await.unwrap().is_empty());
    assert!(f.clients.get_products(f.client_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn deleting_pet_keeps_linked_records() {
    let f = setup().await;
    let ibuprofeno = medicine(&f, "ibuprofeno").await;
    f.pets.add_medicine(f.pet_id, ibuprofeno).await.unwrap();

    f.pets.delete(f.pet_id).await.unwrap();

    assert!(f.pets.get_by_id(f.pet_id).await.is_err());
    assert!(f.medicines.get_by_id(ibuprofeno).await.is_ok());
}

#[tokio::test]
async fn deleting_client_cascades_to_pets() {
    let f = setup().await;
    let ibuprofeno = medicine(&f, "ibuprofeno").await;
    let ana = vet(&f, "ana").await;
    let food = product(&f, "Balanceado").await;

    f.pets.add_medicine(f.pet_id, ibuprofeno).await.unwrap();
    f.pets.add_vet(f.pet_id, ana).await.unwrap();
    f.clients.add_product(f.client_id, food).await.unwrap();

    f.clients.delete(f.client_id).await.unwrap();

    assert!(matches!(
        f.clients.get_by_id(f.client_id).await,
        Err(ClinicError::NotFound { .. })
    ));
    assert!(matches!(
        f.pets.get_by_id(f.pet_id).await,
        Err(ClinicError::NotFound { .. })
    ));
    assert!(f.pets.list_by_client(f.client_id).await.unwrap().is_empty());

    // Linked records themselves survive.
    assert!(f.medicines.get_by_id(ibuprofeno).await.is_ok());
    assert!(f.vets.get_by_id(ana).await.is_ok());
    assert!(f.products.get_by_id(food).await.is_ok());
}
