//! Dispatch of record commands onto the clinic service.

use serde::Serialize;
use serde_json::{Value, json};
use uuid::Uuid;
use vetclinic_core::repository::Pagination;
use vetclinic_core::{ClinicError, ClinicResult, ClinicService, ClinicStore};

use crate::cli::{Entity, LinkKind, RecordCommand};
use crate::fields::{Field, into_form};

fn to_json<T: Serialize>(value: T) -> ClinicResult<Value> {
    serde_json::to_value(value).map_err(|e| ClinicError::Internal(e.to_string()))
}

fn form<T: serde::de::DeserializeOwned>(fields: Vec<Field>) -> ClinicResult<T> {
    into_form(fields).map_err(|e| ClinicError::Internal(format!("invalid fields: {e}")))
}

/// Run `command` and return what should be printed on success.
pub async fn execute<S: ClinicStore>(
    service: &ClinicService<S>,
    command: RecordCommand,
) -> ClinicResult<Value> {
    match command {
        RecordCommand::Create { entity, fields } => create(service, entity, fields).await,
        RecordCommand::Get { entity, id } => get(service, entity, id).await,
        RecordCommand::List {
            entity,
            offset,
            limit,
            client,
            provider,
        } => {
            let pagination = Pagination { offset, limit };
            match (entity, client, provider) {
                (Entity::Pet, Some(client), None) => to_json(service.client_pets(client).await?),
                (Entity::Product, None, Some(provider)) => {
                    to_json(service.provider_products(provider).await?)
                }
                (_, None, None) => list(service, entity, pagination).await,
                _ => Err(ClinicError::Internal(
                    "--client filters pets and --provider filters products".into(),
                )),
            }
        }
        RecordCommand::Update { entity, id, fields } => update(service, entity, id, fields).await,
        RecordCommand::Delete { entity, id } => {
            match entity {
                Entity::Client => service.delete_client(id).await?,
                Entity::Provider => service.delete_provider(id).await?,
                Entity::Vet => service.delete_vet(id).await?,
                Entity::Product => service.delete_product(id).await?,
                Entity::Medicine => service.delete_medicine(id).await?,
                Entity::Pet => service.delete_pet(id).await?,
            }
            Ok(json!({ "deleted": id }))
        }
        RecordCommand::Link {
            kind,
            owner,
            target,
        } => {
            match kind {
                LinkKind::PetMedicine => service.add_medicine_to_pet(owner, target).await?,
                LinkKind::PetVet => service.add_vet_to_pet(owner, target).await?,
                LinkKind::ClientProduct => service.add_product_to_client(owner, target).await?,
            }
            links(service, kind, owner).await
        }
        RecordCommand::Unlink {
            kind,
            owner,
            targets,
        } => {
            match kind {
                LinkKind::PetMedicine => service.remove_medicines_from_pet(owner, &targets).await?,
                LinkKind::PetVet => service.remove_vets_from_pet(owner, &targets).await?,
                LinkKind::ClientProduct => {
                    service.remove_products_from_client(owner, &targets).await?
                }
            }
            links(service, kind, owner).await
        }
        RecordCommand::Links { kind, owner } => links(service, kind, owner).await,
    }
}

async fn create<S: ClinicStore>(
    service: &ClinicService<S>,
    entity: Entity,
    fields: Vec<Field>,
) -> ClinicResult<Value> {
    match entity {
        Entity::Client => to_json(service.create_client(form(fields)?).await?),
        Entity::Provider => to_json(service.create_provider(form(fields)?).await?),
        Entity::Vet => to_json(service.create_vet(form(fields)?).await?),
        Entity::Product => to_json(service.create_product(form(fields)?).await?),
        Entity::Medicine => to_json(service.create_medicine(form(fields)?).await?),
        Entity::Pet => to_json(service.create_pet(form(fields)?).await?),
    }
}

async fn get<S: ClinicStore>(
    service: &ClinicService<S>,
    entity: Entity,
    id: Uuid,
) -> ClinicResult<Value> {
    match entity {
        Entity::Client => to_json(service.get_client(id).await?),
        Entity::Provider => to_json(service.get_provider(id).await?),
        Entity::Vet => to_json(service.get_vet(id).await?),
        Entity::Product => to_json(service.get_product(id).await?),
        Entity::Medicine => to_json(service.get_medicine(id).await?),
        Entity::Pet => to_json(service.get_pet(id).await?),
    }
}

async fn list<S: ClinicStore>(
    service: &ClinicService<S>,
    entity: Entity,
    pagination: Pagination,
) -> ClinicResult<Value> {
    match entity {
        Entity::Client => to_json(service.list_clients(pagination).await?),
        Entity::Provider => to_json(service.list_providers(pagination).await?),
        Entity::Vet => to_json(service.list_vets(pagination).await?),
        Entity::Product => to_json(service.list_products(pagination).await?),
        Entity::Medicine => to_json(service.list_medicines(pagination).await?),
        Entity::Pet => to_json(service.list_pets(pagination).await?),
    }
}

async fn update<S: ClinicStore>(
    service: &ClinicService<S>,
    entity: Entity,
    id: Uuid,
    fields: Vec<Field>,
) -> ClinicResult<Value> {
    match entity {
        Entity::Client => to_json(service.update_client(id, form(fields)?).await?),
        Entity::Provider => to_json(service.update_provider(id, form(fields)?).await?),
        Entity::Vet => to_json(service.update_vet(id, form(fields)?).await?),
        Entity::Product => to_json(service.update_product(id, form(fields)?).await?),
        Entity::Medicine => to_json(service.update_medicine(id, form(fields)?).await?),
        Entity::Pet => to_json(service.update_pet(id, form(fields)?).await?),
    }
}

async fn links<S: ClinicStore>(
    service: &ClinicService<S>,
    kind: LinkKind,
    owner: Uuid,
) -> ClinicResult<Value> {
    match kind {
        LinkKind::PetMedicine => to_json(service.pet_medicines(owner).await?),
        LinkKind::PetVet => to_json(service.pet_vets(owner).await?),
        LinkKind::ClientProduct => to_json(service.client_products(owner).await?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use surrealdb::Surreal;
    use surrealdb::engine::local::{Db, Mem};
    use vetclinic_core::ValidationRules;
    use vetclinic_db::{ClinicDb, SurrealClinicStore};

    use crate::cli::{Cli, Command};

    async fn service() -> ClinicService<SurrealClinicStore<Db>> {
        let db = Surreal::new::<Mem>(()).await.unwrap();
        db.use_ns("test").use_db("test").await.unwrap();
        let clinic = ClinicDb::prepare(db).await.unwrap();
        ClinicService::new(clinic.store(), ValidationRules::default())
    }

    async fn run(
        service: &ClinicService<SurrealClinicStore<Db>>,
        args: &[&str],
    ) -> ClinicResult<Value> {
        let cli = Cli::try_parse_from(std::iter::once("vetclinic").chain(args.iter().copied()))
            .unwrap();
        match cli.command {
            Command::Records(command) => execute(service, command).await,
            Command::Migrate => panic!("not a record command"),
        }
    }

    #[tokio::test]
    async fn create_then_link_medicine() {
        let service = service().await;

        let client = run(
            &service,
            &[
                "create",
                "client",
                "name=Juan",
                "phone=221555232",
                "email=brujita75@hotmail.com",
                "address=13 y 44",
            ],
        )
        .await
        .unwrap();
        let client_id = client["id"].as_str().unwrap().to_owned();

        let pet = run(
            &service,
            &[
                "create",
                "pet",
                "name=Firulais",
                "breed=Caniche",
                "birthday=2020-03-07",
                "weight=8.5",
                format!("client={client_id}").as_str(),
            ],
        )
        .await
        .unwrap();
        assert_eq!(pet["birthday"], "2020-03-07");
        let pet_id = pet["id"].as_str().unwrap().to_owned();

        let medicine = run(
            &service,
            &[
                "create",
                "medicine",
                "name=ibuprofeno",
                "description=analgesico",
                "dose=4",
            ],
        )
        .await
        .unwrap();
        assert_eq!(medicine["dose"], 4.0);
        let medicine_id = medicine["id"].as_str().unwrap().to_owned();

        let linked = run(&service, &["link", "pet-medicine", pet_id.as_str(), medicine_id.as_str()])
            .await
            .unwrap();
        assert_eq!(linked.as_array().unwrap().len(), 1);

        let pets = run(&service, &["list", "pet", "--client", client_id.as_str()])
            .await
            .unwrap();
        assert_eq!(pets.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn validation_failure_carries_field_map() {
        let service = service().await;

        let err = run(&service, &["create", "product", "name=Collar", "price=0"])
            .await
            .unwrap_err();
        let errors = err.field_errors().unwrap();
        assert!(errors.contains("type"));
        assert!(errors.contains("price"));

        let listed = run(&service, &["list", "product"]).await.unwrap();
        assert_eq!(listed["total"], 0);
    }

    #[tokio::test]
    async fn delete_missing_record_is_not_found() {
        let service = service().await;
        let id = Uuid::new_v4().to_string();

        let err = run(&service, &["delete", "vet", id.as_str()]).await.unwrap_err();
        assert!(matches!(err, ClinicError::NotFound { .. }));
    }
}
