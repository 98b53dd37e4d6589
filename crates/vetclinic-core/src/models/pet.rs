//! Pet domain model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::merge;
use crate::validation::{self, FieldErrors, fields, messages};

/// A patient. Always owned by exactly one client; deleted with it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pet {
    pub id: Uuid,
    pub name: String,
    pub breed: String,
    pub birthday: NaiveDate,
    pub weight: f64,
    pub client_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreatePet {
    pub name: String,
    pub breed: String,
    pub birthday: NaiveDate,
    pub weight: f64,
    pub client_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct UpdatePet {
    pub name: Option<String>,
    pub breed: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub weight: Option<f64>,
    pub client_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PetForm {
    pub name: Option<String>,
    pub breed: Option<String>,
    pub birthday: Option<String>,
    pub weight: Option<String>,
    pub client: Option<String>,
}

impl PetForm {
    /// Well-formed owner reference, if one was submitted.
    pub fn client_id(&self) -> Option<Uuid> {
        self.client.as_deref().and_then(validation::parse_reference)
    }

    pub fn parse(self) -> Result<CreatePet, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = errors.required(fields::NAME, self.name, messages::NAME_REQUIRED);
        let breed = errors.required(fields::BREED, self.breed, messages::BREED_REQUIRED);
        let birthday = errors.date(fields::BIRTHDAY, self.birthday);
        let weight = errors.decimal(fields::WEIGHT, self.weight, &validation::WEIGHT);
        let client_id = errors.reference(
            fields::CLIENT,
            self.client,
            messages::CLIENT_REQUIRED,
            messages::CLIENT_INVALID,
        );

        let (Some(name), Some(breed), Some(birthday), Some(weight), Some(client_id)) =
            (name, breed, birthday, weight, client_id)
        else {
            return Err(errors);
        };
        Ok(CreatePet {
            name,
            breed,
            birthday,
            weight,
            client_id,
        })
    }

    pub fn into_update(self) -> UpdatePet {
        UpdatePet {
            name: merge::text(self.name),
            breed: merge::text(self.breed),
            birthday: merge::date(fields::BIRTHDAY, self.birthday),
            weight: merge::decimal(fields::WEIGHT, self.weight),
            client_id: merge::reference(fields::CLIENT, self.client),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loki(client: &str) -> PetForm {
        PetForm {
            name: Some("Loki".into()),
            breed: Some("Border Collie".into()),
            birthday: Some("2024-05-05".into()),
            weight: Some("10".into()),
            client: Some(client.into()),
        }
    }

    #[test]
    fn parses_valid_pet() {
        let owner = Uuid::new_v4();
        let input = loki(&owner.to_string()).parse().unwrap();
        assert_eq!(input.client_id, owner);
        assert_eq!(input.birthday, NaiveDate::from_ymd_opt(2024, 5, 5).unwrap());
        assert_eq!(input.weight, 10.0);
    }

    #[test]
    fn empty_form_reports_every_field() {
        let errors = PetForm::default().parse().unwrap_err();
        assert_eq!(errors.get("name"), Some(messages::NAME_REQUIRED));
        assert_eq!(errors.get("breed"), Some(messages::BREED_REQUIRED));
        assert_eq!(errors.get("birthday"), Some(messages::BIRTHDAY_REQUIRED));
        assert_eq!(errors.get("weight"), Some(messages::WEIGHT_REQUIRED));
        assert_eq!(errors.get("client"), Some(messages::CLIENT_REQUIRED));
    }

    #[test]
    fn zero_weight_rejected() {
        let errors = PetForm {
            weight: Some("0".into()),
            ..loki(&Uuid::new_v4().to_string())
        }
        .parse()
        .unwrap_err();
        assert_eq!(errors.get("weight"), Some(messages::WEIGHT_NOT_POSITIVE));
    }

    #[test]
    fn malformed_client_reference() {
        let form = loki("1");
        assert_eq!(form.client_id(), None);
        let errors = form.parse().unwrap_err();
        assert_eq!(errors.get("client"), Some(messages::CLIENT_INVALID));
    }
}
