//! Client (pet owner) domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::merge;
use crate::validation::{FieldErrors, fields, messages};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateClient {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct UpdateClient {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Client fields as submitted.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClientForm {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl ClientForm {
    pub fn parse(self) -> Result<CreateClient, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = errors.required(fields::NAME, self.name, messages::NAME_REQUIRED);
        let phone = errors.required(fields::PHONE, self.phone, messages::PHONE_REQUIRED);
        let email = errors.email(fields::EMAIL, self.email);

        let (Some(name), Some(phone), Some(email)) = (name, phone, email) else {
            return Err(errors);
        };
        Ok(CreateClient {
            name,
            phone,
            email,
            address: merge::text(self.address),
        })
    }

    pub fn into_update(self) -> UpdateClient {
        UpdateClient {
            name: merge::text(self.name),
            phone: merge::text(self.phone),
            email: merge::text(self.email),
            address: merge::text(self.address),
        }
    }
}
