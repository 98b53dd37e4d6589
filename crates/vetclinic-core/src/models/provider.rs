//! Provider (supplier) domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::merge;
use crate::validation::{FieldErrors, fields, messages};

/// A supplier of products sold by the clinic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Provider {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateProvider {
    pub name: String,
    pub email: String,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct UpdateProvider {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl ProviderForm {
    pub fn parse(self) -> Result<CreateProvider, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = errors.required(fields::NAME, self.name, messages::NAME_REQUIRED);
        let email = errors.email(fields::EMAIL, self.email);

        let (Some(name), Some(email)) = (name, email) else {
            return Err(errors);
        };
        Ok(CreateProvider {
            name,
            email,
            address: merge::text(self.address),
        })
    }

    pub fn into_update(self) -> UpdateProvider {
        UpdateProvider {
            name: merge::text(self.name),
            email: merge::text(self.email),
            address: merge::text(self.address),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_provider() {
        let input = ProviderForm {
            name: Some("katerina mariescurrena".into()),
            email: Some("katy@gmail.com".into()),
            address: Some("17 y 166".into()),
        }
        .parse()
        .unwrap();
        assert_eq!(input.email, "katy@gmail.com");
        assert_eq!(input.address.as_deref(), Some("17 y 166"));
    }

    #[test]
    fn name_and_email_required() {
        let errors = ProviderForm {
            address: Some("17 y 166".into()),
            ..Default::default()
        }
        .parse()
        .unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains("name"));
        assert!(errors.contains("email"));
    }
}
