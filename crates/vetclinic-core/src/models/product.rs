//! Product domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::merge;
use crate::validation::{self, FieldErrors, fields, messages};

/// Something the clinic sells, optionally sourced from a provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub price: f64,
    /// Cleared when the provider is deleted.
    pub provider_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateProduct {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub price: f64,
    pub provider_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct UpdateProduct {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub price: Option<f64>,
    pub provider_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProductForm {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub price: Option<String>,
    pub provider: Option<String>,
}

impl ProductForm {
    /// Well-formed provider reference, if one was submitted.
    pub fn provider_id(&self) -> Option<Uuid> {
        self.provider
            .as_deref()
            .and_then(validation::parse_reference)
    }

    pub fn parse(self) -> Result<CreateProduct, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = errors.required(fields::NAME, self.name, messages::NAME_REQUIRED);
        let kind = errors.required(fields::TYPE, self.kind, messages::TYPE_REQUIRED);
        let price = errors.decimal(fields::PRICE, self.price, &validation::PRICE);
        let provider_id = errors.optional_reference(
            fields::PROVIDER,
            self.provider,
            messages::PROVIDER_INVALID,
        );

        if !errors.is_empty() {
            return Err(errors);
        }
        let (Some(name), Some(kind), Some(price)) = (name, kind, price) else {
            return Err(errors);
        };
        Ok(CreateProduct {
            name,
            kind,
            price,
            provider_id,
        })
    }

    pub fn into_update(self) -> UpdateProduct {
        UpdateProduct {
            name: merge::text(self.name),
            kind: merge::text(self.kind),
            price: merge::decimal(fields::PRICE, self.price),
            provider_id: merge::reference(fields::PROVIDER, self.provider),
        }
    }
}
