//! Veterinarian domain model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::merge;
use crate::validation::{FieldErrors, ValidationRules, fields, messages};

/// A vet's field of practice.
///
/// Stored and compared by its display label, the string the clinic
/// staff picks from the form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Specialty {
    #[serde(rename = "General")]
    General,
    #[serde(rename = "Cirugía")]
    Surgery,
    #[serde(rename = "Dermatología")]
    Dermatology,
    #[serde(rename = "Ortopedia")]
    Orthopedics,
    #[serde(rename = "Cardiología")]
    Cardiology,
    #[serde(rename = "Oftalmología")]
    Ophthalmology,
    #[serde(rename = "Neurología")]
    Neurology,
}

impl Specialty {
    pub const ALL: [Specialty; 7] = [
        Self::General,
        Self::Surgery,
        Self::Dermatology,
        Self::Orthopedics,
        Self::Cardiology,
        Self::Ophthalmology,
        Self::Neurology,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Surgery => "Cirugía",
            Self::Dermatology => "Dermatología",
            Self::Orthopedics => "Ortopedia",
            Self::Cardiology => "Cardiología",
            Self::Ophthalmology => "Oftalmología",
            Self::Neurology => "Neurología",
        }
    }
}

impl fmt::Display for Specialty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown specialty: {0}")]
pub struct UnknownSpecialty(pub String);

impl FromStr for Specialty {
    type Err = UnknownSpecialty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|specialty| specialty.label() == s)
            .ok_or_else(|| UnknownSpecialty(s.to_owned()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vet {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub specialty: Specialty,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateVet {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub specialty: Specialty,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct UpdateVet {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub specialty: Option<Specialty>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VetForm {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub specialty: Option<String>,
}

impl VetForm {
    pub fn parse(self, rules: &ValidationRules) -> Result<CreateVet, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = errors.required(fields::NAME, self.name, messages::NAME_REQUIRED);
        let phone = errors.phone(
            fields::PHONE,
            self.phone,
            rules.vet_phone_prefix.as_deref(),
        );
        let email = errors.email(fields::EMAIL, self.email);
        let specialty = errors
            .required(
                fields::SPECIALTY,
                self.specialty,
                messages::SPECIALTY_REQUIRED,
            )
            .and_then(|label| match label.parse::<Specialty>() {
                Ok(specialty) => Some(specialty),
                Err(_) => {
                    errors.insert(fields::SPECIALTY, messages::SPECIALTY_INVALID);
                    None
                }
            });

        let (Some(name), Some(phone), Some(email), Some(specialty)) =
            (name, phone, email, specialty)
        else {
            return Err(errors);
        };
        Ok(CreateVet {
            name,
            phone,
            email,
            specialty,
        })
    }

    pub fn into_update(self) -> UpdateVet {
        UpdateVet {
            name: merge::text(self.name),
            phone: merge::text(self.phone),
            email: merge::text(self.email),
            specialty: merge::specialty(fields::SPECIALTY, self.specialty),
        }
    }
}
