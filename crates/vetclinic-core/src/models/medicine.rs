//! Medicine domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::merge;
use crate::validation::{self, FieldErrors, fields, messages};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medicine {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub dose: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateMedicine {
    pub name: String,
    pub description: String,
    pub dose: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct UpdateMedicine {
    pub name: Option<String>,
    pub description: Option<String>,
    pub dose: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MedicineForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub dose: Option<String>,
}

impl MedicineForm {
    pub fn parse(self) -> Result<CreateMedicine, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = errors.required(fields::NAME, self.name, messages::NAME_REQUIRED);
        let description = errors.required(
            fields::DESCRIPTION,
            self.description,
            messages::DESCRIPTION_REQUIRED,
        );
        let dose = errors.decimal(fields::DOSE, self.dose, &validation::DOSE);

        let (Some(name), Some(description), Some(dose)) = (name, description, dose) else {
            return Err(errors);
        };
        Ok(CreateMedicine {
            name,
            description,
            dose,
        })
    }

    pub fn into_update(self) -> UpdateMedicine {
        UpdateMedicine {
            name: merge::text(self.name),
            description: merge::text(self.description),
            dose: merge::decimal(fields::DOSE, self.dose),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ibuprofeno_parses_with_integral_dose() {
        let input = MedicineForm {
            name: Some("ibuprofeno".into()),
            description: Some("analgesico".into()),
            dose: Some("4".into()),
        }
        .parse()
        .unwrap();
        assert_eq!(input.dose, 4.0);
    }

    #[test]
    fn empty_form_reports_description_and_dose() {
        let errors = MedicineForm::default().parse().unwrap_err();
        assert_eq!(errors.get("description"), Some(messages::DESCRIPTION_REQUIRED));
        assert_eq!(errors.get("dose"), Some(messages::DOSE_REQUIRED));
    }

    #[test]
    fn negative_dose_out_of_range() {
        let errors = MedicineForm {
            name: Some("ibuprofeno".into()),
            description: Some("analgesico".into()),
            dose: Some("-1".into()),
        }
        .parse()
        .unwrap_err();
        assert_eq!(errors.get("dose"), Some(messages::DOSE_OUT_OF_RANGE));
    }
}
