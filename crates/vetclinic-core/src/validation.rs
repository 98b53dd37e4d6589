//! Field-level validation shared by every entity form.
//!
//! Each rule records at most one message per field and hands back the
//! parsed value when the field passed, so a form can collect every
//! failing field in a single pass and build its typed create input from
//! the survivors.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Form field names as they appear in a submitted field mapping.
pub mod fields {
    pub const NAME: &str = "name";
    pub const PHONE: &str = "phone";
    pub const EMAIL: &str = "email";
    pub const ADDRESS: &str = "address";
    pub const SPECIALTY: &str = "specialty";
    pub const TYPE: &str = "type";
    pub const PRICE: &str = "price";
    pub const PROVIDER: &str = "provider";
    pub const DESCRIPTION: &str = "description";
    pub const DOSE: &str = "dose";
    pub const BREED: &str = "breed";
    pub const BIRTHDAY: &str = "birthday";
    pub const WEIGHT: &str = "weight";
    pub const CLIENT: &str = "client";
}

/// User-facing messages. The clinic staff works in Spanish.
pub mod messages {
    pub const NAME_REQUIRED: &str = "Por favor ingrese un nombre";
    pub const PHONE_REQUIRED: &str = "Por favor ingrese un teléfono";
    pub const EMAIL_REQUIRED: &str = "Por favor ingrese un email";
    pub const EMAIL_INVALID: &str = "Por favor ingrese un email valido";
    pub const SPECIALTY_REQUIRED: &str = "Por favor ingrese una especialidad";
    pub const SPECIALTY_INVALID: &str = "Por favor ingrese una especialidad valida";
    pub const TYPE_REQUIRED: &str = "Por favor ingrese un tipo";
    pub const DESCRIPTION_REQUIRED: &str = "Por favor ingrese una descripcion";
    pub const BREED_REQUIRED: &str = "Por favor ingrese una raza";
    pub const BIRTHDAY_REQUIRED: &str = "Por favor ingrese la fecha de cumpleaños";
    pub const BIRTHDAY_INVALID: &str = "Por favor ingrese una fecha de cumpleaños valida";
    pub const CLIENT_REQUIRED: &str = "Por favor seleccione un cliente";
    pub const CLIENT_INVALID: &str = "Por favor seleccione un cliente valido";
    pub const CLIENT_MISSING: &str = "El cliente seleccionado no existe";
    pub const PROVIDER_INVALID: &str = "Por favor seleccione un proveedor valido";
    pub const PROVIDER_MISSING: &str = "El proveedor seleccionado no existe";

    pub const PRICE_REQUIRED: &str = "Por favor ingrese un precio";
    pub const PRICE_INVALID: &str = "Por favor ingrese un precio valido";
    pub const PRICE_NOT_POSITIVE: &str = "Por favor ingrese un precio mayor que 0";
    pub const PRICE_DECIMALS: &str = "Por favor ingrese un precio con maximo 2 decimales";

    pub const DOSE_REQUIRED: &str = "Por favor ingrese una dosis";
    pub const DOSE_INVALID: &str = "Por favor ingrese una dosis valida";
    pub const DOSE_OUT_OF_RANGE: &str = "Por favor ingrese una dosis entre 1 y 10";
    pub const DOSE_DECIMALS: &str = "Por favor ingrese una dosis con maximo 2 decimales";

    pub const WEIGHT_REQUIRED: &str = "Por favor ingrese un peso";
    pub const WEIGHT_INVALID: &str = "Por favor ingrese un peso valido";
    pub const WEIGHT_NOT_POSITIVE: &str = "Por favor ingrese un peso mayor que 0";
    pub const WEIGHT_DECIMALS: &str = "Por favor ingrese un peso con maximo 2 decimales";

    pub fn phone_prefix(prefix: &str) -> String {
        format!("Por favor ingrese un teléfono que comience con {prefix}")
    }
}

/// Maximum number of fractional digits accepted for prices, weights
/// and doses.
pub const MAX_DECIMAL_PLACES: usize = 2;

/// Tunable validation behaviour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRules {
    /// When set, a vet's phone must start with this prefix (the clinic
    /// uses `"54"`). `None` disables the format check.
    pub vet_phone_prefix: Option<String>,
}

/// Field name → message for every field that failed its rule.
///
/// An empty map means the form is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Record a message for `field`. The first message recorded for a
    /// field wins.
    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_owned())
            .or_insert_with(|| message.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Add `message` for `field` to a parse outcome, turning a success
    /// into a failure.
    pub fn reject<T>(
        outcome: Result<T, FieldErrors>,
        field: &str,
        message: impl Into<String>,
    ) -> Result<T, FieldErrors> {
        let mut errors = outcome.err().unwrap_or_default();
        errors.insert(field, message);
        Err(errors)
    }

    // -------------------------------------------------------------------
    // Rules
    // -------------------------------------------------------------------

    /// Required free text: absent or empty is an error.
    pub fn required(
        &mut self,
        field: &str,
        raw: Option<String>,
        message: &str,
    ) -> Option<String> {
        match raw {
            Some(value) if !value.is_empty() => Some(value),
            _ => {
                self.insert(field, message);
                None
            }
        }
    }

    /// Required email: must contain at least one `@`.
    pub fn email(&mut self, field: &str, raw: Option<String>) -> Option<String> {
        let value = self.required(field, raw, messages::EMAIL_REQUIRED)?;
        if value.contains('@') {
            Some(value)
        } else {
            self.insert(field, messages::EMAIL_INVALID);
            None
        }
    }

    /// Required phone, optionally constrained to start with `prefix`.
    pub fn phone(
        &mut self,
        field: &str,
        raw: Option<String>,
        prefix: Option<&str>,
    ) -> Option<String> {
        let value = self.required(field, raw, messages::PHONE_REQUIRED)?;
        match prefix {
            Some(prefix) if !value.starts_with(prefix) => {
                self.insert(field, messages::phone_prefix(prefix));
                None
            }
            _ => Some(value),
        }
    }

    /// Required decimal checked against `rule`.
    pub fn decimal(
        &mut self,
        field: &str,
        raw: Option<String>,
        rule: &DecimalRule,
    ) -> Option<f64> {
        let raw = self.required(field, raw, rule.required)?;
        let Some(value) = parse_decimal(&raw) else {
            self.insert(field, rule.invalid);
            return None;
        };
        if !rule.bounds.contains(value) {
            self.insert(field, rule.out_of_range);
            return None;
        }
        if decimal_places(value) > MAX_DECIMAL_PLACES {
            self.insert(field, rule.too_precise);
            return None;
        }
        Some(value)
    }

    /// Required ISO calendar date (`YYYY-MM-DD`).
    pub fn date(&mut self, field: &str, raw: Option<String>) -> Option<NaiveDate> {
        let raw = self.required(field, raw, messages::BIRTHDAY_REQUIRED)?;
        match parse_date(&raw) {
            Some(date) => Some(date),
            None => {
                self.insert(field, messages::BIRTHDAY_INVALID);
                None
            }
        }
    }

    /// Required reference to another record. Existence is checked by
    /// the service, which can see the store.
    pub fn reference(
        &mut self,
        field: &str,
        raw: Option<String>,
        required: &str,
        invalid: &str,
    ) -> Option<Uuid> {
        let raw = self.required(field, raw, required)?;
        match parse_reference(&raw) {
            Some(id) => Some(id),
            None => {
                self.insert(field, invalid);
                None
            }
        }
    }

    /// Optional reference: absent or empty yields `None` without an
    /// error, a malformed identifier records `invalid`.
    pub fn optional_reference(
        &mut self,
        field: &str,
        raw: Option<String>,
        invalid: &str,
    ) -> Option<Uuid> {
        let raw = raw.filter(|v| !v.is_empty())?;
        let parsed = parse_reference(&raw);
        if parsed.is_none() {
            self.insert(field, invalid);
        }
        parsed
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------
// Decimal rules
// -----------------------------------------------------------------------

/// Accepted range for a decimal field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bounds {
    /// Strictly greater than zero.
    Positive,
    /// Closed interval.
    Inclusive { min: f64, max: f64 },
}

impl Bounds {
    pub fn contains(&self, value: f64) -> bool {
        match *self {
            Self::Positive => value > 0.0,
            Self::Inclusive { min, max } => (min..=max).contains(&value),
        }
    }
}

/// Range plus the messages a decimal field reports.
#[derive(Debug, Clone, Copy)]
pub struct DecimalRule {
    pub bounds: Bounds,
    pub required: &'static str,
    pub invalid: &'static str,
    pub out_of_range: &'static str,
    pub too_precise: &'static str,
}

pub const PRICE: DecimalRule = DecimalRule {
    bounds: Bounds::Positive,
    required: messages::PRICE_REQUIRED,
    invalid: messages::PRICE_INVALID,
    out_of_range: messages::PRICE_NOT_POSITIVE,
    too_precise: messages::PRICE_DECIMALS,
};

pub const WEIGHT: DecimalRule = DecimalRule {
    bounds: Bounds::Positive,
    required: messages::WEIGHT_REQUIRED,
    invalid: messages::WEIGHT_INVALID,
    out_of_range: messages::WEIGHT_NOT_POSITIVE,
    too_precise: messages::WEIGHT_DECIMALS,
};

pub const DOSE: DecimalRule = DecimalRule {
    bounds: Bounds::Inclusive {
        min: 1.0,
        max: 10.0,
    },
    required: messages::DOSE_REQUIRED,
    invalid: messages::DOSE_INVALID,
    out_of_range: messages::DOSE_OUT_OF_RANGE,
    too_precise: messages::DOSE_DECIMALS,
};

// -----------------------------------------------------------------------
// Parsing helpers (shared with `merge`)
// -----------------------------------------------------------------------

/// Parse a finite float, tolerating surrounding whitespace.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Fractional digits in the shortest round-trip rendering of `value`.
///
/// Values with no exact binary representation are measured by the
/// digits their rendering shows, not the digits the user typed.
pub fn decimal_places(value: f64) -> usize {
    let rendered = value.to_string();
    rendered.split_once('.').map_or(0, |(_, frac)| frac.len())
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

pub fn parse_reference(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_absent_and_empty() {
        let mut errors = FieldErrors::new();
        assert!(errors.required("a", None, "missing a").is_none());
        assert!(errors.required("b", Some(String::new()), "missing b").is_none());
        assert_eq!(
            errors.required("c", Some("x".into()), "missing c").as_deref(),
            Some("x")
        );
        assert_eq!(errors.get("a"), Some("missing a"));
        assert_eq!(errors.get("b"), Some("missing b"));
        assert!(!errors.contains("c"));
    }

    #[test]
    fn email_needs_an_at_sign() {
        let mut errors = FieldErrors::new();
        assert_eq!(errors.email("email", Some("a@b".into())).as_deref(), Some("a@b"));
        assert!(errors.is_empty());

        assert!(errors.email("email", Some("ab".into())).is_none());
        assert_eq!(errors.get("email"), Some(messages::EMAIL_INVALID));

        let mut errors = FieldErrors::new();
        assert!(errors.email("email", None).is_none());
        assert_eq!(errors.get("email"), Some(messages::EMAIL_REQUIRED));
    }

    #[test]
    fn phone_prefix_only_checked_when_configured() {
        let mut errors = FieldErrors::new();
        assert!(errors.phone("phone", Some("2284563542".into()), None).is_some());
        assert!(errors.phone("phone", Some("54221555232".into()), Some("54")).is_some());
        assert!(errors.is_empty());

        assert!(errors.phone("phone", Some("2284563542".into()), Some("54")).is_none());
        assert_eq!(
            errors.get("phone"),
            Some("Por favor ingrese un teléfono que comience con 54")
        );
    }

    #[test]
    fn first_message_for_a_field_wins() {
        let mut errors = FieldErrors::new();
        errors.insert("name", "first");
        errors.insert("name", "second");
        assert_eq!(errors.get("name"), Some("first"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn zero_is_not_a_price_or_weight() {
        for rule in [&PRICE, &WEIGHT] {
            let mut errors = FieldErrors::new();
            assert!(errors.decimal("x", Some("0".into()), rule).is_none());
            assert_eq!(errors.get("x"), Some(rule.out_of_range));

            let mut errors = FieldErrors::new();
            assert_eq!(errors.decimal("x", Some("0.01".into()), rule), Some(0.01));
        }
    }

    #[test]
    fn dose_bounds_are_inclusive() {
        for (raw, ok) in [
            ("1", true),
            ("10", true),
            ("4", true),
            ("0.99", false),
            ("10.01", false),
            ("-1", false),
        ] {
            let mut errors = FieldErrors::new();
            let parsed = errors.decimal("dose", Some(raw.into()), &DOSE);
            assert_eq!(parsed.is_some(), ok, "dose {raw}");
            if !ok {
                assert_eq!(errors.get("dose"), Some(messages::DOSE_OUT_OF_RANGE));
            }
        }
    }

    #[test]
    fn decimal_rejects_garbage_and_excess_precision() {
        let mut errors = FieldErrors::new();
        assert!(errors.decimal("price", Some("abc".into()), &PRICE).is_none());
        assert_eq!(errors.get("price"), Some(messages::PRICE_INVALID));

        let mut errors = FieldErrors::new();
        assert!(errors.decimal("price", Some("inf".into()), &PRICE).is_none());
        assert_eq!(errors.get("price"), Some(messages::PRICE_INVALID));

        let mut errors = FieldErrors::new();
        assert!(errors.decimal("price", Some("1.005".into()), &PRICE).is_none());
        assert_eq!(errors.get("price"), Some(messages::PRICE_DECIMALS));

        let mut errors = FieldErrors::new();
        assert_eq!(errors.decimal("price", Some(" 12.50 ".into()), &PRICE), Some(12.5));
    }

    #[test]
    fn decimal_places_uses_shortest_rendering() {
        assert_eq!(decimal_places(4.0), 0);
        assert_eq!(decimal_places(10.5), 1);
        assert_eq!(decimal_places(0.01), 2);
        assert_eq!(decimal_places(1.005), 3);
        // 0.1 + 0.2 renders as 0.30000000000000004.
        assert!(decimal_places(0.1 + 0.2) > MAX_DECIMAL_PLACES);
    }

    #[test]
    fn date_must_be_iso() {
        let mut errors = FieldErrors::new();
        assert_eq!(
            errors.date("birthday", Some("2024-05-05".into())),
            NaiveDate::from_ymd_opt(2024, 5, 5)
        );
        assert!(errors.date("birthday", Some("05/05/2024".into())).is_none());
        assert_eq!(errors.get("birthday"), Some(messages::BIRTHDAY_INVALID));
    }

    #[test]
    fn optional_reference_allows_blank() {
        let mut errors = FieldErrors::new();
        assert!(errors.optional_reference("provider", None, "bad").is_none());
        assert!(errors.optional_reference("provider", Some(String::new()), "bad").is_none());
        assert!(errors.is_empty());

        assert!(errors.optional_reference("provider", Some("42".into()), "bad").is_none());
        assert_eq!(errors.get("provider"), Some("bad"));
    }

    #[test]
    fn reject_merges_into_existing_errors() {
        let mut errors = FieldErrors::new();
        errors.insert("name", messages::NAME_REQUIRED);
        let outcome: Result<(), FieldErrors> =
            FieldErrors::reject(Err(errors), "client", messages::CLIENT_MISSING);
        let errors = outcome.unwrap_err();
        assert_eq!(errors.len(), 2);

        let outcome = FieldErrors::reject(Ok(()), "client", messages::CLIENT_MISSING);
        assert_eq!(outcome.unwrap_err().get("client"), Some(messages::CLIENT_MISSING));
    }

    #[test]
    fn field_errors_serialize_as_a_flat_map() {
        let mut errors = FieldErrors::new();
        errors.insert("email", messages::EMAIL_INVALID);
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({ "email": "Por favor ingrese un email valido" }));
    }
}
