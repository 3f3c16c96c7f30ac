//! Food: a nutritional record and the rules every stored record satisfies.
//!
//! Constraints:
//! - `name`: required, trimmed, non-empty
//! - `carbs`, `prot`, `fat`: required, finite, non-negative
//! - `servingSize`: optional, at least [`MIN_SERVING_SIZE`]
//! - `servingUnit`: optional, trimmed, non-empty
//!
//! Only the fields in [`UPDATABLE_FIELDS`] may change after creation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{FieldError, FieldProblem, FoodbaseError, ValidationError};
use crate::fields::{collect, read_number, read_string};
use crate::id::FoodId;

pub const NAME: &str = "name";
pub const CARBS: &str = "carbs";
pub const PROT: &str = "prot";
pub const FAT: &str = "fat";
pub const SERVING_SIZE: &str = "servingSize";
pub const SERVING_UNIT: &str = "servingUnit";

/// Fields a partial update is allowed to touch. Everything else is dropped.
pub const UPDATABLE_FIELDS: [&str; 4] = [NAME, CARBS, PROT, FAT];

/// Smallest accepted `servingSize`.
pub const MIN_SERVING_SIZE: f64 = 0.01;

/// A nutritional record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Food {
    #[serde(rename = "_id")]
    pub id: FoodId,
    pub name: String,
    pub carbs: f64,
    pub prot: f64,
    pub fat: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serving_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serving_unit: Option<String>,
}

impl Food {
    /// Create a builder for constructing a [`Food`].
    #[must_use]
    pub fn builder() -> FoodBuilder {
        FoodBuilder::default()
    }

    /// Build a new record from an untyped JSON object, ignoring unknown keys.
    ///
    /// # Errors
    ///
    /// Returns [`FoodbaseError::Validation`] listing every missing, mistyped,
    /// or out-of-range field.
    pub fn from_fields(body: &Map<String, Value>) -> Result<Self, FoodbaseError> {
        let mut errors = Vec::new();
        let builder = FoodBuilder {
            id: None,
            name: collect(read_string(body, NAME), &mut errors),
            carbs: collect(read_number(body, CARBS), &mut errors),
            prot: collect(read_number(body, PROT), &mut errors),
            fat: collect(read_number(body, FAT), &mut errors),
            serving_size: collect(read_number(body, SERVING_SIZE), &mut errors),
            serving_unit: collect(read_string(body, SERVING_UNIT), &mut errors),
        };
        builder.finish(errors)
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`FoodbaseError::Validation`] enumerating every offending field.
    pub fn validate(&self) -> Result<(), FoodbaseError> {
        let mut errors = Vec::new();
        check_text(NAME, Some(&self.name), true, &mut errors);
        check_amount(CARBS, Some(self.carbs), true, &mut errors);
        check_amount(PROT, Some(self.prot), true, &mut errors);
        check_amount(FAT, Some(self.fat), true, &mut errors);
        check_serving_size(self.serving_size, &mut errors);
        check_text(SERVING_UNIT, self.serving_unit.as_deref(), false, &mut errors);
        ValidationError::check(errors)?;
        Ok(())
    }
}

/// Step-by-step builder for [`Food`].
#[derive(Debug, Default)]
pub struct FoodBuilder {
    id: Option<FoodId>,
    name: Option<String>,
    carbs: Option<f64>,
    prot: Option<f64>,
    fat: Option<f64>,
    serving_size: Option<f64>,
    serving_unit: Option<String>,
}

impl FoodBuilder {
    #[must_use]
    pub fn id(mut self, id: FoodId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn carbs(mut self, carbs: f64) -> Self {
        self.carbs = Some(carbs);
        self
    }

    #[must_use]
    pub fn prot(mut self, prot: f64) -> Self {
        self.prot = Some(prot);
        self
    }

    #[must_use]
    pub fn fat(mut self, fat: f64) -> Self {
        self.fat = Some(fat);
        self
    }

    #[must_use]
    pub fn serving_size(mut self, serving_size: f64) -> Self {
        self.serving_size = Some(serving_size);
        self
    }

    #[must_use]
    pub fn serving_unit(mut self, serving_unit: impl Into<String>) -> Self {
        self.serving_unit = Some(serving_unit.into());
        self
    }

    /// Consume the builder, validate, and return a [`Food`].
    ///
    /// A fresh [`FoodId`] is generated when none was set.
    ///
    /// # Errors
    ///
    /// Returns [`FoodbaseError::Validation`] if a required field is missing
    /// or any field violates its constraint.
    pub fn build(self) -> Result<Food, FoodbaseError> {
        self.finish(Vec::new())
    }

    /// Validate on top of errors already collected while reading the fields.
    /// A field that already failed is not reported a second time.
    fn finish(self, mut errors: Vec<FieldError>) -> Result<Food, FoodbaseError> {
        let name = self.name.map(|name| name.trim().to_string());
        let serving_unit = self.serving_unit.map(|unit| unit.trim().to_string());

        let mut violations = Vec::new();
        check_text(NAME, name.as_deref(), true, &mut violations);
        check_amount(CARBS, self.carbs, true, &mut violations);
        check_amount(PROT, self.prot, true, &mut violations);
        check_amount(FAT, self.fat, true, &mut violations);
        check_serving_size(self.serving_size, &mut violations);
        check_text(SERVING_UNIT, serving_unit.as_deref(), false, &mut violations);

        violations.retain(|v| !errors.iter().any(|e| e.field == v.field));
        errors.extend(violations);

        match (name, self.carbs, self.prot, self.fat) {
            (Some(name), Some(carbs), Some(prot), Some(fat)) if errors.is_empty() => Ok(Food {
                id: self.id.unwrap_or_default(),
                name,
                carbs,
                prot,
                fat,
                serving_size: self.serving_size,
                serving_unit,
            }),
            _ => Err(ValidationError::new(errors).into()),
        }
    }
}

/// A partial update restricted to [`UPDATABLE_FIELDS`].
///
/// Absent fields are left untouched on the stored record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FoodPatch {
    pub name: Option<String>,
    pub carbs: Option<f64>,
    pub prot: Option<f64>,
    pub fat: Option<f64>,
}

impl FoodPatch {
    /// Build a patch from an untyped JSON object.
    ///
    /// Keys outside [`UPDATABLE_FIELDS`] are dropped before anything is
    /// read. A whitelisted key explicitly set to `null` is rejected, since
    /// every updatable field is required on the record.
    ///
    /// # Errors
    ///
    /// Returns [`FoodbaseError::Validation`] if any whitelisted field is
    /// mistyped or out of range.
    pub fn from_fields(body: &Map<String, Value>) -> Result<Self, FoodbaseError> {
        let allowed: Map<String, Value> = body
            .iter()
            .filter(|(key, _)| UPDATABLE_FIELDS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let mut errors: Vec<FieldError> = UPDATABLE_FIELDS
            .iter()
            .filter(|field| matches!(allowed.get(**field), Some(Value::Null)))
            .map(|field| FieldError::new(*field, FieldProblem::Required))
            .collect();

        let patch = Self {
            name: collect(read_string(&allowed, NAME), &mut errors),
            carbs: collect(read_number(&allowed, CARBS), &mut errors),
            prot: collect(read_number(&allowed, PROT), &mut errors),
            fat: collect(read_number(&allowed, FAT), &mut errors),
        };

        let mut violations = patch.violations();
        violations.retain(|v| !errors.iter().any(|e| e.field == v.field));
        errors.extend(violations);

        ValidationError::check(errors)?;
        Ok(patch)
    }

    /// Check the constraints of every present field.
    ///
    /// # Errors
    ///
    /// Returns [`FoodbaseError::Validation`] enumerating every offending field.
    pub fn validate(&self) -> Result<(), FoodbaseError> {
        ValidationError::check(self.violations())?;
        Ok(())
    }

    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.carbs.is_none() && self.prot.is_none() && self.fat.is_none()
    }

    /// Merge the present fields into `food`.
    #[must_use]
    pub fn apply_to(&self, mut food: Food) -> Food {
        if let Some(name) = &self.name {
            food.name = name.trim().to_string();
        }
        if let Some(carbs) = self.carbs {
            food.carbs = carbs;
        }
        if let Some(prot) = self.prot {
            food.prot = prot;
        }
        if let Some(fat) = self.fat {
            food.fat = fat;
        }
        food
    }

    fn violations(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_text(NAME, self.name.as_deref(), false, &mut errors);
        check_amount(CARBS, self.carbs, false, &mut errors);
        check_amount(PROT, self.prot, false, &mut errors);
        check_amount(FAT, self.fat, false, &mut errors);
        errors
    }
}

fn check_text(
    field: &'static str,
    value: Option<&str>,
    required: bool,
    errors: &mut Vec<FieldError>,
) {
    match value {
        None if required => errors.push(FieldError::new(field, FieldProblem::Required)),
        Some(text) if text.trim().is_empty() => {
            errors.push(FieldError::new(field, FieldProblem::Empty));
        }
        _ => {}
    }
}

fn check_amount(
    field: &'static str,
    value: Option<f64>,
    required: bool,
    errors: &mut Vec<FieldError>,
) {
    match value {
        None if required => errors.push(FieldError::new(field, FieldProblem::Required)),
        Some(amount) if !amount.is_finite() => {
            errors.push(FieldError::new(field, FieldProblem::NotFinite));
        }
        Some(amount) if amount < 0.0 => {
            errors.push(FieldError::new(field, FieldProblem::Negative));
        }
        _ => {}
    }
}

fn check_serving_size(value: Option<f64>, errors: &mut Vec<FieldError>) {
    match value {
        Some(size) if !size.is_finite() => {
            errors.push(FieldError::new(SERVING_SIZE, FieldProblem::NotFinite));
        }
        Some(size) if size < MIN_SERVING_SIZE => errors.push(FieldError::new(
            SERVING_SIZE,
            FieldProblem::BelowMinimum {
                minimum: MIN_SERVING_SIZE,
            },
        )),
        _ => {}
    }
}
