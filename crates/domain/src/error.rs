//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`FoodbaseError`] via `#[from]` or an explicit `From` impl.

use std::fmt;

pub use crate::id::InvalidFoodId;

/// Top-level error returned by domain and application operations.
#[derive(Debug, thiserror::Error)]
pub enum FoodbaseError {
    /// A record violated one or more field constraints.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A well-formed identifier matched no record.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The caller supplied an identifier that is not a valid [`FoodId`](crate::id::FoodId).
    #[error("invalid identifier")]
    InvalidId(#[from] InvalidFoodId),

    /// The underlying store failed for any other reason.
    #[error("storage error")]
    Storage(Box<dyn std::error::Error + Send + Sync>),
}

/// A lookup by identifier found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// What is wrong with a single field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldProblem {
    /// Absent or `null`.
    Required,
    /// Present but of the wrong JSON type.
    WrongType { expected: &'static str },
    /// A string that is empty once trimmed.
    Empty,
    /// A number below zero.
    Negative,
    /// A number below the field's minimum.
    BelowMinimum { minimum: f64 },
    /// `NaN` or infinite.
    NotFinite,
}

impl fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => f.write_str("is required"),
            Self::WrongType { expected } => write!(f, "must be a {expected}"),
            Self::Empty => f.write_str("must not be empty"),
            Self::Negative => f.write_str("must not be negative"),
            Self::BelowMinimum { minimum } => write!(f, "must be at least {minimum}"),
            Self::NotFinite => f.write_str("must be a finite number"),
        }
    }
}

/// A constraint violation on one named field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("`{field}` {problem}")]
pub struct FieldError {
    pub field: &'static str,
    pub problem: FieldProblem,
}

impl FieldError {
    #[must_use]
    pub fn new(field: &'static str, problem: FieldProblem) -> Self {
        Self { field, problem }
    }
}

/// One or more fields failed validation.
///
/// Use [`ValidationError::check`] to turn a possibly empty list of collected
/// field errors into a result.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    fields: Vec<FieldError>,
}

impl ValidationError {
    /// Wrap already-collected field errors.
    #[must_use]
    pub fn new(fields: Vec<FieldError>) -> Self {
        Self { fields }
    }

    /// `Ok(())` when `fields` is empty, otherwise a [`ValidationError`]
    /// enumerating every offending field.
    ///
    /// # Errors
    ///
    /// Returns the collected errors when at least one is present.
    pub fn check(fields: Vec<FieldError>) -> Result<(), Self> {
        if fields.is_empty() {
            Ok(())
        } else {
            Err(Self { fields })
        }
    }

    /// The offending fields, in the order they were checked.
    #[must_use]
    pub fn fields(&self) -> &[FieldError] {
        &self.fields
    }

    /// Whether the given field is among the offending ones.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|err| err.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("food validation failed: ")?;
        for (idx, err) in self.fields.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
