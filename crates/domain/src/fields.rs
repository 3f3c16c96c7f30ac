//! Typed field extraction from untyped JSON objects.
//!
//! Request bodies arrive as a [`Map`] and are only trusted after every field
//! has gone through one of these readers. Each reader returns `Ok(None)` for
//! an absent key and collects a [`FieldError`] otherwise.

use serde_json::{Map, Value};

use crate::error::{FieldError, FieldProblem};

/// Read an optional string, trimmed. Numbers are cast to their decimal text.
/// `null` reads as absent.
///
/// # Errors
///
/// [`FieldProblem::WrongType`] when the value is neither a string nor a
/// number.
pub fn read_string(
    body: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, FieldError> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(FieldError::new(
            field,
            FieldProblem::WrongType { expected: "string" },
        )),
    }
}

/// Read an optional number. Numeric strings are cast. `null` reads as absent.
///
/// # Errors
///
/// [`FieldProblem::WrongType`] when the value is neither a number nor a
/// string holding one.
pub fn read_number(
    body: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<f64>, FieldError> {
    let wrong_type = || FieldError::new(field, FieldProblem::WrongType { expected: "number" });
    match body.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_f64().map(Some).ok_or_else(wrong_type),
        Some(Value::String(s)) => s.trim().parse::<f64>().map(Some).map_err(|_| wrong_type()),
        Some(_) => Err(wrong_type()),
    }
}

/// Push the reader's error (if any) into `errors` and flatten the result.
pub fn collect<T>(result: Result<Option<T>, FieldError>, errors: &mut Vec<FieldError>) -> Option<T> {
    match result {
        Ok(value) => value,
        Err(err) => {
            errors.push(err);
            None
        }
    }
}
