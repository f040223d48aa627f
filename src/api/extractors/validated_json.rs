//! Validated JSON extractor - Combines deserialization with validation.

use std::collections::BTreeMap;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::errors::AppError;

/// JSON body that has passed its `validator` rules.
///
/// Malformed JSON becomes a 400 with the parser message; rule violations
/// become a 400 with a per-field message map.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::InvalidFields(field_messages(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Collect validation errors into `field -> messages`, keyed by the
/// camelCase name the client sent.
///
/// Nested structs are flattened into the same map; their request fields are
/// flattened on the wire too.
fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    let mut fields = BTreeMap::new();
    collect(errors, &mut fields);
    fields
}

fn collect(errors: &ValidationErrors, fields: &mut BTreeMap<String, Vec<String>>) {
    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(errs) => {
                let messages = fields.entry(wire_name(field)).or_insert_with(Vec::new);
                messages.extend(errs.iter().map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                }));
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, fields),
            ValidationErrorsKind::List(items) => {
                for inner in items.values() {
                    collect(inner, fields);
                }
            }
        }
    }
}

/// `hire_date` -> `hireDate`
fn wire_name(field: &str) -> String {
    let mut name = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = !name.is_empty();
        } else if upper {
            name.extend(c.to_uppercase());
            upper = false;
        } else {
            name.push(c);
        }
    }
    name
}
