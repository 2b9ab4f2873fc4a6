//! JSON Schema validation for the service's analysis payload.
//!
//! The payload is validated against `schema/analysis.schema.json` before
//! it is deserialized into findings.

use std::sync::OnceLock;
use thiserror::Error;

/// Embedded analysis schema (loaded at compile time).
const ANALYSIS_SCHEMA_JSON: &str = include_str!("../schema/analysis.schema.json");

/// Compiled JSON Schema validator (initialized once, reused).
static COMPILED_SCHEMA: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

/// Errors from schema validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Failed to load schema: {0}")]
    LoadError(String),

    #[error("Payload does not match analysis schema: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

fn get_validator() -> Result<&'static jsonschema::Validator, SchemaError> {
    let result = COMPILED_SCHEMA.get_or_init(|| {
        let schema_value: serde_json::Value = match serde_json::from_str(ANALYSIS_SCHEMA_JSON) {
            Ok(v) => v,
            Err(e) => return Err(format!("Invalid schema JSON: {}", e)),
        };

        match jsonschema::options().build(&schema_value) {
            Ok(v) => Ok(v),
            Err(e) => Err(format!("Failed to compile schema: {}", e)),
        }
    });

    match result {
        Ok(v) => Ok(v),
        Err(e) => Err(SchemaError::LoadError(e.clone())),
    }
}

/// Validate an analysis payload, collecting every violation.
pub fn validate_analysis(payload: &serde_json::Value) -> Result<(), SchemaError> {
    let validator = get_validator()?;

    let errors: Vec<String> = validator
        .iter_errors(payload)
        .map(|e| format!("{} at {}", e, e.instance_path))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::Invalid(errors))
    }
}
