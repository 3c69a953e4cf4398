// Built-in validators
//
// Every validator receives the field's value as it appears in the entity's
// JSON form. `Null` means the field is absent: only `Required` and
// `NotEmpty` reject it, everything else lets optional fields through.

use crate::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

// Common regex patterns
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$").unwrap()
});

static URL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").unwrap());

static UUID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$").unwrap()
});

static ALPHA_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z]+$").unwrap());

static ALPHANUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]+$").unwrap());

static NUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());

/// Render a value for error reports; strings are shown without quotes.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn type_error(field: &str, expected: &str, value: &Value) -> ValidationError {
    ValidationError::new(field, format!("{} must be {}", field, expected))
        .with_constraint("type")
        .with_value(display_value(value))
}

// `Ok(None)` for an absent value, an error for anything but a string.
fn text<'a>(value: &'a Value, field: &str) -> Result<Option<&'a str>, ValidationError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.as_str())),
        other => Err(type_error(field, "a string", other)),
    }
}

fn number(value: &Value, field: &str) -> Result<Option<f64>, ValidationError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        other => Err(type_error(field, "a number", other)),
    }
}

// Character count for strings, item count for arrays.
fn length(value: &Value, field: &str) -> Result<Option<usize>, ValidationError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.chars().count())),
        Value::Array(items) => Ok(Some(items.len())),
        other => Err(type_error(field, "a string or a list", other)),
    }
}

fn pattern(
    value: &Value,
    field: &str,
    regex: &Regex,
    constraint: &str,
    message: &str,
) -> Result<(), ValidationError> {
    match text(value, field)? {
        Some(s) if !regex.is_match(s) => Err(ValidationError::new(
            field,
            format!("{} {}", field, message),
        )
        .with_constraint(constraint)
        .with_value(s)),
        _ => Ok(()),
    }
}

// Presence validators

/// Validates that a value is present
pub struct Required;

impl Required {
    pub fn validate(value: &Value, field: &str) -> Result<(), ValidationError> {
        if value.is_null() {
            Err(
                ValidationError::new(field, format!("{} is required", field))
                    .with_constraint("required"),
            )
        } else {
            Ok(())
        }
    }
}

/// Validates that a value is present and not blank
pub struct NotEmpty;

impl NotEmpty {
    pub fn validate(value: &Value, field: &str) -> Result<(), ValidationError> {
        let empty = match value {
            Value::Null => true,
            Value::String(s) => s.trim().is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::Object(map) => map.is_empty(),
            Value::Bool(_) | Value::Number(_) => false,
        };

        if empty {
            Err(
                ValidationError::new(field, format!("{} should not be empty", field))
                    .with_constraint("notEmpty"),
            )
        } else {
            Ok(())
        }
    }
}

// String validators

/// Validates minimum length
pub struct MinLength(pub usize);

impl MinLength {
    pub fn validate(&self, value: &Value, field: &str) -> Result<(), ValidationError> {
        match length(value, field)? {
            Some(len) if len < self.0 => Err(ValidationError::new(
                field,
                format!("{} must be at least {} characters", field, self.0),
            )
            .with_constraint("minLength")
            .with_value(display_value(value))),
            _ => Ok(()),
        }
    }
}

/// Validates maximum length
pub struct MaxLength(pub usize);

impl MaxLength {
    pub fn validate(&self, value: &Value, field: &str) -> Result<(), ValidationError> {
        match length(value, field)? {
            Some(len) if len > self.0 => Err(ValidationError::new(
                field,
                format!("{} must be at most {} characters", field, self.0),
            )
            .with_constraint("maxLength")
            .with_value(display_value(value))),
            _ => Ok(()),
        }
    }
}

/// Validates email format
pub struct IsEmail;

impl IsEmail {
    pub fn validate(value: &Value, field: &str) -> Result<(), ValidationError> {
        pattern(value, field, &EMAIL_REGEX, "isEmail", "must be a valid email")
    }
}

/// Validates URL format
pub struct IsUrl;

impl IsUrl {
    pub fn validate(value: &Value, field: &str) -> Result<(), ValidationError> {
        pattern(value, field, &URL_REGEX, "isUrl", "must be a valid URL")
    }
}

/// Validates UUID format
pub struct IsUuid;

impl IsUuid {
    pub fn validate(value: &Value, field: &str) -> Result<(), ValidationError> {
        pattern(value, field, &UUID_REGEX, "isUuid", "must be a valid UUID")
    }
}

/// Validates alphabetic characters only
pub struct IsAlpha;

impl IsAlpha {
    pub fn validate(value: &Value, field: &str) -> Result<(), ValidationError> {
        pattern(value, field, &ALPHA_REGEX, "isAlpha", "must contain only letters")
    }
}

/// Validates alphanumeric characters only
pub struct IsAlphanumeric;

impl IsAlphanumeric {
    pub fn validate(value: &Value, field: &str) -> Result<(), ValidationError> {
        pattern(
            value,
            field,
            &ALPHANUMERIC_REGEX,
            "isAlphanumeric",
            "must contain only letters and numbers",
        )
    }
}

/// Validates numeric characters only
pub struct IsNumeric;

impl IsNumeric {
    pub fn validate(value: &Value, field: &str) -> Result<(), ValidationError> {
        pattern(value, field, &NUMERIC_REGEX, "isNumeric", "must contain only numbers")
    }
}

/// Custom regex validator
pub struct Matches(pub Regex);

impl Matches {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self(Regex::new(pattern)?))
    }

    pub fn validate(&self, value: &Value, field: &str) -> Result<(), ValidationError> {
        pattern(value, field, &self.0, "matches", "does not match required pattern")
    }
}

// Number validators

/// Validates minimum value
pub struct Min(pub f64);

impl Min {
    pub fn validate(&self, value: &Value, field: &str) -> Result<(), ValidationError> {
        match number(value, field)? {
            Some(n) if n < self.0 => Err(ValidationError::new(
                field,
                format!("{} must be at least {}", field, self.0),
            )
            .with_constraint("min")
            .with_value(n.to_string())),
            _ => Ok(()),
        }
    }
}

/// Validates maximum value
pub struct Max(pub f64);

impl Max {
    pub fn validate(&self, value: &Value, field: &str) -> Result<(), ValidationError> {
        match number(value, field)? {
            Some(n) if n > self.0 => Err(ValidationError::new(
                field,
                format!("{} must be at most {}", field, self.0),
            )
            .with_constraint("max")
            .with_value(n.to_string())),
            _ => Ok(()),
        }
    }
}

/// Validates value is positive
pub struct IsPositive;

impl IsPositive {
    pub fn validate(value: &Value, field: &str) -> Result<(), ValidationError> {
        match number(value, field)? {
            Some(n) if n <= 0.0 => Err(ValidationError::new(
                field,
                format!("{} must be a positive number", field),
            )
            .with_constraint("isPositive")
            .with_value(n.to_string())),
            _ => Ok(()),
        }
    }
}

/// Validates value is in range (inclusive)
pub struct InRange {
    pub min: f64,
    pub max: f64,
}

impl InRange {
    pub fn validate(&self, value: &Value, field: &str) -> Result<(), ValidationError> {
        match number(value, field)? {
            Some(n) if n < self.min || n > self.max => Err(ValidationError::new(
                field,
                format!("{} must be between {} and {}", field, self.min, self.max),
            )
            .with_constraint("inRange")
            .with_value(n.to_string())),
            _ => Ok(()),
        }
    }
}

// Set validators

/// Validates value is one of an allowed set
pub struct OneOf(pub Vec<Value>);

impl OneOf {
    pub fn validate(&self, value: &Value, field: &str) -> Result<(), ValidationError> {
        if value.is_null() || self.0.contains(value) {
            return Ok(());
        }

        let allowed = self
            .0
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", ");
        Err(
            ValidationError::new(field, format!("{} must be one of: {}", field, allowed))
                .with_constraint("oneOf")
                .with_value(display_value(value)),
        )
    }
}
