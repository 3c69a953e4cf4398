// Validation rules builder

use crate::validators::*;
use crate::{ValidationError, ValidationErrors};
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

type ValidatorFn = Arc<dyn Fn(&Value, &str) -> Result<(), ValidationError> + Send + Sync>;

/// Validators attached to a single field.
///
/// Field names may be dotted (`address.city`, `items.0.sku`) to reach into
/// nested objects and arrays.
#[derive(Clone)]
pub struct FieldRules {
    field: String,
    validators: Vec<ValidatorFn>,
}

impl FieldRules {
    /// Create new validation rules for a field
    pub fn for_field(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            validators: Vec::new(),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Number of attached validators
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Add a custom validator function
    #[allow(clippy::should_implement_trait)]
    pub fn add<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Value, &str) -> Result<(), ValidationError> + Send + Sync + 'static,
    {
        self.validators.push(Arc::new(validator));
        self
    }

    pub fn required(self) -> Self {
        self.add(Required::validate)
    }

    pub fn not_empty(self) -> Self {
        self.add(NotEmpty::validate)
    }

    pub fn min_length(self, min: usize) -> Self {
        self.add(move |value, field| MinLength(min).validate(value, field))
    }

    pub fn max_length(self, max: usize) -> Self {
        self.add(move |value, field| MaxLength(max).validate(value, field))
    }

    pub fn email(self) -> Self {
        self.add(IsEmail::validate)
    }

    pub fn url(self) -> Self {
        self.add(IsUrl::validate)
    }

    pub fn uuid(self) -> Self {
        self.add(IsUuid::validate)
    }

    pub fn alpha(self) -> Self {
        self.add(IsAlpha::validate)
    }

    pub fn alphanumeric(self) -> Self {
        self.add(IsAlphanumeric::validate)
    }

    pub fn numeric(self) -> Self {
        self.add(IsNumeric::validate)
    }

    pub fn matches(self, regex: Regex) -> Self {
        let matcher = Matches(regex);
        self.add(move |value, field| matcher.validate(value, field))
    }

    pub fn min(self, min: impl Into<f64>) -> Self {
        let min = Min(min.into());
        self.add(move |value, field| min.validate(value, field))
    }

    pub fn max(self, max: impl Into<f64>) -> Self {
        let max = Max(max.into());
        self.add(move |value, field| max.validate(value, field))
    }

    pub fn positive(self) -> Self {
        self.add(IsPositive::validate)
    }

    pub fn in_range(self, min: impl Into<f64>, max: impl Into<f64>) -> Self {
        let range = InRange {
            min: min.into(),
            max: max.into(),
        };
        self.add(move |value, field| range.validate(value, field))
    }

    pub fn one_of<I, V>(self, allowed: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let one_of = OneOf(allowed.into_iter().map(Into::into).collect());
        self.add(move |value, field| one_of.validate(value, field))
    }

    /// Validate a value against all rules, collecting every violation
    pub fn validate(&self, value: &Value) -> Result<(), Vec<ValidationError>> {
        let errors: Vec<_> = self
            .validators
            .iter()
            .filter_map(|validator| validator(value, &self.field).err())
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl fmt::Debug for FieldRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRules")
            .field("field", &self.field)
            .field("validators", &self.validators.len())
            .finish()
    }
}

/// Mapping from field identifier to its rules.
///
/// Fields are kept in declaration order, which is the order violations are
/// reported in. Declaring the same field twice appends to its rules.
#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    rules: Vec<FieldRules>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add rules for a field
    pub fn field(mut self, rules: FieldRules) -> Self {
        match self.rules.iter_mut().find(|r| r.field == rules.field) {
            Some(existing) => existing.validators.extend(rules.validators),
            None => self.rules.push(rules),
        }
        self
    }

    pub fn get(&self, field: &str) -> Option<&FieldRules> {
        self.rules.iter().find(|r| r.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldRules> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Validate every ruled field of `data`; absent fields are checked as `Null`
    pub fn validate(&self, data: &Value) -> Result<(), ValidationErrors> {
        let mut all_errors = ValidationErrors::default();

        for rule in &self.rules {
            let value = lookup(data, &rule.field).unwrap_or(&Value::Null);
            if let Err(errors) = rule.validate(value) {
                all_errors.errors.extend(errors);
            }
        }

        all_errors.into_result()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a FieldRules;
    type IntoIter = std::slice::Iter<'a, FieldRules>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

/// Resolve a dotted field path inside a JSON value.
pub fn lookup<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    if let Some(value) = data.get(path) {
        return Some(value);
    }

    path.split('.').try_fold(data, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}
