// Validation traits

use crate::{HookFailure, RequestState, RuleSet, ValidationError, ValidationErrors};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Capability set of a request type handled by the validation pipeline.
///
/// The pipeline decodes the body into the type, runs
/// [`prepare_for_validation`](Self::prepare_for_validation), then
/// [`with_validator`](Self::with_validator), then checks [`rules`](Self::rules)
/// against the type's serialized fields.
///
/// ```rust
/// use formgate_validation::*;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Default, Deserialize, Serialize)]
/// struct CreateUser {
///     #[serde(default)]
///     name: String,
///     #[serde(skip)]
///     request: RequestState,
/// }
///
/// impl FormRequest for CreateUser {
///     fn rules(&self) -> RuleSet {
///         RuleSet::new().field(FieldRules::for_field("name").not_empty())
///     }
///
///     fn prepare_for_validation(&mut self) -> Result<(), HookFailure> {
///         self.name = self.name.trim().to_string();
///         Ok(())
///     }
///
///     form_request_state!(request);
/// }
/// ```
pub trait FormRequest: DeserializeOwned + Serialize {
    /// Field identifier to rule mapping checked by the rule validator
    fn rules(&self) -> RuleSet;

    /// Normalize the decoded data before validation
    fn prepare_for_validation(&mut self) -> Result<(), HookFailure> {
        Ok(())
    }

    /// Cross-field checks or validator setup, run after preparation
    fn with_validator(&mut self) -> Result<(), HookFailure> {
        Ok(())
    }

    /// The embedded base state
    fn state(&self) -> &RequestState;

    fn state_mut(&mut self) -> &mut RequestState;
}

/// Implements [`FormRequest::state`] and [`FormRequest::state_mut`] for a
/// named [`RequestState`] field, inside an `impl FormRequest` block.
#[macro_export]
macro_rules! form_request_state {
    ($field:ident) => {
        fn state(&self) -> &$crate::RequestState {
            &self.$field
        }

        fn state_mut(&mut self) -> &mut $crate::RequestState {
            &mut self.$field
        }
    };
}

/// Checks an entity against a rule set.
pub trait RuleValidator {
    fn validate<T>(&self, entity: &T, rules: &RuleSet) -> Result<(), ValidationErrors>
    where
        T: Serialize + ?Sized;
}

/// Reads field values from the entity's JSON form and applies each field's
/// rules in declaration order, collecting every violation.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRuleValidator;

impl RuleValidator for JsonRuleValidator {
    fn validate<T>(&self, entity: &T, rules: &RuleSet) -> Result<(), ValidationErrors>
    where
        T: Serialize + ?Sized,
    {
        let data = serde_json::to_value(entity).map_err(|e| {
            ValidationError::new("_entity", format!("failed to serialize entity: {}", e))
                .with_constraint("serialize")
        })?;

        rules.validate(&data)
    }
}

/// Validate `entity` against `rules` with the default [`JsonRuleValidator`].
pub fn validate_struct<T>(entity: &T, rules: &RuleSet) -> Result<(), ValidationErrors>
where
    T: Serialize + ?Sized,
{
    JsonRuleValidator.validate(entity, rules)
}
