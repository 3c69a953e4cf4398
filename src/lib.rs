// formgate - form request decoding and validation
//
// This library turns an incoming request into a typed, validated form
// request: the body is read once and decoded, lifecycle hooks run, declared
// rules are checked and the query string is attached with inferred types.

// Re-export core functionality
pub use formgate_core::*;

// Re-export optional crates
#[cfg(feature = "config")]
pub use formgate_config;

#[cfg(feature = "validation")]
pub use formgate_validation;

#[cfg(feature = "validation")]
pub use formgate_validation::form_request_state;

// Prelude for common imports
pub mod prelude {
    pub use crate::{Error, HttpRequest, HttpResponse, QueryString, RequestBody};

    #[cfg(feature = "config")]
    pub use formgate_config::{PipelineConfig, Validate};

    #[cfg(feature = "validation")]
    pub use formgate_validation::{
        FieldRules, FormRequest, HookFailure, JsonRuleValidator, PipelineError, QueryValue,
        RequestState, RuleSet, RuleValidator, Stage, ValidationError, ValidationErrors,
        ValidationPipeline, form_request_state,
    };
}
