//! Request validation for formgate
//!
//! Decodes a request body into a typed form request, runs its preparation
//! and validation hooks, checks its declarative rules and attaches the
//! query string with inferred types. Every stage is fail-fast.
//!
//! # Examples
//!
//! ## Form Request Pipeline
//!
//! ```
//! use formgate_core::HttpRequest;
//! use formgate_validation::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Default, Deserialize, Serialize)]
//! struct CreatePost {
//!     #[serde(default)]
//!     title: String,
//!     #[serde(default)]
//!     tags: Vec<String>,
//!     #[serde(skip)]
//!     request: RequestState,
//! }
//!
//! impl FormRequest for CreatePost {
//!     fn rules(&self) -> RuleSet {
//!         RuleSet::new()
//!             .field(FieldRules::for_field("title").not_empty().max_length(80))
//!             .field(FieldRules::for_field("tags").max_length(5))
//!     }
//!
//!     form_request_state!(request);
//! }
//!
//! let mut request = HttpRequest::from_uri("POST", "/posts?draft=true&page=2")
//!     .with_body(r#"{"title":"Hello","tags":["intro"]}"#);
//!
//! let post: CreatePost = ValidationPipeline::new().parse(&mut request).unwrap();
//! assert_eq!(post.title, "Hello");
//! assert_eq!(post.state().query_bool("draft"), Some(true));
//! assert_eq!(post.state().query_int("page"), Some(2));
//! ```
//!
//! ## Validation Rules Builder
//!
//! ```
//! use formgate_validation::{FieldRules, RuleSet};
//! use serde_json::json;
//!
//! let rules = RuleSet::new()
//!     .field(FieldRules::for_field("username").not_empty().min_length(3))
//!     .field(FieldRules::for_field("email").email());
//!
//! assert!(rules.validate(&json!({"username": "john"})).is_ok());
//!
//! let errors = rules
//!     .validate(&json!({"username": "jo", "email": "nope"}))
//!     .unwrap_err();
//! assert_eq!(errors.fields(), ["username", "email"]);
//! ```
//!
//! ## Query Inference
//!
//! ```
//! use formgate_core::QueryString;
//! use formgate_validation::{QueryValue, infer_query};
//!
//! let typed = infer_query(&QueryString::parse("age=30&ratio=1.5&active=true&tag=x"));
//! assert_eq!(typed["age"], QueryValue::Int(30));
//! assert_eq!(typed["ratio"], QueryValue::Float(1.5));
//! assert_eq!(typed["active"], QueryValue::Bool(true));
//! assert_eq!(typed["tag"], QueryValue::String("x".into()));
//! ```

mod errors;
mod infer;
mod pipe;
mod rules;
mod state;
mod traits;
mod validators;

pub use errors::*;
pub use infer::*;
pub use pipe::*;
pub use rules::*;
pub use state::*;
pub use traits::*;
pub use validators::*;
