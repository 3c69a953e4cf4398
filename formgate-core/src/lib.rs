// Core request boundary for formgate
// Transport-facing types consumed by the validation pipeline

pub mod body;
pub mod error;
pub mod http;
pub mod query;

// Re-export commonly used types
pub use body::{BodyReader, RequestBody};
pub use error::*;
pub use http::*;
pub use query::QueryString;
