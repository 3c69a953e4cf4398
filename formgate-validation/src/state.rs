// Per-request state embedded in every form request

use crate::QueryValue;
use serde::Serialize;
use std::collections::HashMap;

/// Base state shared by all form requests.
///
/// Embed it in a request struct under `#[serde(skip)]`; the pipeline fills
/// `query` as its last step, after every other stage has passed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RequestState {
    pub query: HashMap<String, QueryValue>,
}

impl RequestState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an inferred query parameter by name
    pub fn query(&self, key: &str) -> Option<&QueryValue> {
        self.query.get(key)
    }

    pub fn query_int(&self, key: &str) -> Option<i64> {
        self.query(key).and_then(QueryValue::as_i64)
    }

    /// Float parameters, with integer parameters widened
    pub fn query_float(&self, key: &str) -> Option<f64> {
        self.query(key).and_then(QueryValue::as_f64)
    }

    pub fn query_bool(&self, key: &str) -> Option<bool> {
        self.query(key).and_then(QueryValue::as_bool)
    }

    pub fn query_str(&self, key: &str) -> Option<&str> {
        self.query(key).and_then(QueryValue::as_str)
    }

    pub fn has_query(&self, key: &str) -> bool {
        self.query.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> RequestState {
        let mut state = RequestState::new();
        state.query.insert("page".into(), QueryValue::Int(2));
        state.query.insert("ratio".into(), QueryValue::Float(0.5));
        state.query.insert("active".into(), QueryValue::Bool(true));
        state.query.insert("sort".into(), QueryValue::from("name"));
        state
    }

    #[test]
    fn test_typed_getters() {
        let state = state();
        assert_eq!(state.query_int("page"), Some(2));
        assert_eq!(state.query_float("page"), Some(2.0));
        assert_eq!(state.query_float("ratio"), Some(0.5));
        assert_eq!(state.query_bool("active"), Some(true));
        assert_eq!(state.query_str("sort"), Some("name"));
    }

    #[test]
    fn test_getters_do_not_coerce_across_kinds() {
        let state = state();
        assert_eq!(state.query_int("ratio"), None);
        assert_eq!(state.query_bool("page"), None);
        assert_eq!(state.query_str("page"), None);
        assert_eq!(state.query_int("missing"), None);
        assert!(!state.has_query("missing"));
    }
}
