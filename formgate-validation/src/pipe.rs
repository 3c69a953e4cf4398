// Validation pipeline for form requests

use crate::{
    FormRequest, HookFailure, JsonRuleValidator, RuleValidator, ValidationErrors, infer_query,
};
use formgate_config::PipelineConfig;
use formgate_core::body::bytes::Bytes;
use formgate_core::{HttpRequest, HttpResponse};
use std::fmt;
use std::io;
use thiserror::Error;
use tracing::{debug, warn};

/// Steps every request passes through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    TypeCheck,
    BodyRead,
    Decode,
    Prepare,
    Hook,
    RuleValidate,
    QueryMerge,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::TypeCheck => "type_check",
            Stage::BodyRead => "body_read",
            Stage::Decode => "decode",
            Stage::Prepare => "prepare",
            Stage::Hook => "hook",
            Stage::RuleValidate => "rule_validate",
            Stage::QueryMerge => "query_merge",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First failure met by the pipeline. No stage after it has run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Payload Too Large: request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Deserialization error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Prepare error: {0}")]
    Prepare(#[source] HookFailure),

    #[error("Hook error: {0}")]
    Hook(#[source] HookFailure),

    #[error("Validation error: {0}")]
    Validation(#[source] ValidationErrors),
}

impl PipelineError {
    /// The stage that failed
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::InvalidTarget(_) => Stage::TypeCheck,
            PipelineError::Io(_) | PipelineError::PayloadTooLarge { .. } => Stage::BodyRead,
            PipelineError::Decode(_) => Stage::Decode,
            PipelineError::Prepare(_) => Stage::Prepare,
            PipelineError::Hook(_) => Stage::Hook,
            PipelineError::Validation(_) => Stage::RuleValidate,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PipelineError::Decode(_) => 400,
            PipelineError::PayloadTooLarge { .. } => 413,
            PipelineError::Prepare(_) | PipelineError::Hook(_) | PipelineError::Validation(_) => {
                422
            }
            PipelineError::InvalidTarget(_) | PipelineError::Io(_) => 500,
        }
    }

    /// Field-level violations, for rule validation failures
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            PipelineError::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            PipelineError::Validation(errors) => errors.to_json(),
            PipelineError::Prepare(failure) | PipelineError::Hook(failure) => serde_json::json!({
                "error": failure.message,
                "field": failure.field,
                "stage": self.stage().as_str(),
            }),
            other => serde_json::json!({
                "error": other.to_string(),
                "stage": other.stage().as_str(),
            }),
        }
    }

    /// Transform the error to a JSON HTTP response
    pub fn error_response(&self) -> HttpResponse {
        HttpResponse::new(self.status_code())
            .with_header("Content-Type".to_string(), "application/json".to_string())
            .with_body(self.to_json().to_string().into_bytes())
    }
}

impl From<PipelineError> for formgate_core::Error {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Io(e) => formgate_core::Error::Io(e),
            PipelineError::PayloadTooLarge { limit } => formgate_core::Error::PayloadTooLarge(
                format!("request body exceeds {} bytes", limit),
            ),
            PipelineError::Decode(e) => formgate_core::Error::Deserialization(e.to_string()),
            PipelineError::Prepare(f) | PipelineError::Hook(f) => {
                formgate_core::Error::UnprocessableEntity(f.to_string())
            }
            PipelineError::Validation(errors) => {
                formgate_core::Error::Validation(errors.to_string())
            }
            PipelineError::InvalidTarget(msg) => formgate_core::Error::Internal(msg),
        }
    }
}

/// Decode-and-validate pipeline for [`FormRequest`] types.
///
/// Stages run strictly in order and the first failure is returned as is:
///
/// 1. body read (once, released on every path)
/// 2. JSON decode into the target
/// 3. [`FormRequest::prepare_for_validation`]
/// 4. [`FormRequest::with_validator`]
/// 5. rule validation
/// 6. typed query inference into the target's [`RequestState`](crate::RequestState)
///
/// A pipeline holds no per-request state and can be shared between threads.
#[derive(Debug, Clone, Default)]
pub struct ValidationPipeline<V = JsonRuleValidator> {
    config: PipelineConfig,
    validator: V,
}

impl ValidationPipeline {
    /// Pipeline with default configuration and the JSON rule validator
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        Self {
            config,
            validator: JsonRuleValidator,
        }
    }
}

impl<V: RuleValidator> ValidationPipeline<V> {
    /// Swap the rule validator
    pub fn with_rule_validator<W: RuleValidator>(self, validator: W) -> ValidationPipeline<W> {
        ValidationPipeline {
            config: self.config,
            validator,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage against `target`, consuming the request body.
    ///
    /// Decoding replaces `target` wholesale: fields set before the call are
    /// overwritten with the decoded values (or their serde defaults), and a
    /// `null` body is a decode error. Only the embedded
    /// [`RequestState`](crate::RequestState) is carried over.
    pub fn validate<T: FormRequest>(
        &self,
        target: &mut T,
        request: &mut HttpRequest,
    ) -> Result<(), PipelineError> {
        let target_type = std::any::type_name::<T>();
        debug!(target_type, path = %request.path, "running validation pipeline");

        match self.run(target, request) {
            Ok(query_keys) => {
                debug!(target_type, query_keys, "request validated");
                Ok(())
            }
            Err(err) => {
                warn!(target_type, stage = %err.stage(), error = %err, "request rejected");
                Err(err)
            }
        }
    }

    /// Like [`validate`](Self::validate), for call sites holding an optional target.
    ///
    /// A missing target fails before the body is touched.
    pub fn validate_target<T: FormRequest>(
        &self,
        target: Option<&mut T>,
        request: &mut HttpRequest,
    ) -> Result<(), PipelineError> {
        match target {
            Some(target) => self.validate(target, request),
            None => {
                let err = PipelineError::InvalidTarget(format!(
                    "expected a mutable reference to {}",
                    std::any::type_name::<T>()
                ));
                warn!(stage = %err.stage(), error = %err, "request rejected");
                Err(err)
            }
        }
    }

    /// Validate into a fresh `T::default()` and return it.
    pub fn parse<T>(&self, request: &mut HttpRequest) -> Result<T, PipelineError>
    where
        T: FormRequest + Default,
    {
        let mut target = T::default();
        self.validate(&mut target, request)?;
        Ok(target)
    }

    fn run<T: FormRequest>(
        &self,
        target: &mut T,
        request: &mut HttpRequest,
    ) -> Result<usize, PipelineError> {
        debug!(stage = %Stage::BodyRead);
        let body = self.read_body(request)?;

        debug!(stage = %Stage::Decode, bytes = body.len());
        let decoded: T = self.decode(&body)?;
        let state = std::mem::take(target.state_mut());
        *target = decoded;
        *target.state_mut() = state;

        debug!(stage = %Stage::Prepare);
        target
            .prepare_for_validation()
            .map_err(PipelineError::Prepare)?;

        debug!(stage = %Stage::Hook);
        target.with_validator().map_err(PipelineError::Hook)?;

        debug!(stage = %Stage::RuleValidate);
        let rules = target.rules();
        self.validator
            .validate(&*target, &rules)
            .map_err(PipelineError::Validation)?;

        debug!(stage = %Stage::QueryMerge);
        let query = infer_query(request.query());
        let query_keys = query.len();
        target.state_mut().query = query;

        Ok(query_keys)
    }

    // The reader is dropped, and the stream released, before this returns.
    fn read_body(&self, request: &mut HttpRequest) -> Result<Bytes, PipelineError> {
        let limit = self.config.max_body_size;
        let mut reader = request
            .body
            .take_reader()
            .ok_or_else(|| io::Error::other("request body already consumed"))?;

        reader.read_limited(limit).map_err(|e| match e {
            formgate_core::Error::Io(e) => PipelineError::Io(e),
            formgate_core::Error::PayloadTooLarge(_) => PipelineError::PayloadTooLarge { limit },
            other => PipelineError::Io(io::Error::other(other.to_string())),
        })
    }

    fn decode<T: FormRequest>(&self, body: &[u8]) -> Result<T, PipelineError> {
        if self.config.allow_empty_body && body.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::from_slice(b"{}")?);
        }
        Ok(serde_json::from_slice(body)?)
    }
}

/// Run the default pipeline against `target`.
pub fn validate<T: FormRequest>(
    target: &mut T,
    request: &mut HttpRequest,
) -> Result<(), PipelineError> {
    ValidationPipeline::new().validate(target, request)
}
