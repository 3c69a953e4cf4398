// Configuration validation

use crate::{ConfigError, Result};

/// Trait for validating configuration
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Configuration validator with rules
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate that a number is within range
    pub fn in_range<T: PartialOrd + std::fmt::Display>(
        value: T,
        min: T,
        max: T,
        field: &str,
    ) -> Result<()> {
        if value < min || value > max {
            return Err(ConfigError::ValidationError(format!(
                "{} must be between {} and {}",
                field, min, max
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_validation() {
        assert!(ConfigValidator::in_range(5, 1, 10, "field").is_ok());
        assert!(ConfigValidator::in_range(0, 1, 10, "field").is_err());
        assert!(ConfigValidator::in_range(11, 1, 10, "field").is_err());
    }

    #[test]
    fn test_error_message_names_field() {
        let err = ConfigValidator::in_range(0usize, 1, 10, "max_body_size").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: max_body_size must be between 1 and 10"
        );
    }
}
