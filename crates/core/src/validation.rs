//! Validation findings
//!
//! Collects non-fatal findings (warnings) and fatal findings (errors) about a
//! configuration, each tied to the field it concerns.
//!
//! # Example
//!
//! ```rust
//! use droidconf_core::validation::{ValidationError, Validator};
//!
//! let result = Validator::new()
//!     .warning(true, || {
//!         ValidationError::new(
//!             "android.kotlinOptions.jvmTarget",
//!             "JVM_TARGET_MISMATCH",
//!             "differs from targetCompatibility",
//!         )
//!     })
//!     .validate();
//!
//! assert!(result.is_valid());
//! assert_eq!(result.warnings().len(), 1);
//! ```

use serde::{Deserialize, Serialize};

/// Validation finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field that failed validation
    pub field: String,
    /// Finding message
    pub message: String,
    /// Finding code
    pub code: String,
    /// Expected value (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    /// Actual value (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

impl ValidationError {
    /// Create a finding with a code and message
    pub fn new(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: code.into(),
            expected: None,
            actual: None,
        }
    }

    /// Attach expected and actual values
    pub fn with_values(mut self, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self.actual = Some(actual.into());
        self
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)?;
        if let (Some(expected), Some(actual)) = (&self.expected, &self.actual) {
            write!(f, " (expected {}, found {})", expected, actual)?;
        }
        Ok(())
    }
}

/// Validation result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationError>,
}

impl ValidationResult {
    /// Create a new empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// True when there are neither errors nor warnings
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// Get all errors
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Get all warnings
    pub fn warnings(&self) -> &[ValidationError] {
        &self.warnings
    }

    /// Add a warning
    pub fn add_warning(&mut self, warning: ValidationError) {
        self.warnings.push(warning);
    }

    /// Move every warning into the error list
    pub fn escalate_warnings(mut self) -> Self {
        self.errors.append(&mut self.warnings);
        self
    }
}

/// Fluent validator builder
pub struct Validator {
    result: ValidationResult,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Create a new validator
    pub fn new() -> Self {
        Self {
            result: ValidationResult::new(),
        }
    }

    /// Add a fully specified warning (non-blocking)
    pub fn warning(mut self, condition: bool, finding: impl FnOnce() -> ValidationError) -> Self {
        if condition {
            self.result.add_warning(finding());
        }
        self
    }

    /// Complete validation and return result
    pub fn validate(self) -> ValidationResult {
        self.result
    }
}
