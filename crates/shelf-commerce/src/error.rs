//! Commerce error types.

use std::fmt;

use thiserror::Error;

use crate::backend::BackendError;

/// Errors that can occur in storefront operations.
///
/// None of these are fatal: callers surface them as a notification and keep
/// their state unchanged.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Book not found in the catalog.
    #[error("Book not found: {0}")]
    BookNotFound(String),

    /// Order not found.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Listing not found.
    #[error("Listing not found: {0}")]
    ListingNotFound(String),

    /// Checkout attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Order status change that the order's current status forbids.
    #[error("Invalid order status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    /// Form input rejected before anything was sent to the backend.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Operation needs a signed-in user.
    #[error("Not signed in")]
    NotAuthenticated,

    /// Signed-in user lacks the admin role.
    #[error("Access denied. Admin privileges required.")]
    Unauthorized,

    /// The hosted backend reported an error.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Arithmetic overflow in a price calculation.
    #[error("Arithmetic overflow in price calculation")]
    Overflow,

    /// Local storage error.
    #[error("Storage error: {0}")]
    Cache(#[from] shelf_cache::CacheError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CommerceError {
    /// Whether the error came from the backend service.
    pub fn is_backend(&self) -> bool {
        matches!(self, CommerceError::Backend(_))
    }

    /// Whether the error is an authentication or authorization failure.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            CommerceError::NotAuthenticated | CommerceError::Unauthorized
        )
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::Serialization(e.to_string())
    }
}

/// A single rejected form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field name as shown on the form.
    pub field: &'static str,
    /// What is wrong with it.
    pub message: String,
}

/// Every problem found while validating a form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Error)]
pub struct ValidationError {
    /// Rejected fields in form order.
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    /// Create an empty error to accumulate into.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a missing required field.
    pub fn missing(&mut self, field: &'static str) {
        self.fields.push(FieldError {
            field,
            message: "is required".to_string(),
        });
    }

    /// Record an invalid field.
    pub fn invalid(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Check a required text field, recording it if blank.
    pub fn require(&mut self, field: &'static str, value: &str) {
        if value.trim().is_empty() {
            self.missing(field);
        }
    }

    /// Whether any field was rejected.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether `field` was rejected.
    pub fn has(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.field == field)
    }

    /// `Ok(())` when nothing was rejected, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|e| format!("{} {}", e.field, e.message))
            .collect();
        write!(f, "Validation failed: {}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_accumulates() {
        let mut err = ValidationError::new();
        err.require("title", "  ");
        err.require("author", "Stephen King");
        err.invalid("price", "must be a whole number");

        assert!(err.has("title"));
        assert!(!err.has("author"));
        assert_eq!(
            err.to_string(),
            "Validation failed: title is required, price must be a whole number"
        );
        assert!(err.into_result().is_err());
    }

    #[test]
    fn test_empty_validation_is_ok() {
        assert!(ValidationError::new().into_result().is_ok());
    }

    #[test]
    fn test_error_classification() {
        assert!(CommerceError::Unauthorized.is_auth_failure());
        assert!(CommerceError::Backend(BackendError::new("boom")).is_backend());
        assert!(!CommerceError::EmptyCart.is_backend());
    }
}
