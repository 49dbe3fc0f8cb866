//! Input validation errors raised before any store call.

/// Errors that can occur when validating user input.
///
/// These are surfaced to the user immediately and never retried.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required name was empty or only whitespace.
    #[error("name cannot be empty")]
    EmptyName,
    /// A required quantity was empty.
    #[error("quantity is required")]
    MissingQuantity,
    /// A required expiry date was empty.
    #[error("expiry date is required")]
    MissingExpiryDate,
    /// A bulk insert was requested with nothing to insert.
    #[error("nothing to insert")]
    EmptyBatch,
}

/// Trim `value`, rejecting it as [`ValidationError::EmptyName`] when blank.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyName`] if `value` is empty after trimming.
pub fn required_name(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(trimmed.to_owned())
}

/// Trim an optional free-text field; blank becomes `None`.
#[must_use]
pub fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
