use std::fmt;

pub const ORDER_ID_MAX_LEN: usize = 255;
pub const STATUS_CODE_MAX_LEN: usize = 3;
pub const AMOUNT_INPUT_MAX_LEN: usize = 64;
pub const PROVIDER_STATUS_MAX_LEN: usize = 32;
pub const STATUS_MESSAGE_MAX_LEN: usize = 255;
pub const SIGNATURE_MAX_LEN: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), ValidationError>;

/// Strips control characters and collapses whitespace runs.
pub fn sanitize_string(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !ch.is_control())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn validate_required(field: &'static str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }

    Ok(())
}

pub fn validate_max_len(field: &'static str, value: &str, max_len: usize) -> ValidationResult {
    if value.len() > max_len {
        return Err(ValidationError::new(
            field,
            format!("must be at most {} characters", max_len),
        ));
    }

    Ok(())
}

pub fn validate_digits(field: &'static str, value: &str) -> ValidationResult {
    if !value.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(ValidationError::new(field, "must contain only digits"));
    }

    Ok(())
}

/// Plain decimal notation as the provider formats it, e.g. `10000.00`.
/// The string itself is kept as-is for signature checks.
pub fn validate_decimal_string(field: &'static str, value: &str) -> ValidationResult {
    validate_required(field, value)?;
    validate_max_len(field, value, AMOUNT_INPUT_MAX_LEN)?;

    let (whole, fraction) = match value.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (value, None),
    };

    let well_formed = !whole.is_empty()
        && whole.chars().all(|ch| ch.is_ascii_digit())
        && fraction.map_or(true, |f| !f.is_empty() && f.chars().all(|ch| ch.is_ascii_digit()));

    if !well_formed {
        return Err(ValidationError::new(field, "must be a non-negative decimal number"));
    }

    Ok(())
}
