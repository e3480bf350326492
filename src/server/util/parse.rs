use crate::server::error::{internal::InternalError, AppError};

/// Parses a stored enum column into its domain type.
///
/// # Arguments
/// - `field` - Column name, used in the error message
/// - `value` - The stored string
/// - `parse` - Mapping from known strings to the domain value
///
/// # Returns
/// - `Ok(T)` - The stored value is known
/// - `Err(AppError::InternalErr(UnknownEnumValue))` - The database holds a value
///   the application does not recognise
pub fn parse_stored<T>(
    field: &'static str,
    value: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, AppError> {
    parse(value).ok_or_else(|| {
        InternalError::UnknownEnumValue {
            field,
            value: value.to_string(),
        }
        .into()
    })
}

/// Normalizes a coupon code for storage and lookup.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}
