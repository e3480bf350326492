use thiserror::Error;

/// Internal issues with the codebase indicating unexpected behavior & possible bugs
#[derive(Error, Debug)]
pub enum InternalError {
    /// A stored enum column holds a value the application does not know.
    ///
    /// Results in a 500 Internal Server Error with a generic message returned
    /// to client.
    #[error("Unknown {field} value '{value}' in database")]
    UnknownEnumValue {
        /// Name of the column or enum being parsed
        field: &'static str,
        /// The stored value that failed to parse
        value: String,
    },

    /// A month key could not be advanced or parsed.
    #[error("Failed to compute next monthly reset from {0}")]
    InvalidResetDate(String),
}
