use thiserror::Error;

/// Errors raised by the access-control core.
///
/// Authorization outcomes are never errors: denied checks come back as
/// plain booleans or structured deny values so callers can tell "not
/// permitted" apart from malformed input. The only validation failure the
/// core raises is a role-config hard requirement.
#[derive(Error, Debug)]
pub enum AccessError {
    #[error("Role configuration invalid: {0}")]
    ConfigValidation(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AccessError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigValidation(message.into())
    }

    /// Whether this error should surface as a user-facing 4xx rejection.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ConfigValidation(_))
    }
}

pub type AccessResult<T> = std::result::Result<T, AccessError>;
