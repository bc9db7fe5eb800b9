use access_control::AccessError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HierarchyError {
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Account creation denied: {0}")]
    CreationDenied(String),

    #[error("Modification denied: {0}")]
    ModificationDenied(String),

    #[error("Protected account: {0}")]
    ProtectedAccount(String),

    #[error("Invalid account payload: {0}")]
    Validation(String),

    #[error("Role configuration error: {0}")]
    Config(#[from] AccessError),

    #[error("Repository error: {0}")]
    RepositoryError(String),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, HierarchyError>;
