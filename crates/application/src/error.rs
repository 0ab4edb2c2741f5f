use thiserror::Error;

use courselib_auth::{AuthzError, PasswordError, RoleSet, TokenError};
use courselib_core::{DomainError, RepositoryError, ValidationErrors};

/// Terminal failure of one dispatch call (or of a direct account operation).
///
/// Authorization variants are produced by the dispatcher itself; everything
/// else comes from handlers and passes through unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// An identity was required but the caller is anonymous.
    #[error("authentication required")]
    Unauthenticated,

    /// The caller holds none of the declared roles.
    #[error("forbidden: {request} requires one of [{required}]")]
    Forbidden {
        request: &'static str,
        required: RoleSet,
    },

    /// No handler is registered for the request type (wiring defect).
    #[error("no handler registered for {request}")]
    HandlerNotFound { request: &'static str },

    /// Payload failed domain validation.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// Credentials did not match. Deliberately carries no detail.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("conflict: {0}")]
    Conflict(String),

    /// Storage or other infrastructure failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DispatchError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// `Unauthenticated`, `Forbidden` and `InvalidCredentials` all stem from the caller's identity.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::Unauthenticated | Self::Forbidden { .. } | Self::InvalidCredentials
        )
    }
}

impl From<DomainError> for DispatchError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(errors) => DispatchError::Validation(errors),
            DomainError::InvalidId(msg) => {
                let mut errors = ValidationErrors::new();
                errors.add("id", msg);
                DispatchError::Validation(errors)
            }
            DomainError::Conflict(msg) => DispatchError::Conflict(msg),
        }
    }
}

impl From<RepositoryError> for DispatchError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Conflict(msg) => DispatchError::Conflict(msg),
            RepositoryError::Backend(msg) => DispatchError::Internal(msg),
        }
    }
}

impl From<PasswordError> for DispatchError {
    fn from(value: PasswordError) -> Self {
        DispatchError::Internal(value.to_string())
    }
}

impl From<TokenError> for DispatchError {
    fn from(value: TokenError) -> Self {
        DispatchError::Internal(value.to_string())
    }
}

/// Startup-time wiring defect in the access table or handler registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("handler for {request} registered twice")]
    DuplicateHandler { request: &'static str },

    #[error("access for {request} declared twice")]
    DuplicateDeclaration { request: &'static str },

    #[error("access for {request} declares an empty role set")]
    EmptyRoleSet { request: &'static str },

    #[error("{request} is declared but has no handler")]
    MissingHandler { request: &'static str },

    #[error("{request} has a handler but no access declaration")]
    MissingAccess { request: &'static str },
}

pub(crate) fn authz_to_dispatch(request: &'static str, err: AuthzError) -> DispatchError {
    match err {
        AuthzError::Unauthenticated => DispatchError::Unauthenticated,
        AuthzError::Forbidden { required } => DispatchError::Forbidden { request, required },
    }
}
