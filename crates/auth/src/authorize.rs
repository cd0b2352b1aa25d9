use thiserror::Error;

use crate::{Permission, Principal};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),

    #[error("forbidden: requires one of {0:?}")]
    ForbiddenAny(Vec<String>),
}

/// Require a single permission.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(principal: &Principal, required: &Permission) -> Result<(), AuthzError> {
    if principal.has_permission(required) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}

/// Require at least one of `required`.
pub fn authorize_any(principal: &Principal, required: &[Permission]) -> Result<(), AuthzError> {
    if required.iter().any(|p| principal.has_permission(p)) {
        Ok(())
    } else {
        Err(AuthzError::ForbiddenAny(
            required.iter().map(|p| p.as_str().to_string()).collect(),
        ))
    }
}
