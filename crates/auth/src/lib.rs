//! `stockdesk-auth`: who is acting and what they may do.
//!
//! Decoupled from HTTP and storage: the API layer turns a bearer token into a
//! [`Principal`] and everything below only asks it questions.

pub mod authorize;
pub mod claims;
pub mod jwt;
pub mod permissions;
pub mod principal;

pub use authorize::{AuthzError, authorize, authorize_any};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtValidator, JwtError, JwtValidator};
pub use permissions::Permission;
pub use principal::Principal;
