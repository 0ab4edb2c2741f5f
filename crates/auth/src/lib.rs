//! `courselib-auth` — authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it knows how
//! to evaluate an access declaration against a caller, how to sign and check
//! session tokens, and how to hash passwords.

pub mod authorize;
pub mod claims;
pub mod identity;
pub mod password;
pub mod roles;
pub mod token;
pub mod user;

pub use authorize::{Access, AuthorizationDecision, AuthzError, authorize, decide, is_allowed};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use identity::Identity;
pub use password::{PasswordError, PasswordHash, PasswordHasher, Pbkdf2Hasher, validate_password};
pub use roles::{Role, RoleSet, UnknownRole};
pub use token::{Hs256Jwt, JwtValidator, SessionToken, TokenError, TokenIssuer};
pub use user::{User, UserRepository, normalize_email};
