//! Token validation for the identity collaborator.
//!
//! Credential issuance lives outside the core; this module only validates
//! the HS256 access tokens that the identity service mints.

pub mod jwt;
