//! Well-known role and account-status constants.
//!
//! These must match the values seeded into the `users` table.

pub const ROLE_CITIZEN: &str = "citizen";
pub const ROLE_OFFICER: &str = "officer";
pub const ROLE_ADMIN: &str = "admin";

/// Account in good standing; the only status allowed to call the core.
pub const ACCOUNT_ACTIVE: &str = "active";
pub const ACCOUNT_SUSPENDED: &str = "suspended";
pub const ACCOUNT_DELETED: &str = "deleted";
