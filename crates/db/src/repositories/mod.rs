//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Guarded status transitions
//! (`UPDATE ... WHERE status = '<expected>'`) live here; they are the
//! serialization points for claim and escalation races.

pub mod alert_repo;
pub mod alert_response_repo;
pub mod chat_repo;
pub mod safewalk_repo;
pub mod user_repo;

pub use alert_repo::AlertRepo;
pub use alert_response_repo::AlertResponseRepo;
pub use chat_repo::ChatRepo;
pub use safewalk_repo::SafeWalkRepo;
pub use user_repo::UserRepo;
