//! Lifecycle engines.
//!
//! The engines own the alert and safe-walk state machines: each operation
//! validates input, performs the guarded transition against the store,
//! and only then hands a delivery event to the bus. The guarded updates
//! in `guardia_db` are the serialization points; the engines never
//! check-then-write status.

mod alerts;
mod safewalk;

pub use alerts::{
    AlertEngine, ClaimAlertRequest, ClaimOutcome, CreateAlertRequest, UpdateResponseStatusRequest,
};
pub use safewalk::{CheckInRequest, SafeWalkEngine, StartSafeWalkRequest};
