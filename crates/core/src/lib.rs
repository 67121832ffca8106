//! Domain types and state machines for the alert/safe-walk coordination
//! engine. This crate is pure logic: no async, no I/O, no persistence.

pub mod alert;
pub mod error;
pub mod geo;
pub mod roles;
pub mod rooms;
pub mod safewalk;
pub mod types;
