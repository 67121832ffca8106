//! Room-name conventions for the event fan-out layer.
//!
//! Two naming schemes are used by the core: a single well-known room that
//! every connected officer joins, and one private room per end user keyed
//! by that user's id.

use crate::types::DbId;

/// Broadcast room joined by all connected responders.
pub const RESPONDERS_ROOM: &str = "responders";

/// Private delivery room for a single user.
pub fn user_room(user_id: DbId) -> String {
    format!("user_{user_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_room_is_keyed_by_id() {
        assert_eq!(user_room(42), "user_42");
        assert_ne!(user_room(1), user_room(2));
    }
}
