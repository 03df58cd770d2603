use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Identifier assigned to a task by the store on creation.
///
/// A `TaskId` wraps a random (v4) UUID and is rendered as the usual
/// hyphenated string on the wire. Ids are never taken from client input;
/// the only way to mint a new one is [`TaskId::generate`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(uuid::Uuid);

impl TaskId {
    /// Generate a fresh random task ID.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// The all-zero ID. Never produced by [`TaskId::generate`].
    pub const fn nil() -> Self {
        Self(uuid::Uuid::nil())
    }

    /// Create from an existing UUID.
    pub fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Parse a task ID from its string form.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        uuid::Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| TypeError::InvalidTaskId(s.to_string()))
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }

    /// Short representation (first 8 characters of the UUID).
    pub fn short_id(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl FromStr for TaskId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Debug for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TaskId({})", self.short_id())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_are_unique() {
        let ids: HashSet<TaskId> = (0..1000).map(|_| TaskId::generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn generated_ids_are_v4() {
        let id = TaskId::generate();
        assert_eq!(id.as_uuid().get_version_num(), 4);
    }

    #[test]
    fn parse_accepts_display_form() {
        let id = TaskId::generate();
        let parsed = TaskId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = TaskId::parse("non-existing-id").unwrap_err();
        assert_eq!(err, TypeError::InvalidTaskId("non-existing-id".into()));
    }

    #[test]
    fn from_str_matches_parse() {
        let id = TaskId::generate();
        let s = id.to_string();
        assert_eq!(s.parse::<TaskId>().unwrap(), TaskId::parse(&s).unwrap());
    }

    #[test]
    fn display_is_hyphenated_uuid() {
        let id = TaskId::from_uuid(uuid::Uuid::nil());
        assert_eq!(id.to_string(), "00000000-0000-0000-0000-000000000000");
    }

    #[test]
    fn short_id_is_8_chars() {
        assert_eq!(TaskId::generate().short_id().len(), 8);
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = TaskId::from_uuid(uuid::Uuid::nil());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"00000000-0000-0000-0000-000000000000\"");
    }
}
