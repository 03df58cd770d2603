use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::id::TaskId;

/// Completion state of a task.
///
/// Serialized as the bare integer `0` or `1` so the JSON shape stays
/// `{"status": 0}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub enum TaskStatus {
    /// Not yet done (`0`).
    #[default]
    Pending,
    /// Done (`1`).
    Done,
}

impl TaskStatus {
    /// Integer code used on the wire.
    pub fn code(&self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Done => 1,
        }
    }
}

impl TryFrom<i64> for TaskStatus {
    type Error = TypeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Pending),
            1 => Ok(Self::Done),
            other => Err(TypeError::InvalidStatus(other)),
        }
    }
}

impl From<TaskStatus> for u8 {
    fn from(status: TaskStatus) -> Self {
        status.code()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// A stored task record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Assigned by the store; immutable afterwards.
    pub id: TaskId,
    pub name: String,
    pub status: TaskStatus,
}

impl Task {
    /// Build a record from a draft and an already-assigned id.
    pub fn from_draft(id: TaskId, draft: TaskDraft) -> Self {
        Self {
            id,
            name: draft.name,
            status: draft.status,
        }
    }

    /// Overwrite the mutable fields, keeping the id.
    pub fn apply(&mut self, draft: TaskDraft) {
        self.name = draft.name;
        self.status = draft.status;
    }

    /// The mutable fields of this record as a draft.
    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            name: self.name.clone(),
            status: self.status,
        }
    }
}

/// Caller-supplied fields for creating or updating a task.
///
/// Drafts carry no `id`; ids only ever come from the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub name: String,
    pub status: TaskStatus,
}

impl TaskDraft {
    pub fn new(name: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            name: name.into(),
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn status_codes() {
        assert_eq!(TaskStatus::Pending.code(), 0);
        assert_eq!(TaskStatus::Done.code(), 1);
        assert_eq!(TaskStatus::default(), TaskStatus::Pending);
    }

    #[test]
    fn status_from_integer() {
        assert_eq!(TaskStatus::try_from(0).unwrap(), TaskStatus::Pending);
        assert_eq!(TaskStatus::try_from(1).unwrap(), TaskStatus::Done);
        assert_eq!(TaskStatus::try_from(2), Err(TypeError::InvalidStatus(2)));
    }

    #[test]
    fn status_display() {
        assert_eq!(format!("{}", TaskStatus::Pending), "pending");
        assert_eq!(format!("{}", TaskStatus::Done), "done");
    }

    #[test]
    fn task_json_shape() {
        let id = TaskId::from_uuid(uuid::Uuid::nil());
        let task = Task::from_draft(id, TaskDraft::new("Test Task", TaskStatus::Pending));
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "00000000-0000-0000-0000-000000000000",
                "name": "Test Task",
                "status": 0,
            })
        );
    }

    #[test]
    fn task_deserializes_from_wire_shape() {
        let json = r#"{"id":"00000000-0000-0000-0000-000000000000","name":"x","status":1}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.status, TaskStatus::Done);
        assert_eq!(task.name, "x");
    }

    #[test]
    fn status_out_of_range_fails_to_deserialize() {
        let json = r#"{"name":"x","status":2}"#;
        assert!(serde_json::from_str::<TaskDraft>(json).is_err());
    }

    #[test]
    fn apply_keeps_id() {
        let id = TaskId::generate();
        let mut task = Task::from_draft(id, TaskDraft::new("Original", TaskStatus::Pending));
        task.apply(TaskDraft::new("Updated", TaskStatus::Done));
        assert_eq!(task.id, id);
        assert_eq!(task.name, "Updated");
        assert_eq!(task.status, TaskStatus::Done);
        assert_eq!(task.to_draft(), TaskDraft::new("Updated", TaskStatus::Done));
    }

    proptest! {
        #[test]
        fn only_zero_and_one_are_statuses(value in any::<i64>()) {
            let parsed = TaskStatus::try_from(value);
            prop_assert_eq!(parsed.is_ok(), value == 0 || value == 1);
        }
    }
}
