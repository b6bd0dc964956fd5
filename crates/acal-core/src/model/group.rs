//! Study group records

use crate::errors::InputError;
use crate::rules::{parse_integer, require_value};

/// Validated input for the create-study-group workflow
///
/// The group starts with `member_count = 1`, counting the leader. No
/// membership row is written for the leader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudentGroup {
    pub name: String,
    pub purpose: String,
    pub leader_student_id: String,
}

impl NewStudentGroup {
    /// Initial member count of a freshly created group
    pub const INITIAL_MEMBER_COUNT: i64 = 1;

    /// # Errors
    /// `MissingValue` for a blank group name or leader id.
    pub fn parse(name: &str, purpose: &str, leader_student_id: &str) -> Result<Self, InputError> {
        Ok(Self {
            name: require_value("group_name", name)?.to_string(),
            purpose: purpose.trim().to_string(),
            leader_student_id: require_value("leader_student_id", leader_student_id)?.to_string(),
        })
    }
}

/// Input for the change-group-leader workflow
///
/// Whether the new leader is a member of the group is left to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderChange {
    pub group_id: i64,
    pub new_leader_student_id: String,
}

impl LeaderChange {
    /// # Errors
    /// `NotAnInteger` for a non-numeric group id, `MissingValue` for a blank
    /// leader id.
    pub fn parse(group_id: &str, new_leader_student_id: &str) -> Result<Self, InputError> {
        Ok(Self {
            group_id: parse_integer("group_id", group_id)?,
            new_leader_student_id: require_value("new_leader_student_id", new_leader_student_id)?
                .to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_group_trims_fields() {
        let group = NewStudentGroup::parse(" Algo club ", " study ", " 2022000074 ").unwrap();
        assert_eq!(group.name, "Algo club");
        assert_eq!(group.purpose, "study");
        assert_eq!(group.leader_student_id, "2022000074");
    }

    #[test]
    fn test_leader_change_rejects_non_numeric_group() {
        assert!(matches!(
            LeaderChange::parse("group-184", "2022000037"),
            Err(InputError::NotAnInteger { .. })
        ));
    }
}
