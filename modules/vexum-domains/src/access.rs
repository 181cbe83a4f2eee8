//! Which roles may see and run which meeting types.
//!
//! | role        | view                                  | manage / create |
//! |-------------|---------------------------------------|-----------------|
//! | participant | team, all-hands, one-on-one, other    | one-on-one      |
//! | manager     | everything except strategy            | same as view    |
//! | executive   | everything                            | everything      |

use serde::Serialize;
use vexum_core::{MeetingType, UserRole};

pub fn can_view(role: UserRole, meeting_type: MeetingType) -> bool {
    use MeetingType::*;
    match role {
        UserRole::Executive => true,
        UserRole::Manager => meeting_type != Strategy,
        UserRole::Participant => matches!(meeting_type, Team | AllHands | OneOnOne | Other),
    }
}

pub fn can_manage(role: UserRole, meeting_type: MeetingType) -> bool {
    match role {
        UserRole::Executive | UserRole::Manager => can_view(role, meeting_type),
        UserRole::Participant => meeting_type == MeetingType::OneOnOne,
    }
}

pub fn can_create(role: UserRole, meeting_type: MeetingType) -> bool {
    can_manage(role, meeting_type)
}

pub fn viewable_types(role: UserRole) -> Vec<MeetingType> {
    MeetingType::ALL
        .iter()
        .copied()
        .filter(|t| can_view(role, *t))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeetingTypeAccess {
    pub slug: MeetingType,
    pub name: &'static str,
    pub can_view: bool,
    pub can_manage: bool,
    pub can_create: bool,
}

/// The viewable meeting types for a role, each with its capabilities.
pub fn accessible_meeting_types(role: UserRole) -> Vec<MeetingTypeAccess> {
    viewable_types(role)
        .into_iter()
        .map(|slug| MeetingTypeAccess {
            slug,
            name: slug.label(),
            can_view: true,
            can_manage: can_manage(role, slug),
            can_create: can_create(role, slug),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeetingTypeInfo {
    pub slug: MeetingType,
    pub name: &'static str,
}

pub fn meeting_type_catalog() -> Vec<MeetingTypeInfo> {
    MeetingType::ALL
        .iter()
        .map(|t| MeetingTypeInfo {
            slug: *t,
            name: t.label(),
        })
        .collect()
}
