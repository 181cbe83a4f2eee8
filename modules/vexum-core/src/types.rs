//! Status vocabularies shared across the schema, the API, and the UI labels.
//!
//! Every enum here is stored as TEXT in Postgres and travels as its snake_case
//! (or kebab-case, for meeting types) wire string, both in JSON and as a bound
//! query parameter. `label()` is the Japanese display string the front end shows.

use serde::{Deserialize, Serialize};

/// Implement `as_str`, `label`, `ALL`, `Display`, `FromStr`, `TryFrom<String>`
/// and TEXT-backed sqlx encoding for a fieldless enum that already has serde
/// derives with matching names.
#[macro_export]
macro_rules! impl_text_enum {
    ($type:ident, $kind:literal, { $($variant:ident => ($wire:literal, $label:literal)),+ $(,)? }) => {
        impl $type {
            pub const ALL: &'static [$type] = &[$($type::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($type::$variant => $wire),+
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $($type::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $type {
            type Err = $crate::error::UnknownVariant;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($type::$variant),)+
                    _ => Err($crate::error::UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl TryFrom<String> for $type {
            type Error = $crate::error::UnknownVariant;

            fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl ::sqlx::Type<::sqlx::Postgres> for $type {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <String as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <String as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $type {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> std::result::Result<Self, ::sqlx::error::BoxDynError> {
                let text = <&str as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(text.parse::<$type>()?)
            }
        }

        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $type {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <&str as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
            }
        }
    };
}

// --- People ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Participant,
    Manager,
    Executive,
}

impl_text_enum!(UserRole, "user role", {
    Participant => ("participant", "参加者"),
    Manager => ("manager", "マネージャー"),
    Executive => ("executive", "経営層"),
});

// --- Meetings ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MeetingType {
    Team,
    Headquarters,
    Strategy,
    AllHands,
    OneOnOne,
    Other,
}

impl_text_enum!(MeetingType, "meeting type", {
    Team => ("team", "チームMTG"),
    Headquarters => ("headquarters", "本部会議"),
    Strategy => ("strategy", "戦略会議"),
    AllHands => ("all-hands", "全体会議"),
    OneOnOne => ("one-on-one", "1on1"),
    Other => ("other", "その他"),
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingStatus {
    Scheduled,
    Active,
    Completed,
}

impl_text_enum!(MeetingStatus, "meeting status", {
    Scheduled => ("scheduled", "予定"),
    Active => ("active", "開催中"),
    Completed => ("completed", "完了"),
});

// --- Actions and issues ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    NotStarted,
    InProgress,
    Reviewing,
    Completed,
    Waiting,
    OnHold,
}

impl_text_enum!(ActionStatus, "action status", {
    NotStarted => ("not_started", "未着手"),
    InProgress => ("in_progress", "進行中"),
    Reviewing => ("reviewing", "確認中"),
    Completed => ("completed", "完了"),
    Waiting => ("waiting", "待ち"),
    OnHold => ("on_hold", "保留"),
});

impl ActionStatus {
    /// Completed and on-hold actions are out of play for the radar and the
    /// overdue counters.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Completed | Self::OnHold)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueState {
    PendingDecision,
    Waiting,
    Unknown,
    Stuck,
    Insufficient,
    Concern,
}

impl_text_enum!(IssueState, "issue state", {
    PendingDecision => ("pending_decision", "判断待ち"),
    Waiting => ("waiting", "待ち"),
    Unknown => ("unknown", "不明点"),
    Stuck => ("stuck", "詰まり"),
    Insufficient => ("insufficient", "不足"),
    Concern => ("concern", "不安要素"),
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExceptionReason {
    ExternalWait,
    LowPriority,
    LongTerm,
    SpecWait,
    RequestWait,
}

impl_text_enum!(ExceptionReason, "exception reason", {
    ExternalWait => ("external_wait", "外部待ち"),
    LowPriority => ("low_priority", "優先度低"),
    LongTerm => ("long_term", "長期施策"),
    SpecWait => ("spec_wait", "仕様待ち"),
    RequestWait => ("request_wait", "依頼待ち"),
});

// --- Clients ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    Focus,
    All,
    Dormant,
}

impl_text_enum!(ClientStatus, "client status", {
    Focus => ("focus", "Focus"),
    All => ("all", "全件"),
    Dormant => ("dormant", "休眠"),
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextActionType {
    Hearing,
    Proposal,
    Estimate,
    InternalConsultation,
    Approach,
}

impl_text_enum!(NextActionType, "next action", {
    Hearing => ("hearing", "ヒアリング"),
    Proposal => ("proposal", "提案書"),
    Estimate => ("estimate", "概算見積"),
    InternalConsultation => ("internal_consultation", "社内相談"),
    Approach => ("approach", "打診"),
});

// --- Broadcasts ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumptionType {
    Acknowledged,
    Actioned,
    Held,
    Resolved,
}

impl_text_enum!(ConsumptionType, "consumption type", {
    Acknowledged => ("acknowledged", "了承"),
    Actioned => ("actioned", "Action化"),
    Held => ("held", "保留化"),
    Resolved => ("resolved", "解決"),
});

// --- Radar ---

/// Which of the two snoozable tables a radar item or snooze request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Action,
    Issue,
}

impl_text_enum!(EntityType, "entity type", {
    Action => ("action", "アクション"),
    Issue => ("issue", "課題"),
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StagnationKind {
    OverdueAction,
    StaleAction,
    UnassignedAction,
    LongWaiting,
    PostponedIssue,
}

impl_text_enum!(StagnationKind, "stagnation kind", {
    OverdueAction => ("overdue_action", "期限超過"),
    StaleAction => ("stale_action", "更新停止"),
    UnassignedAction => ("unassigned_action", "担当未定"),
    LongWaiting => ("long_waiting", "待ち継続"),
    PostponedIssue => ("postponed_issue", "繰り返し送り"),
});

impl StagnationKind {
    pub fn entity_type(&self) -> EntityType {
        match self {
            Self::PostponedIssue => EntityType::Issue,
            _ => EntityType::Action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_strings_match_serde_names() {
        for status in ActionStatus::ALL {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, serde_json::Value::String(status.as_str().into()));
        }
        for kind in MeetingType::ALL {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, serde_json::Value::String(kind.as_str().into()));
        }
        for kind in StagnationKind::ALL {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, serde_json::Value::String(kind.as_str().into()));
        }
    }

    #[test]
    fn meeting_types_use_kebab_case() {
        assert_eq!(MeetingType::AllHands.as_str(), "all-hands");
        assert_eq!("one-on-one".parse::<MeetingType>().unwrap(), MeetingType::OneOnOne);
        assert!("all_hands".parse::<MeetingType>().is_err());
    }

    #[test]
    fn labels_follow_the_japanese_tables() {
        assert_eq!(ActionStatus::NotStarted.label(), "未着手");
        assert_eq!(IssueState::Concern.label(), "不安要素");
        assert_eq!(ExceptionReason::SpecWait.label(), "仕様待ち");
        assert_eq!(NextActionType::Estimate.label(), "概算見積");
        assert_eq!(ClientStatus::Dormant.label(), "休眠");
        assert_eq!(MeetingType::Strategy.label(), "戦略会議");
        assert_eq!(UserRole::Executive.label(), "経営層");
    }

    #[test]
    fn unknown_strings_are_rejected() {
        let err = "done".parse::<ActionStatus>().unwrap_err();
        assert_eq!(err.kind, "action status");
        assert_eq!(err.value, "done");
        assert!(IssueState::try_from("resolved".to_string()).is_err());
    }

    #[test]
    fn closed_statuses() {
        assert!(ActionStatus::Completed.is_closed());
        assert!(ActionStatus::OnHold.is_closed());
        assert!(!ActionStatus::Waiting.is_closed());
        assert!(!ActionStatus::NotStarted.is_closed());
    }

    #[test]
    fn only_postponed_issue_targets_issues() {
        for kind in StagnationKind::ALL {
            let expected = if *kind == StagnationKind::PostponedIssue {
                EntityType::Issue
            } else {
                EntityType::Action
            };
            assert_eq!(kind.entity_type(), expected);
        }
    }
}
