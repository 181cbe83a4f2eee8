//! Quick capture: one line of free text becomes a decision, action or issue
//! on the meeting being run.

pub mod parser;

pub use parser::{parse, CaptureKind, ParsedCapture};

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use vexum_core::{IssueState, Result, VexumError};

use crate::shared::MeetingScope;
use crate::tracking::{Action, Decision, Issue, NewAction, NewDecision, NewIssue};

#[derive(Debug, Clone, Deserialize)]
pub struct CaptureRequest {
    pub meeting_id: Uuid,
    pub input: String,
}

/// Serialized as `{"type": "<kind>", "item": <row>}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "item", rename_all = "snake_case")]
pub enum CapturedItem {
    Decision(Decision),
    Action(Action),
    Issue(Issue),
}

impl CapturedItem {
    pub fn kind(&self) -> CaptureKind {
        match self {
            Self::Decision(_) => CaptureKind::Decision,
            Self::Action(_) => CaptureKind::Action,
            Self::Issue(_) => CaptureKind::Issue,
        }
    }
}

/// Parse the input and insert the matching record on the meeting. Issues land
/// in the meeting's organization and team.
pub async fn capture(
    request: CaptureRequest,
    organization_id: Uuid,
    created_by: Uuid,
    pool: &PgPool,
) -> Result<CapturedItem> {
    let ParsedCapture { kind, content } = parse(&request.input);
    if content.is_empty() {
        return Err(VexumError::validation("capture content must not be empty"));
    }

    let scope = MeetingScope::load(request.meeting_id, organization_id, pool).await?;

    let item = match kind {
        CaptureKind::Decision => {
            let new = NewDecision {
                meeting_id: scope.meeting_id,
                content,
                related_link: None,
                is_confirmed: false,
            };
            CapturedItem::Decision(Decision::create(new, created_by, pool).await?)
        }
        CaptureKind::Action => {
            let new = NewAction::tentative(scope.meeting_id, content);
            CapturedItem::Action(Action::create(new, created_by, pool).await?)
        }
        CaptureKind::Issue => {
            let new = NewIssue {
                meeting_id: Some(scope.meeting_id),
                team_id: scope.team_id,
                client_id: None,
                content,
                state: IssueState::PendingDecision,
                owner_id: None,
            };
            CapturedItem::Issue(Issue::create(scope.organization_id, new, created_by, pool).await?)
        }
    };

    tracing::info!(meeting_id = %scope.meeting_id, kind = ?item.kind(), "Quick capture stored");
    Ok(item)
}
