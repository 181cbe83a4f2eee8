use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;
use vexum_core::{MeetingType, RadarConfig, Result};

use super::models::agenda_item::AgendaItem;
use super::models::link::Link;
use super::models::meeting::{Meeting, MeetingWithTeam};
use super::models::participant::Participant;
use crate::broadcasts::{Broadcast, BroadcastWithTargets};
use crate::clients::ClientBoard;
use crate::radar::{self, StagnationItem};
use crate::strategy::{RuleUpdate, StrategyAllocation, StrategyNotDoing, StrategyPriority};
use crate::tracking::{
    Action, ActionWithNames, CheckIn, CheckInWithUser, Decision, DecisionWithNames, Issue,
    IssueWithNames,
};

/// Everything the meeting room screen needs in one document.
#[derive(Debug, Clone, Serialize)]
pub struct MeetingDetail {
    #[serde(flatten)]
    pub meeting: MeetingWithTeam,
    pub meeting_type_name: &'static str,
    pub agenda_items: Vec<AgendaItem>,
    pub decisions: Vec<DecisionWithNames>,
    pub actions: Vec<ActionWithNames>,
    pub issues: Vec<IssueWithNames>,
    pub links: Vec<Link>,
    pub check_ins: Vec<CheckInWithUser>,
    pub participants: Vec<Participant>,
    #[serde(flatten)]
    pub board: Option<MeetingBoard>,
    pub stagnation_items: Vec<StagnationItem>,
}

/// Type-specific panels. Only team (with a team), headquarters and strategy
/// meetings have one.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MeetingBoard {
    Team {
        clients: Vec<ClientBoard>,
        pending_broadcasts: Vec<Broadcast>,
    },
    Headquarters {
        broadcasts: Vec<BroadcastWithTargets>,
        rule_updates: Vec<RuleUpdate>,
        cross_team_issues: Vec<IssueWithNames>,
    },
    Strategy {
        strategy_priorities: Vec<StrategyPriority>,
        strategy_not_doing: Vec<StrategyNotDoing>,
        strategy_allocations: Vec<StrategyAllocation>,
    },
}

impl MeetingBoard {
    pub async fn load(meeting: &Meeting, pool: &PgPool) -> Result<Option<Self>> {
        let board = match (meeting.meeting_type, meeting.team_id) {
            (MeetingType::Team, Some(team_id)) => {
                let (clients, pending_broadcasts) = tokio::try_join!(
                    ClientBoard::load_for_team(team_id, meeting.id, pool),
                    Broadcast::pending_for(team_id, pool),
                )?;
                Some(Self::Team {
                    clients,
                    pending_broadcasts,
                })
            }
            (MeetingType::Headquarters, _) => {
                let (broadcasts, rule_updates, cross_team_issues) = tokio::try_join!(
                    Broadcast::list_for_meeting(meeting.id, pool),
                    RuleUpdate::list_for_meeting(meeting.id, pool),
                    Issue::list_cross_team(meeting.organization_id, pool),
                )?;
                Some(Self::Headquarters {
                    broadcasts,
                    rule_updates,
                    cross_team_issues,
                })
            }
            (MeetingType::Strategy, _) => {
                let (strategy_priorities, strategy_not_doing, strategy_allocations) = tokio::try_join!(
                    StrategyPriority::list_for_meeting(meeting.id, pool),
                    StrategyNotDoing::list_for_meeting(meeting.id, pool),
                    StrategyAllocation::list_for_meeting(meeting.id, pool),
                )?;
                Some(Self::Strategy {
                    strategy_priorities,
                    strategy_not_doing,
                    strategy_allocations,
                })
            }
            _ => None,
        };
        Ok(board)
    }
}

impl MeetingDetail {
    /// Assemble the detail view for a meeting already scoped to the caller's
    /// organization.
    pub async fn load(
        meeting: MeetingWithTeam,
        radar_config: &RadarConfig,
        now: DateTime<Utc>,
        pool: &PgPool,
    ) -> Result<Self> {
        let id = meeting.meeting.id;
        let organization_id = meeting.meeting.organization_id;
        let team_id = meeting.meeting.team_id;

        let (
            agenda_items,
            decisions,
            actions,
            issues,
            links,
            check_ins,
            participants,
            board,
            stagnation_items,
        ) = tokio::try_join!(
            AgendaItem::list_for_meeting(id, pool),
            Decision::list_for_meeting(id, pool),
            Action::list_for_meeting(id, pool),
            Issue::list_for_meeting(id, pool),
            Link::list_for_meeting(id, pool),
            CheckIn::list_for_meeting(id, pool),
            Participant::list_for_meeting(id, pool),
            MeetingBoard::load(&meeting.meeting, pool),
            radar::scan(organization_id, team_id, radar_config, now, pool),
        )?;

        Ok(Self {
            meeting_type_name: meeting.meeting.meeting_type.label(),
            meeting,
            agenda_items,
            decisions,
            actions,
            issues,
            links,
            check_ins,
            participants,
            board,
            stagnation_items,
        })
    }
}
