//! Stagnation rules over row snapshots.
//!
//! Each rule is an independent predicate; an action can trip several at once
//! and appears once per rule. Snoozed rows (snooze date today or later) are
//! exempt from every rule.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;
use vexum_core::{ActionStatus, EntityType, RadarConfig, StagnationKind};

use crate::tracking::{Action, ActionWithNames, Issue, IssueWithNames};

/// One flagged entry on the radar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StagnationItem {
    #[serde(rename = "type")]
    pub kind: StagnationKind,
    pub entity_type: EntityType,
    pub entity_id: Uuid,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_stagnant: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub times_postponed: Option<i32>,
}

impl StagnationItem {
    fn for_action(kind: StagnationKind, action: &Action) -> Self {
        Self {
            kind,
            entity_type: kind.entity_type(),
            entity_id: action.id,
            content: action.content.clone(),
            assignee_name: None,
            due_date: None,
            days_stagnant: None,
            owner_name: None,
            times_postponed: None,
        }
    }
}

pub fn is_snoozed(snooze_until: Option<NaiveDate>, today: NaiveDate) -> bool {
    snooze_until.is_some_and(|until| until >= today)
}

/// Whole days since the last recorded activity. Never negative.
pub fn days_since(last_updated_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - last_updated_at).num_days().max(0)
}

pub fn is_overdue(action: &Action, today: NaiveDate) -> bool {
    !action.status.is_closed() && action.due_date.is_some_and(|due| due < today)
}

/// Days stagnant when the action is open, not waiting, and idle past the threshold.
pub fn stale_days(action: &Action, now: DateTime<Utc>, config: &RadarConfig) -> Option<i64> {
    if action.status.is_closed() || action.status == ActionStatus::Waiting {
        return None;
    }
    let days = days_since(action.last_updated_at, now);
    (days >= config.stale_after_days).then_some(days)
}

pub fn is_unassigned(action: &Action) -> bool {
    action.assignee_id.is_none() && !action.status.is_closed()
}

/// Days waiting when the action has sat in `waiting` past the threshold.
pub fn waiting_days(action: &Action, now: DateTime<Utc>, config: &RadarConfig) -> Option<i64> {
    if action.status != ActionStatus::Waiting {
        return None;
    }
    let days = days_since(action.last_updated_at, now);
    (days >= config.waiting_after_days).then_some(days)
}

pub fn is_repeatedly_postponed(issue: &Issue, config: &RadarConfig) -> bool {
    !issue.is_resolved() && issue.times_postponed >= config.postponed_threshold
}

/// Evaluate every rule and concatenate the results in rule order: overdue,
/// stale, unassigned, long waiting, postponed. Within a rule, input order is kept.
pub fn evaluate(
    actions: &[ActionWithNames],
    issues: &[IssueWithNames],
    now: DateTime<Utc>,
    config: &RadarConfig,
) -> Vec<StagnationItem> {
    let today = now.date_naive();

    let live_actions: Vec<&ActionWithNames> = actions
        .iter()
        .filter(|a| !is_snoozed(a.action.snooze_until, today))
        .collect();

    let mut items = Vec::new();

    for row in &live_actions {
        if is_overdue(&row.action, today) {
            items.push(StagnationItem {
                assignee_name: row.assignee_name.clone(),
                due_date: row.action.due_date,
                ..StagnationItem::for_action(StagnationKind::OverdueAction, &row.action)
            });
        }
    }

    for row in &live_actions {
        if let Some(days) = stale_days(&row.action, now, config) {
            items.push(StagnationItem {
                assignee_name: row.assignee_name.clone(),
                days_stagnant: Some(days),
                ..StagnationItem::for_action(StagnationKind::StaleAction, &row.action)
            });
        }
    }

    for row in &live_actions {
        if is_unassigned(&row.action) {
            items.push(StagnationItem::for_action(
                StagnationKind::UnassignedAction,
                &row.action,
            ));
        }
    }

    for row in &live_actions {
        if let Some(days) = waiting_days(&row.action, now, config) {
            items.push(StagnationItem {
                assignee_name: row.assignee_name.clone(),
                days_stagnant: Some(days),
                ..StagnationItem::for_action(StagnationKind::LongWaiting, &row.action)
            });
        }
    }

    for row in issues {
        if is_snoozed(row.issue.snooze_until, today) {
            continue;
        }
        if is_repeatedly_postponed(&row.issue, config) {
            items.push(StagnationItem {
                kind: StagnationKind::PostponedIssue,
                entity_type: EntityType::Issue,
                entity_id: row.issue.id,
                content: row.issue.content.clone(),
                assignee_name: None,
                due_date: None,
                days_stagnant: None,
                owner_name: row.owner_name.clone(),
                times_postponed: Some(row.issue.times_postponed),
            });
        }
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use vexum_core::IssueState;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap()
    }

    fn today() -> NaiveDate {
        now().date_naive()
    }

    fn action(status: ActionStatus) -> ActionWithNames {
        let at = now() - Duration::hours(1);
        ActionWithNames {
            action: Action {
                id: Uuid::new_v4(),
                meeting_id: Uuid::new_v4(),
                content: "見積書を送る".to_string(),
                status,
                assignee_id: Some(Uuid::new_v4()),
                due_date: None,
                completion_criteria: None,
                waiting_reason: None,
                is_tentative: false,
                snooze_until: None,
                exception_reason: None,
                last_updated_at: at,
                created_by: Uuid::new_v4(),
                created_at: at,
                updated_at: at,
            },
            assignee_name: Some("田中".to_string()),
            creator_name: None,
        }
    }

    fn issue(times_postponed: i32) -> IssueWithNames {
        let at = now() - Duration::days(20);
        IssueWithNames {
            issue: Issue {
                id: Uuid::new_v4(),
                meeting_id: None,
                organization_id: Uuid::new_v4(),
                team_id: None,
                client_id: None,
                content: "仕様が決まらない".to_string(),
                state: IssueState::PendingDecision,
                owner_id: None,
                times_postponed,
                snooze_until: None,
                exception_reason: None,
                resolved_at: None,
                last_updated_at: at,
                created_by: Uuid::new_v4(),
                created_at: at,
                updated_at: at,
            },
            owner_name: Some("鈴木".to_string()),
            team_name: None,
            client_name: None,
        }
    }

    fn kinds(items: &[StagnationItem]) -> Vec<StagnationKind> {
        items.iter().map(|i| i.kind).collect()
    }

    fn scan(actions: &[ActionWithNames], issues: &[IssueWithNames]) -> Vec<StagnationItem> {
        evaluate(actions, issues, now(), &RadarConfig::default())
    }

    #[test]
    fn overdue_action_is_flagged_once_with_due_date() {
        let mut a = action(ActionStatus::InProgress);
        a.action.due_date = Some(today() - Duration::days(1));

        let items = scan(&[a.clone()], &[]);
        assert_eq!(kinds(&items), vec![StagnationKind::OverdueAction]);
        assert_eq!(items[0].due_date, a.action.due_date);
        assert_eq!(items[0].assignee_name.as_deref(), Some("田中"));
        assert_eq!(items[0].entity_type, EntityType::Action);
    }

    #[test]
    fn due_today_is_not_overdue() {
        let mut a = action(ActionStatus::InProgress);
        a.action.due_date = Some(today());
        assert!(scan(&[a], &[]).is_empty());
    }

    #[test]
    fn closed_actions_never_flag() {
        for status in [ActionStatus::Completed, ActionStatus::OnHold] {
            let mut a = action(status);
            a.action.due_date = Some(today() - Duration::days(30));
            a.action.assignee_id = None;
            a.action.last_updated_at = now() - Duration::days(30);
            assert!(scan(&[a], &[]).is_empty(), "{status} should not flag");
        }
    }

    #[test]
    fn stale_after_seven_days_but_not_six() {
        let mut fresh = action(ActionStatus::NotStarted);
        fresh.action.last_updated_at = now() - Duration::days(7) + Duration::minutes(1);
        assert!(scan(&[fresh], &[]).is_empty());

        let mut stale = action(ActionStatus::NotStarted);
        stale.action.last_updated_at = now() - Duration::days(9);
        let items = scan(&[stale], &[]);
        assert_eq!(kinds(&items), vec![StagnationKind::StaleAction]);
        assert_eq!(items[0].days_stagnant, Some(9));
    }

    #[test]
    fn waiting_actions_use_the_shorter_clock_and_are_never_stale() {
        let mut a = action(ActionStatus::Waiting);
        a.action.last_updated_at = now() - Duration::days(10);
        let items = scan(&[a], &[]);
        assert_eq!(kinds(&items), vec![StagnationKind::LongWaiting]);
        assert_eq!(items[0].days_stagnant, Some(10));

        let mut short = action(ActionStatus::Waiting);
        short.action.last_updated_at = now() - Duration::days(2);
        assert!(scan(&[short], &[]).is_empty());
    }

    #[test]
    fn unassigned_open_action_is_flagged_without_diagnostics() {
        let mut a = action(ActionStatus::Reviewing);
        a.action.assignee_id = None;
        a.assignee_name = None;
        let items = scan(&[a], &[]);
        assert_eq!(kinds(&items), vec![StagnationKind::UnassignedAction]);
        assert_eq!(items[0].days_stagnant, None);
        assert_eq!(items[0].due_date, None);
    }

    #[test]
    fn one_action_can_trip_several_rules() {
        let mut a = action(ActionStatus::NotStarted);
        a.action.due_date = Some(today() - Duration::days(3));
        a.action.assignee_id = None;
        a.action.last_updated_at = now() - Duration::days(8);

        let items = scan(&[a.clone()], &[]);
        assert_eq!(
            kinds(&items),
            vec![
                StagnationKind::OverdueAction,
                StagnationKind::StaleAction,
                StagnationKind::UnassignedAction,
            ]
        );
        assert!(items.iter().all(|i| i.entity_id == a.action.id));
    }

    #[test]
    fn snoozed_until_tomorrow_is_excluded_from_every_rule() {
        let mut a = action(ActionStatus::Waiting);
        a.action.due_date = Some(today() - Duration::days(3));
        a.action.assignee_id = None;
        a.action.last_updated_at = now() - Duration::days(8);
        a.action.snooze_until = Some(today() + Duration::days(1));

        let mut i = issue(5);
        i.issue.snooze_until = Some(today() + Duration::days(1));

        assert!(scan(&[a], &[i]).is_empty());
    }

    #[test]
    fn snooze_covers_today_and_expires_after() {
        let mut a = action(ActionStatus::InProgress);
        a.action.due_date = Some(today() - Duration::days(1));

        a.action.snooze_until = Some(today());
        assert!(scan(&[a.clone()], &[]).is_empty());

        a.action.snooze_until = Some(today() - Duration::days(1));
        assert_eq!(kinds(&scan(&[a], &[])), vec![StagnationKind::OverdueAction]);
    }

    #[test]
    fn postponed_issue_needs_two_postponements_and_no_resolution() {
        assert!(scan(&[], &[issue(1)]).is_empty());

        let items = scan(&[], &[issue(2)]);
        assert_eq!(kinds(&items), vec![StagnationKind::PostponedIssue]);
        assert_eq!(items[0].entity_type, EntityType::Issue);
        assert_eq!(items[0].times_postponed, Some(2));
        assert_eq!(items[0].owner_name.as_deref(), Some("鈴木"));

        let mut resolved = issue(4);
        resolved.issue.resolved_at = Some(now());
        assert!(scan(&[], &[resolved]).is_empty());
    }

    #[test]
    fn results_are_grouped_by_rule_then_input_order() {
        let mut overdue_1 = action(ActionStatus::InProgress);
        overdue_1.action.due_date = Some(today() - Duration::days(1));
        let mut waiting = action(ActionStatus::Waiting);
        waiting.action.last_updated_at = now() - Duration::days(4);
        let mut overdue_2 = action(ActionStatus::InProgress);
        overdue_2.action.due_date = Some(today() - Duration::days(2));

        let actions = [overdue_1.clone(), waiting.clone(), overdue_2.clone()];
        let items = scan(&actions, &[issue(3)]);

        let ids: Vec<Uuid> = items.iter().map(|i| i.entity_id).collect();
        assert_eq!(kinds(&items)[..2], [StagnationKind::OverdueAction; 2]);
        assert_eq!(ids[0], overdue_1.action.id);
        assert_eq!(ids[1], overdue_2.action.id);
        assert_eq!(items[2].kind, StagnationKind::LongWaiting);
        assert_eq!(ids[2], waiting.action.id);
        assert_eq!(items[3].kind, StagnationKind::PostponedIssue);
    }

    #[test]
    fn thresholds_come_from_config() {
        let config = RadarConfig {
            stale_after_days: 14,
            waiting_after_days: 5,
            postponed_threshold: 3,
        };
        let mut stale = action(ActionStatus::InProgress);
        stale.action.last_updated_at = now() - Duration::days(10);
        let mut waiting = action(ActionStatus::Waiting);
        waiting.action.last_updated_at = now() - Duration::days(4);

        assert!(evaluate(&[stale, waiting], &[issue(2)], now(), &config).is_empty());
    }

    #[test]
    fn serializes_with_type_tag_and_without_empty_fields() {
        let mut a = action(ActionStatus::InProgress);
        a.action.assignee_id = None;
        let items = scan(&[a], &[]);
        let json = serde_json::to_value(&items[0]).unwrap();

        assert_eq!(json["type"], "unassigned_action");
        assert_eq!(json["entity_type"], "action");
        assert!(json.get("due_date").is_none());
        assert!(json.get("days_stagnant").is_none());
    }
}
