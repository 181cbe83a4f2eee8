mod common;

use chrono::{Duration, Utc};
use common::{age_action, test_pool, Fixture};
use vexum_core::{EntityType, ExceptionReason, IssueState, RadarConfig, StagnationKind};
use vexum_domains::radar::{self, SnoozeRequest};
use vexum_domains::tracking::{Action, Issue, NewAction, NewIssue};

fn config() -> RadarConfig {
    RadarConfig::default()
}

#[tokio::test]
async fn overdue_assigned_action_is_flagged_once() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let fx = Fixture::seed(&pool).await;
    let today = Utc::now().date_naive();

    let mut new = NewAction::tentative(fx.meeting.id, "見積を送る");
    new.assignee_id = Some(fx.user.id);
    new.due_date = Some(today - Duration::days(2));
    let action = Action::create(new, fx.user.id, &pool).await.unwrap();

    let items = radar::scan(fx.org.id, None, &config(), Utc::now(), &pool)
        .await
        .unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].kind, StagnationKind::OverdueAction);
    assert_eq!(items[0].entity_id, action.id);
    assert_eq!(items[0].assignee_name.as_deref(), Some("山田"));
    assert_eq!(items[0].due_date, Some(today - Duration::days(2)));
}

#[tokio::test]
async fn snoozed_action_drops_off_until_the_snooze_lapses() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let fx = Fixture::seed(&pool).await;
    let today = Utc::now().date_naive();

    let mut new = NewAction::tentative(fx.meeting.id, "契約書レビュー");
    new.assignee_id = Some(fx.user.id);
    new.due_date = Some(today - Duration::days(1));
    let action = Action::create(new, fx.user.id, &pool).await.unwrap();

    radar::snooze(
        SnoozeRequest {
            entity_type: EntityType::Action,
            entity_id: action.id,
            snooze_until: Some(today),
            exception_reason: Some(ExceptionReason::ExternalWait),
        },
        fx.org.id,
        &pool,
    )
    .await
    .unwrap();

    let items = radar::scan(fx.org.id, None, &config(), Utc::now(), &pool)
        .await
        .unwrap();
    assert!(items.is_empty());

    // Same rows a day later: snooze date is in the past.
    let tomorrow = Utc::now() + Duration::days(1);
    let items = radar::scan(fx.org.id, None, &config(), tomorrow, &pool)
        .await
        .unwrap();
    assert!(items
        .iter()
        .any(|i| i.entity_id == action.id && i.kind == StagnationKind::OverdueAction));
}

#[tokio::test]
async fn stale_unassigned_action_trips_every_matching_rule() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let fx = Fixture::seed(&pool).await;

    let action = Action::create(
        NewAction::tentative(fx.meeting.id, "担当決め"),
        fx.user.id,
        &pool,
    )
    .await
    .unwrap();
    age_action(action.id, 8, &pool).await;

    let items = radar::scan(fx.org.id, None, &config(), Utc::now(), &pool)
        .await
        .unwrap();
    let kinds: Vec<_> = items.iter().map(|i| i.kind).collect();

    assert_eq!(
        kinds,
        vec![StagnationKind::StaleAction, StagnationKind::UnassignedAction]
    );
    assert_eq!(items[0].days_stagnant, Some(8));
}

#[tokio::test]
async fn issue_postponed_twice_is_flagged() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let fx = Fixture::seed(&pool).await;

    let issue = Issue::create(
        fx.org.id,
        NewIssue {
            meeting_id: Some(fx.meeting.id),
            team_id: Some(fx.team.id),
            client_id: None,
            content: "採用方針".to_string(),
            state: IssueState::Stuck,
            owner_id: Some(fx.user.id),
        },
        fx.user.id,
        &pool,
    )
    .await
    .unwrap();

    Issue::postpone(issue.id, fx.org.id, &pool).await.unwrap();
    let items = radar::scan(fx.org.id, Some(fx.team.id), &config(), Utc::now(), &pool)
        .await
        .unwrap();
    assert!(items.is_empty());

    let postponed = Issue::postpone(issue.id, fx.org.id, &pool).await.unwrap();
    assert_eq!(postponed.times_postponed, 2);

    let items = radar::scan(fx.org.id, Some(fx.team.id), &config(), Utc::now(), &pool)
        .await
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].kind, StagnationKind::PostponedIssue);
    assert_eq!(items[0].times_postponed, Some(2));
    assert_eq!(items[0].owner_name.as_deref(), Some("山田"));
}

#[tokio::test]
async fn team_scope_excludes_other_teams_meetings() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let fx = Fixture::seed(&pool).await;
    let other = fx.another_team("営業2課", &pool).await;
    let other_meeting =
        Fixture::meeting_for(fx.org.id, Some(other.id), vexum_core::MeetingType::Team, &pool).await;

    Action::create(
        NewAction::tentative(other_meeting.id, "他チームの宿題"),
        fx.user.id,
        &pool,
    )
    .await
    .unwrap();

    let mine = radar::scan(fx.org.id, Some(fx.team.id), &config(), Utc::now(), &pool)
        .await
        .unwrap();
    assert!(mine.is_empty());

    let theirs = radar::scan(fx.org.id, Some(other.id), &config(), Utc::now(), &pool)
        .await
        .unwrap();
    assert_eq!(theirs.len(), 1);
    assert_eq!(theirs[0].kind, StagnationKind::UnassignedAction);
}

#[tokio::test]
async fn snooze_in_another_organization_is_not_found() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let fx = Fixture::seed(&pool).await;
    let stranger = Fixture::seed(&pool).await;

    let action = Action::create(
        NewAction::tentative(fx.meeting.id, "社外秘"),
        fx.user.id,
        &pool,
    )
    .await
    .unwrap();

    let err = radar::snooze(
        SnoozeRequest {
            entity_type: EntityType::Action,
            entity_id: action.id,
            snooze_until: None,
            exception_reason: None,
        },
        stranger.org.id,
        &pool,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, vexum_core::VexumError::NotFound(_)));
}
