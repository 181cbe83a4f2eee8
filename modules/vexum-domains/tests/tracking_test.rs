mod common;

use chrono::{Duration, Utc};
use common::{age_action, test_pool, Fixture};
use vexum_core::{ActionStatus, IssueState, VexumError};
use vexum_domains::capture::{self, CaptureKind, CaptureRequest, CapturedItem};
use vexum_domains::tracking::{
    Action, ActionFilters, ActionPatch, Decision, DecisionPatch, Issue, IssuePatch, NewAction,
    NewDecision, NewIssue, TriageUpdate,
};

fn new_issue(fx: &Fixture, content: &str) -> NewIssue {
    NewIssue {
        meeting_id: Some(fx.meeting.id),
        team_id: Some(fx.team.id),
        client_id: None,
        content: content.to_string(),
        state: IssueState::PendingDecision,
        owner_id: None,
    }
}

#[tokio::test]
async fn quick_capture_routes_by_prefix() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let fx = Fixture::seed(&pool).await;

    let decision = capture::capture(
        CaptureRequest {
            meeting_id: fx.meeting.id,
            input: "D:予算承認".to_string(),
        },
        fx.org.id,
        fx.user.id,
        &pool,
    )
    .await
    .unwrap();
    let CapturedItem::Decision(decision) = decision else {
        panic!("expected a decision");
    };
    assert_eq!(decision.content, "予算承認");
    assert!(!decision.is_confirmed);

    let action = capture::capture(
        CaptureRequest {
            meeting_id: fx.meeting.id,
            input: "a: 議事録を共有".to_string(),
        },
        fx.org.id,
        fx.user.id,
        &pool,
    )
    .await
    .unwrap();
    assert_eq!(action.kind(), CaptureKind::Action);
    let CapturedItem::Action(action) = action else {
        panic!("expected an action");
    };
    assert!(action.is_tentative);
    assert_eq!(action.status, ActionStatus::NotStarted);

    let issue = capture::capture(
        CaptureRequest {
            meeting_id: fx.meeting.id,
            input: "I:先方の返事がない".to_string(),
        },
        fx.org.id,
        fx.user.id,
        &pool,
    )
    .await
    .unwrap();
    let CapturedItem::Issue(issue) = issue else {
        panic!("expected an issue");
    };
    assert_eq!(issue.organization_id, fx.org.id);
    assert_eq!(issue.team_id, Some(fx.team.id));
    assert_eq!(issue.state, IssueState::PendingDecision);

    let fallback = capture::capture(
        CaptureRequest {
            meeting_id: fx.meeting.id,
            input: "  印刷を頼む ".to_string(),
        },
        fx.org.id,
        fx.user.id,
        &pool,
    )
    .await
    .unwrap();
    let CapturedItem::Action(fallback) = fallback else {
        panic!("expected an action");
    };
    assert_eq!(fallback.content, "印刷を頼む");
}

#[tokio::test]
async fn quick_capture_rejects_a_bare_prefix() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let fx = Fixture::seed(&pool).await;

    let err = capture::capture(
        CaptureRequest {
            meeting_id: fx.meeting.id,
            input: "I:   ".to_string(),
        },
        fx.org.id,
        fx.user.id,
        &pool,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, VexumError::Validation(_)));
}

#[tokio::test]
async fn converting_an_issue_resolves_it_and_creates_a_tentative_action() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let fx = Fixture::seed(&pool).await;
    let issue = Issue::create(fx.org.id, new_issue(&fx, "請求フローの見直し"), fx.user.id, &pool)
        .await
        .unwrap();

    let action = Issue::convert_to_action(issue.id, fx.meeting.id, fx.org.id, fx.user.id, &pool)
        .await
        .unwrap();
    assert_eq!(action.content, "請求フローの見直し");
    assert!(action.is_tentative);
    assert_eq!(action.meeting_id, fx.meeting.id);

    let resolved = Issue::find_for_org(issue.id, fx.org.id, &pool).await.unwrap();
    assert!(resolved.is_resolved());

    // Resolved issues can no longer be carried over.
    let err = Issue::postpone(issue.id, fx.org.id, &pool).await.unwrap_err();
    assert!(matches!(err, VexumError::NotFound(_)));
}

#[tokio::test]
async fn reopening_an_issue_clears_resolution() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let fx = Fixture::seed(&pool).await;
    let issue = Issue::create(fx.org.id, new_issue(&fx, "人員不足"), fx.user.id, &pool)
        .await
        .unwrap();

    let closed = Issue::update(
        issue.id,
        fx.org.id,
        IssuePatch {
            resolved: Some(true),
            ..Default::default()
        },
        &pool,
    )
    .await
    .unwrap();
    assert!(closed.is_resolved());

    let reopened = Issue::update(
        issue.id,
        fx.org.id,
        IssuePatch {
            resolved: Some(false),
            state: Some(IssueState::Insufficient),
            ..Default::default()
        },
        &pool,
    )
    .await
    .unwrap();
    assert!(!reopened.is_resolved());
    assert_eq!(reopened.state, IssueState::Insufficient);
}

#[tokio::test]
async fn triage_batch_is_all_or_nothing() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let fx = Fixture::seed(&pool).await;
    let stranger = Fixture::seed(&pool).await;
    let due = Utc::now().date_naive() + Duration::days(7);

    let mine = Action::create(NewAction::tentative(fx.meeting.id, "資料作成"), fx.user.id, &pool)
        .await
        .unwrap();
    let theirs = Action::create(
        NewAction::tentative(stranger.meeting.id, "他社の宿題"),
        stranger.user.id,
        &pool,
    )
    .await
    .unwrap();

    let err = Action::triage(
        vec![
            TriageUpdate {
                id: mine.id,
                assignee_id: Some(fx.user.id),
                due_date: Some(due),
                is_tentative: false,
            },
            TriageUpdate {
                id: theirs.id,
                assignee_id: Some(fx.user.id),
                due_date: Some(due),
                is_tentative: false,
            },
        ],
        fx.org.id,
        &pool,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, VexumError::NotFound(_)));

    let untouched = Action::find_for_org(mine.id, fx.org.id, &pool).await.unwrap();
    assert!(untouched.is_tentative);
    assert_eq!(untouched.assignee_id, None);

    let applied = Action::triage(
        vec![TriageUpdate {
            id: mine.id,
            assignee_id: Some(fx.user.id),
            due_date: Some(due),
            is_tentative: false,
        }],
        fx.org.id,
        &pool,
    )
    .await
    .unwrap();
    assert_eq!(applied.len(), 1);
    assert_eq!(applied[0].due_date, Some(due));

    let queue = Action::list_triage(fx.org.id, Some(fx.meeting.id), &pool)
        .await
        .unwrap();
    assert!(queue.is_empty());
}

#[tokio::test]
async fn patching_an_action_resets_its_activity_clock() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let fx = Fixture::seed(&pool).await;
    let action = Action::create(NewAction::tentative(fx.meeting.id, "相見積"), fx.user.id, &pool)
        .await
        .unwrap();
    age_action(action.id, 10, &pool).await;

    let updated = Action::update(
        action.id,
        fx.org.id,
        ActionPatch {
            status: Some(ActionStatus::InProgress),
            due_date: Some(None),
            ..Default::default()
        },
        &pool,
    )
    .await
    .unwrap();

    assert_eq!(updated.status, ActionStatus::InProgress);
    assert!(Utc::now() - updated.last_updated_at < Duration::minutes(1));

    let listed = Action::list(
        fx.org.id,
        &ActionFilters {
            status: Some(ActionStatus::InProgress),
            ..Default::default()
        },
        &pool,
    )
    .await
    .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].action.id, action.id);
}

#[tokio::test]
async fn confirming_a_decision_records_the_confirmer() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let fx = Fixture::seed(&pool).await;
    let decision = Decision::create(
        NewDecision {
            meeting_id: fx.meeting.id,
            content: "新料金を4月から適用".to_string(),
            related_link: None,
            is_confirmed: false,
        },
        fx.user.id,
        &pool,
    )
    .await
    .unwrap();
    assert_eq!(decision.confirmed_by, None);

    let confirmed = Decision::update(
        decision.id,
        fx.org.id,
        DecisionPatch {
            is_confirmed: Some(true),
            ..Default::default()
        },
        fx.user.id,
        &pool,
    )
    .await
    .unwrap();
    assert!(confirmed.is_confirmed);
    assert_eq!(confirmed.confirmed_by, Some(fx.user.id));
    assert!(confirmed.confirmed_at.is_some());

    let unconfirmed = Decision::update(
        decision.id,
        fx.org.id,
        DecisionPatch {
            is_confirmed: Some(false),
            ..Default::default()
        },
        fx.user.id,
        &pool,
    )
    .await
    .unwrap();
    assert_eq!(unconfirmed.confirmed_by, None);
    assert_eq!(unconfirmed.confirmed_at, None);
}
