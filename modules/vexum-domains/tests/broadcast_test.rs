mod common;

use common::{test_pool, Fixture};
use vexum_core::{ConsumptionType, MeetingType, VexumError};
use vexum_domains::broadcasts::{self, Broadcast, BroadcastConsumption, NewBroadcast, NewConsumption};

async fn headquarters_broadcast(fx: &Fixture, targets: Vec<uuid::Uuid>, pool: &sqlx::PgPool) -> Broadcast {
    let hq = Fixture::meeting_for(fx.org.id, None, MeetingType::Headquarters, pool).await;
    Broadcast::create(
        fx.org.id,
        NewBroadcast {
            meeting_id: hq.id,
            content: "経費精算ルール変更".to_string(),
            background_link: None,
            effective_date: None,
            target_team_ids: targets,
        },
        fx.user.id,
        pool,
    )
    .await
    .unwrap()
}

fn acknowledged(team_id: uuid::Uuid, meeting_id: uuid::Uuid) -> NewConsumption {
    NewConsumption {
        team_id,
        meeting_id,
        consumption_type: ConsumptionType::Acknowledged,
        action_id: None,
        issue_id: None,
    }
}

#[tokio::test]
async fn broadcast_stays_pending_only_for_teams_that_have_not_consumed_it() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let fx = Fixture::seed(&pool).await;
    let second = fx.another_team("営業2課", &pool).await;
    let broadcast = headquarters_broadcast(&fx, vec![fx.team.id, second.id], &pool).await;

    assert_eq!(Broadcast::pending_for(fx.team.id, &pool).await.unwrap().len(), 1);
    assert_eq!(Broadcast::pending_for(second.id, &pool).await.unwrap().len(), 1);

    broadcasts::consume(broadcast.id, acknowledged(fx.team.id, fx.meeting.id), fx.org.id, &pool)
        .await
        .unwrap();

    assert!(Broadcast::pending_for(fx.team.id, &pool).await.unwrap().is_empty());
    let pending = Broadcast::pending_for(second.id, &pool).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, broadcast.id);

    let listed = Broadcast::list(fx.org.id, None, &pool).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].consumed_by_teams, vec![fx.team.id]);
    assert!(listed[0].is_pending_for(second.id));
    assert!(!listed[0].is_pending_for(fx.team.id));

    let unconsumed = Broadcast::list(fx.org.id, Some(fx.team.id), &pool).await.unwrap();
    assert!(unconsumed.is_empty());
}

#[tokio::test]
async fn repeated_consumption_is_kept_as_separate_rows() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let fx = Fixture::seed(&pool).await;
    let broadcast = headquarters_broadcast(&fx, vec![fx.team.id], &pool).await;

    for _ in 0..2 {
        broadcasts::consume(broadcast.id, acknowledged(fx.team.id, fx.meeting.id), fx.org.id, &pool)
            .await
            .unwrap();
    }

    let rows = BroadcastConsumption::list_for_broadcast(broadcast.id, &pool)
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);

    let listed = Broadcast::list(fx.org.id, None, &pool).await.unwrap();
    assert_eq!(listed[0].consumed_by_teams, vec![fx.team.id]);
}

#[tokio::test]
async fn target_from_another_organization_rolls_back_the_broadcast() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let fx = Fixture::seed(&pool).await;
    let stranger = Fixture::seed(&pool).await;
    let hq = Fixture::meeting_for(fx.org.id, None, MeetingType::Headquarters, &pool).await;

    let err = Broadcast::create(
        fx.org.id,
        NewBroadcast {
            meeting_id: hq.id,
            content: "越境".to_string(),
            background_link: None,
            effective_date: None,
            target_team_ids: vec![fx.team.id, stranger.team.id],
        },
        fx.user.id,
        &pool,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, VexumError::Validation(_)));
    assert!(Broadcast::list(fx.org.id, None, &pool).await.unwrap().is_empty());
}

#[tokio::test]
async fn consuming_another_organizations_broadcast_is_not_found() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let fx = Fixture::seed(&pool).await;
    let stranger = Fixture::seed(&pool).await;
    let broadcast = headquarters_broadcast(&fx, vec![fx.team.id], &pool).await;

    let err = broadcasts::consume(
        broadcast.id,
        acknowledged(stranger.team.id, stranger.meeting.id),
        stranger.org.id,
        &pool,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, VexumError::NotFound(_)));
}
