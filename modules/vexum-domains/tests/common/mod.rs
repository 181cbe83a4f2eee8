//! Shared fixtures for the database-backed tests.
//! Requires a Postgres instance. Set DATABASE_TEST_URL or these tests are skipped.
//!
//! Every fixture seeds a fresh organization, so tests stay isolated without
//! truncating tables underneath each other.

#![allow(dead_code)]

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use vexum_core::{MeetingType, UserRole};
use vexum_domains::meetings::{Meeting, NewMeeting};
use vexum_domains::organizations::{Organization, Team, User};

/// Get a migrated test database pool, or skip if no test DB is available.
pub async fn test_pool() -> Option<PgPool> {
    let url = std::env::var("DATABASE_TEST_URL").ok()?;
    let pool = PgPool::connect(&url).await.ok()?;
    sqlx::migrate!("../../migrations").run(&pool).await.ok()?;
    Some(pool)
}

pub struct Fixture {
    pub org: Organization,
    pub team: Team,
    pub user: User,
    pub meeting: Meeting,
}

impl Fixture {
    pub async fn seed(pool: &PgPool) -> Self {
        let org = Organization::create("テスト株式会社", pool).await.unwrap();
        let team = Team::create(org.id, "営業1課", pool).await.unwrap();
        let user = User::create(
            org.id,
            &format!("manager-{}@example.com", Uuid::new_v4()),
            "山田",
            UserRole::Manager,
            None,
            pool,
        )
        .await
        .unwrap();
        Team::add_member(team.id, user.id, pool).await.unwrap();
        let meeting = Self::meeting_for(org.id, Some(team.id), MeetingType::Team, pool).await;

        Self {
            org,
            team,
            user,
            meeting,
        }
    }

    pub async fn meeting_for(
        organization_id: Uuid,
        team_id: Option<Uuid>,
        meeting_type: MeetingType,
        pool: &PgPool,
    ) -> Meeting {
        Meeting::create(
            organization_id,
            NewMeeting {
                meeting_type,
                team_id,
                title: "週次定例".to_string(),
                slug: None,
                scheduled_at: Utc::now(),
            },
            pool,
        )
        .await
        .unwrap()
    }

    pub async fn another_team(&self, name: &str, pool: &PgPool) -> Team {
        Team::create(self.org.id, name, pool).await.unwrap()
    }
}

/// Backdate an action's activity clock.
pub async fn age_action(action_id: Uuid, days: i64, pool: &PgPool) {
    sqlx::query(
        "UPDATE actions SET last_updated_at = NOW() - make_interval(days => $1::int) WHERE id = $2",
    )
    .bind(days as i32)
    .bind(action_id)
    .execute(pool)
    .await
    .unwrap();
}
