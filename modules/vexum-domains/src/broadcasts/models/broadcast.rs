use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use vexum_core::{OrNotFound, Result, VexumError};

use crate::organizations::Team;

/// A company-wide decision pushed from a headquarters meeting to target teams.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Broadcast {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub meeting_id: Uuid,
    pub content: String,
    pub background_link: Option<String>,
    pub effective_date: Option<NaiveDate>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BroadcastWithCreator {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub broadcast: Broadcast,
    pub creator_name: Option<String>,
}

/// A broadcast with the teams it targets and the teams that have consumed it.
#[derive(Debug, Clone, Serialize)]
pub struct BroadcastWithTargets {
    #[serde(flatten)]
    pub broadcast: BroadcastWithCreator,
    pub targets: Vec<Team>,
    pub consumed_by_teams: Vec<Uuid>,
}

impl BroadcastWithTargets {
    /// Pending means targeted and not yet consumed even once.
    pub fn is_pending_for(&self, team_id: Uuid) -> bool {
        self.targets.iter().any(|t| t.id == team_id) && !self.consumed_by_teams.contains(&team_id)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewBroadcast {
    pub meeting_id: Uuid,
    pub content: String,
    pub background_link: Option<String>,
    pub effective_date: Option<NaiveDate>,
    #[serde(default)]
    pub target_team_ids: Vec<Uuid>,
}

#[derive(sqlx::FromRow)]
struct TargetRow {
    broadcast_id: Uuid,
    #[sqlx(flatten)]
    team: Team,
}

impl Broadcast {
    /// Insert the broadcast and its target teams in one transaction. Every
    /// target must be a team of the same organization.
    pub async fn create(
        organization_id: Uuid,
        new: NewBroadcast,
        created_by: Uuid,
        pool: &PgPool,
    ) -> Result<Self> {
        if new.content.trim().is_empty() {
            return Err(VexumError::validation("content must not be empty"));
        }

        let mut target_ids = new.target_team_ids;
        target_ids.sort();
        target_ids.dedup();

        let mut tx = pool.begin().await?;

        let broadcast = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO broadcasts (organization_id, meeting_id, content, background_link, effective_date, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(organization_id)
        .bind(new.meeting_id)
        .bind(new.content.trim())
        .bind(new.background_link)
        .bind(new.effective_date)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO broadcast_targets (broadcast_id, team_id)
            SELECT $1, t.id FROM teams t
            WHERE t.id = ANY($2) AND t.organization_id = $3
            "#,
        )
        .bind(broadcast.id)
        .bind(&target_ids)
        .bind(organization_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted as usize != target_ids.len() {
            return Err(VexumError::validation(
                "target_team_ids must name teams of this organization",
            ));
        }

        tx.commit().await?;

        tracing::info!(
            broadcast_id = %broadcast.id,
            targets = target_ids.len(),
            "Broadcast created"
        );
        Ok(broadcast)
    }

    pub async fn find_for_org(id: Uuid, organization_id: Uuid, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM broadcasts WHERE id = $1 AND organization_id = $2",
        )
        .bind(id)
        .bind(organization_id)
        .fetch_optional(pool)
        .await?
        .or_not_found("Broadcast not found")
    }

    /// Broadcasts of an organization, newest first, each with targets and
    /// consuming teams. With `unconsumed_by_team`, only those pending for it.
    pub async fn list(
        organization_id: Uuid,
        unconsumed_by_team: Option<Uuid>,
        pool: &PgPool,
    ) -> Result<Vec<BroadcastWithTargets>> {
        let rows = sqlx::query_as::<_, BroadcastWithCreator>(
            r#"
            SELECT b.*, u.name AS creator_name
            FROM broadcasts b
            LEFT JOIN users u ON u.id = b.created_by
            WHERE b.organization_id = $1
              AND (
                $2::uuid IS NULL
                OR (
                    EXISTS (
                        SELECT 1 FROM broadcast_targets bt
                        WHERE bt.broadcast_id = b.id AND bt.team_id = $2
                    )
                    AND NOT EXISTS (
                        SELECT 1 FROM broadcast_consumptions bc
                        WHERE bc.broadcast_id = b.id AND bc.team_id = $2
                    )
                )
              )
            ORDER BY b.created_at DESC
            "#,
        )
        .bind(organization_id)
        .bind(unconsumed_by_team)
        .fetch_all(pool)
        .await?;

        Self::attach_targets(rows, pool).await
    }

    /// Broadcasts still awaiting the team's first consumption, oldest first.
    pub async fn pending_for(team_id: Uuid, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT b.* FROM broadcasts b
            JOIN broadcast_targets bt ON bt.broadcast_id = b.id
            WHERE bt.team_id = $1
              AND NOT EXISTS (
                SELECT 1 FROM broadcast_consumptions bc
                WHERE bc.broadcast_id = b.id AND bc.team_id = $1
              )
            ORDER BY b.created_at
            "#,
        )
        .bind(team_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn list_for_meeting(meeting_id: Uuid, pool: &PgPool) -> Result<Vec<BroadcastWithTargets>> {
        let rows = sqlx::query_as::<_, BroadcastWithCreator>(
            r#"
            SELECT b.*, u.name AS creator_name
            FROM broadcasts b
            LEFT JOIN users u ON u.id = b.created_by
            WHERE b.meeting_id = $1
            ORDER BY b.created_at
            "#,
        )
        .bind(meeting_id)
        .fetch_all(pool)
        .await?;

        Self::attach_targets(rows, pool).await
    }

    async fn attach_targets(
        rows: Vec<BroadcastWithCreator>,
        pool: &PgPool,
    ) -> Result<Vec<BroadcastWithTargets>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = rows.iter().map(|r| r.broadcast.id).collect();

        let (targets, consumptions) = tokio::try_join!(
            sqlx::query_as::<_, TargetRow>(
                r#"
                SELECT bt.broadcast_id, t.*
                FROM broadcast_targets bt
                JOIN teams t ON t.id = bt.team_id
                WHERE bt.broadcast_id = ANY($1)
                ORDER BY t.name
                "#,
            )
            .bind(&ids)
            .fetch_all(pool),
            sqlx::query_as::<_, (Uuid, Uuid)>(
                r#"
                SELECT broadcast_id, team_id
                FROM broadcast_consumptions
                WHERE broadcast_id = ANY($1)
                ORDER BY created_at
                "#,
            )
            .bind(&ids)
            .fetch_all(pool),
        )?;

        let mut targets_by_broadcast: HashMap<Uuid, Vec<Team>> = HashMap::new();
        for row in targets {
            targets_by_broadcast
                .entry(row.broadcast_id)
                .or_default()
                .push(row.team);
        }

        let mut consumers_by_broadcast: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for (broadcast_id, team_id) in consumptions {
            let consumers = consumers_by_broadcast.entry(broadcast_id).or_default();
            if !consumers.contains(&team_id) {
                consumers.push(team_id);
            }
        }

        Ok(rows
            .into_iter()
            .map(|broadcast| {
                let id = broadcast.broadcast.id;
                BroadcastWithTargets {
                    broadcast,
                    targets: targets_by_broadcast.remove(&id).unwrap_or_default(),
                    consumed_by_teams: consumers_by_broadcast.remove(&id).unwrap_or_default(),
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(id: Uuid) -> Team {
        Team {
            id,
            organization_id: Uuid::nil(),
            name: "営業1課".to_string(),
            created_at: Utc::now(),
        }
    }

    fn broadcast_for(targets: &[Uuid], consumed: &[Uuid]) -> BroadcastWithTargets {
        let broadcast = Broadcast {
            id: Uuid::new_v4(),
            organization_id: Uuid::nil(),
            meeting_id: Uuid::new_v4(),
            content: "経費精算は月末締め".to_string(),
            background_link: None,
            effective_date: None,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
        };
        BroadcastWithTargets {
            broadcast: BroadcastWithCreator {
                broadcast,
                creator_name: None,
            },
            targets: targets.iter().copied().map(team).collect(),
            consumed_by_teams: consumed.to_vec(),
        }
    }

    #[test]
    fn pending_only_for_targets_without_consumption() {
        let (team_1, team_2, outsider) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let b = broadcast_for(&[team_1, team_2], &[team_1]);

        assert!(!b.is_pending_for(team_1));
        assert!(b.is_pending_for(team_2));
        assert!(!b.is_pending_for(outsider));
    }

    #[test]
    fn consumption_by_a_non_target_does_not_matter() {
        let (target, other) = (Uuid::new_v4(), Uuid::new_v4());
        let b = broadcast_for(&[target], &[other]);
        assert!(b.is_pending_for(target));
    }

    #[test]
    fn serializes_flat_with_targets_and_consumers() {
        let team_1 = Uuid::new_v4();
        let b = broadcast_for(&[team_1], &[team_1]);
        let json = serde_json::to_value(&b).unwrap();
        assert_eq!(json["content"], "経費精算は月末締め");
        assert_eq!(json["targets"][0]["id"], team_1.to_string());
        assert_eq!(json["consumed_by_teams"][0], team_1.to_string());
        assert!(json.get("broadcast").is_none());
    }
}
