use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use vexum_core::{Result, VexumError};

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Completed share of all actions, as a percentage. 0 when there are none.
    pub action_completion_rate: f64,
    pub overdue_actions_count: i64,
    pub tentative_actions_count: i64,
    pub stagnant_issues_count: i64,
    /// Mean check-in confidence over meetings scheduled within the window. 0 when none.
    pub avg_confidence_score: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct DashboardQuery {
    pub organization_id: Uuid,
    pub team_id: Option<Uuid>,
    pub window_days: i64,
    pub postponed_threshold: i32,
}

pub fn completion_rate(completed: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    completed as f64 / total as f64 * 100.0
}

impl DashboardStats {
    pub async fn compute(query: DashboardQuery, now: DateTime<Utc>, pool: &PgPool) -> Result<Self> {
        if query.window_days < 1 {
            return Err(VexumError::validation("days must be at least 1"));
        }

        let DashboardQuery {
            organization_id,
            team_id,
            window_days,
            postponed_threshold,
        } = query;
        let today = now.date_naive();
        let window_start = now - Duration::days(window_days);

        let ((total, completed), overdue, tentative, stagnant, avg_confidence) = tokio::try_join!(
            async {
                sqlx::query_as::<_, (i64, i64)>(
                    r#"
                    SELECT COUNT(*), COUNT(*) FILTER (WHERE a.status = 'completed')
                    FROM actions a
                    JOIN meetings m ON m.id = a.meeting_id
                    WHERE m.organization_id = $1 AND ($2::uuid IS NULL OR m.team_id = $2)
                    "#,
                )
                .bind(organization_id)
                .bind(team_id)
                .fetch_one(pool)
                .await
                .map_err(VexumError::from)
            },
            async {
                sqlx::query_as::<_, (i64,)>(
                    r#"
                    SELECT COUNT(*)
                    FROM actions a
                    JOIN meetings m ON m.id = a.meeting_id
                    WHERE m.organization_id = $1 AND ($2::uuid IS NULL OR m.team_id = $2)
                      AND a.due_date < $3
                      AND a.status NOT IN ('completed', 'on_hold')
                    "#,
                )
                .bind(organization_id)
                .bind(team_id)
                .bind(today)
                .fetch_one(pool)
                .await
                .map(|r| r.0)
                .map_err(VexumError::from)
            },
            async {
                sqlx::query_as::<_, (i64,)>(
                    r#"
                    SELECT COUNT(*)
                    FROM actions a
                    JOIN meetings m ON m.id = a.meeting_id
                    WHERE m.organization_id = $1 AND ($2::uuid IS NULL OR m.team_id = $2)
                      AND a.is_tentative
                    "#,
                )
                .bind(organization_id)
                .bind(team_id)
                .fetch_one(pool)
                .await
                .map(|r| r.0)
                .map_err(VexumError::from)
            },
            async {
                sqlx::query_as::<_, (i64,)>(
                    r#"
                    SELECT COUNT(*)
                    FROM issues
                    WHERE organization_id = $1 AND ($2::uuid IS NULL OR team_id = $2)
                      AND resolved_at IS NULL
                      AND times_postponed >= $3
                    "#,
                )
                .bind(organization_id)
                .bind(team_id)
                .bind(postponed_threshold)
                .fetch_one(pool)
                .await
                .map(|r| r.0)
                .map_err(VexumError::from)
            },
            async {
                sqlx::query_as::<_, (Option<f64>,)>(
                    r#"
                    SELECT AVG(ci.confidence_score)::float8
                    FROM check_ins ci
                    JOIN meetings m ON m.id = ci.meeting_id
                    WHERE m.organization_id = $1 AND ($2::uuid IS NULL OR m.team_id = $2)
                      AND m.scheduled_at >= $3
                    "#,
                )
                .bind(organization_id)
                .bind(team_id)
                .bind(window_start)
                .fetch_one(pool)
                .await
                .map(|r| r.0)
                .map_err(VexumError::from)
            },
        )?;

        Ok(Self {
            action_completion_rate: completion_rate(completed, total),
            overdue_actions_count: overdue,
            tentative_actions_count: tentative,
            stagnant_issues_count: stagnant,
            avg_confidence_score: avg_confidence.unwrap_or(0.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_rate_of_nothing_is_zero() {
        assert_eq!(completion_rate(0, 0), 0.0);
    }

    #[test]
    fn completion_rate_is_a_percentage() {
        assert_eq!(completion_rate(1, 4), 25.0);
        assert_eq!(completion_rate(3, 3), 100.0);
        assert!((completion_rate(1, 3) - 33.333).abs() < 0.01);
    }
}
