//! Per-user statistics.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use tracing::debug;
use uuid::Uuid;

use taskdeck_core::{
    CollectionStats, Error, ProjectStatus, Result, Statistics, StatsRepository, TaskStatus,
};

/// PostgreSQL implementation of StatsRepository.
#[derive(Clone)]
pub struct PgStatsRepository {
    pool: Pool<Postgres>,
}

impl PgStatsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatsRepository for PgStatsRepository {
    async fn statistics(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<Statistics> {
        let task_counts: Vec<(String, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*) FROM tasks WHERE user_id = $1 GROUP BY status",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let project_counts: Vec<(String, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*) FROM projects WHERE owner_id = $1 GROUP BY status",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let overdue: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM tasks
            WHERE user_id = $1
              AND status <> 'Completed'
              AND deadline IS NOT NULL
              AND deadline < $2
            "#,
        )
        .bind(user_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        let stats = Statistics {
            tasks: CollectionStats::from_counts(
                TaskStatus::ALL.iter().map(|s| s.as_str()),
                &task_counts,
            ),
            projects: CollectionStats::from_counts(
                ProjectStatus::ALL.iter().map(|s| s.as_str()),
                &project_counts,
            ),
            overdue,
        };

        debug!(
            subsystem = "db",
            component = "stats",
            op = "statistics",
            user_id = %user_id,
            tasks = stats.tasks.total,
            projects = stats.projects.total,
            overdue,
            "Computed statistics"
        );
        Ok(stats)
    }
}
