//! Project repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};
use tracing::{debug, info};
use uuid::Uuid;

use taskdeck_core::{
    Error, NewProject, Project, ProjectChanges, ProjectDeletion, ProjectDeletionReport,
    ProjectRepository, Result,
};

use crate::rows::{project_from_row, PROJECT_COLUMNS};

/// PostgreSQL implementation of ProjectRepository.
#[derive(Clone)]
pub struct PgProjectRepository {
    pool: Pool<Postgres>,
}

impl PgProjectRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectRepository for PgProjectRepository {
    async fn insert(&self, project: NewProject) -> Result<Project> {
        let id = Uuid::now_v7();
        let now = Utc::now();

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO projects AS p (id, owner_id, name, description, tags, deadline, urgency, status, created_at_utc, updated_at_utc)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING {}
            "#,
            PROJECT_COLUMNS
        ))
        .bind(id)
        .bind(project.owner_id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(&project.tags)
        .bind(project.deadline)
        .bind(project.urgency.to_string())
        .bind(project.status.as_str())
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        info!(
            subsystem = "db",
            component = "projects",
            op = "insert",
            project_id = %id,
            user_id = %project.owner_id,
            "Project created"
        );
        project_from_row(&row)
    }

    async fn get(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Project>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM projects p WHERE p.id = $1 AND p.owner_id = $2",
            PROJECT_COLUMNS
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.as_ref().map(project_from_row).transpose()
    }

    async fn list(&self, owner_id: Uuid) -> Result<Vec<Project>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM projects p WHERE p.owner_id = $1 ORDER BY p.id",
            PROJECT_COLUMNS
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "projects",
            op = "list",
            result_count = rows.len(),
            "Listed projects"
        );
        rows.iter().map(project_from_row).collect()
    }

    async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        changes: ProjectChanges,
    ) -> Result<Option<Project>> {
        // Build dynamic update query
        let mut updates = vec!["updated_at_utc = $1".to_string()];
        let mut param_count = 2;

        for (column, present) in [
            ("name", changes.name.is_some()),
            ("description", changes.description.is_some()),
            ("tags", changes.tags.is_some()),
            ("deadline", changes.deadline.is_some()),
            ("urgency", changes.urgency.is_some()),
            ("status", changes.status.is_some()),
        ] {
            if present {
                updates.push(format!("{} = ${}", column, param_count));
                param_count += 1;
            }
        }

        let query = format!(
            "UPDATE projects p SET {} WHERE p.id = ${} AND p.owner_id = ${} RETURNING {}",
            updates.join(", "),
            param_count,
            param_count + 1,
            PROJECT_COLUMNS
        );

        let mut q = sqlx::query(&query).bind(Utc::now());
        if let Some(name) = &changes.name {
            q = q.bind(name);
        }
        if let Some(description) = &changes.description {
            q = q.bind(description);
        }
        if let Some(tags) = &changes.tags {
            q = q.bind(tags);
        }
        if let Some(deadline) = changes.deadline {
            q = q.bind(deadline);
        }
        if let Some(urgency) = changes.urgency {
            q = q.bind(urgency.to_string());
        }
        if let Some(status) = changes.status {
            q = q.bind(status.as_str());
        }

        let row = q
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        row.as_ref().map(project_from_row).transpose()
    }

    async fn delete(
        &self,
        owner_id: Uuid,
        id: Uuid,
        options: ProjectDeletion,
    ) -> Result<Option<ProjectDeletionReport>> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let removed = sqlx::query("DELETE FROM projects WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?
            .rows_affected();
        if removed == 0 {
            return Ok(None);
        }

        let mut report = ProjectDeletionReport::default();

        if options.delete_tasks {
            let deleted = sqlx::query("DELETE FROM tasks WHERE project_id = $1 AND user_id = $2")
                .bind(id)
                .bind(owner_id)
                .execute(&mut *tx)
                .await
                .map_err(Error::Database)?
                .rows_affected();
            report.deleted_tasks = Some(deleted);
        }

        if options.unassign_tasks {
            let unassigned = sqlx::query(
                "UPDATE tasks SET project_id = NULL, updated_at_utc = $3 WHERE project_id = $1 AND user_id = $2",
            )
            .bind(id)
            .bind(owner_id)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?
            .rows_affected();
            report.unassigned_tasks = Some(unassigned);
        }

        tx.commit().await.map_err(Error::Database)?;

        info!(
            subsystem = "db",
            component = "projects",
            op = "delete",
            project_id = %id,
            user_id = %owner_id,
            deleted_tasks = ?report.deleted_tasks,
            unassigned_tasks = ?report.unassigned_tasks,
            "Project deleted"
        );
        Ok(Some(report))
    }
}
