//! Task repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};
use tracing::{debug, info};
use uuid::Uuid;

use taskdeck_core::{
    Error, NewTask, Result, Task, TaskChanges, TaskFilter, TaskOrder, TaskRepository,
};

use crate::escape_like;
use crate::rows::{task_from_row, TASK_COLUMNS};
use crate::task_filter::{QueryParam, TaskFilterQueryBuilder};

/// PostgreSQL implementation of TaskRepository.
#[derive(Clone)]
pub struct PgTaskRepository {
    pool: Pool<Postgres>,
}

impl PgTaskRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn insert(&self, task: NewTask) -> Result<Task> {
        let id = Uuid::now_v7();
        let now = Utc::now();

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO tasks AS t (id, user_id, project_id, title, description, tags, deadline,
                                    priority, urgency, status, assignee, context, sort_order,
                                    completed_at, created_at_utc, updated_at_utc)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $15)
            RETURNING {}
            "#,
            TASK_COLUMNS
        ))
        .bind(id)
        .bind(task.user_id)
        .bind(task.project_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.tags)
        .bind(task.deadline)
        .bind(task.priority.to_string())
        .bind(task.urgency().to_string())
        .bind(task.status.as_str())
        .bind(&task.assignee)
        .bind(task.context.as_str())
        .bind(task.order)
        .bind(task.completed_at)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        info!(
            subsystem = "db",
            component = "tasks",
            op = "insert",
            task_id = %id,
            user_id = %task.user_id,
            "Task created"
        );
        task_from_row(&row)
    }

    async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Option<Task>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM tasks t WHERE t.id = $1 AND t.user_id = $2",
            TASK_COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.as_ref().map(task_from_row).transpose()
    }

    async fn list(&self, user_id: Uuid, filter: &TaskFilter) -> Result<Vec<Task>> {
        let (clause, params) = TaskFilterQueryBuilder::new(filter, 1).build();
        let query = format!(
            "SELECT {} FROM tasks t WHERE t.user_id = $1 AND {} ORDER BY t.id",
            TASK_COLUMNS, clause
        );

        let mut q = sqlx::query(&query).bind(user_id);
        for param in params {
            q = match param {
                QueryParam::Uuid(v) => q.bind(v),
                QueryParam::String(v) => q.bind(v),
            };
        }

        let rows = q.fetch_all(&self.pool).await.map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "tasks",
            op = "list",
            filter = %clause,
            result_count = rows.len(),
            "Listed tasks"
        );
        rows.iter().map(task_from_row).collect()
    }

    async fn count(&self, user_id: Uuid) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)
    }

    async fn update(&self, user_id: Uuid, id: Uuid, changes: TaskChanges) -> Result<Option<Task>> {
        // Build dynamic update query; priority and urgency always move together
        let mut updates = vec!["updated_at_utc = $1".to_string()];
        let mut param_count = 2;

        let mut set = |column: &str, present: bool| {
            present.then(|| {
                updates.push(format!("{} = ${}", column, param_count));
                param_count += 1;
                param_count - 1
            })
        };
        set("title", changes.title.is_some());
        set("description", changes.description.is_some());
        set("project_id", changes.project_id.is_some());
        set("tags", changes.tags.is_some());
        set("deadline", changes.deadline.is_some());
        set("priority", changes.priority.is_some());
        set("urgency", changes.priority.is_some());
        let status_param = set("status", changes.status.is_some());
        set("assignee", changes.assignee.is_some());
        set("context", changes.context.is_some());
        set("sort_order", changes.order.is_some());

        // Derived from the row as it is at write time, so overlapping status
        // changes cannot break the completed_at/status pairing.
        if let Some(n) = status_param {
            updates.push(format!(
                "completed_at = CASE WHEN ${n} = 'Completed' \
                 THEN COALESCE(t.completed_at, $1) ELSE NULL END"
            ));
        }

        let query = format!(
            "UPDATE tasks t SET {} WHERE t.id = ${} AND t.user_id = ${} RETURNING {}",
            updates.join(", "),
            param_count,
            param_count + 1,
            TASK_COLUMNS
        );

        let mut q = sqlx::query(&query).bind(Utc::now());
        if let Some(title) = &changes.title {
            q = q.bind(title);
        }
        if let Some(description) = &changes.description {
            q = q.bind(description);
        }
        if let Some(project_id) = changes.project_id {
            q = q.bind(project_id);
        }
        if let Some(tags) = &changes.tags {
            q = q.bind(tags);
        }
        if let Some(deadline) = changes.deadline {
            q = q.bind(deadline);
        }
        if let Some(priority) = changes.priority {
            q = q.bind(priority.to_string());
            q = q.bind(priority.urgency().to_string());
        }
        if let Some(status) = changes.status {
            q = q.bind(status.as_str());
        }
        if let Some(assignee) = &changes.assignee {
            q = q.bind(assignee);
        }
        if let Some(context) = changes.context {
            q = q.bind(context.as_str());
        }
        if let Some(order) = changes.order {
            q = q.bind(order);
        }

        let row = q
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        if row.is_some() {
            info!(
                subsystem = "db",
                component = "tasks",
                op = "update",
                task_id = %id,
                user_id = %user_id,
                "Task updated"
            );
        }
        row.as_ref().map(task_from_row).transpose()
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(result.rows_affected() > 0)
    }

    async fn reorder(&self, user_id: Uuid, orders: &[TaskOrder]) -> Result<u64> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;
        let mut updated = 0;

        for entry in orders {
            updated += sqlx::query(
                "UPDATE tasks SET sort_order = $1, updated_at_utc = $2 WHERE id = $3 AND user_id = $4",
            )
            .bind(entry.order)
            .bind(now)
            .bind(entry.id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?
            .rows_affected();
        }

        tx.commit().await.map_err(Error::Database)?;

        info!(
            subsystem = "db",
            component = "tasks",
            op = "reorder",
            user_id = %user_id,
            requested = orders.len(),
            rows_affected = updated,
            "Tasks reordered"
        );
        Ok(updated)
    }

    async fn search(&self, user_id: Uuid, query: &str, limit: Option<i64>) -> Result<Vec<Task>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let pattern = escape_like(query);
        let sql = format!(
            r#"
            SELECT {}
            FROM tasks t
            WHERE t.user_id = $1
              AND (
                t.title ILIKE '%' || $2 || '%' ESCAPE '\'
                OR t.description ILIKE '%' || $2 || '%' ESCAPE '\'
                OR EXISTS (SELECT 1 FROM unnest(t.tags) AS tag WHERE tag ILIKE '%' || $2 || '%' ESCAPE '\')
              )
            ORDER BY t.id
            LIMIT $3
            "#,
            TASK_COLUMNS
        );

        let rows = sqlx::query(&sql)
            .bind(user_id)
            .bind(&pattern)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "tasks",
            op = "search",
            result_count = rows.len(),
            "Searched tasks"
        );
        rows.iter().map(task_from_row).collect()
    }
}
