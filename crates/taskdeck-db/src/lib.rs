//! # taskdeck-db
//!
//! PostgreSQL database layer for taskdeck.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for users, projects and tasks
//! - SQL generation for structured task filters
//! - Per-user statistics
//!
//! ## Example
//!
//! ```rust,ignore
//! use taskdeck_db::{Database, TaskFilter, TaskRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/taskdeck").await?;
//!     let tasks = db.tasks.list(user_id, &TaskFilter::default()).await?;
//!     println!("{} tasks", tasks.len());
//!     Ok(())
//! }
//! ```

pub mod pool;
pub mod projects;
pub mod rows;
pub mod stats;
pub mod task_filter;
pub mod tasks;
pub mod test_fixtures;
pub mod users;

pub use pool::{
    create_lazy_pool, create_pool, create_pool_with_config, log_pool_metrics, PoolConfig,
};

// Re-export core types
pub use taskdeck_core::*;

pub use projects::PgProjectRepository;
pub use stats::PgStatsRepository;
pub use task_filter::{QueryParam, TaskFilterQueryBuilder};
pub use tasks::PgTaskRepository;
pub use users::PgUserRepository;

/// Escape LIKE/ILIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Map a unique-constraint violation to `Error::Conflict`, anything else to
/// `Error::Database`.
pub(crate) fn conflict_or_database(e: sqlx::Error, conflict: impl FnOnce(&str) -> String) -> Error {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            let constraint = db_err.constraint().unwrap_or_default().to_string();
            return Error::Conflict(conflict(&constraint));
        }
    }
    Error::Database(e)
}

/// Database handle bundling the pool with every repository.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// User accounts.
    pub users: PgUserRepository,
    /// Projects, scoped per owner.
    pub projects: PgProjectRepository,
    /// Tasks, scoped per user.
    pub tasks: PgTaskRepository,
    /// Dashboard counts.
    pub stats: PgStatsRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            users: PgUserRepository::new(pool.clone()),
            projects: PgProjectRepository::new(pool.clone()),
            tasks: PgTaskRepository::new(pool.clone()),
            stats: PgStatsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
