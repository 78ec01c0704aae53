//! User repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};
use tracing::info;
use uuid::Uuid;

use taskdeck_core::{Error, NewUser, Result, User, UserRepository};

use crate::conflict_or_database;
use crate::rows::{user_from_row, USER_COLUMNS};

/// PostgreSQL implementation of UserRepository.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: Pool<Postgres>,
}

impl PgUserRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn duplicate_message(constraint: &str) -> String {
    if constraint.contains("email") {
        "Email is already registered".to_string()
    } else if constraint.contains("username") {
        "Username is already taken".to_string()
    } else {
        "Account already exists".to_string()
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User> {
        let id = Uuid::now_v7();
        let now = Utc::now();

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (id, email, username, password_hash, created_at_utc, updated_at_utc)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or_database(e, duplicate_message))?;

        info!(
            subsystem = "db",
            component = "users",
            op = "insert",
            user_id = %id,
            "User registered"
        );
        Ok(user_from_row(&row))
    }

    async fn get(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE email = LOWER($1)",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE LOWER(username) = LOWER($1)",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn update_username(&self, id: Uuid, username: &str) -> Result<User> {
        let row = sqlx::query(&format!(
            "UPDATE users SET username = $1, updated_at_utc = $2 WHERE id = $3 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(username)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| conflict_or_database(e, duplicate_message))?;

        row.as_ref()
            .map(user_from_row)
            .ok_or_else(|| Error::NotFound(format!("User {} not found", id)))
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> Result<()> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $1, updated_at_utc = $2 WHERE id = $3")
                .bind(password_hash)
                .bind(Utc::now())
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("User {} not found", id)));
        }
        info!(
            subsystem = "db",
            component = "users",
            op = "update_password",
            user_id = %id,
            "Password changed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_message_by_constraint() {
        assert_eq!(
            duplicate_message("users_email_unique"),
            "Email is already registered"
        );
        assert_eq!(
            duplicate_message("users_username_unique"),
            "Username is already taken"
        );
        assert_eq!(duplicate_message(""), "Account already exists");
    }
}
