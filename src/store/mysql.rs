use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, MySqlPool};
use tracing::warn;

use super::{AttendanceStore, StoreError, UserStore};
use crate::model::attendance::{Attendance, AttendanceEntry};
use crate::model::user::User;

/// Store client over a MySQL connection pool. Cheap to clone.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for MySqlStore {
    async fn insert_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)?;

        Ok(User {
            id: result.last_insert_id(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        })
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl AttendanceStore for MySqlStore {
    async fn insert_check_in(
        &self,
        user_id: u64,
        date: NaiveDate,
        at: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO attendances (user_id, check_in, date)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(at)
        .bind(date)
        .execute(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)?;

        Ok(result.last_insert_id())
    }

    async fn close_check_in(
        &self,
        user_id: u64,
        date: NaiveDate,
        at: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE attendances
            SET check_out = ?
            WHERE user_id = ?
            AND date = ?
            AND check_out IS NULL
            "#,
        )
        .bind(at)
        .bind(user_id)
        .bind(date)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn find_for_date(
        &self,
        user_id: u64,
        date: NaiveDate,
    ) -> Result<Option<Attendance>, StoreError> {
        let record = sqlx::query_as::<_, Attendance>(
            r#"
            SELECT id, user_id, check_in, check_out, date
            FROM attendances
            WHERE user_id = ? AND date = ?
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn recent_for_user(
        &self,
        user_id: u64,
        limit: u32,
    ) -> Result<Vec<AttendanceEntry>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT a.id, a.user_id, u.name AS user_name, a.check_in, a.check_out, a.date
            FROM attendances a
            JOIN users u ON a.user_id = u.id
            WHERE a.user_id = ?
            ORDER BY a.date DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(skip_malformed(rows.iter().map(AttendanceEntry::from_row), user_id))
    }
}

/// Keeps the rows that decoded, in order. A row that fails is logged and dropped.
fn skip_malformed<I>(rows: I, user_id: u64) -> Vec<AttendanceEntry>
where
    I: IntoIterator<Item = Result<AttendanceEntry, sqlx::Error>>,
{
    rows.into_iter()
        .filter_map(|row| match row {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, user_id, "Skipping malformed attendance row");
                None
            }
        })
        .collect()
}
