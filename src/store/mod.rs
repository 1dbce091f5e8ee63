//! Persistence seams for users and attendance records.
//!
//! Both traits are implemented by [`mysql::MySqlStore`] in production. The
//! store is the authority for uniqueness: a second insert for the same email,
//! or for the same `(user_id, date)`, comes back as [`StoreError::Duplicate`].

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::model::attendance::{Attendance, AttendanceEntry};
use crate::model::user::User;

#[cfg(test)]
pub mod memory;
pub mod mysql;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique key rejected the write.
    #[error("duplicate key")]
    Duplicate,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Translate a raw sqlx error, keeping unique-key violations apart.
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StoreError::Duplicate;
            }
        }
        StoreError::Database(err)
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user and return the stored row, including its assigned id.
    async fn insert_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Open the record for `(user_id, date)`. Returns the new record id.
    async fn insert_check_in(
        &self,
        user_id: u64,
        date: NaiveDate,
        at: DateTime<Utc>,
    ) -> Result<u64, StoreError>;

    /// Close the open record for `(user_id, date)`. Returns the number of rows
    /// updated, zero when nothing was open.
    async fn close_check_in(
        &self,
        user_id: u64,
        date: NaiveDate,
        at: DateTime<Utc>,
    ) -> Result<u64, StoreError>;

    async fn find_for_date(
        &self,
        user_id: u64,
        date: NaiveDate,
    ) -> Result<Option<Attendance>, StoreError>;

    /// Newest first, at most `limit` entries.
    async fn recent_for_user(
        &self,
        user_id: u64,
        limit: u32,
    ) -> Result<Vec<AttendanceEntry>, StoreError>;
}
