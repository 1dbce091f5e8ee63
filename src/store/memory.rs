use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use super::{AttendanceStore, StoreError, UserStore};
use crate::model::attendance::{Attendance, AttendanceEntry};
use crate::model::user::User;

/// In-process store for tests. Enforces the same unique keys as the schema.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    attendances: Mutex<Vec<Attendance>>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail as if the database were unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        self.check_online()?;
        let mut users = self.users.lock().unwrap();

        if users.iter().any(|u| u.email == email) {
            return Err(StoreError::Duplicate);
        }

        let user = User {
            id: users.len() as u64 + 1,
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.check_online()?;
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn insert_check_in(
        &self,
        user_id: u64,
        date: NaiveDate,
        at: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        self.check_online()?;
        let mut rows = self.attendances.lock().unwrap();

        if rows.iter().any(|a| a.user_id == user_id && a.date == date) {
            return Err(StoreError::Duplicate);
        }

        let id = rows.len() as u64 + 1;
        rows.push(Attendance {
            id,
            user_id,
            check_in: at,
            check_out: None,
            date,
        });
        Ok(id)
    }

    async fn close_check_in(
        &self,
        user_id: u64,
        date: NaiveDate,
        at: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        self.check_online()?;
        let mut rows = self.attendances.lock().unwrap();

        let open = rows
            .iter_mut()
            .find(|a| a.user_id == user_id && a.date == date && a.check_out.is_none());

        match open {
            Some(record) => {
                record.check_out = Some(at);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn find_for_date(
        &self,
        user_id: u64,
        date: NaiveDate,
    ) -> Result<Option<Attendance>, StoreError> {
        self.check_online()?;
        let rows = self.attendances.lock().unwrap();
        Ok(rows
            .iter()
            .find(|a| a.user_id == user_id && a.date == date)
            .cloned())
    }

    async fn recent_for_user(
        &self,
        user_id: u64,
        limit: u32,
    ) -> Result<Vec<AttendanceEntry>, StoreError> {
        self.check_online()?;
        let users = self.users.lock().unwrap();
        let rows = self.attendances.lock().unwrap();

        let Some(owner) = users.iter().find(|u| u.id == user_id) else {
            return Ok(Vec::new());
        };

        let mut entries: Vec<AttendanceEntry> = rows
            .iter()
            .filter(|a| a.user_id == user_id)
            .map(|a| AttendanceEntry {
                id: a.id,
                user_id: a.user_id,
                user_name: owner.name.clone(),
                check_in: a.check_in,
                check_out: a.check_out,
                date: a.date,
            })
            .collect();

        entries.sort_by(|a, b| b.date.cmp(&a.date));
        entries.truncate(limit as usize);
        Ok(entries)
    }
}
