//! Per-day attendance state machine.
//!
//! For each `(user, day)` a record moves `Absent -> Present -> Completed`:
//! check-in creates it with no check-out, check-out closes it once. The day is
//! the UTC calendar date of the server clock, never a client value.

use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use tracing::info;

use crate::{
    error::AppError,
    model::attendance::{AttendanceEntry, TodayStatus},
    store::{AttendanceStore, StoreError},
};

/// Upper bound on history entries returned in one call.
pub const HISTORY_LIMIT: u32 = 30;

pub fn calendar_day(now: DateTime<Utc>) -> NaiveDate {
    now.date_naive()
}

pub struct Ledger {
    store: Arc<dyn AttendanceStore>,
}

impl Ledger {
    pub fn new(store: Arc<dyn AttendanceStore>) -> Self {
        Self { store }
    }

    /// One check-in per day, whether or not the earlier one was closed.
    pub async fn check_in(&self, user_id: u64, now: DateTime<Utc>) -> Result<u64, AppError> {
        let date = calendar_day(now);

        match self.store.insert_check_in(user_id, date, now).await {
            Ok(id) => {
                info!(user_id, record_id = id, %date, "Checked in");
                Ok(id)
            }
            Err(StoreError::Duplicate) => Err(AppError::AlreadyCheckedIn),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn check_out(&self, user_id: u64, now: DateTime<Utc>) -> Result<(), AppError> {
        let date = calendar_day(now);

        let updated = self.store.close_check_in(user_id, date, now).await?;
        if updated == 0 {
            return Err(AppError::NoOpenCheckIn);
        }

        info!(user_id, %date, "Checked out");
        Ok(())
    }

    pub async fn today_status(
        &self,
        user_id: u64,
        now: DateTime<Utc>,
    ) -> Result<TodayStatus, AppError> {
        let record = self.store.find_for_date(user_id, calendar_day(now)).await?;

        Ok(match record {
            Some(record) => TodayStatus::from_record(record),
            None => TodayStatus::absent(),
        })
    }

    /// Newest first, capped at [`HISTORY_LIMIT`].
    pub async fn history(
        &self,
        user_id: u64,
        limit: u32,
    ) -> Result<Vec<AttendanceEntry>, AppError> {
        let limit = limit.min(HISTORY_LIMIT);
        Ok(self.store.recent_for_user(user_id, limit).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::store::UserStore;
    use chrono::{Duration, TimeZone};

    async fn ledger_with_user() -> (Arc<MemoryStore>, Ledger, u64) {
        let store = Arc::new(MemoryStore::new());
        let user = store
            .insert_user("Alice", "alice@x.com", "$argon2id$stub")
            .await
            .unwrap();
        (store.clone(), Ledger::new(store), user.id)
    }

    fn morning() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap()
    }

    #[actix_web::test]
    async fn full_day_walks_through_every_state() {
        let (_, ledger, uid) = ledger_with_user().await;
        let now = morning();

        assert_eq!(ledger.today_status(uid, now).await.unwrap(), TodayStatus::absent());

        let id = ledger.check_in(uid, now).await.unwrap();
        let status = ledger.today_status(uid, now).await.unwrap();
        assert!(status.checked_in);
        assert_eq!(status.checked_out, Some(false));
        assert_eq!(status.attendance.as_ref().map(|a| a.id), Some(id));

        let evening = now + Duration::hours(9);
        ledger.check_out(uid, evening).await.unwrap();
        let status = ledger.today_status(uid, evening).await.unwrap();
        assert_eq!(status.checked_out, Some(true));
        assert_eq!(status.attendance.unwrap().check_out, Some(evening));
    }

    #[actix_web::test]
    async fn second_check_in_same_day_fails_even_after_check_out() {
        let (_, ledger, uid) = ledger_with_user().await;
        let now = morning();

        ledger.check_in(uid, now).await.unwrap();
        let err = ledger.check_in(uid, now + Duration::minutes(5)).await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyCheckedIn));

        ledger.check_out(uid, now + Duration::hours(1)).await.unwrap();
        let err = ledger.check_in(uid, now + Duration::hours(2)).await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyCheckedIn));
    }

    #[actix_web::test]
    async fn concurrent_check_ins_record_only_one() {
        let (store, ledger, uid) = ledger_with_user().await;
        let now = morning();

        let (a, b) = futures::join!(ledger.check_in(uid, now), ledger.check_in(uid, now));

        assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
        let loser = if a.is_ok() { b } else { a };
        assert!(matches!(loser, Err(AppError::AlreadyCheckedIn)));
        assert_eq!(store.recent_for_user(uid, HISTORY_LIMIT).await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn check_out_needs_an_open_check_in() {
        let (_, ledger, uid) = ledger_with_user().await;
        let now = morning();

        let err = ledger.check_out(uid, now).await.unwrap_err();
        assert!(matches!(err, AppError::NoOpenCheckIn));

        ledger.check_in(uid, now).await.unwrap();
        ledger.check_out(uid, now + Duration::hours(1)).await.unwrap();
        let err = ledger.check_out(uid, now + Duration::hours(2)).await.unwrap_err();
        assert!(matches!(err, AppError::NoOpenCheckIn));
    }

    #[actix_web::test]
    async fn yesterdays_open_record_does_not_satisfy_check_out() {
        let (_, ledger, uid) = ledger_with_user().await;
        let now = morning();

        ledger.check_in(uid, now).await.unwrap();
        let err = ledger.check_out(uid, now + Duration::days(1)).await.unwrap_err();
        assert!(matches!(err, AppError::NoOpenCheckIn));
    }

    #[actix_web::test]
    async fn day_boundary_is_utc_midnight() {
        let (_, ledger, uid) = ledger_with_user().await;
        let late = Utc.with_ymd_and_hms(2026, 3, 2, 23, 59, 59).unwrap();

        ledger.check_in(uid, late).await.unwrap();
        assert!(ledger.check_in(uid, late + Duration::seconds(1)).await.is_ok());
    }

    #[actix_web::test]
    async fn history_is_capped_and_newest_first() {
        let (_, ledger, uid) = ledger_with_user().await;
        let start = morning();

        for day in 0..40 {
            ledger.check_in(uid, start + Duration::days(day)).await.unwrap();
        }

        let history = ledger.history(uid, 100).await.unwrap();
        assert_eq!(history.len(), HISTORY_LIMIT as usize);
        assert!(history.windows(2).all(|w| w[0].date > w[1].date));
        assert_eq!(history[0].date, calendar_day(start + Duration::days(39)));
        assert!(history.iter().all(|e| e.user_name == "Alice"));
    }

    #[actix_web::test]
    async fn history_only_shows_own_records() {
        let (store, ledger, uid) = ledger_with_user().await;
        let bob = store.insert_user("Bob", "bob@x.com", "$argon2id$stub").await.unwrap();

        ledger.check_in(uid, morning()).await.unwrap();
        ledger.check_in(bob.id, morning()).await.unwrap();

        let history = ledger.history(uid, HISTORY_LIMIT).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].user_id, uid);
    }

    #[actix_web::test]
    async fn store_outage_is_not_mistaken_for_state() {
        let (store, ledger, uid) = ledger_with_user().await;
        store.set_offline(true);

        let err = ledger.check_in(uid, morning()).await.unwrap_err();
        assert!(matches!(err, AppError::StoreUnavailable(_)));
        let err = ledger.history(uid, HISTORY_LIMIT).await.unwrap_err();
        assert!(matches!(err, AppError::StoreUnavailable(_)));
    }
}
