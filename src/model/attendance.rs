use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Row of the `attendances` table. At most one per user per day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow, ToSchema)]
pub struct Attendance {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1)]
    pub user_id: u64,
    #[schema(example = "2026-01-01T08:00:00Z", format = "date-time", value_type = String)]
    pub check_in: DateTime<Utc>,
    #[schema(example = "2026-01-01T17:00:00Z", format = "date-time", value_type = Option<String>)]
    pub check_out: Option<DateTime<Utc>>,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub date: NaiveDate,
}

/// Attendance row joined with its owner's display name, as listed in history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow, ToSchema)]
pub struct AttendanceEntry {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1)]
    pub user_id: u64,
    #[schema(example = "Alice")]
    pub user_name: String,
    #[schema(example = "2026-01-01T08:00:00Z", format = "date-time", value_type = String)]
    pub check_in: DateTime<Utc>,
    #[schema(example = "2026-01-01T17:00:00Z", format = "date-time", value_type = Option<String>)]
    pub check_out: Option<DateTime<Utc>>,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub date: NaiveDate,
}

/// What the caller sees for the current day.
///
/// `{"checked_in": false}` when there is no record yet, otherwise the record
/// and whether it has been closed.
#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
#[schema(example = json!({
    "checked_in": true,
    "checked_out": false,
    "attendance": {
        "id": 1,
        "user_id": 1,
        "check_in": "2026-01-01T08:00:00Z",
        "check_out": null,
        "date": "2026-01-01"
    }
}))]
pub struct TodayStatus {
    pub checked_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked_out: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendance: Option<Attendance>,
}

impl TodayStatus {
    pub fn absent() -> Self {
        Self {
            checked_in: false,
            checked_out: None,
            attendance: None,
        }
    }

    pub fn from_record(record: Attendance) -> Self {
        Self {
            checked_in: true,
            checked_out: Some(record.check_out.is_some()),
            attendance: Some(record),
        }
    }
}
