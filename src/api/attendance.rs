use crate::{
    auth::auth::AuthUser,
    error::AppError,
    ledger::{HISTORY_LIMIT, Ledger},
    models::{CheckInResponse, MessageResponse},
};
use actix_web::{HttpResponse, web};
use chrono::Utc;
use tracing::instrument;

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/check-in",
    responses(
        (status = 200, description = "Checked in", body = CheckInResponse),
        (status = 400, description = "Already checked in today", body = Object, example = json!({
            "error": "Already checked in today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
#[instrument(skip(auth, ledger), fields(user_id = auth.user_id))]
pub async fn check_in(
    auth: AuthUser,
    ledger: web::Data<Ledger>,
) -> Result<HttpResponse, AppError> {
    let id = ledger.check_in(auth.user_id, Utc::now()).await?;

    Ok(HttpResponse::Ok().json(CheckInResponse {
        message: "Check-in successful".to_string(),
        id,
    }))
}

/// Check-out endpoint
#[utoipa::path(
    post,
    path = "/api/check-out",
    responses(
        (status = 200, description = "Checked out", body = MessageResponse),
        (status = 400, description = "No open check-in for today", body = Object, example = json!({
            "error": "No active check-in found or already checked out"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
#[instrument(skip(auth, ledger), fields(user_id = auth.user_id))]
pub async fn check_out(
    auth: AuthUser,
    ledger: web::Data<Ledger>,
) -> Result<HttpResponse, AppError> {
    ledger.check_out(auth.user_id, Utc::now()).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Check-out successful".to_string(),
    }))
}

/// Today's attendance for the caller
#[utoipa::path(
    get,
    path = "/api/today-status",
    responses(
        (
            status = 200,
            description = "Status for the current day",
            body = crate::model::attendance::TodayStatus
        ),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn today_status(
    auth: AuthUser,
    ledger: web::Data<Ledger>,
) -> Result<HttpResponse, AppError> {
    let status = ledger.today_status(auth.user_id, Utc::now()).await?;
    Ok(HttpResponse::Ok().json(status))
}

/// Recent attendance history, newest first
#[utoipa::path(
    get,
    path = "/api/attendances",
    responses(
        (
            status = 200,
            description = "Up to 30 records ordered by date descending",
            body = [crate::model::attendance::AttendanceEntry]
        ),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn attendances(
    auth: AuthUser,
    ledger: web::Data<Ledger>,
) -> Result<HttpResponse, AppError> {
    let entries = ledger.history(auth.user_id, HISTORY_LIMIT).await?;
    Ok(HttpResponse::Ok().json(entries))
}
