use crate::model::attendance::{Attendance, AttendanceEntry, TodayStatus};
use crate::model::user::UserProfile;
use crate::models::{AuthResponse, CheckInResponse, LoginReqDto, MessageResponse, RegisterReq};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Absensi API",
        version = "1.0.0",
        description = r#"
## Attendance Tracker

Employees register, log in, and record one check-in and one check-out per
calendar day (UTC).

### Security
Attendance endpoints require a **JWT Bearer** token obtained from
`/api/register` or `/api/login`. Tokens expire after 24 hours.

### Response Format
- JSON bodies
- Errors are `{"error": "..."}`; validation errors add `details`
"#,
    ),
    paths(
        crate::auth::handlers::register,
        crate::auth::handlers::login,

        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::today_status,
        crate::api::attendance::attendances
    ),
    components(
        schemas(
            RegisterReq,
            LoginReqDto,
            AuthResponse,
            UserProfile,
            CheckInResponse,
            MessageResponse,
            Attendance,
            AttendanceEntry,
            TodayStatus
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration and login"),
        (name = "Attendance", description = "Daily check-in / check-out"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
