use crate::{
    auth::{credentials::Credentials, jwt::SessionIssuer},
    error::AppError,
    model::user::UserProfile,
    models::{AuthResponse, LoginReqDto, RegisterReq},
};
use actix_web::{HttpResponse, web};
use tracing::{info, instrument};

/// User registration handler
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterReq,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (
            status = 400,
            description = "Validation failed or email already exists",
            body = Object,
            example = json!({ "error": "Email already exists" })
        ),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_register",
    skip(payload, credentials, sessions),
    fields(email = %payload.email)
)]
pub async fn register(
    payload: web::Json<RegisterReq>,
    credentials: web::Data<Credentials>,
    sessions: web::Data<SessionIssuer>,
) -> Result<HttpResponse, AppError> {
    let user = credentials
        .register(&payload.name, &payload.email, &payload.password)
        .await?;

    let token = sessions.issue(user.id)?;

    Ok(HttpResponse::Created().json(AuthResponse {
        message: "User registered successfully".to_string(),
        token,
        user: UserProfile::from(&user),
    }))
}

/// Password login handler
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Invalid credentials", body = Object, example = json!({
            "error": "Invalid credentials"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(payload, credentials, sessions),
    fields(email = %payload.email)
)]
pub async fn login(
    payload: web::Json<LoginReqDto>,
    credentials: web::Data<Credentials>,
    sessions: web::Data<SessionIssuer>,
) -> Result<HttpResponse, AppError> {
    info!("Login request received");

    let user = credentials
        .authenticate(&payload.email, &payload.password)
        .await?;

    let token = sessions.issue(user.id)?;

    info!(user_id = user.id, "Login successful");

    Ok(HttpResponse::Ok().json(AuthResponse {
        message: "Login successful".to_string(),
        token,
        user: UserProfile::from(&user),
    }))
}
