use crate::auth::auth::AuthUser;
use crate::auth::jwt::SessionIssuer;
use crate::error::AppError;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, ResponseError,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};

/// Rejects the request with 401 unless it carries `Authorization: Bearer <token>`
/// with a valid, unexpired token.
pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let issuer = req
        .app_data::<Data<SessionIssuer>>()
        .ok_or_else(|| AppError::Internal("session issuer missing from app data".to_string()))?;

    let validated = bearer_token(&req).and_then(|token| issuer.validate(token));

    let user_id = match validated {
        Ok(user_id) => user_id,
        Err(e) => {
            tracing::debug!(path = req.path(), "Unauthenticated request");
            let resp = e.error_response();
            return Ok(req.into_response(resp));
        }
    };

    req.extensions_mut().insert(AuthUser { user_id });

    next.call(req).await
}

fn bearer_token(req: &ServiceRequest) -> Result<&str, AppError> {
    let header = req
        .headers()
        .get("Authorization")
        .ok_or(AppError::Unauthenticated("Authorization header required"))?;

    header
        .to_str()
        .ok()
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthenticated(
            "Authorization header must use the Bearer scheme",
        ))
}
