use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::user::UserProfile;

#[derive(Deserialize, ToSchema)]
pub struct RegisterReq {
    #[schema(example = "Alice")]
    pub name: String,
    #[schema(example = "alice@x.com", format = "email", value_type = String)]
    pub email: String,
    #[schema(example = "pw123")]
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "alice@x.com", format = "email", value_type = String)]
    pub email: String,
    #[schema(example = "pw123")]
    pub password: String,
}

/// Returned by both register and login.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    #[schema(example = "Login successful")]
    pub message: String,
    pub token: String,
    pub user: UserProfile,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct CheckInResponse {
    #[schema(example = "Check-in successful")]
    pub message: String,
    #[schema(example = 1)]
    pub id: u64,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Check-out successful")]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}
