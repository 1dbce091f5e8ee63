use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;
use uuid::Uuid;

use crate::{error::AppError, models::Claims};

/// Issues and validates HS256 access tokens with a process-wide key.
pub struct SessionIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl SessionIssuer {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::seconds(ttl_secs),
        }
    }

    pub fn issue(&self, user_id: u64) -> Result<String, AppError> {
        self.issue_at(user_id, Utc::now())
    }

    pub fn issue_at(&self, user_id: u64, issued_at: DateTime<Utc>) -> Result<String, AppError> {
        let claims = Claims {
            user_id,
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("failed to sign token: {e}")))
    }

    /// Returns the embedded user id. Missing, malformed, forged and expired
    /// tokens are all `Unauthenticated`.
    pub fn validate(&self, token: &str) -> Result<u64, AppError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims.user_id)
            .map_err(|e| {
                debug!(error = %e, "Token rejected");
                AppError::Unauthenticated("Invalid or expired token")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn issued_token_validates_to_same_user() {
        let issuer = SessionIssuer::new(SECRET, 86_400);
        let token = issuer.issue(42).unwrap();
        assert_eq!(issuer.validate(&token).unwrap(), 42);
    }

    #[test]
    fn token_older_than_ttl_is_rejected() {
        let issuer = SessionIssuer::new(SECRET, 86_400);
        let token = issuer
            .issue_at(42, Utc::now() - Duration::hours(25))
            .unwrap();
        assert!(matches!(
            issuer.validate(&token),
            Err(AppError::Unauthenticated(_))
        ));
    }

    #[test]
    fn token_inside_ttl_is_accepted() {
        let issuer = SessionIssuer::new(SECRET, 86_400);
        let token = issuer
            .issue_at(42, Utc::now() - Duration::hours(23))
            .unwrap();
        assert_eq!(issuer.validate(&token).unwrap(), 42);
    }

    #[test]
    fn token_signed_with_other_key_is_rejected() {
        let ours = SessionIssuer::new(SECRET, 86_400);
        let theirs = SessionIssuer::new("ffffffffffffffffffffffffffffffff", 86_400);
        let token = theirs.issue(42).unwrap();
        assert!(matches!(ours.validate(&token), Err(AppError::Unauthenticated(_))));
    }

    #[test]
    fn garbage_is_rejected() {
        let issuer = SessionIssuer::new(SECRET, 86_400);
        assert!(matches!(
            issuer.validate("not.a.token"),
            Err(AppError::Unauthenticated(_))
        ));
        assert!(matches!(issuer.validate(""), Err(AppError::Unauthenticated(_))));
    }
}
