use actix_web::web;
use std::sync::Arc;
use tracing::{error, info};

use crate::{
    auth::password::Hasher,
    error::AppError,
    model::user::User,
    store::{StoreError, UserStore},
};

/// Column width of `users.name` and `users.email`, in characters.
const MAX_FIELD_LEN: usize = 100;

/// Registration and password login over a [`UserStore`].
pub struct Credentials {
    store: Arc<dyn UserStore>,
    hasher: Hasher,
}

impl Credentials {
    pub fn new(store: Arc<dyn UserStore>, hasher: Hasher) -> Self {
        Self { store, hasher }
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        let name = name.trim();
        let email = email.trim();

        if name.is_empty() {
            return Err(AppError::validation("name", "must not be empty"));
        }
        check_length("name", name)?;
        validate_email(email)?;
        check_length("email", email)?;
        if password.is_empty() {
            return Err(AppError::validation("password", "must not be empty"));
        }

        let hasher = self.hasher.clone();
        let password = password.to_owned();
        let hashed = web::block(move || hasher.hash_password(&password))
            .await
            .map_err(|e| AppError::Internal(format!("hashing task failed: {e}")))?
            .map_err(|e| AppError::Internal(format!("failed to hash password: {e}")))?;

        match self.store.insert_user(name, email, &hashed).await {
            Ok(user) => {
                info!(user_id = user.id, "User registered");
                Ok(user)
            }
            Err(StoreError::Duplicate) => Err(AppError::DuplicateEmail),
            Err(e) => Err(e.into()),
        }
    }

    /// Unknown email and wrong password fail the same way.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AppError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AppError::validation("email", "must not be empty"));
        }
        if password.is_empty() {
            return Err(AppError::validation("password", "must not be empty"));
        }

        let found = self.store.find_user_by_email(email).await?;

        let hasher = self.hasher.clone();
        let password = password.to_owned();

        let Some(user) = found else {
            let _ = web::block(move || hasher.verify_dummy(&password)).await;
            info!("Invalid credentials: user not found");
            return Err(AppError::InvalidCredentials);
        };

        let stored = user.password_hash.clone();
        let verified = web::block(move || hasher.verify_password(&password, &stored))
            .await
            .map_err(|e| AppError::Internal(format!("verification task failed: {e}")))?;

        match verified {
            Ok(true) => Ok(user),
            Ok(false) => {
                info!(user_id = user.id, "Invalid credentials: password mismatch");
                Err(AppError::InvalidCredentials)
            }
            Err(e) => {
                error!(user_id = user.id, error = %e, "Stored password hash is malformed");
                Err(AppError::InvalidCredentials)
            }
        }
    }
}

fn check_length(field: &str, value: &str) -> Result<(), AppError> {
    if value.chars().count() > MAX_FIELD_LEN {
        return Err(AppError::validation(
            field,
            format!("must be at most {MAX_FIELD_LEN} characters"),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), AppError> {
    if email.is_empty() {
        return Err(AppError::validation("email", "must not be empty"));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(AppError::validation("email", "must be a valid email address")),
    }
}
