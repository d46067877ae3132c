use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::{
    config,
    dto::auth::{LoginRequest, LoginResponse, RegisterRequest},
    entity::{Users, users},
    error::{AppError, AppResult},
    middleware::auth::issue_token,
    models::UserProfile,
    state::AppState,
};

pub async fn register_user(state: &AppState, payload: RegisterRequest) -> AppResult<UserProfile> {
    let fields = validate_registration(&payload)?;

    let existing = Users::find()
        .filter(users::Column::Email.eq(fields.email.as_str()))
        .one(&state.orm)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("email already in use".into()));
    }

    let password_hash = hash_password(&fields.password)?;

    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(fields.name),
        username: Set(fields.username),
        email: Set(fields.email),
        address: Set(payload.address),
        phone: Set(payload.phone),
        password_hash: Set(password_hash),
        role: Set("user".to_string()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok(user.into())
}

pub async fn login_user(state: &AppState, payload: LoginRequest) -> AppResult<LoginResponse> {
    let user = Users::find()
        .filter(users::Column::Email.eq(payload.email.as_str()))
        .one(&state.orm)
        .await?;

    // Unknown email and wrong password fail identically so the endpoint
    // cannot be used to enumerate accounts.
    let user = user.ok_or_else(invalid_credentials)?;
    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(invalid_credentials());
    }

    let secret = config::jwt_secret()?;
    let token = issue_token(&user, secret.as_bytes())
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    tracing::info!(user_id = %user.id, "user logged in");
    Ok(LoginResponse {
        token,
        user: user.into(),
    })
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("invalid credentials".into())
}

/// Argon2 hash with a fresh per-user random salt.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, stored_hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

struct RegistrationFields {
    name: String,
    username: String,
    email: String,
    password: String,
}

fn validate_registration(payload: &RegisterRequest) -> Result<RegistrationFields, AppError> {
    let required = |value: &Option<String>, field: &str| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
            .ok_or_else(|| AppError::BadRequest(format!("{field} is required")))
    };

    Ok(RegistrationFields {
        name: required(&payload.name, "name")?,
        username: required(&payload.username, "username")?,
        email: required(&payload.email, "email")?,
        password: payload
            .password
            .clone()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::BadRequest("password is required".into()))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trip() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &hash).unwrap());
        assert!(!verify_password("hunter3", &hash).unwrap());
    }

    #[test]
    fn salts_differ_between_hashes() {
        let first = hash_password("same-password").unwrap();
        let second = hash_password("same-password").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn registration_requires_core_fields() {
        let payload = RegisterRequest {
            name: Some("Ada".into()),
            username: Some("ada".into()),
            email: Some("ada@example.com".into()),
            address: None,
            phone: None,
            password: Some("lovelace".into()),
        };
        assert!(validate_registration(&payload).is_ok());

        let missing_email = RegisterRequest {
            email: None,
            ..clone_request(&payload)
        };
        assert!(validate_registration(&missing_email).is_err());

        let blank_username = RegisterRequest {
            username: Some("   ".into()),
            ..clone_request(&payload)
        };
        assert!(validate_registration(&blank_username).is_err());
    }

    fn clone_request(payload: &RegisterRequest) -> RegisterRequest {
        RegisterRequest {
            name: payload.name.clone(),
            username: payload.username.clone(),
            email: payload.email.clone(),
            address: payload.address.clone(),
            phone: payload.phone.clone(),
            password: payload.password.clone(),
        }
    }
}
