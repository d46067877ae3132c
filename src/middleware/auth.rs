use axum::{extract::FromRequestParts, http::header};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::{config, dto::auth::Claims, entity, error::AppError};

/// Fixed token lifetime.
const TOKEN_TTL_HOURS: i64 = 1;

/// Authenticated principal extracted from a bearer token.
///
/// A missing header and an invalid or expired token both reject with 401;
/// 403 is reserved for the role check in [`AdminUser`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub username: String,
    pub role: String,
}

/// Role-gated principal: composes [`AuthUser`] with the admin check so routes
/// declare their requirement with a single extractor argument.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

pub fn ensure_role(user: &AuthUser, role: &str) -> Result<(), AppError> {
    if user.role != role {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

/// Sign a 1-hour bearer token for the given user.
pub fn issue_token(
    user: &entity::users::Model,
    secret: &[u8],
) -> Result<String, jsonwebtoken::errors::Error> {
    let exp = (Utc::now() + Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize;
    let claims = Claims {
        sub: user.id.to_string(),
        username: user.username.clone(),
        role: user.role.clone(),
        exp,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret))
}

/// Verify signature and expiry, returning the embedded claims.
pub fn decode_claims(
    token: &str,
    secret: &[u8],
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("no token provided".into()))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("invalid authorization header".into()))?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("invalid authorization scheme".into()))?
            .trim();

        let secret = config::jwt_secret()?;

        let claims = decode_claims(token, secret.as_bytes())
            .map_err(|_| AppError::Unauthorized("invalid or expired token".into()))?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("invalid user id in token".into()))?;

        Ok(AuthUser {
            user_id,
            username: claims.username,
            role: claims.role,
        })
    }
}

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        ensure_role(&user, "admin")?;
        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::entity::prelude::DateTimeWithTimeZone;

    const SECRET: &[u8] = b"test-secret";

    fn sample_user(role: &str) -> entity::users::Model {
        let now: DateTimeWithTimeZone = Utc::now().into();
        entity::users::Model {
            id: Uuid::new_v4(),
            name: "Sample User".into(),
            username: "sample".into(),
            email: "sample@example.com".into(),
            address: None,
            phone: None,
            password_hash: "irrelevant".into(),
            role: role.into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn token_round_trip_preserves_identity_and_role() {
        let user = sample_user("admin");
        let token = issue_token(&user, SECRET).unwrap();

        let claims = decode_claims(&token, SECRET).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.username, "sample");
        assert_eq!(claims.role, "admin");
        assert!(claims.exp > Utc::now().timestamp() as usize);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let user = sample_user("user");
        let token = issue_token(&user, b"other-secret").unwrap();

        assert!(decode_claims(&token, SECRET).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let user = sample_user("user");
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role.clone(),
            // Two hours in the past, safely beyond the default leeway.
            exp: (Utc::now() - Duration::hours(2)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert!(decode_claims(&token, SECRET).is_err());
    }

    #[test]
    fn role_check_distinguishes_wrong_role_from_missing_token() {
        let user = AuthUser {
            user_id: Uuid::new_v4(),
            username: "shopper".into(),
            role: "user".into(),
        };
        match ensure_role(&user, "admin") {
            Err(AppError::Forbidden) => {}
            other => panic!("expected Forbidden, got {other:?}"),
        }
        assert!(ensure_role(&user, "user").is_ok());
    }
}
