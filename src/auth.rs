//! Authentication and authorization: JWT bearer tokens carrying the
//! user's identity and role, argon2 password hashing, and the request
//! extractor used by role-gated handlers.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, SaltString};
use argon2::{Argon2, PasswordVerifier};
use axum::{extract::FromRequestParts, http::header, http::request::Parts};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::user::{self, AccountStatus, UserRole};
use crate::errors::ServiceError;

/// Claim structure for JWT tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub username: String,
    pub name: String,
    pub role: UserRole,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

/// Authenticated user data extracted from the bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub username: String,
    pub name: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn has_role(&self, roles: &[UserRole]) -> bool {
        roles.contains(&self.role)
    }

    /// Admin-tier check (ADMIN or SUPER_ADMIN).
    pub fn require_admin(&self) -> Result<(), ServiceError> {
        self.require_role(&[UserRole::Admin, UserRole::SuperAdmin])
    }

    pub fn require_super_admin(&self) -> Result<(), ServiceError> {
        self.require_role(&[UserRole::SuperAdmin])
    }

    pub fn require_role(&self, roles: &[UserRole]) -> Result<(), ServiceError> {
        if self.has_role(roles) {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(
                "You do not have permission to perform this action".to_string(),
            ))
        }
    }
}

/// Token issuance and verification.
#[derive(Clone)]
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_secs: u64,
}

impl AuthService {
    pub fn new(jwt_secret: &str, expiration_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            expiration_secs,
        }
    }

    pub fn issue_token(&self, user: &user::Model) -> Result<String, ServiceError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            name: user.name.clone(),
            role: user.role,
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + self.expiration_secs as i64,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::Internal(format!("failed to sign token: {}", e)))
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, ServiceError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| ServiceError::Unauthorized("Invalid or expired token".to_string()))
    }
}

/// Hashes a password with argon2 and a fresh salt.
pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| ServiceError::Internal(format!("password hashing failed: {}", e)))
}

/// Verifies a password against a stored argon2 hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ServiceError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| ServiceError::Internal(format!("stored password hash invalid: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Checks login preconditions shared by token issuance: the account must
/// exist, be active, and the password must match.
pub fn check_login(user: &user::Model, password: &str) -> Result<(), ServiceError> {
    if user.account_status != AccountStatus::Active {
        return Err(ServiceError::AccountDisabled);
    }
    if !verify_password(password, &user.password)? {
        return Err(ServiceError::InvalidCredentials);
    }
    Ok(())
}

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_service = parts
            .extensions
            .get::<Arc<AuthService>>()
            .cloned()
            .ok_or_else(|| {
                ServiceError::Internal("auth service missing from request extensions".to_string())
            })?;

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| {
                ServiceError::Unauthorized("Missing bearer token".to_string())
            })?;

        let claims = auth_service.verify_token(token)?;

        Ok(AuthenticatedUser {
            id: claims.sub,
            username: claims.username,
            name: claims.name,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_user() -> user::Model {
        user::Model {
            id: 7,
            username: "somsak".to_string(),
            email: "somsak@example.com".to_string(),
            password: hash_password("s3cret-pass").unwrap(),
            name: "Somsak T.".to_string(),
            role: UserRole::Admin,
            account_status: AccountStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn token_round_trip_preserves_identity() {
        let svc = AuthService::new("a-test-secret-that-is-long-enough-000", 3600);
        let user = sample_user();
        let token = svc.issue_token(&user).unwrap();
        let claims = svc.verify_token(&token).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.username, "somsak");
        assert_eq!(claims.role, UserRole::Admin);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let issuer = AuthService::new("a-test-secret-that-is-long-enough-000", 3600);
        let verifier = AuthService::new("a-different-secret-that-is-long-enough", 3600);
        let token = issuer.issue_token(&sample_user()).unwrap();
        assert!(verifier.verify_token(&token).is_err());
    }

    #[test]
    fn disabled_account_cannot_log_in() {
        let mut user = sample_user();
        user.account_status = AccountStatus::Disabled;
        let err = check_login(&user, "s3cret-pass").unwrap_err();
        assert!(matches!(err, ServiceError::AccountDisabled));
    }

    #[test]
    fn wrong_password_is_invalid_credentials() {
        let user = sample_user();
        let err = check_login(&user, "not-the-password").unwrap_err();
        assert!(matches!(err, ServiceError::InvalidCredentials));
    }

    #[test]
    fn role_tiers() {
        let admin = AuthenticatedUser {
            id: 1,
            username: "a".into(),
            name: "A".into(),
            role: UserRole::Admin,
        };
        assert!(admin.require_admin().is_ok());
        assert!(admin.require_super_admin().is_err());
    }
}
