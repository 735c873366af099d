use std::sync::Arc;
use std::time::Duration;

use axum::extract::{FromRef, FromRequestParts, State};
use axum::http::request::Parts;
use axum::{Json, RequestPartsExt};
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::api::error::ApiError;
use crate::config::Config;
use crate::db;
use crate::models::UserId;
use crate::state::AppState;

/// Distinguishes the two tokens in a pair. Only access tokens authenticate
/// requests; refresh tokens can only mint new access tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// The contents of a JSON Web Token issued by this service.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The user the token was issued to.
    pub sub: i64,
    /// The expiry time of the token.
    pub exp: usize,
    /// The time the token was issued.
    pub iat: usize,
    pub token_type: TokenType,
}

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct AccessToken {
    pub access: String,
}

/// The authenticated caller, resolved from the `Authorization` bearer
/// header. Rejects missing, malformed, expired and non-access tokens.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub UserId);

impl<S> FromRequestParts<S> for AuthUser
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| ApiError::InvalidToken)?;

        let state = Arc::<AppState>::from_ref(state);
        let claims = decode_token(bearer.token(), &state.config.jwt_secret)?;

        if claims.token_type != TokenType::Access {
            return Err(ApiError::InvalidToken);
        }

        Ok(AuthUser(UserId::new(claims.sub)))
    }
}

pub fn encode_token(
    user_id: UserId,
    token_type: TokenType,
    ttl: Duration,
    secret: &str,
) -> Result<String, ApiError> {
    let now = Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: user_id.as_i64(),
        exp: now + ttl.as_secs() as usize,
        iat: now,
        token_type,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        error!("Error creating token: {}", e);
        ApiError::TokenCreation
    })
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::InvalidToken)
}

pub fn issue_token_pair(user_id: UserId, config: &Config) -> Result<TokenPair, ApiError> {
    Ok(TokenPair {
        access: encode_token(
            user_id,
            TokenType::Access,
            config.access_token_ttl,
            &config.jwt_secret,
        )?,
        refresh: encode_token(
            user_id,
            TokenType::Refresh,
            config.refresh_token_ttl,
            &config.jwt_secret,
        )?,
    })
}

/// Handler for POST /api/token: verify credentials and return an access
/// and refresh token pair.
pub async fn obtain_token(
    State(state): State<Arc<AppState>>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<TokenPair>, ApiError> {
    let user = db::user::get_user_by_username(&state.db_pool, &credentials.username)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    let password_matches =
        bcrypt::verify(&credentials.password, &user.password_hash).map_err(|e| {
            error!("Error verifying password: {}", e);
            ApiError::Internal("password verification failed".to_string())
        })?;

    if !password_matches {
        return Err(ApiError::InvalidCredentials);
    }

    let pair = issue_token_pair(user.id, &state.config)?;
    info!("Issued token pair for user {}", user.id);

    Ok(Json(pair))
}

/// Handler for POST /api/token/refresh: mint a fresh access token from a
/// valid refresh token.
pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<AccessToken>, ApiError> {
    let claims = decode_token(&request.refresh, &state.config.jwt_secret)?;

    if claims.token_type != TokenType::Refresh {
        return Err(ApiError::InvalidToken);
    }

    let user_id = UserId::new(claims.sub);
    if db::user::get_user_by_id(&state.db_pool, user_id).await?.is_none() {
        return Err(ApiError::InvalidToken);
    }

    let access = encode_token(
        user_id,
        TokenType::Access,
        state.config.access_token_ttl,
        &state.config.jwt_secret,
    )?;

    Ok(Json(AccessToken { access }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn token_pair_round_trips() {
        let user_id = UserId::new(7);

        let access = encode_token(user_id, TokenType::Access, Duration::from_secs(900), SECRET)
            .expect("Failed to encode access token");
        let refresh = encode_token(user_id, TokenType::Refresh, Duration::from_secs(86_400), SECRET)
            .expect("Failed to encode refresh token");

        let access_claims = decode_token(&access, SECRET).expect("Access token should decode");
        assert_eq!(access_claims.sub, 7);
        assert_eq!(access_claims.token_type, TokenType::Access);
        assert!(access_claims.exp > access_claims.iat);

        let refresh_claims = decode_token(&refresh, SECRET).expect("Refresh token should decode");
        assert_eq!(refresh_claims.token_type, TokenType::Refresh);
    }

    #[test]
    fn rejects_expired_tokens() {
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: 7,
            exp: now - 3_600,
            iat: now - 7_200,
            token_type: TokenType::Access,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .expect("Failed to encode token");

        assert!(decode_token(&token, SECRET).is_err(), "Expired token should be rejected");
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = encode_token(
            UserId::new(7),
            TokenType::Access,
            Duration::from_secs(900),
            SECRET,
        )
        .expect("Failed to encode token");

        assert!(decode_token(&token, "other-secret").is_err());
    }

    #[test]
    fn rejects_garbage_tokens() {
        assert!(decode_token("not.a.token", SECRET).is_err());
        assert!(decode_token("", SECRET).is_err());
    }
}
