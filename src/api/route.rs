use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::api::error::ApiError;
use crate::api::response::with_total_count;
use crate::auth::{self, AuthUser};
use crate::db;
use crate::models::{AnalyticsResponse, NewTransaction, Transaction, UserResponse};
use crate::state::AppState;
use crate::validation;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct NewTransactionRequest {
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TransactionsQuery {
    pub offset: Option<String>,
    pub limit: Option<String>,
}

// Create router with all routes
pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/register", post(register))
        .route("/api/token", post(auth::obtain_token))
        .route("/api/token/refresh", post(auth::refresh_token))
        .route(
            "/api/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route("/api/analytics", get(get_analytics))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

fn map_registration_error(e: sqlx::Error) -> ApiError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return ApiError::BadRequest(
                "A user with that username or email already exists".to_string(),
            );
        }
    }

    ApiError::Database(e)
}

/// Handler for POST /api/register
async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    validation::validate_username(&payload.username)?;
    validation::validate_email(&payload.email)?;
    validation::validate_password(&payload.password)?;

    let password_hash =
        bcrypt::hash(&payload.password, state.config.bcrypt_cost).map_err(|e| {
            tracing::error!("Error hashing password: {}", e);
            ApiError::Internal("password hashing failed".to_string())
        })?;

    let user = db::user::create_user(&state.db_pool, &payload.username, &payload.email, &password_hash)
        .await
        .map_err(map_registration_error)?;

    info!("Registered user {} ({})", user.id, user.username);

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Handler for POST /api/transactions
async fn create_transaction(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<NewTransactionRequest>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    validation::validate_amount(payload.amount)?;
    let kind = validation::parse_kind(&payload.kind)?;
    let category = validation::parse_category(payload.category.as_deref())?;
    validation::validate_description(payload.description.as_deref())?;

    let new = NewTransaction {
        amount: payload.amount,
        kind,
        category,
        description: payload.description,
    };

    // Persist first, then invalidate, then respond. Swapping the first two
    // would let a racing reader re-cache the pre-write balance.
    let transaction = state.store.insert(user.0, new).await?;
    state.analytics.on_transaction_created(user.0, &transaction).await;

    info!(
        "Recorded {} transaction {} for user {}",
        transaction.kind, transaction.id, user.0
    );

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// Handler for GET /api/transactions
async fn list_transactions(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<TransactionsQuery>,
) -> Result<Response, ApiError> {
    let offset = validation::validate_offset(query.offset.as_deref())?;
    let limit = validation::validate_limit(query.limit.as_deref())?;

    let (transactions, total_count) = state.store.list(user.0, offset, limit).await?;

    Ok(with_total_count(transactions, total_count))
}

/// Handler for GET /api/analytics
async fn get_analytics(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<AnalyticsResponse>, ApiError> {
    let summary = state.analytics.get_or_compute(user.0).await?;
    let last_activity = state.analytics.last_activity(user.0).await;

    Ok(Json(AnalyticsResponse {
        balance: summary.balance,
        transaction_count: summary.transaction_count,
        last_activity,
    }))
}
