//! HTTP surface of the analytics service.

use axum::{extract::{Query, State}, http::{header::AUTHORIZATION, HeaderMap, StatusCode}, routing::{get, post}, Json, Router};
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use validator::Validate;
use crate::analytics::{aggregate, AggregationResult, BucketMode};
use crate::client::OrderClient;
use crate::config::Config;
use crate::domain::aggregates::Order;
use crate::domain::value_objects::SellerEmail;
use crate::StorefrontError;

#[derive(Clone)]
pub struct AppState { pub config: Arc<Config>, pub orders: OrderClient }

impl AppState {
    pub fn new(config: Config, orders: OrderClient) -> Self { Self { config: Arc::new(config), orders } }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "storefront-analytics"})) }))
        .route("/api/v1/analytics", post(analyze_orders))
        .route("/api/v1/reseller/analytics", get(reseller_analytics))
        .layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()).with_state(state)
}

type ApiError = (StatusCode, String);

fn reject(err: StorefrontError) -> ApiError {
    match &err {
        StorefrontError::MissingToken | StorefrontError::Unauthorized => (StatusCode::UNAUTHORIZED, err.to_string()),
        e if e.is_fetch_failure() => (StatusCode::BAD_GATEWAY, "Failed to fetch orders. Please try again.".to_string()),
        StorefrontError::InvalidEmail(_) | StorefrontError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
        StorefrontError::InvalidBucketMode(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

fn validated<T: Validate>(input: &T) -> Result<(), ApiError> {
    input.validate().map_err(|e| reject(StorefrontError::Validation(e.to_string())))
}

/// Both endpoints accept the mode in any letter case; absent means monthly.
fn parse_mode(raw: Option<&str>) -> Result<BucketMode, ApiError> {
    raw.map_or(Ok(BucketMode::default()), |raw| raw.parse().map_err(reject))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsRequest {
    #[validate(email)]
    pub reseller_email: String,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub now: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub orders: Vec<Order>,
}

/// Aggregates an order snapshot supplied by the caller.
async fn analyze_orders(State(s): State<AppState>, Json(r): Json<AnalyticsRequest>) -> Result<Json<AggregationResult>, ApiError> {
    validated(&r)?;
    let reseller = SellerEmail::new(&r.reseller_email).map_err(|e| reject(e.into()))?;
    let mode = parse_mode(r.mode.as_deref())?;
    let now = r.now.unwrap_or_else(|| s.config.now());
    Ok(Json(aggregate(&r.orders, &reseller, mode, now)))
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResellerQuery {
    #[validate(email)]
    pub email: String,
    pub mode: Option<String>,
}

/// Fetches the reseller's orders with the caller's token, then aggregates.
async fn reseller_analytics(State(s): State<AppState>, headers: HeaderMap, Query(q): Query<ResellerQuery>) -> Result<Json<AggregationResult>, ApiError> {
    let token = bearer_token(&headers).ok_or_else(|| reject(StorefrontError::MissingToken))?;
    validated(&q)?;
    let reseller = SellerEmail::new(&q.email).map_err(|e| reject(e.into()))?;
    let mode = parse_mode(q.mode.as_deref())?;
    let orders = s.orders.fetch_orders(token).await.map_err(|e| {
        tracing::warn!(error = %e, upstream = %s.orders.url(), "order fetch failed");
        reject(e)
    })?;
    let result = aggregate(&orders, &reseller, mode, s.config.now());
    tracing::info!(reseller = %reseller, mode = %mode, relevant = result.total_orders, "served reseller analytics");
    Ok(Json(result))
}
