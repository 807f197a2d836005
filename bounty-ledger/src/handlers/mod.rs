pub mod admin;
pub mod assets;
pub mod bounty;

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Query, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
    Router,
};
use parking_lot::Mutex;
use serde::Deserialize;
use shared::messaging::{EventEnvelope, EventLog};
use shared::observability::{MetricsCollector, MetricsSnapshot};
use shared::types::{parse_address, Address, ApiResponse, TokenAmount, U256};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::asset::InMemoryAsset;
use crate::bootstrap::Sandbox;
use crate::error::LedgerError;
use crate::ledger::BountyLedger;

/// Header set by the authenticating gateway.
pub const CALLER_HEADER: &str = "x-caller-address";

/// Shared application state. The mutex serializes every ledger operation.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<Mutex<BountyLedger>>,
    pub transaction_asset: Arc<InMemoryAsset>,
    pub investment_asset: Arc<InMemoryAsset>,
    pub events: Arc<EventLog>,
    pub metrics: Arc<MetricsCollector>,
}

impl From<Sandbox> for AppState {
    fn from(sandbox: Sandbox) -> Self {
        Self {
            ledger: Arc::new(Mutex::new(sandbox.ledger)),
            transaction_asset: sandbox.transaction_asset,
            investment_asset: sandbox.investment_asset,
            events: sandbox.events,
            metrics: sandbox.metrics,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_snapshot))
        .route("/events", get(list_events))
        .route("/ledger", get(bounty::get_ledger))
        // Bounty lifecycle
        .route("/bounties", get(bounty::list_bounties).post(bounty::create_bounty))
        .route("/bounties/:id", get(bounty::get_bounty))
        .route("/bounties/:id/claim", post(bounty::claim_bounty))
        .route("/bounties/:id/refund", post(bounty::refund_bounty))
        // Administration
        .route("/admin/pause", post(admin::pause))
        .route("/admin/unpause", post(admin::unpause))
        .route("/admin/owner", put(admin::update_owner))
        .route("/admin/emission-rate", put(admin::update_emission_rate))
        .route("/admin/minimum-manager-holding", put(admin::update_minimum_manager_holding))
        .route("/admin/limit-managers", put(admin::update_limit_managers))
        .route("/admin/managers", put(admin::set_managers))
        .route("/admin/clawback", post(admin::clawback_emission))
        // Sandbox assets
        .route("/assets/:asset/balances/:account", get(assets::balance_of))
        .route("/assets/:asset/approve", post(assets::approve))
        .route("/assets/:asset/transfer", post(assets::transfer))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

async fn health_check() -> Json<ApiResponse<HashMap<String, String>>> {
    let mut status = HashMap::new();
    status.insert("service".to_string(), "bounty-ledger".to_string());
    status.insert("status".to_string(), "healthy".to_string());
    status.insert("version".to_string(), env!("CARGO_PKG_VERSION").to_string());

    Json(ApiResponse::success(status))
}

async fn metrics_snapshot(State(state): State<AppState>) -> Json<ApiResponse<MetricsSnapshot>> {
    Json(ApiResponse::success(state.metrics.snapshot()))
}

#[derive(Debug, Deserialize)]
pub struct EventQuery {
    pub since: Option<u64>,
}

async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventQuery>,
) -> Json<ApiResponse<Vec<EventEnvelope>>> {
    Json(ApiResponse::success(state.events.since(query.since.unwrap_or(0))))
}

/// Error rendered as an `ApiResponse` failure envelope.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    body: ApiResponse<()>,
}

impl ApiFailure {
    pub fn bad_request(code: &str, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ApiResponse::failure(code, message),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            body: ApiResponse::failure("MISSING_CALLER", message),
        }
    }

    pub fn forbidden(code: &str, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            body: ApiResponse::failure(code, message),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<LedgerError> for ApiFailure {
    fn from(err: LedgerError) -> Self {
        let status = StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self {
            status,
            body: ApiResponse::failure(err.code(), err.to_string()).with_detail("category", err.category().to_string()),
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiFailure>;

/// Authenticated account taken from the gateway header.
#[derive(Debug, Clone, Copy)]
pub struct Caller(pub Address);

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiFailure;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(CALLER_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiFailure::unauthorized(format!("missing {} header", CALLER_HEADER)))?;

        parse_address(value)
            .map(Caller)
            .map_err(|e| ApiFailure::bad_request("INVALID_CALLER", e.to_string()))
    }
}

/// Parses a base-unit amount given as a decimal string.
pub(crate) fn parse_amount(field: &str, value: &str) -> Result<TokenAmount, ApiFailure> {
    U256::from_dec_str(value.trim())
        .map_err(|_| ApiFailure::bad_request("INVALID_AMOUNT", format!("{} must be a base-unit integer", field)))
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::{create_router, AppState, CALLER_HEADER};
    use crate::bootstrap::build_sandbox;
    use crate::config::Config;

    pub const OWNER: &str = "0x1000000000000000000000000000000000000001";
    pub const LEDGER: &str = "0x2000000000000000000000000000000000000002";
    pub const MANAGER: &str = "0x3000000000000000000000000000000000000003";
    pub const CLIENT: &str = "0x4000000000000000000000000000000000000004";
    pub const WINNER: &str = "0x5000000000000000000000000000000000000005";

    pub fn app() -> Router {
        let sandbox = build_sandbox(&Config::default()).unwrap();
        create_router(AppState::from(sandbox))
    }

    pub async fn call(app: &Router, method: &str, uri: &str, caller: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(caller) = caller {
            request = request.header(CALLER_HEADER, caller);
        }
        let body = match body {
            Some(json) => {
                request = request.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_health_check() {
        let app = app();
        let (status, body) = call(&app, "GET", "/health", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["service"], "bounty-ledger");
    }

    #[tokio::test]
    async fn test_missing_caller_is_unauthorized() {
        let app = app();
        let (status, body) = call(&app, "POST", "/admin/pause", None, None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "MISSING_CALLER");
    }

    #[tokio::test]
    async fn test_malformed_caller_is_rejected() {
        let app = app();
        let (status, body) = call(&app, "POST", "/admin/pause", Some("0xnothex"), None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_CALLER");
    }

    #[tokio::test]
    async fn test_events_and_metrics_endpoints() {
        let app = app();

        let (status, body) = call(&app, "GET", "/events", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["event_type"], "Initialized");

        let (_, body) = call(&app, "GET", "/events?since=1", None, None).await;
        assert_eq!(body["data"].as_array().map(|a| a.len()), Some(0));

        call(&app, "POST", "/admin/pause", Some(CLIENT), None).await;
        let (status, body) = call(&app, "GET", "/metrics", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["counters"]["ledger_rejections_total"], 1);
    }
}
