use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use shared::types::{Address, ApiResponse};

use super::{parse_amount, ApiResult, AppState, Caller};

#[derive(Debug, Deserialize)]
pub struct UpdateOwnerRequest {
    pub owner: Address,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEmissionRateRequest {
    /// 18-decimal fixed point, base units.
    pub emission_rate: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMinimumHoldingRequest {
    pub amount: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateLimitManagersRequest {
    pub limit_managers: bool,
}

#[derive(Debug, Deserialize)]
pub struct SetManagersRequest {
    pub managers: Vec<Address>,
}

#[derive(Debug, Serialize)]
pub struct ClawbackResponse {
    pub amount: String,
}

pub async fn pause(State(state): State<AppState>, Caller(caller): Caller) -> ApiResult<()> {
    state.ledger.lock().pause(caller)?;
    Ok(Json(ApiResponse::success(())))
}

pub async fn unpause(State(state): State<AppState>, Caller(caller): Caller) -> ApiResult<()> {
    state.ledger.lock().unpause(caller)?;
    Ok(Json(ApiResponse::success(())))
}

pub async fn update_owner(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(req): Json<UpdateOwnerRequest>,
) -> ApiResult<()> {
    state.ledger.lock().update_owner(caller, req.owner)?;
    Ok(Json(ApiResponse::success(())))
}

pub async fn update_emission_rate(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(req): Json<UpdateEmissionRateRequest>,
) -> ApiResult<()> {
    let rate = parse_amount("emission_rate", &req.emission_rate)?;
    state.ledger.lock().update_emission_rate(caller, rate)?;
    Ok(Json(ApiResponse::success(())))
}

pub async fn update_minimum_manager_holding(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(req): Json<UpdateMinimumHoldingRequest>,
) -> ApiResult<()> {
    let amount = parse_amount("amount", &req.amount)?;
    state.ledger.lock().update_minimum_manager_holding(caller, amount)?;
    Ok(Json(ApiResponse::success(())))
}

pub async fn update_limit_managers(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(req): Json<UpdateLimitManagersRequest>,
) -> ApiResult<()> {
    state.ledger.lock().update_limit_managers(caller, req.limit_managers)?;
    Ok(Json(ApiResponse::success(())))
}

pub async fn set_managers(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(req): Json<SetManagersRequest>,
) -> ApiResult<()> {
    state.ledger.lock().set_managers(caller, &req.managers)?;
    Ok(Json(ApiResponse::success(())))
}

pub async fn clawback_emission(State(state): State<AppState>, Caller(caller): Caller) -> ApiResult<ClawbackResponse> {
    let amount = state.ledger.lock().clawback_emission(caller)?;
    Ok(Json(ApiResponse::success(ClawbackResponse {
        amount: amount.to_string(),
    })))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::handlers::test_support::*;

    #[tokio::test]
    async fn test_admin_routes_require_owner() {
        let app = app();
        let requests = [
            ("POST", "/admin/pause", None),
            ("POST", "/admin/unpause", None),
            ("PUT", "/admin/owner", Some(json!({ "owner": CLIENT }))),
            ("PUT", "/admin/emission-rate", Some(json!({ "emission_rate": "1" }))),
            ("PUT", "/admin/minimum-manager-holding", Some(json!({ "amount": "1" }))),
            ("PUT", "/admin/limit-managers", Some(json!({ "limit_managers": false }))),
            ("PUT", "/admin/managers", Some(json!({ "managers": [CLIENT] }))),
            ("POST", "/admin/clawback", None),
        ];

        for (method, uri, body) in requests {
            let (status, response) = call(&app, method, uri, Some(CLIENT), body).await;
            assert_eq!(status, StatusCode::FORBIDDEN, "{} {}", method, uri);
            assert_eq!(response["error"]["code"], "NOT_OWNER");
        }
    }

    #[tokio::test]
    async fn test_owner_updates_parameters() {
        let app = app();

        let (status, _) = call(&app, "PUT", "/admin/emission-rate", Some(OWNER), Some(json!({ "emission_rate": "5" }))).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = call(&app, "PUT", "/admin/limit-managers", Some(OWNER), Some(json!({ "limit_managers": false }))).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = call(&app, "PUT", "/admin/managers", Some(OWNER), Some(json!({ "managers": [CLIENT, WINNER] }))).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = call(&app, "POST", "/admin/pause", Some(OWNER), None).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = call(&app, "GET", "/ledger", None, None).await;
        assert_eq!(body["data"]["emission_rate"], "5");
        assert_eq!(body["data"]["limit_managers"], false);
        assert_eq!(body["data"]["paused"], true);
        assert_eq!(body["data"]["managers"][1], WINNER);
    }

    #[tokio::test]
    async fn test_clawback_and_owner_transfer() {
        let app = app();

        let (status, body) = call(&app, "POST", "/admin/clawback", Some(OWNER), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["amount"], "100000000000000000000000");

        let (_, body) = call(&app, "GET", &format!("/assets/investment/balances/{}", LEDGER), None, None).await;
        assert_eq!(body["data"]["balance"], "0");

        let (status, _) = call(&app, "PUT", "/admin/owner", Some(OWNER), Some(json!({ "owner": CLIENT }))).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = call(&app, "POST", "/admin/pause", Some(OWNER), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = call(&app, "POST", "/admin/pause", Some(CLIENT), None).await;
        assert_eq!(status, StatusCode::OK);
    }
}
