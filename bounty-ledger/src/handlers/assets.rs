//! Sandbox access to the in-memory assets, so clients can fund themselves
//! and grant the ledger an allowance.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use shared::types::{Address, ApiResponse};

use super::{parse_amount, ApiFailure, ApiResult, AppState, Caller};
use crate::asset::{FungibleAsset, InMemoryAsset};
use crate::error::LedgerError;
use crate::ledger::BountyLedger;
use crate::models::AssetKind;

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub asset: AssetKind,
    pub symbol: String,
    pub account: Address,
    pub balance: String,
}

#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    pub spender: Address,
    pub amount: String,
}

#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub to: Address,
    pub amount: String,
}

fn select(state: &AppState, asset: &str) -> Result<(AssetKind, Arc<InMemoryAsset>), ApiFailure> {
    match asset {
        "transaction" => Ok((AssetKind::Transaction, state.transaction_asset.clone())),
        "investment" => Ok((AssetKind::Investment, state.investment_asset.clone())),
        other => Err(ApiFailure::bad_request("UNKNOWN_ASSET", format!("unknown asset '{}'", other))),
    }
}

/// Custody only moves through ledger operations.
fn reject_custody(ledger: &BountyLedger, caller: Address) -> Result<(), ApiFailure> {
    if caller == ledger.account() {
        return Err(ApiFailure::forbidden(
            "CUSTODY_ACCOUNT",
            "the ledger custody account cannot act on the sandbox asset routes",
        ));
    }
    Ok(())
}

pub async fn balance_of(
    State(state): State<AppState>,
    Path((asset, account)): Path<(String, Address)>,
) -> ApiResult<BalanceResponse> {
    let (kind, token) = select(&state, &asset)?;
    Ok(Json(ApiResponse::success(BalanceResponse {
        asset: kind,
        symbol: token.symbol().to_string(),
        account,
        balance: token.balance_of(account).to_string(),
    })))
}

pub async fn approve(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(asset): Path<String>,
    Json(req): Json<ApproveRequest>,
) -> ApiResult<()> {
    let (_, token) = select(&state, &asset)?;
    let amount = parse_amount("amount", &req.amount)?;

    // Holding the ledger lock keeps asset changes ordered with ledger operations.
    let ledger = state.ledger.lock();
    reject_custody(&ledger, caller)?;
    token.approve(caller, req.spender, amount).map_err(LedgerError::from)?;
    Ok(Json(ApiResponse::success(())))
}

pub async fn transfer(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(asset): Path<String>,
    Json(req): Json<TransferRequest>,
) -> ApiResult<()> {
    let (_, token) = select(&state, &asset)?;
    let amount = parse_amount("amount", &req.amount)?;

    let ledger = state.ledger.lock();
    reject_custody(&ledger, caller)?;
    token.transfer(caller, req.to, amount).map_err(LedgerError::from)?;
    Ok(Json(ApiResponse::success(())))
}
