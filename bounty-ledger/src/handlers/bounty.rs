use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use shared::types::{Address, ApiResponse, BountyId, BountyStatus};
use tracing::info;

use super::{parse_amount, ApiResult, AppState, Caller};
use crate::asset::FungibleAsset;
use crate::models::{AssetKind, Bounty};

/// Bounty as exposed over HTTP; amounts are base-unit decimal strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BountyView {
    pub id: BountyId,
    pub creator: Address,
    pub manager: Address,
    pub metadata_url: String,
    pub reward: String,
    pub commission: String,
    pub emission: String,
    pub winner: Option<Address>,
    pub status: BountyStatus,
}

impl From<&Bounty> for BountyView {
    fn from(bounty: &Bounty) -> Self {
        Self {
            id: bounty.id,
            creator: bounty.creator,
            manager: bounty.manager,
            metadata_url: bounty.metadata_url.clone(),
            reward: bounty.reward.to_string(),
            commission: bounty.commission.to_string(),
            emission: bounty.emission.to_string(),
            winner: bounty.winner(),
            status: bounty.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LedgerView {
    pub custody: Address,
    pub owner: Address,
    pub paused: bool,
    pub pause_policy: crate::models::PausePolicy,
    pub emission_rate: String,
    pub minimum_manager_holding: String,
    pub limit_managers: bool,
    /// All ten slots; unset ones are the zero address.
    pub managers: Vec<Address>,
    pub transaction_asset: AssetView,
    pub investment_asset: AssetView,
    pub bounty_count: u64,
}

#[derive(Debug, Serialize)]
pub struct AssetView {
    pub symbol: String,
    pub decimals: u32,
    pub custody_balance: String,
}

#[derive(Debug, Deserialize)]
pub struct BountyFilters {
    pub status: Option<BountyStatus>,
    pub manager: Option<Address>,
    pub creator: Option<Address>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBountyRequest {
    pub manager: Address,
    pub metadata_url: String,
    pub reward: String,
    #[serde(default)]
    pub commission: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClaimBountyRequest {
    pub winner: Address,
}

pub async fn get_ledger(State(state): State<AppState>) -> ApiResult<LedgerView> {
    let ledger = state.ledger.lock();
    let config = ledger.config()?;

    let asset_view = |kind: AssetKind| {
        let asset = config.asset(kind);
        AssetView {
            symbol: asset.symbol().to_string(),
            decimals: asset.decimals(),
            custody_balance: asset.balance_of(ledger.account()).to_string(),
        }
    };

    let view = LedgerView {
        custody: ledger.account(),
        owner: config.owner(),
        paused: config.is_paused(),
        pause_policy: ledger.pause_policy(),
        emission_rate: config.emission_rate().to_string(),
        minimum_manager_holding: config.minimum_manager_holding().to_string(),
        limit_managers: config.limit_managers(),
        managers: config.managers().slots().to_vec(),
        transaction_asset: asset_view(AssetKind::Transaction),
        investment_asset: asset_view(AssetKind::Investment),
        bounty_count: ledger.bounty_count(),
    };

    Ok(Json(ApiResponse::success(view)))
}

pub async fn list_bounties(
    State(state): State<AppState>,
    Query(filters): Query<BountyFilters>,
) -> ApiResult<Vec<BountyView>> {
    let ledger = state.ledger.lock();

    let bounties = ledger
        .bounties()
        .iter()
        .filter(|b| filters.status.map_or(true, |s| b.status == s))
        .filter(|b| filters.manager.map_or(true, |m| b.manager == m))
        .filter(|b| filters.creator.map_or(true, |c| b.creator == c))
        .map(BountyView::from)
        .collect();

    Ok(Json(ApiResponse::success(bounties)))
}

pub async fn get_bounty(State(state): State<AppState>, Path(bounty_id): Path<BountyId>) -> ApiResult<BountyView> {
    let ledger = state.ledger.lock();
    let bounty = ledger.bounty(bounty_id)?;
    Ok(Json(ApiResponse::success(BountyView::from(bounty))))
}

pub async fn create_bounty(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(req): Json<CreateBountyRequest>,
) -> ApiResult<BountyView> {
    let reward = parse_amount("reward", &req.reward)?;
    let commission = match req.commission.as_deref() {
        Some(value) => parse_amount("commission", value)?,
        None => Default::default(),
    };

    let mut ledger = state.ledger.lock();
    let id = ledger.create_bounty(caller, req.manager, req.metadata_url, reward, commission)?;
    let view = BountyView::from(ledger.bounty(id)?);

    info!(bounty_id = id, creator = ?caller, "Bounty created via API");
    Ok(Json(ApiResponse::success(view)))
}

pub async fn claim_bounty(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(bounty_id): Path<BountyId>,
    Json(req): Json<ClaimBountyRequest>,
) -> ApiResult<BountyView> {
    let mut ledger = state.ledger.lock();
    ledger.claim_bounty(caller, bounty_id, req.winner)?;
    Ok(Json(ApiResponse::success(BountyView::from(ledger.bounty(bounty_id)?))))
}

pub async fn refund_bounty(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(bounty_id): Path<BountyId>,
) -> ApiResult<BountyView> {
    let mut ledger = state.ledger.lock();
    ledger.refund_bounty(caller, bounty_id)?;
    Ok(Json(ApiResponse::success(BountyView::from(ledger.bounty(bounty_id)?))))
}
