//! Assembles a sandbox ledger from configuration: two in-memory assets with
//! their genesis allocations, a funded emission reserve and an initialized
//! ledger wired to the event log and metrics.

use std::sync::Arc;

use anyhow::{Context, Result};
use shared::messaging::EventLog;
use shared::observability::MetricsCollector;
use tracing::info;

use crate::asset::{AssetHandle, InMemoryAsset};
use crate::config::{AssetConfig, Config};
use crate::ledger::{BountyLedger, InitParams};

pub struct Sandbox {
    pub ledger: BountyLedger,
    pub transaction_asset: Arc<InMemoryAsset>,
    pub investment_asset: Arc<InMemoryAsset>,
    pub events: Arc<EventLog>,
    pub metrics: Arc<MetricsCollector>,
}

fn build_asset(config: &AssetConfig) -> Result<Arc<InMemoryAsset>> {
    let asset = InMemoryAsset::new(&config.name, &config.symbol, config.decimals);

    for (account, amount) in config.genesis_allocations()? {
        asset
            .mint(account, amount)
            .with_context(|| format!("genesis allocation of {} to {:?}", config.symbol, account))?;
    }

    info!(
        symbol = %config.symbol,
        decimals = config.decimals,
        supply = %asset.total_supply(),
        "Asset ready"
    );
    Ok(Arc::new(asset))
}

pub fn build_sandbox(config: &Config) -> Result<Sandbox> {
    config.validate().context("invalid configuration")?;

    let account = config.ledger.account()?;
    let owner = config.ledger.owner()?;

    let transaction_asset = build_asset(&config.assets.transaction)?;
    let investment_asset = build_asset(&config.assets.investment)?;

    let reserve = config.assets.emission_reserve_units()?;
    investment_asset
        .mint(account, reserve)
        .context("funding emission reserve")?;

    let events = Arc::new(EventLog::new());
    let metrics = Arc::new(MetricsCollector::new());

    let mut ledger = BountyLedger::new(account)
        .with_pause_policy(config.ledger.pause_policy)
        .with_publisher(events.clone())
        .with_metrics(metrics.clone());

    let tx_handle: AssetHandle = transaction_asset.clone();
    let inv_handle: AssetHandle = investment_asset.clone();
    ledger
        .initialize(
            owner,
            InitParams {
                transaction_asset: tx_handle,
                investment_asset: inv_handle,
                emission_rate: config.ledger.emission_rate_fixed()?,
                minimum_manager_holding: config
                    .ledger
                    .minimum_manager_holding_units(config.assets.investment.decimals)?,
                managers: config.ledger.manager_addresses()?,
            },
        )
        .context("initializing ledger")?;

    if !config.ledger.limit_managers {
        ledger.update_limit_managers(owner, false)?;
    }

    info!(
        custody = ?account,
        owner = ?owner,
        reserve = %reserve,
        pause_policy = ?config.ledger.pause_policy,
        "Sandbox ledger ready"
    );

    Ok(Sandbox {
        ledger,
        transaction_asset,
        investment_asset,
        events,
        metrics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::FungibleAsset;
    use crate::models::PausePolicy;
    use shared::types::{scale_factor, U256};

    #[test]
    fn test_default_sandbox() {
        let config = Config::default();
        let sandbox = build_sandbox(&config).unwrap();

        let account = config.ledger.account().unwrap();
        let owner = config.ledger.owner().unwrap();

        assert_eq!(sandbox.ledger.owner().unwrap(), owner);
        assert!(sandbox.ledger.limit_managers().unwrap());
        assert_eq!(sandbox.ledger.emission_rate().unwrap(), U256::from(10u64) * scale_factor(18));
        assert_eq!(
            sandbox.investment_asset.balance_of(account),
            U256::from(100_000u64) * scale_factor(18)
        );
        assert_eq!(
            sandbox.transaction_asset.balance_of(owner),
            U256::from(1_000_000u64) * scale_factor(9)
        );
        assert_eq!(sandbox.events.len(), 1);
    }

    #[test]
    fn test_open_market_sandbox() {
        let mut config = Config::default();
        config.ledger.limit_managers = false;
        config.ledger.pause_policy = PausePolicy::AllLifecycle;

        let sandbox = build_sandbox(&config).unwrap();
        assert!(!sandbox.ledger.limit_managers().unwrap());
        assert_eq!(sandbox.ledger.pause_policy(), PausePolicy::AllLifecycle);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = Config::default();
        config.ledger.emission_rate = "-3".to_string();
        assert!(build_sandbox(&config).is_err());
    }
}
