//! The bounty ledger: lifecycle operations, the administrative surface and
//! read accessors over one custody account.
//!
//! Every mutating operation validates first, then runs its settlement plan,
//! and only then writes ledger state and publishes events. A rejected call
//! leaves balances, bounties and configuration untouched.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use shared::messaging::{
    BountyClaimedEvent, BountyCreatedEvent, BountyRefundedEvent, EmissionClawedBackEvent, EmissionRateUpdatedEvent,
    EventPublisher, InitializedEvent, LedgerEvent, LimitManagersUpdatedEvent, ManagersUpdatedEvent,
    MinimumManagerHoldingUpdatedEvent, NoopPublisher, OwnerUpdatedEvent, PauseChangedEvent,
};
use shared::observability::{metric_names, MetricsCollector};
use shared::types::{Address, BountyId, BountyStatus, TokenAmount, MANAGER_SLOTS};
use tracing::{info, warn};

use crate::asset::{AssetHandle, FungibleAsset};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{AssetKind, Bounty, LedgerConfig, ManagerList, PausePolicy};
use crate::services::{eligibility, emission, SettlementPlan};

/// One-time initialization arguments.
pub struct InitParams {
    pub transaction_asset: AssetHandle,
    pub investment_asset: AssetHandle,
    /// Fixed point, 18 decimals.
    pub emission_rate: TokenAmount,
    /// Investment-asset base units.
    pub minimum_manager_holding: TokenAmount,
    pub managers: Vec<Address>,
}

pub struct BountyLedger {
    account: Address,
    initialized: AtomicBool,
    config: Option<LedgerConfig>,
    bounties: Vec<Bounty>,
    pause_policy: PausePolicy,
    publisher: Arc<dyn EventPublisher>,
    metrics: Arc<MetricsCollector>,
}

impl BountyLedger {
    /// Uninitialized ledger holding custody under `account`.
    pub fn new(account: Address) -> Self {
        Self {
            account,
            initialized: AtomicBool::new(false),
            config: None,
            bounties: Vec::new(),
            pause_policy: PausePolicy::default(),
            publisher: Arc::new(NoopPublisher),
            metrics: Arc::new(MetricsCollector::new()),
        }
    }

    pub fn with_pause_policy(mut self, policy: PausePolicy) -> Self {
        self.pause_policy = policy;
        self
    }

    pub fn with_publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.publisher = publisher;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Installs assets and parameters; the caller becomes owner. Succeeds once.
    pub fn initialize(&mut self, caller: Address, params: InitParams) -> LedgerResult<()> {
        self.run("initialize", caller, |ledger| {
            if ledger.initialized.load(Ordering::SeqCst) {
                return Err(LedgerError::AlreadyInitialized);
            }
            if caller.is_zero() {
                return Err(LedgerError::InvalidAddress("owner"));
            }
            if same_asset(&params.transaction_asset, &params.investment_asset) {
                return Err(LedgerError::InvalidAddress("investment_asset"));
            }
            let managers = ManagerList::from_slice(&params.managers)?;

            ledger
                .initialized
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .map_err(|_| LedgerError::AlreadyInitialized)?;

            let event = InitializedEvent {
                owner: caller,
                transaction_asset: params.transaction_asset.symbol().to_string(),
                investment_asset: params.investment_asset.symbol().to_string(),
                emission_rate: params.emission_rate,
                minimum_manager_holding: params.minimum_manager_holding,
            };

            ledger.config = Some(LedgerConfig::new(
                caller,
                params.transaction_asset,
                params.investment_asset,
                params.emission_rate,
                params.minimum_manager_holding,
                managers,
            ));

            info!(
                owner = ?caller,
                custody = ?ledger.account,
                emission_rate = %event.emission_rate,
                managers = managers.active_count(),
                "Ledger initialized"
            );
            ledger.publisher.publish(LedgerEvent::Initialized(event));
            Ok(())
        })
    }

    // Bounty lifecycle

    /// Escrows `reward + commission` from the caller and records a new bounty.
    pub fn create_bounty(
        &mut self,
        caller: Address,
        manager: Address,
        metadata_url: impl Into<String>,
        reward: TokenAmount,
        commission: TokenAmount,
    ) -> LedgerResult<BountyId> {
        let metadata_url = metadata_url.into();

        self.run("create_bounty", caller, |ledger| {
            let config = ledger.config()?;

            if config.is_paused() {
                return Err(LedgerError::ContractPaused);
            }
            if reward.is_zero() {
                return Err(LedgerError::NotEnoughReward);
            }
            if config.emission_rate().is_zero() {
                return Err(LedgerError::NotEnoughEmission);
            }

            let escrow = reward.checked_add(commission).ok_or(LedgerError::AmountOverflow)?;
            let emission = emission::compute_emission(
                reward,
                config.emission_rate(),
                config.transaction_asset().decimals(),
            )?;
            // The reserve must cover this bounty's emission at creation time.
            if emission > config.investment_asset().balance_of(ledger.account) {
                return Err(LedgerError::NotEnoughEmission);
            }
            eligibility::check(config, manager)?;

            SettlementPlan::new(ledger.account)
                .pull(AssetKind::Transaction, caller, escrow)
                .execute(config)?;

            let id = ledger.bounties.len() as BountyId;
            ledger.bounties.push(Bounty::new(
                id,
                caller,
                manager,
                metadata_url.clone(),
                reward,
                commission,
                emission,
            ));

            ledger.metrics.increment_counter(metric_names::BOUNTIES_CREATED_TOTAL, 1);
            ledger.metrics.increment_gauge(metric_names::BOUNTIES_ACTIVE);
            info!(
                bounty_id = id,
                creator = ?caller,
                manager = ?manager,
                %reward,
                %commission,
                %emission,
                "Bounty created"
            );
            ledger.publisher.publish(LedgerEvent::BountyCreated(BountyCreatedEvent {
                bounty_id: id,
                creator: caller,
                manager,
                metadata_url,
                reward,
                commission,
                emission,
            }));

            Ok(id)
        })
    }

    /// Pays the reward to `winner`, the commission to the manager and the
    /// emission to the creator. Only the bounty's manager may call this.
    pub fn claim_bounty(&mut self, caller: Address, bounty_id: BountyId, winner: Address) -> LedgerResult<()> {
        self.run("claim_bounty", caller, |ledger| {
            let (index, status) = ledger.settleable(caller, bounty_id, BountyStatus::Claimed)?;
            if winner.is_zero() || winner == ledger.account {
                return Err(LedgerError::InvalidAddress("winner"));
            }

            let config = ledger.config()?;
            let bounty = &ledger.bounties[index];
            SettlementPlan::new(ledger.account)
                .pay(AssetKind::Transaction, winner, bounty.reward)
                .pay(AssetKind::Transaction, bounty.manager, bounty.commission)
                .pay(AssetKind::Investment, bounty.creator, bounty.emission)
                .execute(config)?;

            let bounty = &mut ledger.bounties[index];
            bounty.winner = winner;
            bounty.status = status;
            let (reward, emission) = (bounty.reward, bounty.emission);

            ledger.metrics.increment_counter(metric_names::BOUNTIES_CLAIMED_TOTAL, 1);
            ledger.metrics.decrement_gauge(metric_names::BOUNTIES_ACTIVE);
            info!(bounty_id, winner = ?winner, %reward, %emission, "Bounty claimed");
            ledger
                .publisher
                .publish(LedgerEvent::BountyClaimed(BountyClaimedEvent { bounty_id, winner }));
            Ok(())
        })
    }

    /// Returns the reward to the creator and pays the commission to the
    /// manager. No emission is paid. Only the bounty's manager may call this.
    pub fn refund_bounty(&mut self, caller: Address, bounty_id: BountyId) -> LedgerResult<()> {
        self.run("refund_bounty", caller, |ledger| {
            let (index, status) = ledger.settleable(caller, bounty_id, BountyStatus::Refunded)?;

            let config = ledger.config()?;
            let bounty = &ledger.bounties[index];
            SettlementPlan::new(ledger.account)
                .pay(AssetKind::Transaction, bounty.manager, bounty.commission)
                .pay(AssetKind::Transaction, bounty.creator, bounty.reward)
                .execute(config)?;

            let bounty = &mut ledger.bounties[index];
            bounty.status = status;
            let reward = bounty.reward;

            ledger.metrics.increment_counter(metric_names::BOUNTIES_REFUNDED_TOTAL, 1);
            ledger.metrics.decrement_gauge(metric_names::BOUNTIES_ACTIVE);
            info!(bounty_id, %reward, "Bounty refunded");
            ledger
                .publisher
                .publish(LedgerEvent::BountyRefunded(BountyRefundedEvent { bounty_id }));
            Ok(())
        })
    }

    /// Existence, then manager, then status. Returns the bounty's index and
    /// the status it moves to.
    fn settleable(
        &self,
        caller: Address,
        bounty_id: BountyId,
        next: BountyStatus,
    ) -> LedgerResult<(usize, BountyStatus)> {
        let config = self.config()?;
        if config.is_paused() && self.pause_policy.blocks_settlement() {
            return Err(LedgerError::ContractPaused);
        }

        let index = usize::try_from(bounty_id).map_err(|_| LedgerError::BountyNotFound(bounty_id))?;
        let bounty = self.bounties.get(index).ok_or(LedgerError::BountyNotFound(bounty_id))?;

        if bounty.manager != caller {
            return Err(LedgerError::NotManager { bounty_id, caller });
        }

        let status = bounty.status.transition_to(next).map_err(|_| match (bounty.status, next) {
            (BountyStatus::Claimed, BountyStatus::Claimed) => LedgerError::AlreadyClaimed(bounty_id),
            (status, _) => LedgerError::NotActive { bounty_id, status },
        })?;

        Ok((index, status))
    }

    // Administration

    pub fn update_owner(&mut self, caller: Address, new_owner: Address) -> LedgerResult<()> {
        self.run("update_owner", caller, |ledger| {
            let config = ledger.owner_config(caller)?;
            if new_owner.is_zero() {
                return Err(LedgerError::InvalidAddress("owner"));
            }
            config.set_owner(new_owner);

            info!(previous_owner = ?caller, new_owner = ?new_owner, "Owner updated");
            ledger.publisher.publish(LedgerEvent::OwnerUpdated(OwnerUpdatedEvent {
                previous_owner: caller,
                new_owner,
            }));
            Ok(())
        })
    }

    pub fn pause(&mut self, caller: Address) -> LedgerResult<()> {
        self.run("pause", caller, |ledger| {
            ledger.owner_config(caller)?.set_paused(true);

            info!(by = ?caller, policy = ?ledger.pause_policy, "Ledger paused");
            ledger
                .publisher
                .publish(LedgerEvent::Paused(PauseChangedEvent { by: caller }));
            Ok(())
        })
    }

    pub fn unpause(&mut self, caller: Address) -> LedgerResult<()> {
        self.run("unpause", caller, |ledger| {
            ledger.owner_config(caller)?.set_paused(false);

            info!(by = ?caller, "Ledger unpaused");
            ledger
                .publisher
                .publish(LedgerEvent::Unpaused(PauseChangedEvent { by: caller }));
            Ok(())
        })
    }

    /// Applies to bounties created afterwards; existing emissions are fixed.
    pub fn update_emission_rate(&mut self, caller: Address, emission_rate: TokenAmount) -> LedgerResult<()> {
        self.run("update_emission_rate", caller, |ledger| {
            ledger.owner_config(caller)?.set_emission_rate(emission_rate);

            info!(%emission_rate, "Emission rate updated");
            ledger
                .publisher
                .publish(LedgerEvent::EmissionRateUpdated(EmissionRateUpdatedEvent { emission_rate }));
            Ok(())
        })
    }

    pub fn update_minimum_manager_holding(&mut self, caller: Address, amount: TokenAmount) -> LedgerResult<()> {
        self.run("update_minimum_manager_holding", caller, |ledger| {
            ledger.owner_config(caller)?.set_minimum_manager_holding(amount);

            info!(minimum_manager_holding = %amount, "Minimum manager holding updated");
            ledger.publisher.publish(LedgerEvent::MinimumManagerHoldingUpdated(
                MinimumManagerHoldingUpdatedEvent {
                    minimum_manager_holding: amount,
                },
            ));
            Ok(())
        })
    }

    pub fn update_limit_managers(&mut self, caller: Address, limit_managers: bool) -> LedgerResult<()> {
        self.run("update_limit_managers", caller, |ledger| {
            ledger.owner_config(caller)?.set_limit_managers(limit_managers);

            info!(limit_managers, "Manager whitelist enforcement updated");
            ledger
                .publisher
                .publish(LedgerEvent::LimitManagersUpdated(LimitManagersUpdatedEvent { limit_managers }));
            Ok(())
        })
    }

    /// Replaces the whole whitelist.
    pub fn set_managers(&mut self, caller: Address, managers: &[Address]) -> LedgerResult<()> {
        self.run("set_managers", caller, |ledger| {
            let config = ledger.owner_config(caller)?;
            let list = ManagerList::from_slice(managers)?;
            config.set_managers(list);

            let active: Vec<Address> = list.iter_active().copied().collect();
            info!(managers = active.len(), "Manager whitelist replaced");
            ledger
                .publisher
                .publish(LedgerEvent::ManagersUpdated(ManagersUpdatedEvent { managers: active }));
            Ok(())
        })
    }

    /// Sweeps the ledger's whole investment-asset balance to the owner and
    /// returns the amount moved.
    pub fn clawback_emission(&mut self, caller: Address) -> LedgerResult<TokenAmount> {
        self.run("clawback_emission", caller, |ledger| {
            let owner = ledger.owner_config(caller)?.owner();
            let config = ledger.config()?;
            let amount = config.investment_asset().balance_of(ledger.account);

            SettlementPlan::new(ledger.account)
                .pay(AssetKind::Investment, owner, amount)
                .execute(config)?;

            ledger.metrics.increment_counter(metric_names::EMISSION_CLAWBACKS_TOTAL, 1);
            info!(to = ?owner, %amount, "Emission clawed back");
            ledger
                .publisher
                .publish(LedgerEvent::EmissionClawedBack(EmissionClawedBackEvent { to: owner, amount }));
            Ok(amount)
        })
    }

    // Reads

    pub fn account(&self) -> Address {
        self.account
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    pub fn pause_policy(&self) -> PausePolicy {
        self.pause_policy
    }

    pub fn metrics(&self) -> &Arc<MetricsCollector> {
        &self.metrics
    }

    pub fn config(&self) -> LedgerResult<&LedgerConfig> {
        self.config.as_ref().ok_or(LedgerError::NotInitialized)
    }

    pub fn owner(&self) -> LedgerResult<Address> {
        Ok(self.config()?.owner())
    }

    pub fn is_paused(&self) -> LedgerResult<bool> {
        Ok(self.config()?.is_paused())
    }

    pub fn emission_rate(&self) -> LedgerResult<TokenAmount> {
        Ok(self.config()?.emission_rate())
    }

    pub fn minimum_manager_holding(&self) -> LedgerResult<TokenAmount> {
        Ok(self.config()?.minimum_manager_holding())
    }

    pub fn limit_managers(&self) -> LedgerResult<bool> {
        Ok(self.config()?.limit_managers())
    }

    /// All slots, unset ones as the zero address.
    pub fn managers(&self) -> LedgerResult<[Address; MANAGER_SLOTS]> {
        Ok(*self.config()?.managers().slots())
    }

    pub fn transaction_asset(&self) -> LedgerResult<AssetHandle> {
        Ok(self.config()?.transaction_asset().clone())
    }

    pub fn investment_asset(&self) -> LedgerResult<AssetHandle> {
        Ok(self.config()?.investment_asset().clone())
    }

    /// Balance the ledger currently holds of `kind`.
    pub fn custody_balance(&self, kind: AssetKind) -> LedgerResult<TokenAmount> {
        Ok(self.config()?.asset(kind).balance_of(self.account))
    }

    pub fn bounty(&self, bounty_id: BountyId) -> LedgerResult<&Bounty> {
        usize::try_from(bounty_id)
            .ok()
            .and_then(|index| self.bounties.get(index))
            .ok_or(LedgerError::BountyNotFound(bounty_id))
    }

    pub fn bounties(&self) -> &[Bounty] {
        &self.bounties
    }

    pub fn bounty_count(&self) -> u64 {
        self.bounties.len() as u64
    }

    // Internals

    fn owner_config(&mut self, caller: Address) -> LedgerResult<&mut LedgerConfig> {
        let config = self.config.as_mut().ok_or(LedgerError::NotInitialized)?;
        if config.owner() != caller {
            return Err(LedgerError::NotOwner { caller });
        }
        Ok(config)
    }

    fn run<T, F>(&mut self, operation: &'static str, caller: Address, f: F) -> LedgerResult<T>
    where
        F: FnOnce(&mut Self) -> LedgerResult<T>,
    {
        let result = f(self);
        if let Err(err) = &result {
            self.metrics.increment_counter(metric_names::LEDGER_REJECTIONS_TOTAL, 1);
            warn!(
                operation,
                caller = ?caller,
                code = err.code(),
                category = %err.category(),
                error = %err,
                "Ledger operation rejected"
            );
        }
        result
    }
}

fn same_asset(a: &AssetHandle, b: &AssetHandle) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const u8,
        Arc::as_ptr(b) as *const u8,
    )
}
