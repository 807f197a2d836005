use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::common::{Address, BountyId, TokenAmount};

/// Notifications emitted by the bounty ledger after a state change commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", content = "data")]
pub enum LedgerEvent {
    // Bounty lifecycle
    BountyCreated(BountyCreatedEvent),
    BountyClaimed(BountyClaimedEvent),
    BountyRefunded(BountyRefundedEvent),

    // Administration
    Initialized(InitializedEvent),
    OwnerUpdated(OwnerUpdatedEvent),
    Paused(PauseChangedEvent),
    Unpaused(PauseChangedEvent),
    EmissionRateUpdated(EmissionRateUpdatedEvent),
    MinimumManagerHoldingUpdated(MinimumManagerHoldingUpdatedEvent),
    LimitManagersUpdated(LimitManagersUpdatedEvent),
    ManagersUpdated(ManagersUpdatedEvent),
    EmissionClawedBack(EmissionClawedBackEvent),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BountyCreatedEvent {
    pub bounty_id: BountyId,
    pub creator: Address,
    pub manager: Address,
    pub metadata_url: String,
    pub reward: TokenAmount,
    pub commission: TokenAmount,
    pub emission: TokenAmount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BountyClaimedEvent {
    pub bounty_id: BountyId,
    pub winner: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BountyRefundedEvent {
    pub bounty_id: BountyId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitializedEvent {
    pub owner: Address,
    pub transaction_asset: String,
    pub investment_asset: String,
    pub emission_rate: TokenAmount,
    pub minimum_manager_holding: TokenAmount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerUpdatedEvent {
    pub previous_owner: Address,
    pub new_owner: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseChangedEvent {
    pub by: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmissionRateUpdatedEvent {
    pub emission_rate: TokenAmount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimumManagerHoldingUpdatedEvent {
    pub minimum_manager_holding: TokenAmount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitManagersUpdatedEvent {
    pub limit_managers: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagersUpdatedEvent {
    pub managers: Vec<Address>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmissionClawedBackEvent {
    pub to: Address,
    pub amount: TokenAmount,
}

/// An event paired with its position in the journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub sequence: u64,
    pub emitted_at: DateTime<Utc>,
    #[serde(flatten)]
    pub event: LedgerEvent,
}

impl LedgerEvent {
    /// Stable snake_case name, used as the channel suffix.
    pub fn name(&self) -> &'static str {
        match self {
            LedgerEvent::BountyCreated(_) => "bounty_created",
            LedgerEvent::BountyClaimed(_) => "bounty_claimed",
            LedgerEvent::BountyRefunded(_) => "bounty_refunded",
            LedgerEvent::Initialized(_) => "initialized",
            LedgerEvent::OwnerUpdated(_) => "owner_updated",
            LedgerEvent::Paused(_) => "paused",
            LedgerEvent::Unpaused(_) => "unpaused",
            LedgerEvent::EmissionRateUpdated(_) => "emission_rate_updated",
            LedgerEvent::MinimumManagerHoldingUpdated(_) => "minimum_manager_holding_updated",
            LedgerEvent::LimitManagersUpdated(_) => "limit_managers_updated",
            LedgerEvent::ManagersUpdated(_) => "managers_updated",
            LedgerEvent::EmissionClawedBack(_) => "emission_clawed_back",
        }
    }

    pub fn bounty_id(&self) -> Option<BountyId> {
        match self {
            LedgerEvent::BountyCreated(e) => Some(e.bounty_id),
            LedgerEvent::BountyClaimed(e) => Some(e.bounty_id),
            LedgerEvent::BountyRefunded(e) => Some(e.bounty_id),
            _ => None,
        }
    }

    pub fn is_administrative(&self) -> bool {
        self.bounty_id().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::common::U256;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_event_is_tagged() {
        let event = LedgerEvent::BountyClaimed(BountyClaimedEvent {
            bounty_id: 3,
            winner: Address::from_low_u64_be(9),
        });

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], "BountyClaimed");
        assert_eq!(json["data"]["bounty_id"], 3);
        assert_eq!(event.name(), "bounty_claimed");
        assert_eq!(event.bounty_id(), Some(3));
    }

    #[test]
    fn test_admin_events_have_no_bounty() {
        let event = LedgerEvent::EmissionRateUpdated(EmissionRateUpdatedEvent {
            emission_rate: U256::from(5u64),
        });
        assert!(event.is_administrative());
        assert_eq!(event.name(), "emission_rate_updated");
    }
}
