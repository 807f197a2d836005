use serde::{Deserialize, Serialize};
use shared::types::{Address, BountyId, BountyStatus, TokenAmount};

/// A funded bounty. Everything except `winner` and `status` is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounty {
    pub id: BountyId,
    pub creator: Address,
    pub manager: Address,
    pub metadata_url: String,
    pub reward: TokenAmount,
    pub commission: TokenAmount,
    pub emission: TokenAmount,
    /// Zero until claimed.
    pub winner: Address,
    pub status: BountyStatus,
}

impl Bounty {
    pub fn new(
        id: BountyId,
        creator: Address,
        manager: Address,
        metadata_url: String,
        reward: TokenAmount,
        commission: TokenAmount,
        emission: TokenAmount,
    ) -> Self {
        Self {
            id,
            creator,
            manager,
            metadata_url,
            reward,
            commission,
            emission,
            winner: Address::zero(),
            status: BountyStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == BountyStatus::Active
    }

    pub fn winner(&self) -> Option<Address> {
        if self.winner.is_zero() {
            None
        } else {
            Some(self.winner)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::types::U256;

    #[test]
    fn test_new_bounty_is_active_without_winner() {
        let bounty = Bounty::new(
            0,
            Address::from_low_u64_be(1),
            Address::from_low_u64_be(2),
            "ipfs://bounty".to_string(),
            U256::from(50u64),
            U256::from(5u64),
            U256::from(500u64),
        );

        assert!(bounty.is_active());
        assert_eq!(bounty.winner(), None);
    }
}
