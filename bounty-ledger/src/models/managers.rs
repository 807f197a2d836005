use serde::{Deserialize, Serialize};
use shared::types::{Address, MANAGER_SLOTS};

use crate::error::{LedgerError, LedgerResult};

/// Fixed-capacity manager whitelist. Zero-address slots are unset.
/// The list is only ever replaced as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ManagerList([Address; MANAGER_SLOTS]);

impl ManagerList {
    /// Fills slots in order; remaining slots stay unset.
    pub fn from_slice(managers: &[Address]) -> LedgerResult<Self> {
        if managers.len() > MANAGER_SLOTS {
            return Err(LedgerError::TooManyManagers {
                count: managers.len(),
                max: MANAGER_SLOTS,
            });
        }

        let mut slots = [Address::zero(); MANAGER_SLOTS];
        slots[..managers.len()].copy_from_slice(managers);
        Ok(Self(slots))
    }

    pub fn contains(&self, candidate: &Address) -> bool {
        !candidate.is_zero() && self.0.contains(candidate)
    }

    pub fn slots(&self) -> &[Address; MANAGER_SLOTS] {
        &self.0
    }

    pub fn iter_active(&self) -> impl Iterator<Item = &Address> {
        self.0.iter().filter(|m| !m.is_zero())
    }

    pub fn active_count(&self) -> usize {
        self.iter_active().count()
    }
}
