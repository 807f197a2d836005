pub mod bounty;
pub mod ledger_config;
pub mod managers;

pub use bounty::Bounty;
pub use ledger_config::{AssetKind, LedgerConfig, PausePolicy};
pub use managers::ManagerList;
