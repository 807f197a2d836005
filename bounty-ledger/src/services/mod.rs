pub mod eligibility;
pub mod emission;
pub mod settlement;

pub use eligibility::EligibilityPath;
pub use emission::compute_emission;
pub use settlement::{Leg, SettlementPlan};
