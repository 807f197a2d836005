//! Shared types, observability and messaging for the bounty ledger services

pub use anyhow;
pub use chrono;
pub use serde;
pub use serde_json;
pub use thiserror;
pub use tracing;

pub mod messaging;
pub mod observability;
pub mod types;

pub use types::{CommonError, Result};
