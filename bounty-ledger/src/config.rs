use serde::{Deserialize, Serialize};
use shared::observability::{LogConfig, LogFormat, LogLevel};
use shared::types::{parse_address, parse_token_amount, Address, TokenAmount, EMISSION_RATE_DECIMALS, MANAGER_SLOTS};
use std::env;

use crate::models::PausePolicy;

/// Largest decimal count whose scale factor fits a 256-bit amount.
const MAX_ASSET_DECIMALS: u32 = 77;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub ledger: LedgerSettings,
    pub assets: AssetsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Ledger parameters. Amounts are human decimal strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSettings {
    /// Custody account of the ledger itself.
    pub account: String,
    pub owner: String,
    /// Investment units per whole transaction unit, e.g. "0.1283917".
    pub emission_rate: String,
    /// In whole investment units.
    pub minimum_manager_holding: String,
    pub managers: Vec<String>,
    pub limit_managers: bool,
    #[serde(default)]
    pub pause_policy: PausePolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    pub transaction: AssetConfig,
    pub investment: AssetConfig,
    /// Investment units credited to the ledger at start-up to fund emissions.
    pub emission_reserve: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetConfig {
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
    #[serde(default)]
    pub genesis: Vec<Allocation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub account: String,
    pub amount: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: env::var("SERVER_PORT")
                    .unwrap_or_else(|_| defaults.server.port.to_string())
                    .parse()
                    .map_err(|_| ConfigError::InvalidPort)?,
            },
            ledger: LedgerSettings {
                account: env::var("LEDGER_ACCOUNT").unwrap_or(defaults.ledger.account),
                owner: env::var("LEDGER_OWNER").unwrap_or(defaults.ledger.owner),
                emission_rate: env::var("EMISSION_RATE").unwrap_or(defaults.ledger.emission_rate),
                minimum_manager_holding: env::var("MINIMUM_MANAGER_HOLDING")
                    .unwrap_or(defaults.ledger.minimum_manager_holding),
                managers: env::var("LEDGER_MANAGERS")
                    .map(|list| split_list(&list))
                    .unwrap_or(defaults.ledger.managers),
                limit_managers: env::var("LIMIT_MANAGERS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.ledger.limit_managers),
                pause_policy: match env::var("PAUSE_POLICY") {
                    Ok(policy) => policy.parse().map_err(ConfigError::InvalidConfig)?,
                    Err(_) => defaults.ledger.pause_policy,
                },
            },
            assets: AssetsConfig {
                transaction: asset_from_env("TRANSACTION_ASSET", defaults.assets.transaction)?,
                investment: asset_from_env("INVESTMENT_ASSET", defaults.assets.investment)?,
                emission_reserve: env::var("EMISSION_RESERVE").unwrap_or(defaults.assets.emission_reserve),
            },
            logging: LoggingConfig {
                level: env::var("LOG_LEVEL").unwrap_or(defaults.logging.level),
                format: env::var("LOG_FORMAT").unwrap_or(defaults.logging.format),
            },
        })
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound(path.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidPort);
        }

        let account = self.ledger.account()?;
        let owner = self.ledger.owner()?;
        if account.is_zero() || owner.is_zero() {
            return Err(ConfigError::InvalidConfig("ledger account and owner must be non-zero".to_string()));
        }
        if account == owner {
            return Err(ConfigError::InvalidConfig("ledger account must differ from owner".to_string()));
        }

        if self.ledger.managers.len() > MANAGER_SLOTS {
            return Err(ConfigError::InvalidConfig(format!(
                "at most {} managers allowed, got {}",
                MANAGER_SLOTS,
                self.ledger.managers.len()
            )));
        }
        self.ledger.manager_addresses()?;
        self.ledger.emission_rate_fixed()?;
        self.ledger.minimum_manager_holding_units(self.assets.investment.decimals)?;

        for asset in [&self.assets.transaction, &self.assets.investment] {
            if asset.decimals > MAX_ASSET_DECIMALS {
                return Err(ConfigError::InvalidConfig(format!(
                    "{} decimals must be at most {}",
                    asset.symbol, MAX_ASSET_DECIMALS
                )));
            }
            if asset.symbol.trim().is_empty() {
                return Err(ConfigError::InvalidConfig("asset symbol must not be empty".to_string()));
            }
            asset.genesis_allocations()?;
        }
        if self.assets.transaction.symbol == self.assets.investment.symbol {
            return Err(ConfigError::InvalidConfig("asset symbols must differ".to_string()));
        }
        self.assets.emission_reserve_units()?;

        self.logging.to_log_config()?;

        Ok(())
    }
}

impl LedgerSettings {
    pub fn account(&self) -> Result<Address, ConfigError> {
        address_field("ledger.account", &self.account)
    }

    pub fn owner(&self) -> Result<Address, ConfigError> {
        address_field("ledger.owner", &self.owner)
    }

    pub fn manager_addresses(&self) -> Result<Vec<Address>, ConfigError> {
        self.managers
            .iter()
            .map(|m| address_field("ledger.managers", m))
            .collect()
    }

    /// Rate as an 18-decimal fixed-point value.
    pub fn emission_rate_fixed(&self) -> Result<TokenAmount, ConfigError> {
        amount_field("ledger.emission_rate", &self.emission_rate, EMISSION_RATE_DECIMALS)
    }

    pub fn minimum_manager_holding_units(&self, investment_decimals: u32) -> Result<TokenAmount, ConfigError> {
        amount_field(
            "ledger.minimum_manager_holding",
            &self.minimum_manager_holding,
            investment_decimals,
        )
    }
}

impl AssetsConfig {
    pub fn emission_reserve_units(&self) -> Result<TokenAmount, ConfigError> {
        amount_field("assets.emission_reserve", &self.emission_reserve, self.investment.decimals)
    }
}

impl AssetConfig {
    /// Genesis allocations in base units.
    pub fn genesis_allocations(&self) -> Result<Vec<(Address, TokenAmount)>, ConfigError> {
        self.genesis
            .iter()
            .map(|allocation| -> Result<(Address, TokenAmount), ConfigError> {
                Ok((
                    address_field("genesis.account", &allocation.account)?,
                    amount_field("genesis.amount", &allocation.amount, self.decimals)?,
                ))
            })
            .collect()
    }
}

impl LoggingConfig {
    pub fn to_log_config(&self) -> Result<LogConfig, ConfigError> {
        let level: LogLevel = self
            .level
            .parse()
            .map_err(|e: shared::observability::ObservabilityError| ConfigError::InvalidConfig(e.to_string()))?;
        let format: LogFormat = self
            .format
            .parse()
            .map_err(|e: shared::observability::ObservabilityError| ConfigError::InvalidConfig(e.to_string()))?;

        Ok(LogConfig {
            level,
            format,
            service_name: "bounty-ledger".to_string(),
            include_line_numbers: !matches!(format, LogFormat::Json),
            include_thread_ids: matches!(format, LogFormat::Json),
        })
    }
}

fn address_field(field: &str, value: &str) -> Result<Address, ConfigError> {
    parse_address(value).map_err(|e| ConfigError::InvalidConfig(format!("{}: {}", field, e)))
}

fn amount_field(field: &str, value: &str, decimals: u32) -> Result<TokenAmount, ConfigError> {
    parse_token_amount(value, decimals).map_err(|e| ConfigError::InvalidConfig(format!("{}: {}", field, e)))
}

/// Splits "a,b,c" (or "addr:amount,...") into trimmed, non-empty parts.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn asset_from_env(prefix: &str, defaults: AssetConfig) -> Result<AssetConfig, ConfigError> {
    let var = |suffix: &str| env::var(format!("{}_{}", prefix, suffix));

    let genesis = match var("GENESIS") {
        Ok(list) => split_list(&list)
            .into_iter()
            .map(|entry| -> Result<Allocation, ConfigError> {
                let (account, amount) = entry
                    .split_once(':')
                    .ok_or_else(|| ConfigError::InvalidConfig(format!("{}_GENESIS entry '{}'", prefix, entry)))?;
                Ok(Allocation {
                    account: account.trim().to_string(),
                    amount: amount.trim().to_string(),
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?,
        Err(_) => defaults.genesis,
    };

    Ok(AssetConfig {
        name: var("NAME").unwrap_or(defaults.name),
        symbol: var("SYMBOL").unwrap_or(defaults.symbol),
        decimals: match var("DECIMALS") {
            Ok(d) => d
                .parse()
                .map_err(|_| ConfigError::InvalidConfig(format!("{}_DECIMALS must be an integer", prefix)))?,
            Err(_) => defaults.decimals,
        },
        genesis,
    })
}

impl Default for Config {
    fn default() -> Self {
        let owner = "0x1000000000000000000000000000000000000001".to_string();

        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3002,
            },
            ledger: LedgerSettings {
                account: "0x2000000000000000000000000000000000000002".to_string(),
                owner: owner.clone(),
                emission_rate: "10".to_string(),
                minimum_manager_holding: "1000".to_string(),
                managers: vec!["0x3000000000000000000000000000000000000003".to_string()],
                limit_managers: true,
                pause_policy: PausePolicy::CreationOnly,
            },
            assets: AssetsConfig {
                transaction: AssetConfig {
                    name: "Transaction Token".to_string(),
                    symbol: "TXN".to_string(),
                    decimals: 9,
                    genesis: vec![Allocation {
                        account: owner.clone(),
                        amount: "1000000".to_string(),
                    }],
                },
                investment: AssetConfig {
                    name: "Novolem".to_string(),
                    symbol: "NVL".to_string(),
                    decimals: 18,
                    genesis: vec![Allocation {
                        account: owner,
                        amount: "1000000".to_string(),
                    }],
                },
                emission_reserve: "100000".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
