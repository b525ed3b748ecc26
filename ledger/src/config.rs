//! Engine configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use vesta_types::Address;
use vesta_utils::LogFormat;

use crate::error::LedgerError;
use crate::fee::FeeSchedule;

/// Configuration for a vesting engine.
///
/// Can be loaded from a TOML file via [`EngineConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Account allowed to pause the engine and change fees and treasury.
    pub admin: Address,

    /// Account receiving split and merge fees.
    pub treasury: Address,

    /// Split fee in basis points of the unclaimed balance (max 200).
    #[serde(default)]
    pub split_fee_bps: u32,

    /// Merge fee in basis points of the unclaimed balance (max 200).
    #[serde(default)]
    pub merge_fee_bps: u32,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl EngineConfig {
    /// A fee-free configuration with default logging.
    pub fn new(admin: Address, treasury: Address) -> Self {
        Self {
            admin,
            treasury,
            split_fee_bps: 0,
            merge_fee_bps: 0,
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| LedgerError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, LedgerError> {
        let config: Self = toml::from_str(s).map_err(|e| LedgerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, LedgerError> {
        toml::to_string_pretty(self).map_err(|e| LedgerError::Config(e.to_string()))
    }

    /// Check addresses and fee caps.
    pub fn validate(&self) -> Result<(), LedgerError> {
        for (field, address) in [("admin", &self.admin), ("treasury", &self.treasury)] {
            Address::parse(address.as_str())
                .map_err(|e| LedgerError::Config(format!("{field}: {e}")))?;
        }
        self.fee_schedule()?;
        Ok(())
    }

    /// The configured fee rates, checked against the cap.
    pub fn fee_schedule(&self) -> Result<FeeSchedule, LedgerError> {
        FeeSchedule::new(self.split_fee_bps, self.merge_fee_bps)
    }

    /// Install the global tracing subscriber described by this configuration.
    pub fn init_logging(&self) -> Result<(), LedgerError> {
        vesta_utils::init_logging(self.log_format, &self.log_level)
            .map_err(|e| LedgerError::Config(e.to_string()))
    }
}
