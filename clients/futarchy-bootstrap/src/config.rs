//! Client configuration loaded from TOML
//!
//! Every field has a default, so an empty document is a valid configuration
//! pointing at mainnet program deployments.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use solana_commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;

use crate::constants::*;
use crate::error::{BootstrapError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub rpc_url: String,
    /// One of "processed", "confirmed", "finalized"
    pub commitment: String,
    pub programs: ProgramConfig,
    pub market: MarketConfig,
    pub submission: SubmissionConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProgramConfig {
    pub governance: String,
    pub conditional_vault: String,
    pub orderbook: String,
    pub twap: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    pub conf_filter: f32,
    pub max_staleness_slots: Option<u32>,
    pub quote_lot_size: i64,
    pub base_lot_size: i64,
    /// Seconds until the market expires, 0 for never
    pub time_expiry: i64,
    pub twap_window: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SubmissionConfig {
    pub skip_preflight: bool,
    pub confirm_timeout_ms: u64,
    pub poll_interval_ms: u64,
}

/// Program ids after validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramIds {
    pub governance: Pubkey,
    pub conditional_vault: Pubkey,
    pub orderbook: Pubkey,
    pub twap: Pubkey,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.mainnet-beta.solana.com".to_string(),
            commitment: "confirmed".to_string(),
            programs: ProgramConfig::default(),
            market: MarketConfig::default(),
            submission: SubmissionConfig::default(),
        }
    }
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            governance: GOVERNANCE_PROGRAM_ID.to_string(),
            conditional_vault: CONDITIONAL_VAULT_PROGRAM_ID.to_string(),
            orderbook: ORDERBOOK_PROGRAM_ID.to_string(),
            twap: TWAP_PROGRAM_ID.to_string(),
        }
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            conf_filter: DEFAULT_CONF_FILTER,
            max_staleness_slots: Some(DEFAULT_MAX_STALENESS_SLOTS),
            quote_lot_size: DEFAULT_QUOTE_LOT_SIZE,
            base_lot_size: DEFAULT_BASE_LOT_SIZE,
            time_expiry: 0,
            twap_window: DEFAULT_TWAP_WINDOW,
        }
    }
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            skip_preflight: true,
            confirm_timeout_ms: DEFAULT_CONFIRM_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl Default for ProgramIds {
    fn default() -> Self {
        Self {
            governance: GOVERNANCE_PROGRAM_ID,
            conditional_vault: CONDITIONAL_VAULT_PROGRAM_ID,
            orderbook: ORDERBOOK_PROGRAM_ID,
            twap: TWAP_PROGRAM_ID,
        }
    }
}

impl ClientConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: ClientConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&raw)
    }

    /// Reject settings the client cannot run with
    pub fn validate(&self) -> Result<()> {
        self.program_ids()?;
        self.commitment_config()?;
        if self.market.quote_lot_size <= 0 || self.market.base_lot_size <= 0 {
            return Err(BootstrapError::Config(
                "lot sizes must be positive".to_string(),
            ));
        }
        if self.submission.poll_interval_ms == 0 {
            return Err(BootstrapError::Config(
                "poll_interval_ms must be positive".to_string(),
            ));
        }
        if self.submission.confirm_timeout_ms == 0 {
            return Err(BootstrapError::Config(
                "confirm_timeout_ms must be positive".to_string(),
            ));
        }
        if !self.market.conf_filter.is_finite() {
            return Err(BootstrapError::Config(
                "conf_filter must be a finite number".to_string(),
            ));
        }
        Ok(())
    }

    pub fn program_ids(&self) -> Result<ProgramIds> {
        Ok(ProgramIds {
            governance: parse_program_id("governance", &self.programs.governance)?,
            conditional_vault: parse_program_id(
                "conditional_vault",
                &self.programs.conditional_vault,
            )?,
            orderbook: parse_program_id("orderbook", &self.programs.orderbook)?,
            twap: parse_program_id("twap", &self.programs.twap)?,
        })
    }

    pub fn commitment_config(&self) -> Result<CommitmentConfig> {
        match self.commitment.as_str() {
            "processed" => Ok(CommitmentConfig::processed()),
            "confirmed" => Ok(CommitmentConfig::confirmed()),
            "finalized" => Ok(CommitmentConfig::finalized()),
            other => Err(BootstrapError::Config(format!(
                "unknown commitment level {other:?}"
            ))),
        }
    }

    pub fn confirm_timeout(&self) -> Duration {
        Duration::from_millis(self.submission.confirm_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.submission.poll_interval_ms)
    }
}

fn parse_program_id(name: &str, raw: &str) -> Result<Pubkey> {
    Pubkey::from_str(raw)
        .map_err(|e| BootstrapError::Config(format!("program id {name} = {raw:?}: {e}")))
}
