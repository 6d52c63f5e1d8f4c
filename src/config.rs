//! Aggregator configuration
//!
//! Provides:
//! - Well-known aggregator deployments as named presets
//! - The [`MulticallConfig`] value handed to [`crate::Multicall`]
//!
//! There is no global registry: presets are plain constants resolved
//! explicitly by the caller.

use std::str::FromStr;

use alloy::primitives::{address, Address};
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Aggregator contract on Ethereum mainnet
pub const MAINNET_ADDRESS: Address = address!("5eb3fa2dfecdde21c950813c665e9364fa609bd2");

/// Aggregator contract on Ropsten
pub const ROPSTEN_ADDRESS: Address = address!("f3ad7e31b052ff96566eedd218a823430e74b406");

/// Named aggregator deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Mainnet,
    Ropsten,
}

impl Preset {
    /// Aggregator contract address for this network
    pub const fn address(self) -> Address {
        match self {
            Self::Mainnet => MAINNET_ADDRESS,
            Self::Ropsten => ROPSTEN_ADDRESS,
        }
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" => Ok(Self::Mainnet),
            "ropsten" => Ok(Self::Ropsten),
            other => Err(ConfigError::UnknownPreset(other.to_string())),
        }
    }
}

/// Target aggregator and gas limit for outbound requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MulticallConfig {
    /// Address of the aggregator contract
    pub multicall_address: Address,
    /// Gas limit for the aggregate `eth_call`; omitted from the request when unset
    #[serde(default)]
    pub gas: Option<u64>,
}

impl MulticallConfig {
    pub fn new(multicall_address: Address) -> Self {
        Self { multicall_address, gas: None }
    }

    pub fn from_preset(preset: Preset) -> Self {
        Self::new(preset.address())
    }

    /// Sets the aggregator contract address
    ///
    /// # Returns
    /// * `Self` - Returns self for method chaining
    pub fn with_address(mut self, address: Address) -> Self {
        self.multicall_address = address;
        self
    }

    /// Sets the gas limit
    pub fn with_gas(mut self, gas: u64) -> Self {
        self.gas = Some(gas);
        self
    }

    /// Sets the gas limit from a `0x`-prefixed hex quantity
    ///
    /// # Returns
    /// * `Err(ConfigError::InvalidGas)` - If `gas` is not valid hex or overflows `u64`
    pub fn with_gas_hex(self, gas: &str) -> Result<Self, ConfigError> {
        let digits = gas
            .strip_prefix("0x")
            .ok_or_else(|| ConfigError::InvalidGas(gas.to_string()))?;
        let gas = u64::from_str_radix(digits, 16)
            .map_err(|e| ConfigError::InvalidGas(format!("{gas}: {e}")))?;
        Ok(self.with_gas(gas))
    }
}

impl Default for MulticallConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Mainnet)
    }
}
