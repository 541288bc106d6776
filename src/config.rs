//! Configuration for the Position Lens
//!
//! Values come from environment variables (with `.env` support) or a TOML
//! file. Defaults target Uniswap V3 on Ethereum Mainnet.

use alloy_primitives::{Address, B256};
use eyre::{eyre, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::lens::{
    LensSettings, DEFAULT_MAX_CONCURRENCY, UNISWAP_V3_FACTORY, UNISWAP_V3_POOL_INIT_CODE_HASH,
    UNISWAP_V3_POSITION_MANAGER,
};

// ============================================
// OUTPUT FORMAT
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Coloured table on stdout
    Table,
    /// Pretty JSON report on stdout
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Table
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "TABLE"),
            OutputFormat::Json => write!(f, "JSON"),
        }
    }
}

// ============================================
// MAIN CONFIGURATION
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // ========== Network Settings ==========
    /// Primary RPC URL (Alchemy/Infura recommended)
    pub rpc_url: String,

    /// Chain ID (1 = Ethereum Mainnet)
    pub chain_id: u64,

    // ========== Registries ==========
    /// NonfungiblePositionManager holding the positions
    pub position_manager: Address,

    /// Factory that deploys the pools
    pub pool_factory: Address,

    /// keccak256 of the pool creation code, used for address derivation
    pub pool_init_code_hash: B256,

    // ========== Batching ==========
    /// Positions assembled concurrently
    pub max_concurrent_positions: usize,

    // ========== Output ==========
    pub output_format: OutputFormat,
}

impl Config {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            rpc_url: env::var("RPC_URL")
                .unwrap_or_else(|_| "https://eth.llamarpc.com".to_string()),
            chain_id: env_parsed("CHAIN_ID")?.unwrap_or(1),

            position_manager: env_parsed("POSITION_MANAGER")?
                .unwrap_or(UNISWAP_V3_POSITION_MANAGER),
            pool_factory: env_parsed("POOL_FACTORY")?.unwrap_or(UNISWAP_V3_FACTORY),
            pool_init_code_hash: env_parsed("POOL_INIT_CODE_HASH")?
                .unwrap_or(UNISWAP_V3_POOL_INIT_CODE_HASH),

            max_concurrent_positions: env_parsed("MAX_CONCURRENT_POSITIONS")?
                .unwrap_or(DEFAULT_MAX_CONCURRENCY),

            output_format: match env::var("OUTPUT_FORMAT")
                .unwrap_or_else(|_| "table".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => OutputFormat::Json,
                _ => OutputFormat::Table,
            },
        })
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.rpc_url.is_empty() || self.rpc_url.contains("YOUR_API_KEY") {
            return Err(eyre!("Invalid RPC_URL - please set a valid Alchemy/Infura URL"));
        }
        if self.position_manager == Address::ZERO {
            return Err(eyre!("POSITION_MANAGER must not be the zero address"));
        }
        if self.pool_factory == Address::ZERO {
            return Err(eyre!("POOL_FACTORY must not be the zero address"));
        }
        if self.pool_init_code_hash == B256::ZERO {
            return Err(eyre!("POOL_INIT_CODE_HASH must be set"));
        }
        if self.max_concurrent_positions == 0 {
            return Err(eyre!("MAX_CONCURRENT_POSITIONS must be at least 1"));
        }
        Ok(())
    }

    /// Registry identities handed to the aggregator
    pub fn lens_settings(&self) -> LensSettings {
        LensSettings {
            factory: self.pool_factory,
            pool_init_code_hash: self.pool_init_code_hash,
            max_concurrency: self.max_concurrent_positions,
        }
    }

    pub fn print_summary(&self) {
        println!("╔════════════════════════════════════════════════════════════╗");
        println!("║              POSITION LENS - CONFIGURATION                 ║");
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ Chain ID:          {:^40} ║", self.chain_id);
        println!("║ Output:            {:^40} ║", self.output_format);
        println!("║ Concurrency:       {:^40} ║", self.max_concurrent_positions);
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ REGISTRIES                                                 ║");
        println!("║ • Positions:  {:<44} ║", self.position_manager.to_string());
        println!("║ • Factory:    {:<44} ║", self.pool_factory.to_string());
        println!("╚════════════════════════════════════════════════════════════╝");
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: "https://eth.llamarpc.com".to_string(),
            chain_id: 1,
            position_manager: UNISWAP_V3_POSITION_MANAGER,
            pool_factory: UNISWAP_V3_FACTORY,
            pool_init_code_hash: UNISWAP_V3_POOL_INIT_CODE_HASH,
            max_concurrent_positions: DEFAULT_MAX_CONCURRENCY,
            output_format: OutputFormat::Table,
        }
    }
}

/// Unset is `None`, set-but-malformed is an error
fn env_parsed<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| eyre!("Invalid {}: {}", key, e)),
        Err(_) => Ok(None),
    }
}

// ============================================
// TESTS
// ============================================
