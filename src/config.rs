//! Application configuration loaded from config.toml and environment
//! variables. Environment variables take precedence over file values.
//!
//! Digest thresholds that the on-chain record cannot dictate (materiality
//! floor, suffix breakpoints live in the amount formatter, message budget,
//! display caps, whale tiers) are deliberately configuration, not constants.

use ::config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub explorer: ExplorerConfig,
    pub digest: DigestConfig,
    pub indexer: IndexerConfig,
    pub price_api: PriceApiConfig,
    pub delivery: DeliveryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub base_url: String,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://explorer.e.cash".to_string(),
        }
    }
}

/// Balance thresholds (sats) for the address-tier emoji, largest first
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WhaleTiers {
    pub big_whale: u64,
    pub modest_whale: u64,
    pub shark: u64,
    pub swordfish: u64,
    pub barracuda: u64,
    pub octopus: u64,
    pub piranha: u64,
    pub crab: u64,
}

impl Default for WhaleTiers {
    fn default() -> Self {
        Self {
            big_whale: 5_000_000_000_000,
            modest_whale: 1_000_000_000_000,
            shark: 500_000_000_000,
            swordfish: 100_000_000_000,
            barracuda: 50_000_000_000,
            octopus: 10_000_000_000,
            piranha: 5_000_000_000,
            crab: 1_000_000_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    /// Hard character budget per composed message
    pub msg_char_limit: usize,
    /// Plain-send lines shown before "...and N more"
    pub xec_send_display_count: usize,
    /// Characters kept on each side of an elided address or id
    pub address_slice_size: usize,
    /// Fiat value below which amounts render in raw units even with a price
    pub fiat_materiality: f64,
    pub halving_height: u64,
    pub staking_activation_height: u64,
    /// Staker payout as a percent of total coinbase value
    pub staking_reward_percent: u64,
    /// Tolerance above the exact percent when hunting the staker output
    pub staker_percent_padding: u64,
    pub whale_tiers: WhaleTiers,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            msg_char_limit: 4096,
            xec_send_display_count: 12,
            address_slice_size: 3,
            fiat_materiality: 0.0,
            halving_height: 840_000,
            staking_activation_height: 818_670,
            staking_reward_percent: 10,
            staker_percent_padding: 1,
            whale_tiers: WhaleTiers::default(),
        }
    }
}

impl DigestConfig {
    /// Emoji tier for an address balance
    pub fn balance_emoji(&self, balance_sats: u64) -> &'static str {
        use crate::constants::emoji;
        let tiers = &self.whale_tiers;
        if balance_sats >= tiers.big_whale {
            emoji::BIG_WHALE
        } else if balance_sats >= tiers.modest_whale {
            emoji::MODEST_WHALE
        } else if balance_sats >= tiers.shark {
            emoji::SHARK
        } else if balance_sats >= tiers.swordfish {
            emoji::SWORDFISH
        } else if balance_sats >= tiers.barracuda {
            emoji::BARRACUDA
        } else if balance_sats >= tiers.octopus {
            emoji::OCTOPUS
        } else if balance_sats >= tiers.piranha {
            emoji::PIRANHA
        } else if balance_sats >= tiers.crab {
            emoji::CRAB
        } else {
            emoji::SHRIMP
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    pub url: String,
    pub timeout_seconds: u64,
    pub max_retries: usize,
    pub initial_backoff_ms: u64,
    pub backoff_multiplier: f64,
    pub max_backoff_seconds: u64,
    /// Poll interval for the watch loop
    pub poll_interval_seconds: u64,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            url: "https://chronik.e.cash".to_string(),
            timeout_seconds: 30,
            max_retries: 5,
            initial_backoff_ms: 200,
            backoff_multiplier: 2.0,
            max_backoff_seconds: 30,
            poll_interval_seconds: 15,
        }
    }
}

/// One asset tracked by the price feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceAsset {
    pub slug: String,
    pub ticker: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceApiConfig {
    pub base_url: String,
    pub assets: Vec<PriceAsset>,
    pub fiat: String,
    pub precision: u32,
}

impl Default for PriceApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.coingecko.com/api/v3/simple/price".to_string(),
            assets: vec![
                PriceAsset {
                    slug: "ecash".to_string(),
                    ticker: "XEC".to_string(),
                },
                PriceAsset {
                    slug: "bitcoin".to_string(),
                    ticker: "BTC".to_string(),
                },
                PriceAsset {
                    slug: "ethereum".to_string(),
                    ticker: "ETH".to_string(),
                },
            ],
            fiat: "usd".to_string(),
            precision: 8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DeliveryConfig {
    pub bot_token: String,
    pub channel_id: String,
}

impl AppConfig {
    /// Load configuration from config.toml (optional) and environment
    /// variables with the HERALD_ prefix (e.g. HERALD_INDEXER__URL)
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("HERALD").separator("__"))
            .build()?;

        let app_config: AppConfig = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// Load from an explicit file path, for the CLI's --config flag
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("HERALD").separator("__"))
            .build()?;
        let app_config: AppConfig = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.digest.msg_char_limit == 0 {
            return Err(ConfigError::Message(
                "digest.msg_char_limit must be positive".to_string(),
            ));
        }
        if self.digest.address_slice_size == 0 {
            return Err(ConfigError::Message(
                "digest.address_slice_size must be positive".to_string(),
            ));
        }
        if self.price_api.assets.is_empty() {
            return Err(ConfigError::Message(
                "price_api.assets must name at least one asset".to_string(),
            ));
        }
        Ok(())
    }
}
