//! Command line interface: one-shot payload decoding, offline block
//! composition from captured indexer JSON, and the live watch loop.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::block::parse_block;
use crate::config::AppConfig;
use crate::decoder;
use crate::feeds::{IndexerClient, PriceClient, TelegramSink};
use crate::format::compose_block;
use crate::protocols;
use crate::types::{PriceQuote, RawBlock, TokenMeta};

/// eCash block digest engine
#[derive(Parser)]
#[command(name = "ecash-digest")]
#[command(about = "Classify eCash transactions and render block digests")]
#[command(version)]
pub struct Cli {
    /// Path to a config file (defaults to ./config.toml when present)
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode and interpret one locking script's payload
    Decode(DecodeCommand),
    /// Compose the digest for a block captured as JSON
    Block(BlockCommand),
    /// Follow the chain tip and deliver digests to the channel
    Watch(WatchCommand),
}

#[derive(Parser)]
pub struct DecodeCommand {
    /// Locking script, hex encoded (starting with the OP_RETURN opcode)
    pub script_hex: String,
}

#[derive(Parser)]
pub struct BlockCommand {
    /// Block JSON file (RawBlock shape)
    pub file: PathBuf,
    /// Optional price quotes JSON file ([{ticker, fiat, price}])
    #[arg(long)]
    pub prices: Option<PathBuf>,
    /// Optional token metadata JSON file ({tokenId: {ticker, ...}})
    #[arg(long)]
    pub tokens: Option<PathBuf>,
}

#[derive(Parser)]
pub struct WatchCommand {
    /// Compose digests but do not deliver them
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn run() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("loading config from {}", path))?,
        None => AppConfig::load().context("loading config")?,
    };

    match cli.command {
        Commands::Decode(cmd) => run_decode(cmd),
        Commands::Block(cmd) => run_block(cmd, &config),
        Commands::Watch(cmd) => run_watch(cmd, &config).await,
    }
}

fn run_decode(cmd: DecodeCommand) -> Result<()> {
    let script = hex::decode(cmd.script_hex.trim()).context("script is not valid hex")?;
    match decoder::decode_payload(&script) {
        Some(stack) => {
            let record = protocols::interpret(&stack);
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        None => println!("not a payload output"),
    }
    Ok(())
}

fn run_block(cmd: BlockCommand, config: &AppConfig) -> Result<()> {
    let block: RawBlock = serde_json::from_str(
        &std::fs::read_to_string(&cmd.file)
            .with_context(|| format!("reading {}", cmd.file.display()))?,
    )
    .context("block JSON did not match the expected shape")?;

    let prices: Option<Vec<PriceQuote>> = match &cmd.prices {
        Some(path) => Some(serde_json::from_str(&std::fs::read_to_string(path)?)?),
        None => None,
    };
    let token_meta: HashMap<String, TokenMeta> = match &cmd.tokens {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => HashMap::new(),
    };

    let parsed = parse_block(&block, &config.digest)?;
    let digest = compose_block(
        &parsed,
        prices.as_deref(),
        &token_meta,
        None,
        &config.explorer.base_url,
        &config.digest,
    );

    match &digest.priced {
        Some(priced) => println!("{}", priced),
        None => println!("{}", digest.plain),
    }
    if digest.priced.is_some() {
        println!("\n--- price-unavailable variant ---\n");
        println!("{}", digest.plain);
    }
    Ok(())
}

async fn run_watch(cmd: WatchCommand, config: &AppConfig) -> Result<()> {
    let indexer = IndexerClient::new(config.indexer.clone())?;
    let price_client = PriceClient::new(config.price_api.clone())?;
    let sink = if cmd.dry_run {
        None
    } else {
        Some(TelegramSink::new(config.delivery.clone())?)
    };

    let mut last_height = indexer.tip_height().await?;
    info!(height = last_height, "watching for new blocks");

    loop {
        tokio::time::sleep(std::time::Duration::from_secs(
            config.indexer.poll_interval_seconds,
        ))
        .await;

        let tip = match indexer.tip_height().await {
            Ok(tip) => tip,
            Err(e) => {
                warn!(error = %e, "tip height fetch failed");
                continue;
            }
        };

        while last_height < tip {
            let height = last_height + 1;
            let block = match indexer.block_by_height(height).await {
                Ok(block) => block,
                Err(e) => {
                    warn!(height, error = %e, "block fetch failed, will retry");
                    break;
                }
            };

            let mined_at = DateTime::<Utc>::from_timestamp(block.meta.timestamp, 0)
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "unknown".to_string());
            info!(height, mined_at = %mined_at, "processing block");

            let parsed = parse_block(&block, &config.digest)?;

            // Price failure is not fatal: it selects the fallback variant
            let prices = match price_client.get_prices().await {
                Ok(quotes) => Some(quotes),
                Err(e) => {
                    warn!(error = %e, "price fetch failed, composing without fiat");
                    None
                }
            };

            let token_ids: Vec<&str> = parsed.token_ids.iter().map(String::as_str).collect();
            let token_meta = indexer.token_meta_map(token_ids).await;
            let scripts: Vec<&str> = parsed.output_scripts.iter().map(String::as_str).collect();
            let script_info = indexer.script_info_map(scripts).await;

            let digest = compose_block(
                &parsed,
                prices.as_deref(),
                &token_meta,
                Some(&script_info),
                &config.explorer.base_url,
                &config.digest,
            );
            let message = digest.priced.as_ref().unwrap_or(&digest.plain);

            match &sink {
                Some(sink) => {
                    if let Err(e) = sink.send_message(message).await {
                        warn!(height, error = %e, "delivery failed");
                    }
                }
                None => println!("{}", message),
            }

            last_height = height;
        }
    }
}
