//! Indexer client: blocks, transactions, token metadata and script balances
//! over the indexer's JSON gateway.
//!
//! All network access for the digest pipeline happens here (or in the
//! sibling price/delivery clients); the classification core only ever sees
//! the resolved values.

use std::collections::HashMap;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, info, warn};

use super::retry::calculate_next_backoff;
use crate::config::IndexerConfig;
use crate::errors::{FeedError, FeedResult};
use crate::types::{RawBlock, ScriptInfo, TokenMeta};

const SERVICE: &str = "indexer";

/// Chronik-style indexer client with retry/backoff
pub struct IndexerClient {
    http: reqwest::Client,
    config: IndexerConfig,
}

impl IndexerClient {
    pub fn new(config: IndexerConfig) -> FeedResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { http, config })
    }

    /// Current chain tip height
    pub async fn tip_height(&self) -> FeedResult<u64> {
        let value: serde_json::Value = self.get_json("blockchain-info").await?;
        value
            .get("tipHeight")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| FeedError::InvalidResponse {
                service: SERVICE.to_string(),
                reason: "missing tipHeight".to_string(),
            })
    }

    /// Fetch a block with all of its transactions by height
    pub async fn block_by_height(&self, height: u64) -> FeedResult<RawBlock> {
        let block: RawBlock = self.get_json(&format!("block/{}", height)).await?;
        info!(
            height = block.meta.height,
            txs = block.txs.len(),
            "fetched block"
        );
        Ok(block)
    }

    /// Token metadata for one id; `None` when the indexer does not know it
    pub async fn token_meta(&self, token_id: &str) -> FeedResult<Option<TokenMeta>> {
        match self.get_json::<TokenMeta>(&format!("token/{}", token_id)).await {
            Ok(meta) => Ok(Some(meta)),
            Err(FeedError::Status { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Resolve metadata for a set of token ids concurrently. Unknown tokens
    /// are simply absent from the result; the formatter falls back to elided
    /// ids for those.
    pub async fn token_meta_map(
        &self,
        token_ids: impl IntoIterator<Item = &str>,
    ) -> HashMap<String, TokenMeta> {
        let lookups = token_ids.into_iter().map(|id| async move {
            match self.token_meta(id).await {
                Ok(Some(meta)) => Some((id.to_string(), meta)),
                Ok(None) => {
                    debug!(token_id = id, "token unknown to indexer");
                    None
                }
                Err(e) => {
                    warn!(token_id = id, error = %e, "token metadata fetch failed");
                    None
                }
            }
        });
        join_all(lookups).await.into_iter().flatten().collect()
    }

    /// Confirmed balance for a set of scripts, for the whale-tier emojis.
    /// Failures degrade to an empty map: balances are decoration, not data.
    pub async fn script_info_map(
        &self,
        scripts: impl IntoIterator<Item = &str>,
    ) -> HashMap<String, ScriptInfo> {
        let lookups = scripts.into_iter().map(|script| async move {
            match self
                .get_json::<serde_json::Value>(&format!("script/{}/balance", script))
                .await
            {
                Ok(value) => value.get("balanceSats").and_then(|v| v.as_u64()).map(
                    |balance_sats| (script.to_string(), ScriptInfo { balance_sats }),
                ),
                Err(e) => {
                    debug!(script, error = %e, "balance fetch failed");
                    None
                }
            }
        });
        join_all(lookups).await.into_iter().flatten().collect()
    }

    /// GET with retry/backoff, deserialising the JSON body
    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> FeedResult<T> {
        let url = format!("{}/{}", self.config.url.trim_end_matches('/'), path);
        let mut backoff = Duration::from_millis(self.config.initial_backoff_ms);

        for attempt in 1..=self.config.max_retries {
            match self.try_get_json::<T>(&url).await {
                Ok(value) => return Ok(value),
                // 404 carries meaning (unknown token, no block yet): no retry
                Err(FeedError::Status { status: 404, .. }) => {
                    return Err(FeedError::Status {
                        service: SERVICE.to_string(),
                        status: 404,
                    })
                }
                Err(e) if attempt == self.config.max_retries => {
                    warn!(url = %url, error = %e, "giving up after {} attempts", attempt);
                    return Err(FeedError::MaxRetriesExceeded {
                        operation: format!("GET {}", url),
                    });
                }
                Err(e) => {
                    debug!(url = %url, attempt, error = %e, "retrying after backoff");
                    tokio::time::sleep(backoff).await;
                    backoff = calculate_next_backoff(
                        backoff,
                        self.config.backoff_multiplier,
                        self.config.max_backoff_seconds,
                    );
                }
            }
        }
        Err(FeedError::MaxRetriesExceeded {
            operation: format!("GET {}", url),
        })
    }

    async fn try_get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> FeedResult<T> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                service: SERVICE.to_string(),
                status: status.as_u16(),
            });
        }
        response.json::<T>().await.map_err(|e| FeedError::InvalidResponse {
            service: SERVICE.to_string(),
            reason: e.to_string(),
        })
    }
}
