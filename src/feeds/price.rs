//! Price feed client.
//!
//! Returns the tracked assets' fiat quotes with XEC first, or an error; the
//! caller maps a failed fetch onto the digest's price-unavailable variant.

use std::time::Duration;

use tracing::warn;

use crate::config::PriceApiConfig;
use crate::errors::{FeedError, FeedResult};
use crate::types::PriceQuote;

const SERVICE: &str = "price-api";

pub struct PriceClient {
    http: reqwest::Client,
    config: PriceApiConfig,
}

impl PriceClient {
    pub fn new(config: PriceApiConfig) -> FeedResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { http, config })
    }

    /// Fetch one quote per configured asset. Any missing asset fails the
    /// whole call: a digest with half its prices is worse than the
    /// no-price variant.
    pub async fn get_prices(&self) -> FeedResult<Vec<PriceQuote>> {
        let slugs: Vec<&str> = self.config.assets.iter().map(|a| a.slug.as_str()).collect();
        let url = format!(
            "{}?ids={}&vs_currencies={}&precision={}",
            self.config.base_url,
            slugs.join(","),
            self.config.fiat,
            self.config.precision
        );

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "price fetch failed");
            return Err(FeedError::Status {
                service: SERVICE.to_string(),
                status: status.as_u16(),
            });
        }
        let body: serde_json::Value =
            response.json().await.map_err(|e| FeedError::InvalidResponse {
                service: SERVICE.to_string(),
                reason: e.to_string(),
            })?;

        let mut quotes = Vec::with_capacity(self.config.assets.len());
        for asset in &self.config.assets {
            let price = body
                .get(&asset.slug)
                .and_then(|entry| entry.get(&self.config.fiat))
                .and_then(|p| p.as_f64())
                .ok_or_else(|| FeedError::InvalidResponse {
                    service: SERVICE.to_string(),
                    reason: format!("no {} price for {}", self.config.fiat, asset.slug),
                })?;
            let quote = PriceQuote {
                ticker: asset.ticker.clone(),
                fiat: self.config.fiat.clone(),
                price,
            };
            // XEC leads: the digest's own unit comes first in the price lines
            if asset.ticker == "XEC" {
                quotes.insert(0, quote);
            } else {
                quotes.push(quote);
            }
        }
        Ok(quotes)
    }
}
