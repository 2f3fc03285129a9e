//! Per-block parsing: coinbase miner/staker identification and the
//! transaction classification loop that feeds the digest composer.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::config::DigestConfig;
use crate::constants::miners::KNOWN_MINERS;
use crate::decoder;
use crate::errors::{AppError, AppResult};
use crate::flow::{self, FlowAggregate};
use crate::format::address::script_to_address;
use crate::protocols::{self, ProtocolRecord};
use crate::types::{RawBlock, RawTx, TokenTxType, TxOutput};

/// Token facets a transaction can carry on top of (or instead of) a payload
#[derive(Debug, Clone, Serialize)]
pub struct TokenSendFacet {
    pub token_id: String,
    pub type_label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenBurnFacet {
    pub token_id: String,
    pub burned_atoms: u128,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenGenesisFacet {
    pub token_id: String,
}

/// One classified transaction
#[derive(Debug, Clone, Serialize)]
pub struct ParsedTx {
    pub txid: String,
    /// Decoded app payload, when the tx carries one
    pub record: Option<ProtocolRecord>,
    pub genesis: Option<TokenGenesisFacet>,
    pub token_send: Option<TokenSendFacet>,
    pub token_burn: Option<TokenBurnFacet>,
    pub flow: FlowAggregate,
}

/// Staking reward payout found in a coinbase
#[derive(Debug, Clone, Serialize)]
pub struct StakerInfo {
    /// cashaddr, or `script(<hex>)` for non-standard payouts
    pub address: String,
    pub reward_sats: u64,
}

/// A block classified for digest composition
#[derive(Debug, Clone, Serialize)]
pub struct ParsedBlock {
    pub hash: String,
    pub height: u64,
    pub miner: String,
    pub staker: Option<StakerInfo>,
    pub num_txs: usize,
    /// Non-coinbase transactions, block order preserved
    pub txs: Vec<ParsedTx>,
    /// Token ids the digest will want metadata for
    pub token_ids: BTreeSet<String>,
    /// Scripts the digest may want balance info for (first sender and first
    /// receiver of each tx)
    pub output_scripts: BTreeSet<String>,
}

/// Classify a single transaction: decode any payload output, interpret it,
/// aggregate the monetary flow and pick up the indexer's token facets.
pub fn parse_tx(tx: &RawTx) -> AppResult<ParsedTx> {
    let flow = flow::aggregate(tx)?;

    let mut genesis = None;
    let mut token_send = None;
    let mut token_burn = None;

    let is_token_tx = !tx.token_entries.is_empty();
    if let Some(entry) = tx.token_entries.first() {
        match entry.tx_type {
            TokenTxType::Genesis => {
                genesis = Some(TokenGenesisFacet {
                    token_id: entry.token_id.clone(),
                });
            }
            TokenTxType::Send => {
                if entry.actual_burn_atoms > 0 {
                    token_burn = Some(TokenBurnFacet {
                        token_id: entry.token_id.clone(),
                        burned_atoms: entry.actual_burn_atoms,
                    });
                } else {
                    token_send = Some(TokenSendFacet {
                        token_id: entry.token_id.clone(),
                        type_label: entry.type_label(),
                    });
                }
            }
            // MINT and exotic entries fall through to base-currency rendering
            _ => {}
        }
    }

    // Burns are a property of the flow, not of any recognized payload: an
    // unindexed transaction that destroys token atoms still gets its line
    if token_burn.is_none() && token_send.is_none() && genesis.is_none() {
        if let Some(token_flow) = &flow.token_flow {
            if token_flow.burned_atoms > 0 && !token_flow.multi_token {
                token_burn = Some(TokenBurnFacet {
                    token_id: token_flow.token_id.clone(),
                    burned_atoms: token_flow.burned_atoms,
                });
            }
        }
    }

    // Token txs get their story from the indexer facets; re-reading their
    // payload would double-report them
    let mut record = None;
    if !is_token_tx {
        for output in &tx.outputs {
            if let Some(stack) = decode_output_payload(output) {
                record = Some(protocols::interpret(&stack));
            }
        }
    }

    if let Some(ProtocolRecord::Unrecognized(u)) = &record {
        debug!(txid = %tx.txid, reason = ?u.reason, "payload degraded to unrecognized");
    }

    Ok(ParsedTx {
        txid: tx.txid.clone(),
        record,
        genesis,
        token_send,
        token_burn,
        flow,
    })
}

fn decode_output_payload(output: &TxOutput) -> Option<decoder::StackArray> {
    let script = hex::decode(&output.output_script).ok()?;
    decoder::decode_payload(&script)
}

/// Parse a block: coinbase first, then every other transaction in block
/// order. Order is preserved all the way to the composer; section grouping
/// is the composer's job.
pub fn parse_block(block: &RawBlock, cfg: &DigestConfig) -> AppResult<ParsedBlock> {
    let coinbase = block
        .txs
        .first()
        .ok_or_else(|| AppError::ContractViolation("block has no transactions".to_string()))?;

    let miner = identify_miner(coinbase);
    let staker = find_staker(block.meta.height, &coinbase.outputs, cfg);

    let mut txs = Vec::with_capacity(block.txs.len().saturating_sub(1));
    for tx in block.txs.iter().skip(1) {
        txs.push(parse_tx(tx)?);
    }

    let mut token_ids = BTreeSet::new();
    let mut output_scripts = BTreeSet::new();
    for ptx in &txs {
        if let Some(g) = &ptx.genesis {
            token_ids.insert(g.token_id.clone());
        }
        if let Some(s) = &ptx.token_send {
            token_ids.insert(s.token_id.clone());
        }
        if let Some(b) = &ptx.token_burn {
            token_ids.insert(b.token_id.clone());
        }
        if let Some(record) = &ptx.record {
            if let Some(id) = record.token_id() {
                token_ids.insert(id.to_string());
            }
        }
        if let Some(script) = ptx.flow.first_sending_script() {
            output_scripts.insert(script.to_string());
        }
        if let Some(script) = ptx.flow.first_receiving_script() {
            output_scripts.insert(script.to_string());
        }
    }

    Ok(ParsedBlock {
        hash: block.meta.hash.clone(),
        height: block.meta.height,
        miner,
        staker,
        num_txs: block.txs.len(),
        txs,
        token_ids,
        output_scripts,
    })
}

/// Identify the mining pool from the coinbase transaction.
///
/// Payout script match first; then the coinbase tag fragment scan (last
/// match wins, so ckpool forks shadow the generic ckpool entry); then the
/// `unknown, ...xxxx` fallback built from the first payout address.
pub fn identify_miner(coinbase: &RawTx) -> String {
    let scriptsig = coinbase
        .inputs
        .first()
        .map(|i| i.input_script.to_lowercase())
        .unwrap_or_default();

    let mut found = None;
    for info in KNOWN_MINERS.iter() {
        if let Some(script) = info.payout_output_script {
            if coinbase.outputs.iter().any(|o| o.output_script == script) {
                found = Some(info);
                break;
            }
        }
    }
    if found.is_none() {
        for info in KNOWN_MINERS.iter() {
            if scriptsig.contains(info.coinbase_hex_fragment) {
                // No break: a more specific later entry wins
                found = Some(info);
            }
        }
    }

    let Some(info) = found else {
        // Identify by the tail of the payout address
        let Some(first_output) = coinbase.outputs.first() else {
            return "unknown".to_string();
        };
        let address = script_to_address(&first_output.output_script);
        if address.starts_with("script(") {
            return "unknown".to_string();
        }
        return format!("unknown, ...{}", &address[address.len() - 4..]);
    };

    if !info.parse_coinbase_info {
        return info.miner.to_string();
    }

    // ViaBTC and CK Pool put worker info between '/' markers (ascii 2f).
    // The interesting section is the one right after the pool fragment.
    let sections: Vec<&str> = scriptsig.split("2f").collect();
    let mut info_ascii = String::new();
    for (i, section) in sections.iter().enumerate() {
        if section.contains(info.coinbase_hex_fragment) {
            if i + 1 < sections.len() {
                if let Ok(bytes) = hex::decode(sections[i + 1]) {
                    info_ascii = decoder::ascii_lossy_bytes(&bytes);
                }
            }
            break;
        }
    }

    // Solo miners running pool software self-identify here
    if info_ascii == "mined by IceBerg" {
        return "IceBerg".to_string();
    }
    if info_ascii == "mined by iceberg" {
        return "iceberg".to_string();
    }
    if info_ascii.is_empty() {
        return info.miner.to_string();
    }
    format!("{}, {}", info.miner, info_ascii)
}

/// Find the staking reward output: the coinbase payout worth the configured
/// percentage (within padding) of the total coinbase value. Blocks before
/// activation have no staker.
pub fn find_staker(height: u64, outputs: &[TxOutput], cfg: &DigestConfig) -> Option<StakerInfo> {
    if height < cfg.staking_activation_height {
        return None;
    }
    let total: u64 = outputs.iter().map(|o| o.sats).sum();
    let min_staker_value = total * cfg.staking_reward_percent / 100;
    let max_staker_value =
        total * (cfg.staking_reward_percent + cfg.staker_percent_padding) / 100;

    for output in outputs {
        if output.sats >= min_staker_value && output.sats <= max_staker_value {
            return Some(StakerInfo {
                address: script_to_address(&output.output_script),
                reward_sats: output.sats,
            });
        }
    }
    // A miner that overpays or underpays rewards produces no staker line
    None
}
