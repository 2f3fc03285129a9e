//! Raw chain data model as supplied by the indexer, plus the per-call
//! lookup types (token metadata, prices, script balances) the formatter
//! consumes.
//!
//! Everything here is plain data. The indexer client deserialises into these
//! structs; the classification core only ever reads them.

use serde::{Deserialize, Serialize};

/// Reference to a transaction output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutPoint {
    pub txid: String,
    pub out_idx: u32,
}

/// A token quantity attached to an input or output, in undecimalized atoms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAmount {
    pub token_id: String,
    pub atoms: u128,
}

/// Transaction input with its previous output resolved by the indexer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxInput {
    pub prev_out: OutPoint,
    /// scriptSig, hex encoded. Carries the coinbase tag data for coinbase txs.
    pub input_script: String,
    /// Locking script of the spent output, hex encoded.
    /// Absent for coinbase inputs.
    #[serde(default)]
    pub output_script: Option<String>,
    pub sats: u64,
    #[serde(default)]
    pub token: Option<TokenAmount>,
}

/// Transaction output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxOutput {
    pub sats: u64,
    /// Locking script, hex encoded
    pub output_script: String,
    #[serde(default)]
    pub token: Option<TokenAmount>,
    #[serde(default)]
    pub spent_by: Option<OutPoint>,
}

/// Token protocols the indexer reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenProtocol {
    Slp,
    Alp,
}

/// SLP token type numbers as reported by the indexer
pub const SLP_FUNGIBLE: u32 = 1;
pub const SLP_NFT_CHILD: u32 = 65;
pub const SLP_NFT_COLLECTION: u32 = 129;

/// Transaction-level token action reported by the indexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenTxType {
    Genesis,
    Send,
    Mint,
    Burn,
    Unknown,
}

/// One token action within a transaction, as indexed.
///
/// A transaction carries at most one entry per involved token id; this core
/// classifies single-token transactions only (the first entry wins, see the
/// flow aggregator).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenEntry {
    pub token_id: String,
    pub protocol: TokenProtocol,
    pub protocol_number: u32,
    pub tx_type: TokenTxType,
    /// Atoms destroyed by this tx beyond what the outputs claim.
    /// Zero for clean sends.
    #[serde(default)]
    pub actual_burn_atoms: u128,
}

impl TokenEntry {
    /// Human label for the token standard, e.g. "SLP", "ALP", "NFT"
    pub fn type_label(&self) -> String {
        match self.protocol {
            TokenProtocol::Alp => "ALP".to_string(),
            TokenProtocol::Slp => match self.protocol_number {
                SLP_FUNGIBLE => "SLP".to_string(),
                SLP_NFT_COLLECTION => "NFT Collection".to_string(),
                SLP_NFT_CHILD => "NFT".to_string(),
                n => format!("SLP {}", n),
            },
        }
    }
}

/// A full transaction as returned by the indexer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTx {
    pub txid: String,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    /// Serialized size in bytes
    pub size: u64,
    #[serde(default)]
    pub is_coinbase: bool,
    #[serde(default)]
    pub token_entries: Vec<TokenEntry>,
}

/// Block header data the digest needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockMeta {
    pub hash: String,
    pub height: u64,
    /// Unix timestamp in seconds
    pub timestamp: i64,
}

/// A block with all of its transactions, coinbase first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawBlock {
    pub meta: BlockMeta,
    pub txs: Vec<RawTx>,
}

/// Genesis info for a token id, resolved by the token metadata source.
///
/// Passed into the formatter as a read-only map per call; the core holds no
/// metadata cache of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenMeta {
    pub token_ticker: String,
    pub token_name: String,
    pub decimals: u32,
    #[serde(default)]
    pub url: Option<String>,
}

/// One quote from the price source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceQuote {
    pub ticker: String,
    pub fiat: String,
    pub price: f64,
}

/// Per-script info the caller may supply for balance-tier emoji tagging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptInfo {
    pub balance_sats: u64,
}
