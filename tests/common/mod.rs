//! Shared fixture builders for the integration tests: canned scripts,
//! transactions and blocks shaped like indexer output.

#![allow(dead_code)]

use ecash_digest::types::{
    BlockMeta, OutPoint, RawBlock, RawTx, TokenAmount, TokenEntry, TokenProtocol, TokenTxType,
    TxInput, TxOutput,
};

/// Deterministic p2pkh locking script built from a filler byte
pub fn p2pkh_script(byte: u8) -> String {
    format!("76a914{}88ac", hex::encode([byte; 20]))
}

pub fn input(script: &str, sats: u64) -> TxInput {
    TxInput {
        prev_out: OutPoint {
            txid: "00".repeat(32),
            out_idx: 0,
        },
        input_script: String::new(),
        output_script: Some(script.to_string()),
        sats,
        token: None,
    }
}

pub fn token_input(script: &str, sats: u64, token_id: &str, atoms: u128) -> TxInput {
    let mut i = input(script, sats);
    i.token = Some(TokenAmount {
        token_id: token_id.to_string(),
        atoms,
    });
    i
}

pub fn output(script: &str, sats: u64) -> TxOutput {
    TxOutput {
        sats,
        output_script: script.to_string(),
        token: None,
        spent_by: None,
    }
}

pub fn token_output(script: &str, sats: u64, token_id: &str, atoms: u128) -> TxOutput {
    let mut o = output(script, sats);
    o.token = Some(TokenAmount {
        token_id: token_id.to_string(),
        atoms,
    });
    o
}

pub fn tx(txid_byte: u8, inputs: Vec<TxInput>, outputs: Vec<TxOutput>) -> RawTx {
    RawTx {
        txid: hex::encode([txid_byte; 32]),
        inputs,
        outputs,
        size: 250,
        is_coinbase: false,
        token_entries: vec![],
    }
}

pub fn send_entry(token_id: &str) -> TokenEntry {
    TokenEntry {
        token_id: token_id.to_string(),
        protocol: TokenProtocol::Slp,
        protocol_number: 1,
        tx_type: TokenTxType::Send,
        actual_burn_atoms: 0,
    }
}

pub fn genesis_entry(token_id: &str) -> TokenEntry {
    TokenEntry {
        tx_type: TokenTxType::Genesis,
        ..send_entry(token_id)
    }
}

pub fn burn_entry(token_id: &str, burned: u128) -> TokenEntry {
    TokenEntry {
        actual_burn_atoms: burned,
        ..send_entry(token_id)
    }
}

/// Minimal coinbase paying a single output
pub fn coinbase(script: &str, sats: u64) -> RawTx {
    RawTx {
        txid: "cb".repeat(32),
        inputs: vec![TxInput {
            prev_out: OutPoint {
                txid: "00".repeat(32),
                out_idx: u32::MAX,
            },
            input_script: "0378120c".to_string(),
            output_script: None,
            sats: 0,
            token: None,
        }],
        outputs: vec![output(script, sats)],
        size: 200,
        is_coinbase: true,
        token_entries: vec![],
    }
}

pub fn block(height: u64, txs: Vec<RawTx>) -> RawBlock {
    RawBlock {
        meta: BlockMeta {
            hash: "0f".repeat(32),
            height,
            timestamp: 1_700_000_000,
        },
        txs,
    }
}
