//! Transaction flow aggregation: who sent, who received, what was change.
//!
//! A script spent by any input is a sender; every output locking to a sender
//! script is change, every other output is a receiving entry. The payload
//! output (zero-value data carrier) is kept under its own key so recipient
//! counts and address rendering can skip it without losing track of it.
//! The same partition runs a second time over token-bearing outputs for the
//! transaction's active token.

use serde::Serialize;

use crate::errors::{AppError, AppResult};
use crate::types::RawTx;

/// Key of one receiving entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum OutputKey {
    /// Locking script, hex
    Script(String),
    /// The data-carrier output
    Payload,
}

/// Insertion-ordered amount accumulator. Transactions have few distinct
/// output scripts; linear lookup beats pulling in an ordered-map dependency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderedAmounts<K: PartialEq, V> {
    entries: Vec<(K, V)>,
}

impl<K: PartialEq, V> Default for OrderedAmounts<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: PartialEq, V: Copy + std::ops::Add<Output = V>> OrderedAmounts<K, V> {
    pub fn add(&mut self, key: K, value: V) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = *v + value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(K, V)> {
        self.entries.iter()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
    }
}

/// Token-facet flow for the transaction's single active token
#[derive(Debug, Clone, Serialize)]
pub struct TokenFlow {
    pub token_id: String,
    pub sending_scripts: Vec<String>,
    pub change_outputs: OrderedAmounts<String, u128>,
    pub receiving_outputs: OrderedAmounts<String, u128>,
    /// Input atoms not accounted for by any output: destroyed quantity.
    /// Computed from the flow alone, whatever the payload claims.
    pub burned_atoms: u128,
    /// More than one token id moved; this facet is not classified further
    pub multi_token: bool,
}

/// Per-transaction monetary flow, base currency plus optional token facet
#[derive(Debug, Clone, Serialize)]
pub struct FlowAggregate {
    /// Scripts spent by the inputs, input order, deduplicated
    pub sending_scripts: Vec<String>,
    pub change_outputs: OrderedAmounts<String, u64>,
    pub receiving_outputs: OrderedAmounts<OutputKey, u64>,
    /// Sats sent to non-change outputs. Zero for self-sends; those are
    /// reported as "0 to itself", never dropped.
    pub total_sats_sent: u64,
    /// Sats returned to the senders
    pub change_sats: u64,
    /// Absent for coinbase transactions
    pub fee_sats: Option<u64>,
    /// Fee rate over the serialized size, display precision
    pub fee_per_byte: Option<f64>,
    pub token_flow: Option<TokenFlow>,
}

impl FlowAggregate {
    /// Receiving entries that are real scripts (payload excluded)
    pub fn receiving_scripts(&self) -> impl Iterator<Item = (&String, u64)> {
        self.receiving_outputs.iter().filter_map(|(k, v)| match k {
            OutputKey::Script(s) => Some((s, *v)),
            OutputKey::Payload => None,
        })
    }

    pub fn recipient_count(&self) -> usize {
        self.receiving_scripts().count()
    }

    pub fn first_sending_script(&self) -> Option<&str> {
        self.sending_scripts.first().map(String::as_str)
    }

    pub fn first_receiving_script(&self) -> Option<&str> {
        self.receiving_scripts().next().map(|(s, _)| s.as_str())
    }

    /// No non-payload output left the senders' scripts
    pub fn is_self_send(&self) -> bool {
        self.recipient_count() == 0
    }
}

fn is_payload_script(script_hex: &str) -> bool {
    // OP_RETURN opcode leads the locking script
    script_hex.len() >= 2 && script_hex[..2].eq_ignore_ascii_case("6a")
}

/// Aggregate one transaction's flow.
///
/// The only error is the caller handing a transaction with no outputs;
/// blockchain weirdness degrades, contract violations do not.
pub fn aggregate(tx: &RawTx) -> AppResult<FlowAggregate> {
    if tx.outputs.is_empty() {
        return Err(AppError::ContractViolation(format!(
            "transaction {} has no outputs",
            tx.txid
        )));
    }

    let mut sending_scripts: Vec<String> = Vec::new();
    let mut token_sending_scripts: Vec<String> = Vec::new();
    let mut input_sats: u64 = 0;
    let mut token_input_atoms: u128 = 0;

    // Active token id: the indexer's entry wins, else the first id seen
    let mut active_token_id: Option<String> =
        tx.token_entries.first().map(|e| e.token_id.clone());
    let mut multi_token = false;
    fn note_token_id(seen: &str, active: &mut Option<String>, multi: &mut bool) {
        match active.as_deref() {
            Some(id) if id != seen => *multi = true,
            Some(_) => {}
            None => *active = Some(seen.to_string()),
        }
    }

    for input in &tx.inputs {
        input_sats += input.sats;
        if let Some(script) = &input.output_script {
            if !sending_scripts.contains(script) {
                sending_scripts.push(script.clone());
            }
            if input.token.is_some() && !token_sending_scripts.contains(script) {
                token_sending_scripts.push(script.clone());
            }
        }
        if let Some(token) = &input.token {
            note_token_id(&token.token_id, &mut active_token_id, &mut multi_token);
            token_input_atoms += token.atoms;
        }
    }

    let mut change_outputs: OrderedAmounts<String, u64> = OrderedAmounts::default();
    let mut receiving_outputs: OrderedAmounts<OutputKey, u64> = OrderedAmounts::default();
    let mut token_change: OrderedAmounts<String, u128> = OrderedAmounts::default();
    let mut token_receiving: OrderedAmounts<String, u128> = OrderedAmounts::default();

    let mut output_sats: u64 = 0;
    let mut token_output_atoms: u128 = 0;
    let mut total_sats_sent: u64 = 0;
    let mut change_sats: u64 = 0;
    let mut any_output_token = false;

    for output in &tx.outputs {
        output_sats += output.sats;
        let script = &output.output_script;

        if sending_scripts.contains(script) {
            change_outputs.add(script.clone(), output.sats);
            change_sats += output.sats;
        } else if is_payload_script(script) {
            receiving_outputs.add(OutputKey::Payload, output.sats);
        } else {
            receiving_outputs.add(OutputKey::Script(script.clone()), output.sats);
            total_sats_sent += output.sats;
        }

        if let Some(token) = &output.token {
            any_output_token = true;
            note_token_id(&token.token_id, &mut active_token_id, &mut multi_token);
            token_output_atoms += token.atoms;
            if token_sending_scripts.contains(script) {
                token_change.add(script.clone(), token.atoms);
            } else {
                token_receiving.add(script.clone(), token.atoms);
            }
        }
    }

    let token_flow = match (active_token_id, token_input_atoms > 0 || any_output_token) {
        (Some(token_id), true) => Some(TokenFlow {
            token_id,
            sending_scripts: token_sending_scripts,
            change_outputs: token_change,
            receiving_outputs: token_receiving,
            burned_atoms: token_input_atoms.saturating_sub(token_output_atoms),
            multi_token,
        }),
        _ => None,
    };

    let (fee_sats, fee_per_byte) = if tx.is_coinbase {
        (None, None)
    } else {
        let fee = input_sats.saturating_sub(output_sats);
        let rate = if tx.size > 0 {
            let raw = fee as f64 / tx.size as f64;
            Some((raw * 100.0).round() / 100.0)
        } else {
            None
        };
        (Some(fee), rate)
    };

    Ok(FlowAggregate {
        sending_scripts,
        change_outputs,
        receiving_outputs,
        total_sats_sent,
        change_sats,
        fee_sats,
        fee_per_byte,
        token_flow,
    })
}
