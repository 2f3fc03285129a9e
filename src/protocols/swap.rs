//! SWaP protocol interpreter.
//!
//! Stack layout: `[prefix, msg_class, msg_type, ...]` with class 01 = Signal
//! and 02 = Payment; type 01 = SLP Atomic Swap, 02 = Multi-Party Escrow,
//! 03 = Threshold Crowdfunding.
//!
//! A signal's rate and minimum-trade fields are ambiguous on chain: the spec
//! example encodes them as hex integers, but wallets have shipped ASCII
//! digit strings in the same positions. The inherited heuristic: a field
//! longer than two bytes consisting solely of ASCII digits is read as the
//! ASCII decimal value, anything else as a big-endian hex integer. This is a
//! documented protocol ambiguity, not something to second-guess.

use super::record::{
    AmountEncoding, ProtocolRecord, SwapAmount, SwapMsgType, SwapSide, SwapSignal, Unrecognized,
    UnrecognizedReason,
};
use crate::decoder::StackArray;

const TOKEN_ID_BYTES: usize = 32;

/// Stack index of each signal field, per the SWaP spec
const IDX_CLASS: usize = 1;
const IDX_TYPE: usize = 2;
const IDX_TOKEN_ID: usize = 3;
const IDX_SIDE: usize = 4;
const IDX_RATE: usize = 5;
const IDX_MIN_TRADE: usize = 9;

pub fn interpret(stack: &StackArray) -> ProtocolRecord {
    let (Some(class), Some(subtype)) = (single_byte(stack, IDX_CLASS), single_byte(stack, IDX_TYPE))
    else {
        // Too short to carry class and type
        return ProtocolRecord::Unrecognized(Unrecognized::new(
            UnrecognizedReason::MalformedSwap,
            raw_pushes(stack),
        ));
    };

    match (class, subtype) {
        (0x01, 0x01) => ProtocolRecord::AtomicSwapSignal(parse_signal(stack)),
        (0x01, 0x02) => ProtocolRecord::AtomicSwapEscrow { payment: false },
        (0x01, 0x03) => ProtocolRecord::Crowdfund { payment: false },
        (0x02, 0x01) => ProtocolRecord::AtomicSwapPayment {
            kind: SwapMsgType::AtomicSwap,
        },
        (0x02, 0x02) => ProtocolRecord::AtomicSwapEscrow { payment: true },
        (0x02, 0x03) => ProtocolRecord::Crowdfund { payment: true },
        (class, subtype) => {
            // Unknown sub-type: still report the token id when it decodes,
            // so the digest can name the ticker on the malformed line
            ProtocolRecord::Unrecognized(
                Unrecognized::new(
                    UnrecognizedReason::UnknownSwapSubtype { class, subtype },
                    raw_pushes(stack),
                )
                .with_token_id(token_id_at(stack, IDX_TOKEN_ID)),
            )
        }
    }
}

fn parse_signal(stack: &StackArray) -> SwapSignal {
    let side = stack.get(IDX_SIDE).map(|bytes| {
        match std::str::from_utf8(bytes) {
            Ok("BUY") => SwapSide::Buy,
            Ok("SELL") => SwapSide::Sell,
            _ => SwapSide::Other(crate::decoder::ascii_lossy_bytes(bytes)),
        }
    });

    SwapSignal {
        token_id: token_id_at(stack, IDX_TOKEN_ID),
        side,
        rate: stack.get(IDX_RATE).and_then(parse_ambiguous_amount),
        min_trade: stack.get(IDX_MIN_TRADE).and_then(parse_ambiguous_amount),
    }
}

/// Apply the hex/ASCII disambiguation rule to a raw amount field.
///
/// `3130303030303030` is ASCII "10000000" and must read as ten million, not
/// as its (absurd) hex value. `0258` stays hex: 600.
pub fn parse_ambiguous_amount(bytes: &[u8]) -> Option<SwapAmount> {
    if bytes.is_empty() {
        return None;
    }
    if bytes.len() > 2 && bytes.iter().all(u8::is_ascii_digit) {
        let text = std::str::from_utf8(bytes).ok()?;
        return text.parse::<u128>().ok().map(|sats| SwapAmount {
            sats,
            encoding: AmountEncoding::Ascii,
        });
    }
    if bytes.len() > 16 {
        // Wider than u128, not a plausible sats amount
        return None;
    }
    let mut sats: u128 = 0;
    for &b in bytes {
        sats = (sats << 8) | b as u128;
    }
    Some(SwapAmount {
        sats,
        encoding: AmountEncoding::Hex,
    })
}

fn single_byte(stack: &StackArray, index: usize) -> Option<u8> {
    match stack.get(index) {
        Some([b]) => Some(*b),
        _ => None,
    }
}

fn token_id_at(stack: &StackArray, index: usize) -> Option<String> {
    stack
        .get(index)
        .filter(|bytes| bytes.len() == TOKEN_ID_BYTES)
        .map(hex::encode)
}

fn raw_pushes(stack: &StackArray) -> Vec<String> {
    stack.0.iter().map(hex::encode).collect()
}
