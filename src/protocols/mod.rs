//! Protocol interpreters: stack array -> `ProtocolRecord`.
//!
//! Dispatch keys on the chunk at index 0: the 4-byte app prefixes, the
//! 2-byte memo prefix, or the single OP_RESERVED byte that opens an EMPP
//! envelope. Unregistered prefixes degrade to `Unrecognized` - interpreters
//! never fail on byte-level weirdness.

pub mod apps;
pub mod memo;
pub mod record;
pub mod swap;
pub mod token;

use crate::constants::protocols as prefixes;
use crate::decoder::StackArray;
pub use record::{ProtocolRecord, Unrecognized, UnrecognizedReason};

/// Interpret one payload stack array against the protocol registry.
pub fn interpret(stack: &StackArray) -> ProtocolRecord {
    let Some(first) = stack.get(0) else {
        return ProtocolRecord::Unrecognized(Unrecognized::new(
            UnrecognizedReason::EmptyPayload,
            Vec::new(),
        ));
    };

    // memo: two-byte prefix, action code in the second byte
    if first.len() == 2 && first[0] == prefixes::MEMO_PREFIX_BYTE {
        return memo::interpret(stack, first[1]);
    }

    // EMPP envelope: a lone OP_RESERVED byte
    if first.len() == 1 && first[0] == prefixes::EMPP_ENVELOPE_BYTE {
        return token::interpret_multipush(stack);
    }

    match <[u8; 4]>::try_from(first) {
        Ok(prefixes::SWAP_PREFIX) => swap::interpret(stack),
        Ok(prefixes::AIRDROP_PREFIX) => apps::interpret_airdrop(stack),
        Ok(prefixes::CASHTAB_MSG_PREFIX) => apps::interpret_cashtab_msg(stack),
        Ok(prefixes::CASHTAB_ENCRYPTED_PREFIX) => apps::interpret_cashtab_encrypted(),
        Ok(prefixes::FUSION_PREFIX) => apps::interpret_fusion(stack),
        Ok(prefixes::ALIAS_PREFIX) => apps::interpret_alias(stack),
        Ok(prefixes::PAY_BUTTON_PREFIX) => apps::interpret_pay_button(stack),
        Ok(prefixes::PAYWALL_PREFIX) => apps::interpret_paywall(stack),
        Ok(prefixes::AUTH_PREFIX) => apps::interpret_authentication(stack),
        _ => ProtocolRecord::Unrecognized(Unrecognized::new(
            UnrecognizedReason::UnknownPrefix,
            stack.0.iter().map(hex::encode).collect(),
        )),
    }
}
