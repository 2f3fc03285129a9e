//! memo protocol interpreter.
//!
//! The two-byte prefix folds the action code into its second byte; each code
//! has a fixed field layout. Absent fields are simply skipped - memo wallets
//! ship plenty of short payloads and the digest still wants a line for them.

use super::record::{MemoAction, MemoPart, ProtocolRecord, Unrecognized, UnrecognizedReason};
use crate::constants::protocols::MEMO_ACTIONS;
use crate::decoder::StackArray;

const TX_HASH_BYTES: usize = 32;
const HASH160_BYTES: usize = 20;

pub fn interpret(stack: &StackArray, code: u8) -> ProtocolRecord {
    let Some(action) = MEMO_ACTIONS.get(&code).copied() else {
        // Keep the raw code observable on the digest line
        return ProtocolRecord::Unrecognized(Unrecognized::new(
            UnrecognizedReason::UnknownMemoCode { code },
            stack.0.iter().map(hex::encode).collect(),
        ));
    };

    let mut parts: Vec<MemoPart> = Vec::new();
    match code {
        // <text>
        0x01 | 0x02 | 0x05 | 0x0d | 0x0e => {
            push_text(&mut parts, stack, 1);
        }
        // <tx_hash> <message>
        0x03 | 0x0b => {
            push_tx_ref(&mut parts, stack, 1);
            push_text(&mut parts, stack, 2);
        }
        // <tx_hash>
        0x04 => {
            push_tx_ref(&mut parts, stack, 1);
        }
        // <address_hash>
        0x06 | 0x07 | 0x16 | 0x17 => {
            push_address(&mut parts, stack, 1);
        }
        // <url>
        0x0a => {
            if let Some(url) = text_at(stack, 1) {
                parts.push(MemoPart::ImageUrl(url));
            }
        }
        // <topic_name> <message>
        0x0c => {
            push_text(&mut parts, stack, 1);
            push_text(&mut parts, stack, 2);
        }
        // <poll_type> <option_count> <question>
        0x10 => {
            push_text(&mut parts, stack, 3);
        }
        // <poll_tx_hash> <option> / <poll_tx_hash> <comment>
        0x13 | 0x14 => {
            push_text(&mut parts, stack, 2);
        }
        // <address_hash> <message>
        0x20 | 0x24 | 0x26 => {
            push_address(&mut parts, stack, 1);
            push_text(&mut parts, stack, 2);
        }
        // Token-sale handshake steps and pins: action phrase only; decoding
        // the referenced tokens is not worth it for a one-line digest
        0x21 | 0x22 | 0x30 | 0x31 | 0x32 | 0x35 => {}
        _ => {}
    }

    ProtocolRecord::MemoAction(MemoAction {
        code,
        action,
        parts,
    })
}

fn text_at(stack: &StackArray, index: usize) -> Option<String> {
    stack
        .get(index)
        .map(|b| String::from_utf8_lossy(b).into_owned())
}

fn push_text(parts: &mut Vec<MemoPart>, stack: &StackArray, index: usize) {
    if let Some(text) = text_at(stack, index) {
        parts.push(MemoPart::Text(text));
    }
}

fn push_tx_ref(parts: &mut Vec<MemoPart>, stack: &StackArray, index: usize) {
    if let Some(hash) = stack.get(index).filter(|b| b.len() == TX_HASH_BYTES) {
        parts.push(MemoPart::TxRef(hex::encode(hash)));
    }
}

fn push_address(parts: &mut Vec<MemoPart>, stack: &StackArray, index: usize) {
    if let Some(hash) = stack.get(index).filter(|b| b.len() == HASH160_BYTES) {
        parts.push(MemoPart::AddressRef(hex::encode(hash)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::decode_payload;
    use crate::protocols::interpret as dispatch;

    fn interpret_script(script_hex: &str) -> ProtocolRecord {
        let script = hex::decode(script_hex).unwrap();
        dispatch(&decode_payload(&script).unwrap())
    }

    #[test]
    fn post_memo_carries_text() {
        // 6d02 "hello"
        match interpret_script("6a026d020568656c6c6f") {
            ProtocolRecord::MemoAction(m) => {
                assert_eq!(m.code, 0x02);
                assert_eq!(m.action, "Post memo");
                assert_eq!(m.parts, vec![MemoPart::Text("hello".to_string())]);
            }
            other => panic!("unexpected record: {:?}", other),
        }
    }

    #[test]
    fn reply_references_the_memo_and_the_text() {
        let tx_hash = "eae5710aba50a0a22b266ddbb445e05b7348d15c88cbc2e012a91a09bec3861a";
        let script = format!("6a026d0320{}026f6b", tx_hash);
        match interpret_script(&script) {
            ProtocolRecord::MemoAction(m) => {
                assert_eq!(m.action, "Reply to memo");
                assert_eq!(
                    m.parts,
                    vec![
                        MemoPart::TxRef(tx_hash.to_string()),
                        MemoPart::Text("ok".to_string()),
                    ]
                );
            }
            other => panic!("unexpected record: {:?}", other),
        }
    }

    #[test]
    fn follow_user_carries_the_address_hash() {
        let hash160 = "0b7d35fda03544a08e65464d54cfae4257eb6db7";
        let script = format!("6a026d0614{}", hash160);
        match interpret_script(&script) {
            ProtocolRecord::MemoAction(m) => {
                assert_eq!(m.action, "Follow user");
                assert_eq!(m.parts, vec![MemoPart::AddressRef(hash160.to_string())]);
            }
            other => panic!("unexpected record: {:?}", other),
        }
    }

    #[test]
    fn poll_question_sits_at_index_three() {
        // 6d10 <poll_type> <option_count> <question>
        match interpret_script("6a026d100101010204676f6f64") {
            ProtocolRecord::MemoAction(m) => {
                assert_eq!(m.action, "Create poll");
                assert_eq!(m.parts, vec![MemoPart::Text("good".to_string())]);
            }
            other => panic!("unexpected record: {:?}", other),
        }
    }

    #[test]
    fn phrase_only_codes_have_no_parts() {
        match interpret_script("6a026d30") {
            ProtocolRecord::MemoAction(m) => {
                assert_eq!(m.action, "Sell tokens");
                assert!(m.parts.is_empty());
            }
            other => panic!("unexpected record: {:?}", other),
        }
    }

    #[test]
    fn unknown_code_reports_the_raw_value() {
        match interpret_script("6a026dff0568656c6c6f") {
            ProtocolRecord::Unrecognized(u) => {
                assert_eq!(u.reason, UnrecognizedReason::UnknownMemoCode { code: 0xff });
            }
            other => panic!("unexpected record: {:?}", other),
        }
    }

    #[test]
    fn truncated_layout_keeps_what_exists() {
        // Reply with the hash push missing entirely
        match interpret_script("6a026d03") {
            ProtocolRecord::MemoAction(m) => {
                assert_eq!(m.action, "Reply to memo");
                assert!(m.parts.is_empty());
            }
            other => panic!("unexpected record: {:?}", other),
        }
    }
}
