//! Token payload interpreter for the EMPP multi-push envelope.
//!
//! An EMPP payload opens with a bare OP_RESERVED chunk; each following push
//! is its own sub-payload. The one this core understands is the "SLP2" token
//! payload: 1-byte token type, length-prefixed section tag, and for
//! SEND/MINT a byte-reversed token id plus fixed-width little-endian atom
//! amounts per output. Sibling pushes with no known prefix are kept as 7-bit
//! decodes so the digest can still show them.

use byteorder::{ByteOrder, LittleEndian};

use super::record::{ProtocolRecord, TokenPayload, Unrecognized, UnrecognizedReason};
use crate::constants::protocols::SLP2_PREFIX;
use crate::decoder::{ascii_lossy_bytes, StackArray};

const TOKEN_ID_BYTES: usize = 32;
/// Atom amounts are 6-byte little-endian integers
const AMOUNT_BYTES: usize = 6;

/// Interpret a full EMPP envelope (chunk 0 is the OP_RESERVED marker).
pub fn interpret_multipush(stack: &StackArray) -> ProtocolRecord {
    let mut token_record: Option<ProtocolRecord> = None;
    let mut extras: Vec<String> = Vec::new();

    for push in stack.0.iter().skip(1) {
        if token_record.is_none() && push.len() >= 4 && push[..4] == SLP2_PREFIX {
            token_record = Some(parse_slp2(&push[4..], stack));
        } else {
            // No spec to parse by; keep a 7-bit decode of the whole push
            extras.push(ascii_lossy_bytes(push));
        }
    }

    match token_record {
        Some(mut record) => {
            if let ProtocolRecord::TokenSend(p)
            | ProtocolRecord::TokenGenesis(p)
            | ProtocolRecord::TokenMint(p)
            | ProtocolRecord::TokenBurn(p) = &mut record
            {
                p.extra_pushes = extras;
            }
            record
        }
        None => ProtocolRecord::Unrecognized(Unrecognized::new(
            UnrecognizedReason::UnknownEmppPush { decoded: extras },
            stack.0.iter().map(hex::encode).collect(),
        )),
    }
}

/// Parse one SLP2 push with the 4-byte prefix already removed.
fn parse_slp2(payload: &[u8], stack: &StackArray) -> ProtocolRecord {
    let mut cursor = payload;

    let unknown_token_type = match take(&mut cursor, 1) {
        Some([token_type]) => *token_type != 0x00,
        _ => true,
    };

    let section = take(&mut cursor, 1)
        .map(|len| len[0] as usize)
        .and_then(|len| take(&mut cursor, len))
        .map(|tag| String::from_utf8_lossy(tag).into_owned());

    let Some(section) = section else {
        return ProtocolRecord::Unrecognized(Unrecognized::new(
            UnrecognizedReason::UnknownTokenSection { tag: String::new() },
            stack.0.iter().map(hex::encode).collect(),
        ));
    };

    let mut payload_out = TokenPayload {
        unknown_token_type,
        ..TokenPayload::default()
    };

    match section.as_str() {
        "SEND" | "MINT" => {
            // token id is stored byte-reversed on the wire
            if let Some(id) = take(&mut cursor, TOKEN_ID_BYTES) {
                let mut reversed = id.to_vec();
                reversed.reverse();
                payload_out.token_id = Some(hex::encode(reversed));
            }
            if let Some([count]) = take(&mut cursor, 1) {
                for _ in 0..*count {
                    match take(&mut cursor, AMOUNT_BYTES) {
                        Some(raw) => payload_out.output_atoms.push(LittleEndian::read_u48(raw)),
                        // Truncated amount list: keep what decoded
                        None => break,
                    }
                }
            }
            if section == "SEND" {
                ProtocolRecord::TokenSend(payload_out)
            } else {
                ProtocolRecord::TokenMint(payload_out)
            }
        }
        "GENESIS" => ProtocolRecord::TokenGenesis(payload_out),
        "BURN" => ProtocolRecord::TokenBurn(payload_out),
        tag => ProtocolRecord::Unrecognized(Unrecognized::new(
            UnrecognizedReason::UnknownTokenSection {
                tag: tag.to_string(),
            },
            stack.0.iter().map(hex::encode).collect(),
        )),
    }
}

fn take<'a>(cursor: &mut &'a [u8], n: usize) -> Option<&'a [u8]> {
    if cursor.len() < n {
        return None;
    }
    let (head, rest) = cursor.split_at(n);
    *cursor = rest;
    Some(head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::decode_payload;
    use crate::protocols::interpret;

    fn interpret_script(script_hex: &str) -> ProtocolRecord {
        let script = hex::decode(script_hex).unwrap();
        interpret(&decode_payload(&script).unwrap())
    }

    #[test]
    fn send_section_with_reversed_token_id_and_amounts() {
        // OP_RESERVED envelope, one SLP2 SEND push with three outputs
        let record = interpret_script(
            "6a503d534c5032c80453454e440748dae47347c2cf32838eaddedc60866160f077\
             2a022b17463aa435809ac63503102700000000584d00000000640000000000",
        );
        match record {
            ProtocolRecord::TokenSend(p) => {
                assert_eq!(
                    p.token_id.as_deref(),
                    Some("35c69a8035a43a46172b022a77f060618660dcdead8e8332cfc24773e4da4807")
                );
                assert_eq!(p.output_atoms, vec![10_000, 19_800, 100]);
                // token type 0xc8 is not the standard type
                assert!(p.unknown_token_type);
                assert!(p.extra_pushes.is_empty());
            }
            other => panic!("unexpected record: {:?}", other),
        }
    }

    #[test]
    fn burn_section_with_standard_token_type() {
        let record = interpret_script(
            "6a5030534c503200044255524e45e1f25de444e399b6d46fa66e3424c04549a85a\
             14b12bc9a4ddc9cdcdcdcdcd204e00000000",
        );
        match record {
            ProtocolRecord::TokenBurn(p) => {
                assert!(!p.unknown_token_type);
                assert!(p.token_id.is_none());
            }
            other => panic!("unexpected record: {:?}", other),
        }
    }

    #[test]
    fn trailing_non_slp2_push_is_kept_as_extra() {
        // SEND push followed by a Cashtab-style push the envelope spec does
        // not cover; the 7-bit decode is preserved
        let record = interpret_script(
            "6a503d534c5032c80453454e440748dae47347c2cf32838eaddedc60866160f077\
             2a022b17463aa435809ac63503102700000000584d000000006400000000002e04\
             007461622846726f6d20467265657865632c207468616e6b20796f7520666f7220\
             796f757220737570706f7274",
        );
        match record {
            ProtocolRecord::TokenSend(p) => {
                assert_eq!(p.extra_pushes.len(), 1);
                assert!(p.extra_pushes[0].ends_with("From Freexec, thank you for your support"));
            }
            other => panic!("unexpected record: {:?}", other),
        }
    }

    #[test]
    fn envelope_without_slp2_push_degrades_to_unknown_empp() {
        let record = interpret_script("6a500b68656c6c6f20776f726c64");
        match record {
            ProtocolRecord::Unrecognized(u) => match u.reason {
                UnrecognizedReason::UnknownEmppPush { decoded } => {
                    assert_eq!(decoded, vec!["hello world".to_string()]);
                }
                other => panic!("unexpected reason: {:?}", other),
            },
            other => panic!("unexpected record: {:?}", other),
        }
    }

    #[test]
    fn truncated_amount_list_keeps_decoded_amounts() {
        // Declares 3 outputs but carries bytes for one and a half
        let record = interpret_script(
            "6a5033534c5032000453454e440748dae47347c2cf32838eaddedc60866160f077\
             2a022b17463aa435809ac63503102700000000584d",
        );
        match record {
            ProtocolRecord::TokenSend(p) => {
                assert_eq!(p.output_atoms, vec![10_000]);
            }
            other => panic!("unexpected record: {:?}", other),
        }
    }
}
