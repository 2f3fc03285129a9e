//! Binary payload decoder: locking script bytes -> stack array.
//!
//! Recognises the OP_RETURN data-carrier opcode and splits the remainder of
//! the script into its raw pushes, in on-chain order, with no interpretation
//! of meaning. Protocol interpreters decide what the chunks are.
//!
//! Malformed scripts never error here: a truncated final push is clamped to
//! the bytes that exist, and parsing stops quietly at the first non-push
//! opcode. "Not a payload at all" is the only `None`.

use crate::constants::protocols::OP_RETURN;

/// Ordered raw pushes extracted from one payload output's locking script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackArray(pub Vec<Vec<u8>>);

impl StackArray {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&[u8]> {
        self.0.get(index).map(|v| v.as_slice())
    }

    /// Hex rendering of the push at `index`, empty string if absent
    pub fn hex(&self, index: usize) -> String {
        self.get(index).map(hex::encode).unwrap_or_default()
    }

    /// UTF-8 decoding of the push at `index`, lossy
    pub fn utf8_lossy(&self, index: usize) -> String {
        self.get(index)
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .unwrap_or_default()
    }

    /// Byte-per-char decoding, the way node's 'ascii' codec reads payloads:
    /// every byte masked to 7 bits and mapped to a char
    pub fn ascii_lossy(&self, index: usize) -> String {
        self.get(index).map(ascii_lossy_bytes).unwrap_or_default()
    }
}

/// Byte-per-char 7-bit decoding of arbitrary bytes
pub fn ascii_lossy_bytes(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| (b & 0x7f) as char).collect()
}

/// Decode one output's locking script into its stack array.
///
/// Returns `None` when the script is not a data-carrier script (ordinary
/// payment output). Zero-length pushdata chunks are dropped so downstream
/// indices line up with the on-chain payload layout; single-opcode pushes
/// (`OP_0`, `OP_RESERVED`, `OP_1`..`OP_16`) appear as their opcode byte.
pub fn decode_payload(script: &[u8]) -> Option<StackArray> {
    if script.first() != Some(&OP_RETURN) {
        return None;
    }

    let mut pushes: Vec<Vec<u8>> = Vec::new();
    let mut pos = 1usize;

    while pos < script.len() {
        let opcode = script[pos];
        match opcode {
            // OP_0: represented by its opcode byte, like OP_1..OP_16.
            // App layouts (PayButton version/data fields) rely on seeing it.
            0x00 => {
                pushes.push(vec![0x00]);
                pos += 1;
            }
            // Direct push of 1-75 bytes
            0x01..=0x4b => {
                let len = opcode as usize;
                let (chunk, consumed) = take_clamped(&script[pos + 1..], len);
                if !chunk.is_empty() {
                    pushes.push(chunk);
                }
                pos += 1 + consumed;
            }
            // OP_PUSHDATA1
            0x4c => {
                let Some(&len) = script.get(pos + 1) else { break };
                let (chunk, consumed) = take_clamped(&script[pos + 2..], len as usize);
                if !chunk.is_empty() {
                    pushes.push(chunk);
                }
                pos += 2 + consumed;
            }
            // OP_PUSHDATA2, little-endian length
            0x4d => {
                if pos + 3 > script.len() {
                    break;
                }
                let len = u16::from_le_bytes([script[pos + 1], script[pos + 2]]) as usize;
                let (chunk, consumed) = take_clamped(&script[pos + 3..], len);
                if !chunk.is_empty() {
                    pushes.push(chunk);
                }
                pos += 3 + consumed;
            }
            // OP_PUSHDATA4, little-endian length
            0x4e => {
                if pos + 5 > script.len() {
                    break;
                }
                let len = u32::from_le_bytes([
                    script[pos + 1],
                    script[pos + 2],
                    script[pos + 3],
                    script[pos + 4],
                ]) as usize;
                let (chunk, consumed) = take_clamped(&script[pos + 5..], len);
                if !chunk.is_empty() {
                    pushes.push(chunk);
                }
                pos += 5 + consumed;
            }
            // OP_1NEGATE, OP_RESERVED, OP_1..OP_16: the opcode itself is the
            // chunk. OP_RESERVED keys the EMPP envelope and must survive at
            // index 0.
            0x4f..=0x60 => {
                pushes.push(vec![opcode]);
                pos += 1;
            }
            // Anything else is not a push; stop and hand over what we have
            _ => break,
        }
    }

    Some(StackArray(pushes))
}

/// Take up to `want` bytes, clamping at the end of the script
fn take_clamped(bytes: &[u8], want: usize) -> (Vec<u8>, usize) {
    let take = want.min(bytes.len());
    (bytes[..take].to_vec(), take)
}
