//! cashaddr encoding for eCash addresses.
//!
//! Only the encoding direction is needed: locking scripts and memo hash160s
//! become `ecash:q...`/`ecash:p...` strings for display. The codec is the
//! standard cashaddr base32 with the 40-bit polymod checksum.

use crate::errors::{AppError, AppResult};

const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";
const PREFIX: &str = "ecash";

/// Address type encoded in the version byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressType {
    P2pkh,
    P2sh,
}

impl AddressType {
    fn version_byte(self) -> u8 {
        match self {
            AddressType::P2pkh => 0x00,
            AddressType::P2sh => 0x08,
        }
    }
}

fn polymod(values: &[u8]) -> u64 {
    let mut c: u64 = 1;
    for &d in values {
        let c0 = (c >> 35) as u8;
        c = ((c & 0x0007_ffff_ffff) << 5) ^ d as u64;
        if c0 & 0x01 != 0 {
            c ^= 0x98_f2bc_8e61;
        }
        if c0 & 0x02 != 0 {
            c ^= 0x79_b76d_99e2;
        }
        if c0 & 0x04 != 0 {
            c ^= 0xf3_3e5f_b3c4;
        }
        if c0 & 0x08 != 0 {
            c ^= 0xae_2eab_e2a8;
        }
        if c0 & 0x10 != 0 {
            c ^= 0x1e_4f43_e470;
        }
    }
    c ^ 1
}

/// Regroup 8-bit bytes into 5-bit groups, padding the tail
fn to_five_bit_groups(bytes: &[u8]) -> Vec<u8> {
    let mut groups = Vec::with_capacity(bytes.len() * 8 / 5 + 1);
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    for &b in bytes {
        acc = (acc << 8) | b as u32;
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            groups.push(((acc >> bits) & 0x1f) as u8);
        }
    }
    if bits > 0 {
        groups.push(((acc << (5 - bits)) & 0x1f) as u8);
    }
    groups
}

/// Encode a 20-byte hash as an ecash address
pub fn encode_hash160(address_type: AddressType, hash: &[u8]) -> AppResult<String> {
    if hash.len() != 20 {
        return Err(AppError::InvalidData(format!(
            "hash160 must be 20 bytes, got {}",
            hash.len()
        )));
    }

    let mut payload = Vec::with_capacity(21);
    payload.push(address_type.version_byte());
    payload.extend_from_slice(hash);
    let payload5 = to_five_bit_groups(&payload);

    // Checksum input: prefix chars masked to 5 bits, a zero separator,
    // the payload groups, then 8 zero groups as a checksum template
    let mut checksum_input: Vec<u8> = PREFIX.bytes().map(|b| b & 0x1f).collect();
    checksum_input.push(0);
    checksum_input.extend_from_slice(&payload5);
    checksum_input.extend_from_slice(&[0u8; 8]);
    let checksum = polymod(&checksum_input);

    let mut encoded = String::with_capacity(PREFIX.len() + 1 + payload5.len() + 8);
    encoded.push_str(PREFIX);
    encoded.push(':');
    for group in &payload5 {
        encoded.push(CHARSET[*group as usize] as char);
    }
    for i in 0..8 {
        let group = ((checksum >> (5 * (7 - i))) & 0x1f) as usize;
        encoded.push(CHARSET[group] as char);
    }
    Ok(encoded)
}

/// Encode a locking script as an ecash address.
///
/// Understands the two standard templates; anything else (multisig, raw
/// pubkeys, data carriers) is rendered as `script(<hex>)` by the caller.
pub fn encode_output_script(script_hex: &str) -> AppResult<String> {
    let script = hex::decode(script_hex)
        .map_err(|_| AppError::InvalidData(format!("bad script hex: {}", script_hex)))?;

    // P2PKH: OP_DUP OP_HASH160 <20> OP_EQUALVERIFY OP_CHECKSIG
    if script.len() == 25
        && script[0] == 0x76
        && script[1] == 0xa9
        && script[2] == 0x14
        && script[23] == 0x88
        && script[24] == 0xac
    {
        return encode_hash160(AddressType::P2pkh, &script[3..23]);
    }

    // P2SH: OP_HASH160 <20> OP_EQUAL
    if script.len() == 23 && script[0] == 0xa9 && script[1] == 0x14 && script[22] == 0x87 {
        return encode_hash160(AddressType::P2sh, &script[2..22]);
    }

    Err(AppError::InvalidData(format!(
        "script is not a standard address template: {}",
        script_hex
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Vectors shared with the reference JS implementation

    #[test]
    fn encodes_p2pkh_output_scripts() {
        let cases = [
            (
                "76a91476a04053bda0a88bda5177b86a15c3b29f55987388ac",
                "ecash:qpm2qsznhks23z7629mms6s4cwef74vcwva87rkuu2",
            ),
            (
                "76a914cb481232299cd5743151ac4b2d63ae198e7bb0a988ac",
                "ecash:qr95sy3j9xwd2ap32xkykttr4cvcu7as4ykdcjcn6n",
            ),
            (
                "76a914011f28e473c95f4013d7d53ec5fbc3b42df8ed1088ac",
                "ecash:qqq3728yw0y47sqn6l2na30mcw6zm78dzq653y7pv5",
            ),
        ];
        for (script, expected) in cases {
            assert_eq!(encode_output_script(script).unwrap(), expected);
        }
    }

    #[test]
    fn encodes_p2sh_output_scripts() {
        let cases = [
            (
                "a91476a04053bda0a88bda5177b86a15c3b29f55987387",
                "ecash:ppm2qsznhks23z7629mms6s4cwef74vcwv2zrv3l8h",
            ),
            (
                "a914cb481232299cd5743151ac4b2d63ae198e7bb0a987",
                "ecash:pr95sy3j9xwd2ap32xkykttr4cvcu7as4ypg9alspw",
            ),
        ];
        for (script, expected) in cases {
            assert_eq!(encode_output_script(script).unwrap(), expected);
        }
    }

    #[test]
    fn encodes_bare_hash160() {
        let hash = hex::decode("76a04053bda0a88bda5177b86a15c3b29f559873").unwrap();
        assert_eq!(
            encode_hash160(AddressType::P2pkh, &hash).unwrap(),
            "ecash:qpm2qsznhks23z7629mms6s4cwef74vcwva87rkuu2"
        );
    }

    #[test]
    fn nonstandard_scripts_are_rejected() {
        assert!(encode_output_script("6a0400746162").is_err());
        assert!(encode_output_script("51").is_err());
        assert!(encode_output_script("zz").is_err());
    }

    #[test]
    fn wrong_hash_length_is_rejected() {
        assert!(encode_hash160(AddressType::P2pkh, &[0u8; 19]).is_err());
    }
}
