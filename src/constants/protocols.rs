//! Application-protocol identifiers found at index 0 of a payload's stack
//! array, and the memo action-code table.
//!
//! Prefixes are 4 bytes except memo (2 bytes, action code folded into the
//! second byte) and the EMPP envelope (the single byte OP_RESERVED).

use lazy_static::lazy_static;
use std::collections::HashMap;

/// OP_RETURN opcode, first byte of every payload locking script
pub const OP_RETURN: u8 = 0x6a;

/// "SWP\0" - atomic swap protocol
pub const SWAP_PREFIX: [u8; 4] = [0x53, 0x57, 0x50, 0x00];
/// "drop" - airdrop distribution
pub const AIRDROP_PREFIX: [u8; 4] = [0x64, 0x72, 0x6f, 0x70];
/// "\0tab" - Cashtab message
pub const CASHTAB_MSG_PREFIX: [u8; 4] = [0x00, 0x74, 0x61, 0x62];
/// "etab" - encrypted Cashtab message
pub const CASHTAB_ENCRYPTED_PREFIX: [u8; 4] = [0x65, 0x74, 0x61, 0x62];
/// "FUZ\0" - CashFusion session report
pub const FUSION_PREFIX: [u8; 4] = [0x46, 0x55, 0x5a, 0x00];
/// ".xec" - alias registration
pub const ALIAS_PREFIX: [u8; 4] = [0x2e, 0x78, 0x65, 0x63];
/// "PAY\0" - PayButton
pub const PAY_BUTTON_PREFIX: [u8; 4] = [0x50, 0x41, 0x59, 0x00];
/// "payw" - paywall payment
pub const PAYWALL_PREFIX: [u8; 4] = [0x70, 0x61, 0x79, 0x77];
/// "auth" - eCashChat authentication
pub const AUTH_PREFIX: [u8; 4] = [0x61, 0x75, 0x74, 0x68];

/// First byte of a memo action prefix ("m")
pub const MEMO_PREFIX_BYTE: u8 = 0x6d;
/// OP_RESERVED, pushed as-is to open an EMPP multi-push envelope
pub const EMPP_ENVELOPE_BYTE: u8 = 0x50;
/// "SLP2" - token payload prefix inside an EMPP push
pub const SLP2_PREFIX: [u8; 4] = [0x53, 0x4c, 0x50, 0x32];

lazy_static! {
    /// memo action code -> action phrase.
    ///
    /// Field layouts per code live in the memo interpreter; this table only
    /// names the action for rendering.
    pub static ref MEMO_ACTIONS: HashMap<u8, &'static str> = {
        let mut m = HashMap::new();
        m.insert(0x01, "Set name");
        m.insert(0x02, "Post memo");
        m.insert(0x03, "Reply to memo");
        m.insert(0x04, "Like / tip memo");
        m.insert(0x05, "Set profile text");
        m.insert(0x06, "Follow user");
        m.insert(0x07, "Unfollow user");
        m.insert(0x0a, "Set profile picture");
        m.insert(0x0b, "Repost memo");
        m.insert(0x0c, "Post topic message");
        m.insert(0x0d, "Topic follow");
        m.insert(0x0e, "Topic unfollow");
        m.insert(0x10, "Create poll");
        m.insert(0x13, "Add poll option");
        m.insert(0x14, "Poll vote");
        m.insert(0x16, "Mute user");
        m.insert(0x17, "Unmute user");
        m.insert(0x20, "Link request");
        m.insert(0x21, "Link accept");
        m.insert(0x22, "Link revoke");
        m.insert(0x24, "Send money");
        m.insert(0x26, "Set address alias");
        m.insert(0x30, "Sell tokens");
        m.insert(0x31, "Token buy offer");
        m.insert(0x32, "Attach token sale signature");
        m.insert(0x35, "Pin token post");
        m
    };
}

/// Display names of the known apps
pub mod app_names {
    pub const SWAP: &str = "SWaP";
    pub const AIRDROP: &str = "Airdrop";
    pub const CASHTAB_MSG: &str = "Cashtab Msg";
    pub const CASHTAB_ENCRYPTED: &str = "Cashtab Encrypted";
    pub const FUSION: &str = "CashFusion";
    pub const ALIAS: &str = "Alias (beta)";
    pub const PAY_BUTTON: &str = "PayButton";
    pub const PAYWALL: &str = "Paywall";
    pub const AUTH: &str = "Authentication";
    pub const MEMO: &str = "memo";
    pub const EMPP: &str = "EMPP";
    pub const SLP2: &str = "SLP v2";
    pub const UNKNOWN: &str = "unknown";
}
