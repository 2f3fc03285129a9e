//! Static registries: protocol prefixes, memo action codes, known miners,
//! known address labels, and the emoji vocabulary of the digest.

pub mod addresses;
pub mod miners;
pub mod protocols;

/// Emoji tags used by the digest renderer
pub mod emoji {
    pub const BLOCK: &str = "📦";
    pub const XEC_SEND: &str = "💸";
    pub const TOKEN_GENESIS: &str = "🧪";
    pub const TOKEN_BURN: &str = "🔥";
    pub const MEMO: &str = "🗞";
    pub const FUSION: &str = "⚛️";
    pub const UNKNOWN: &str = "❓";
    pub const AIRDROP: &str = "🪂";
    pub const CASHTAB_MSG: &str = "🖋";
    pub const CASHTAB_ENCRYPTED: &str = "🔏";
    pub const ALIAS: &str = "👾";
    pub const SWAP: &str = "🤳";
    pub const PAY_BUTTON: &str = "🛒";
    pub const PAYWALL: &str = "🧱";
    pub const AUTH: &str = "🔓";
    pub const STAKER: &str = "💰";
    pub const ARROW_RIGHT: &str = "➡️";
    pub const HALVING: &str = "⏰";

    /// Balance-tier emojis, largest first
    pub const BIG_WHALE: &str = "🐳";
    pub const MODEST_WHALE: &str = "🐋";
    pub const SHARK: &str = "🦈";
    pub const SWORDFISH: &str = "🐬";
    pub const BARRACUDA: &str = "🐠";
    pub const OCTOPUS: &str = "🐙";
    pub const PIRANHA: &str = "🐡";
    pub const CRAB: &str = "🦀";
    pub const SHRIMP: &str = "🦐";
}

/// Fiat currency symbol for a lowercase fiat code. Unknown codes get no symbol.
pub fn fiat_symbol(fiat_code: &str) -> &'static str {
    match fiat_code {
        "usd" => "$",
        "eur" => "€",
        "gbp" => "£",
        "jpy" => "¥",
        _ => "",
    }
}
