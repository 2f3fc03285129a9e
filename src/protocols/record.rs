//! Structured result of interpreting one payload stack array.
//!
//! Interpreters are pure: stack array in, `ProtocolRecord` out. Rendering
//! (phrases, links, escaping) happens later in the formatter, one renderer
//! per variant.

use serde::Serialize;

/// Tagged union over everything the interpreters can recognise.
///
/// Malformed-but-identified payloads land in `Unrecognized` with the most
/// specific reason available and any fields that could still be salvaged;
/// they are never silently dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ProtocolRecord {
    TokenSend(TokenPayload),
    TokenGenesis(TokenPayload),
    TokenMint(TokenPayload),
    TokenBurn(TokenPayload),
    AtomicSwapSignal(SwapSignal),
    /// Payment-class swap message; carries only the referenced type
    AtomicSwapPayment { kind: SwapMsgType },
    AtomicSwapEscrow { payment: bool },
    Crowdfund { payment: bool },
    UserMessage(UserMessage),
    MemoAction(MemoAction),
    CoinMixReport { session_id: Option<String> },
    AirdropDistribution(Airdrop),
    Unrecognized(Unrecognized),
}

impl ProtocolRecord {
    /// Token id this record references, if it salvaged one.
    /// The block parser collects these for metadata lookup.
    pub fn token_id(&self) -> Option<&str> {
        match self {
            ProtocolRecord::TokenSend(p)
            | ProtocolRecord::TokenGenesis(p)
            | ProtocolRecord::TokenMint(p)
            | ProtocolRecord::TokenBurn(p) => p.token_id.as_deref(),
            ProtocolRecord::AtomicSwapSignal(s) => s.token_id.as_deref(),
            ProtocolRecord::AirdropDistribution(a) => a.token_id.as_deref(),
            ProtocolRecord::Unrecognized(u) => u.token_id.as_deref(),
            _ => None,
        }
    }
}

/// Token operation decoded from an EMPP token payload.
///
/// Amounts are undecimalized atoms; display scaling needs externally
/// supplied token decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct TokenPayload {
    /// Display-order (byte-reversed) token id
    pub token_id: Option<String>,
    /// Per-output atom amounts, on-chain order
    pub output_atoms: Vec<u64>,
    /// The payload declared a token type this core does not know
    pub unknown_token_type: bool,
    /// 7-bit decodes of sibling envelope pushes with no known prefix
    pub extra_pushes: Vec<String>,
}

/// How an ambiguous swap amount field was read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AmountEncoding {
    Hex,
    Ascii,
}

/// An amount field from a swap signal together with its encoding hint
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SwapAmount {
    pub sats: u128,
    pub encoding: AmountEncoding,
}

/// Offer side of a swap signal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SwapSide {
    Buy,
    Sell,
    /// Off-spec side marker, raw ASCII preserved
    Other(String),
}

/// SLP Atomic Swap signal (message class 01, type 01)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwapSignal {
    /// None when the field is absent or not a 32-byte id
    pub token_id: Option<String>,
    pub side: Option<SwapSide>,
    /// Rate in sats per token unit
    pub rate: Option<SwapAmount>,
    /// Minimum sats to exchange
    pub min_trade: Option<SwapAmount>,
}

/// Swap message types, shared by the payment class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SwapMsgType {
    AtomicSwap,
    Escrow,
    Crowdfund,
}

/// PayButton payload states
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PayButtonData {
    NoData,
    Data(String),
    UnsupportedVersion(u8),
    OffSpec,
}

/// Single-purpose app messages with fixed layouts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum UserMessage {
    /// None: prefix present but no message push
    Cashtab { msg: Option<String> },
    CashtabEncrypted,
    /// None: registration did not match the expected 4-push, version-0 layout
    Alias { alias: Option<String> },
    PayButton(PayButtonData),
    /// `article_txid` None with `off_spec` false: present but invalid txid
    Paywall {
        article_txid: Option<String>,
        off_spec: bool,
    },
    /// valid None: off-spec push count
    Authentication { valid: Option<bool> },
}

/// One field of a memo action payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MemoPart {
    /// UTF-8 text, escaped at render time
    Text(String),
    /// 32-byte transaction reference, hex
    TxRef(String),
    /// 20-byte p2pkh hash160, hex
    AddressRef(String),
    /// Profile picture URL
    ImageUrl(String),
}

/// A recognised memo action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoAction {
    pub code: u8,
    pub action: &'static str,
    pub parts: Vec<MemoPart>,
}

/// Airdrop announcement; the recipient list comes from the flow aggregator,
/// not the payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Airdrop {
    /// None: token id field absent or not 32 bytes ("Invalid Airdrop")
    pub token_id: Option<String>,
    /// Optional Cashtab message riding along
    pub message: Option<String>,
}

/// Reason a payload could not be fully interpreted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum UnrecognizedReason {
    /// Prefix not in the registry
    UnknownPrefix,
    /// OP_RETURN with no pushes at all
    EmptyPayload,
    /// Recognised swap prefix, unknown message sub-type
    UnknownSwapSubtype { class: u8, subtype: u8 },
    /// Swap payload too short to carry class and type
    MalformedSwap,
    /// memo prefix with an unregistered action code
    UnknownMemoCode { code: u8 },
    /// EMPP token payload with an unknown section tag
    UnknownTokenSection { tag: String },
    /// EMPP envelope whose pushes match no known payload prefix;
    /// the 7-bit decodes of the pushes are kept for display
    UnknownEmppPush { decoded: Vec<String> },
}

/// Identified-but-unparseable payload, fields salvaged opportunistically
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Unrecognized {
    pub reason: UnrecognizedReason,
    /// Raw pushes, hex encoded, for observability
    pub pushes: Vec<String>,
    /// Token id recovered from a malformed-but-informative payload
    pub token_id: Option<String>,
}

impl Unrecognized {
    pub fn new(reason: UnrecognizedReason, pushes: Vec<String>) -> Self {
        Self {
            reason,
            pushes,
            token_id: None,
        }
    }

    pub fn with_token_id(mut self, token_id: Option<String>) -> Self {
        self.token_id = token_id;
        self
    }
}
