//! Per-transaction digest fragments: one renderer per protocol record
//! variant, plus the genesis/burn/plain-send lines. Escaping and amount
//! policy live here so no caller ever concatenates raw payload text.

use std::collections::HashMap;

use crate::config::DigestConfig;
use crate::constants::emoji;
use crate::constants::protocols::app_names;
use crate::decoder::ascii_lossy_bytes;
use crate::format::address::{address_preview, elide_hex_id, script_preview};
use crate::format::amounts::{
    decimalized_amount, format_rate_sats, sats_to_formatted_value,
};
use crate::format::markup::{escape, link, plural};
use crate::protocols::record::{
    Airdrop, MemoAction, MemoPart, PayButtonData, ProtocolRecord, SwapMsgType, SwapSide,
    SwapSignal, TokenPayload, Unrecognized, UnrecognizedReason, UserMessage,
};
use crate::block::ParsedTx;
use crate::types::{ScriptInfo, TokenMeta};

/// Category tag of a rendered fragment; the composer groups sections by it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentCategory {
    TokenGenesis,
    TokenSend,
    TokenBurn,
    App(String),
    Fusion,
    Airdrop,
    Swap,
    Escrow,
    Crowdfund,
    XecTransfer,
}

/// One formatted text unit with its category
#[derive(Debug, Clone)]
pub struct DigestFragment {
    pub category: FragmentCategory,
    pub text: String,
}

/// Everything a render pass needs, resolved by the caller: prices, token
/// metadata and script balances are per-call lookups, never core state.
pub struct RenderContext<'a> {
    pub explorer_url: &'a str,
    pub xec_price: Option<f64>,
    pub token_meta: &'a HashMap<String, TokenMeta>,
    pub script_info: Option<&'a HashMap<String, ScriptInfo>>,
    pub cfg: &'a DigestConfig,
}

impl<'a> RenderContext<'a> {
    pub fn tx_url(&self, txid: &str) -> String {
        format!("{}/tx/{}", self.explorer_url, txid)
    }

    pub fn address_url(&self, address: &str) -> String {
        format!("{}/address/{}", self.explorer_url, address)
    }

    /// Fiat when priced and material, raw units otherwise
    pub fn amount(&self, sats: u64) -> String {
        sats_to_formatted_value(sats, self.xec_price, self.cfg.fiat_materiality)
    }

    /// Link to a token id labeled with its ticker, or the elided id when
    /// metadata is unavailable
    pub fn token_link(&self, token_id: &str) -> String {
        let label = match self.token_meta.get(token_id) {
            Some(meta) => escape(&meta.token_ticker),
            None => elide_hex_id(token_id, self.cfg.address_slice_size),
        };
        link(&self.tx_url(token_id), &label)
    }

    fn balance_emoji(&self, script_hex: &str) -> &'static str {
        match self.script_info {
            Some(info) => info
                .get(script_hex)
                .map(|i| self.cfg.balance_emoji(i.balance_sats))
                .unwrap_or(""),
            None => "",
        }
    }

    fn preview_script(&self, script_hex: &str) -> String {
        script_preview(script_hex, self.cfg.address_slice_size)
    }
}

/// Render the app-payload fragment for a classified transaction, if it has
/// a record. Every record renders something; malformed payloads get their
/// clearly-labeled line rather than silence.
pub fn render_record(ptx: &ParsedTx, ctx: &RenderContext) -> Option<DigestFragment> {
    let record = ptx.record.as_ref()?;
    let (category, app_emoji, app, msg) = match record {
        ProtocolRecord::UserMessage(user) => render_user_message(ptx, user, ctx),
        ProtocolRecord::MemoAction(action) => (
            FragmentCategory::App(app_names::MEMO.to_string()),
            emoji::MEMO,
            app_names::MEMO.to_string(),
            render_memo(action, ctx),
        ),
        ProtocolRecord::CoinMixReport { .. } => (
            FragmentCategory::Fusion,
            emoji::FUSION,
            app_names::FUSION.to_string(),
            format!(
                "Fused {} from {} inputs into {} outputs",
                ctx.amount(ptx.flow.total_sats_sent),
                ptx.flow.sending_scripts.len(),
                ptx.flow.receiving_outputs.len()
            ),
        ),
        ProtocolRecord::AirdropDistribution(airdrop) => (
            FragmentCategory::Airdrop,
            emoji::AIRDROP,
            app_names::AIRDROP.to_string(),
            render_airdrop(ptx, airdrop, ctx),
        ),
        ProtocolRecord::AtomicSwapSignal(signal) => (
            FragmentCategory::Swap,
            emoji::SWAP,
            app_names::SWAP.to_string(),
            render_swap_signal(signal, ctx),
        ),
        ProtocolRecord::AtomicSwapPayment { kind } => (
            FragmentCategory::Swap,
            emoji::SWAP,
            app_names::SWAP.to_string(),
            format!("Payment|{}", swap_type_name(*kind)),
        ),
        ProtocolRecord::AtomicSwapEscrow { payment } => (
            FragmentCategory::Escrow,
            emoji::SWAP,
            app_names::SWAP.to_string(),
            format!(
                "{}|{}",
                if *payment { "Payment" } else { "Signal" },
                swap_type_name(SwapMsgType::Escrow)
            ),
        ),
        ProtocolRecord::Crowdfund { payment } => (
            FragmentCategory::Crowdfund,
            emoji::SWAP,
            app_names::SWAP.to_string(),
            format!(
                "{}|{}",
                if *payment { "Payment" } else { "Signal" },
                swap_type_name(SwapMsgType::Crowdfund)
            ),
        ),
        ProtocolRecord::TokenSend(p) => render_empp_token(p, "SEND", ctx),
        ProtocolRecord::TokenMint(p) => render_empp_token(p, "MINT", ctx),
        ProtocolRecord::TokenGenesis(p) => render_empp_token(p, "GENESIS", ctx),
        ProtocolRecord::TokenBurn(p) => render_empp_token(p, "BURN", ctx),
        ProtocolRecord::Unrecognized(u) => render_unrecognized(u),
    };

    Some(DigestFragment {
        category,
        text: format!(
            "{}{} {}",
            app_emoji,
            link(&ctx.tx_url(&ptx.txid), &format!("{}:", app)),
            msg
        ),
    })
}

fn swap_type_name(kind: SwapMsgType) -> &'static str {
    match kind {
        SwapMsgType::AtomicSwap => "SLP Atomic Swap",
        SwapMsgType::Escrow => "Multi-Party Escrow",
        SwapMsgType::Crowdfund => "Threshold Crowdfunding",
    }
}

fn render_user_message(
    ptx: &ParsedTx,
    user: &UserMessage,
    ctx: &RenderContext,
) -> (FragmentCategory, &'static str, String, String) {
    match user {
        UserMessage::Cashtab { msg } => {
            // The plain-send numbers ride along in the app label
            let app = format!(
                "{}, {} for {}",
                app_names::CASHTAB_MSG,
                ctx.amount(ptx.flow.total_sats_sent),
                ctx.amount(ptx.flow.fee_sats.unwrap_or(0)),
            );
            let body = match msg {
                Some(text) => escape(text),
                None => format!("Invalid {}", app_names::CASHTAB_MSG),
            };
            (
                FragmentCategory::App(app_names::CASHTAB_MSG.to_string()),
                emoji::CASHTAB_MSG,
                app,
                body,
            )
        }
        UserMessage::CashtabEncrypted => {
            let sender = ptx
                .flow
                .first_sending_script()
                .map(|s| ctx.preview_script(s))
                .unwrap_or_else(|| "unknown sender".to_string());
            let mut msg = format!(
                "{} sent an encrypted message and {} to ",
                sender,
                ctx.amount(ptx.flow.total_sats_sent)
            );
            match ptx.flow.first_receiving_script() {
                Some(first) => {
                    msg.push_str(&ctx.preview_script(first));
                    let extra = ptx.flow.recipient_count().saturating_sub(1);
                    if extra > 0 {
                        msg.push_str(&format!(" and {} other{}", extra, plural(extra)));
                    }
                }
                None => msg.push_str("itself"),
            }
            (
                FragmentCategory::App(app_names::CASHTAB_ENCRYPTED.to_string()),
                emoji::CASHTAB_ENCRYPTED,
                app_names::CASHTAB_ENCRYPTED.to_string(),
                msg,
            )
        }
        UserMessage::Alias { alias } => (
            FragmentCategory::App(app_names::ALIAS.to_string()),
            emoji::ALIAS,
            app_names::ALIAS.to_string(),
            match alias {
                Some(name) => escape(name),
                None => "Invalid alias registration".to_string(),
            },
        ),
        UserMessage::PayButton(data) => (
            FragmentCategory::App(app_names::PAY_BUTTON.to_string()),
            emoji::PAY_BUTTON,
            app_names::PAY_BUTTON.to_string(),
            match data {
                PayButtonData::NoData => "no data".to_string(),
                PayButtonData::Data(text) => escape(text),
                PayButtonData::UnsupportedVersion(v) => {
                    format!("Unsupported version: 0x{:02x}", v)
                }
                PayButtonData::OffSpec => "[off spec]".to_string(),
            },
        ),
        UserMessage::Paywall {
            article_txid,
            off_spec,
        } => (
            FragmentCategory::App(app_names::PAYWALL.to_string()),
            emoji::PAYWALL,
            app_names::PAYWALL.to_string(),
            if *off_spec {
                "[off spec paywall payment]".to_string()
            } else {
                match article_txid {
                    Some(txid) => link(&ctx.tx_url(txid), "Article paywall payment"),
                    None => "Invalid paywall article txid".to_string(),
                }
            },
        ),
        UserMessage::Authentication { valid } => (
            FragmentCategory::App(app_names::AUTH.to_string()),
            emoji::AUTH,
            app_names::AUTH.to_string(),
            match valid {
                Some(true) => "eCashChat authentication via dust tx".to_string(),
                Some(false) => "Invalid eCashChat authentication identifier".to_string(),
                None => "[off spec eCashChat authentication]".to_string(),
            },
        ),
    }
}

fn render_memo(action: &MemoAction, ctx: &RenderContext) -> String {
    let mut msg = action.action.to_string();
    for part in &action.parts {
        msg.push('|');
        match part {
            MemoPart::Text(text) => msg.push_str(&escape(text)),
            MemoPart::TxRef(txid) => msg.push_str(&link(&ctx.tx_url(txid), "memo")),
            MemoPart::AddressRef(hash160_hex) => {
                let rendered = hex::decode(hash160_hex)
                    .ok()
                    .and_then(|hash| {
                        crate::format::cashaddr::encode_hash160(
                            crate::format::cashaddr::AddressType::P2pkh,
                            &hash,
                        )
                        .ok()
                    })
                    .map(|address| {
                        link(
                            &ctx.address_url(&address),
                            &address_preview(&address, ctx.cfg.address_slice_size),
                        )
                    })
                    .unwrap_or_else(|| elide_hex_id(hash160_hex, ctx.cfg.address_slice_size));
                msg.push_str(&rendered);
            }
            MemoPart::ImageUrl(url) => msg.push_str(&link(url, "[img]")),
        }
    }
    // Posts aimed at another chain's audience are not worth quoting
    if msg.contains("BCH") {
        return "[check memo.cash for msg]".to_string();
    }
    msg
}

fn render_airdrop(ptx: &ParsedTx, airdrop: &Airdrop, ctx: &RenderContext) -> String {
    let Some(token_id) = &airdrop.token_id else {
        return format!("Invalid {}", app_names::AIRDROP);
    };
    let sender = ptx
        .flow
        .first_sending_script()
        .map(|s| ctx.preview_script(s))
        .unwrap_or_else(|| "unknown sender".to_string());

    let mut msg = format!(
        "{} airdropped {} to {} holders of {}",
        sender,
        ctx.amount(ptx.flow.total_sats_sent),
        ptx.flow.recipient_count(),
        ctx.token_link(token_id),
    );
    if let Some(text) = &airdrop.message {
        msg.push('|');
        msg.push_str(&escape(text));
    }
    msg
}

fn render_swap_signal(signal: &SwapSignal, ctx: &RenderContext) -> String {
    let mut msg = String::from("Signal|SLP Atomic Swap|");

    match &signal.token_id {
        Some(token_id) => {
            msg.push_str(&ctx.token_link_or_unknown(token_id));
            msg.push('|');
        }
        None => msg.push_str("Invalid tokenId|"),
    }

    if let Some(side) = &signal.side {
        let side_text = match side {
            SwapSide::Buy => "BUY".to_string(),
            SwapSide::Sell => "SELL".to_string(),
            SwapSide::Other(raw) => escape(raw),
        };
        msg.push_str(&side_text);
    }

    if let Some(rate) = &signal.rate {
        msg.push_str(&format!(" for {} XEC", format_rate_sats(rate.sats)));
    }
    if let Some(min) = &signal.min_trade {
        msg.push_str(&format!(
            "|Min trade: {} XEC",
            format_rate_sats(min.sats)
        ));
    }
    msg
}

impl<'a> RenderContext<'a> {
    /// Swap lines label unresolvable tokens "Unknown Token" rather than
    /// falling back to the elided id
    fn token_link_or_unknown(&self, token_id: &str) -> String {
        let label = match self.token_meta.get(token_id) {
            Some(meta) => escape(&meta.token_ticker),
            None => "Unknown Token".to_string(),
        };
        link(&self.tx_url(token_id), &label)
    }
}

fn render_empp_token(
    payload: &TokenPayload,
    section: &str,
    ctx: &RenderContext,
) -> (FragmentCategory, &'static str, String, String) {
    let mut msg = format!("{}:", app_names::SLP2);
    if payload.unknown_token_type {
        msg.push_str("Unknown token type|");
    }
    msg.push_str(section);

    if let Some(token_id) = &payload.token_id {
        msg.push('|');
        msg.push_str(&ctx.token_link(token_id));
        if let Some(meta) = ctx.token_meta.get(token_id) {
            let total: u128 = payload.output_atoms.iter().map(|&a| a as u128).sum();
            msg.push('|');
            msg.push_str(&decimalized_amount(total, meta.decimals));
        }
    }

    for extra in &payload.extra_pushes {
        msg.push_str(&format!("|Unknown App:{}", escape(extra)));
    }

    (
        FragmentCategory::App(app_names::EMPP.to_string()),
        emoji::UNKNOWN,
        app_names::EMPP.to_string(),
        msg,
    )
}

fn render_unrecognized(
    u: &Unrecognized,
) -> (FragmentCategory, &'static str, String, String) {
    match &u.reason {
        UnrecognizedReason::UnknownSwapSubtype { .. } => (
            FragmentCategory::Swap,
            emoji::SWAP,
            app_names::SWAP.to_string(),
            "Malformed SWaP tx".to_string(),
        ),
        UnrecognizedReason::MalformedSwap => (
            FragmentCategory::Swap,
            emoji::SWAP,
            app_names::SWAP.to_string(),
            "Invalid SWaP".to_string(),
        ),
        UnrecognizedReason::UnknownMemoCode { code } => (
            FragmentCategory::App(app_names::MEMO.to_string()),
            emoji::MEMO,
            app_names::MEMO.to_string(),
            format!("Unknown memo action (0x{:02x})", code),
        ),
        UnrecognizedReason::UnknownTokenSection { tag } => (
            FragmentCategory::App(app_names::EMPP.to_string()),
            emoji::UNKNOWN,
            app_names::EMPP.to_string(),
            format!("{}:{}", app_names::SLP2, escape(tag)),
        ),
        UnrecognizedReason::UnknownEmppPush { decoded } => (
            FragmentCategory::App(app_names::EMPP.to_string()),
            emoji::UNKNOWN,
            app_names::EMPP.to_string(),
            decoded
                .iter()
                .map(|d| format!("Unknown App:{}", escape(d)))
                .collect::<Vec<_>>()
                .join("|"),
        ),
        UnrecognizedReason::EmptyPayload | UnrecognizedReason::UnknownPrefix => (
            FragmentCategory::App(app_names::UNKNOWN.to_string()),
            emoji::UNKNOWN,
            app_names::UNKNOWN.to_string(),
            render_unknown_pushes(&u.pushes),
        ),
    }
}

/// Unknown payloads: printable ASCII gets decoded, anything else becomes a
/// truncated hex dump
fn render_unknown_pushes(pushes_hex: &[String]) -> String {
    const UNKNOWN_MAX_CHARS: usize = 20;

    let joined = pushes_hex.concat();
    let bytes = match hex::decode(&joined) {
        Ok(b) => b,
        Err(_) => return String::new(),
    };
    if !bytes.is_empty() && bytes.iter().all(|&b| (0x20..=0x7e).contains(&b)) {
        return escape(&ascii_lossy_bytes(&bytes));
    }

    let mut msg = pushes_hex
        .iter()
        .map(|p| format!("0x{}", p))
        .collect::<Vec<_>>()
        .join(" ");
    if msg.len() > UNKNOWN_MAX_CHARS {
        msg.truncate(UNKNOWN_MAX_CHARS);
        msg.push_str("...");
    }
    msg
}

/// Token genesis line for the digest's first section
pub fn render_genesis_line(token_id: &str, ctx: &RenderContext) -> String {
    match ctx.token_meta.get(token_id) {
        Some(meta) => {
            let doc = link(meta.url.as_deref().unwrap_or(""), "[doc]");
            format!(
                "{}{} ({}) {}",
                emoji::TOKEN_GENESIS,
                link(&ctx.tx_url(token_id), &escape(&meta.token_name)),
                escape(&meta.token_ticker),
                doc
            )
        }
        None => format!(
            "{}{}",
            emoji::TOKEN_GENESIS,
            link(
                &ctx.tx_url(token_id),
                &elide_hex_id(token_id, ctx.cfg.address_slice_size)
            )
        ),
    }
}

/// Token burn line
pub fn render_burn_line(
    ptx: &ParsedTx,
    token_id: &str,
    burned_atoms: u128,
    ctx: &RenderContext,
) -> String {
    let burner = ptx
        .flow
        .first_sending_script()
        .map(|s| ctx.preview_script(s))
        .unwrap_or_else(|| "unknown".to_string());
    let decimals = ctx
        .token_meta
        .get(token_id)
        .map(|m| m.decimals)
        .unwrap_or(0);
    format!(
        "{}{} {} {} {} ",
        emoji::TOKEN_BURN,
        burner,
        link(&ctx.tx_url(&ptx.txid), "burned"),
        decimalized_amount(burned_atoms, decimals),
        ctx.token_link(token_id),
    )
}

/// Plain base-currency send line. Self-sends stay first-class: zero sent,
/// arrow to itself.
pub fn render_xec_send_line(ptx: &ParsedTx, ctx: &RenderContext) -> DigestFragment {
    let amount = ctx.amount(ptx.flow.total_sats_sent);
    let fee = ctx.amount(ptx.flow.fee_sats.unwrap_or(0));
    let mut text = format!(
        "{}{}",
        emoji::XEC_SEND,
        link(&ctx.tx_url(&ptx.txid), &format!("{} for {}", amount, fee))
    );

    let sender_script = ptx.flow.first_sending_script();
    let sender_emoji = sender_script.map(|s| ctx.balance_emoji(s)).unwrap_or("");

    if ptx.flow.is_self_send() {
        if !sender_emoji.is_empty() {
            let sender_display = if ptx.flow.sending_scripts.len() > 1 {
                format!("{} addresses", ptx.flow.sending_scripts.len())
            } else {
                sender_script
                    .map(|s| ctx.preview_script(s))
                    .unwrap_or_default()
            };
            let target = if ptx.flow.sending_scripts.len() > 1 {
                "themselves"
            } else {
                "itself"
            };
            text.push_str(&format!(
                " {} {} {} {}",
                sender_emoji,
                sender_display,
                emoji::ARROW_RIGHT,
                target
            ));
        }
    } else {
        let receiver_script = ptx.flow.first_receiving_script();
        let receiver_emoji = receiver_script.map(|s| ctx.balance_emoji(s)).unwrap_or("");
        if !sender_emoji.is_empty() || !receiver_emoji.is_empty() {
            let sender_display = sender_script
                .map(|s| ctx.preview_script(s))
                .unwrap_or_default();
            let receiver_display = receiver_script
                .map(|s| ctx.preview_script(s))
                .unwrap_or_default();
            text.push_str(&format!(
                " {}{} {} {}{}",
                sender_emoji,
                sender_display,
                emoji::ARROW_RIGHT,
                receiver_emoji,
                receiver_display
            ));
            let extra = ptx.flow.recipient_count().saturating_sub(1);
            if extra > 0 {
                text.push_str(&format!(" and {} other{}", extra, plural(extra)));
            }
        }
    }

    DigestFragment {
        category: FragmentCategory::XecTransfer,
        text,
    }
}
