//! Block digest composition: section ordering, per-token send aggregation,
//! the character budget, and the priced/unpriced variant pair.

use std::collections::HashMap;

use crate::block::ParsedBlock;
use crate::config::DigestConfig;
use crate::constants::emoji;
use crate::flow::OrderedAmounts;
use crate::format::address::address_preview;
use crate::format::amounts::{decimalized_amount, format_price, to_locale_string};
use crate::format::fragment::{
    render_burn_line, render_genesis_line, render_record, render_xec_send_line, RenderContext,
};
use crate::format::markup::{bold, link, plural};
use crate::types::{PriceQuote, ScriptInfo, TokenMeta};

/// The two text variants the composer produces for every block
#[derive(Debug, Clone)]
pub struct BlockDigest {
    /// Present only when the caller supplied prices
    pub priced: Option<String>,
    /// The "API failure" variant: every amount in raw units
    pub plain: String,
}

/// Per-token accumulator for the send section
struct TokenSendSummary {
    tx_count: usize,
    total_atoms: u128,
}

/// Compose both digest variants for a parsed block.
pub fn compose_block(
    parsed: &ParsedBlock,
    prices: Option<&[PriceQuote]>,
    token_meta: &HashMap<String, TokenMeta>,
    script_info: Option<&HashMap<String, ScriptInfo>>,
    explorer_url: &str,
    cfg: &DigestConfig,
) -> BlockDigest {
    let priced = prices.map(|quotes| {
        compose_variant(
            parsed,
            Some(quotes),
            token_meta,
            script_info,
            explorer_url,
            cfg,
        )
    });
    let plain = compose_variant(parsed, None, token_meta, script_info, explorer_url, cfg);
    BlockDigest { priced, plain }
}

/// Compose one variant. `prices` drives both the price lines and every
/// amount rendering downstream; passing `None` is the total fallback.
pub fn compose_variant(
    parsed: &ParsedBlock,
    prices: Option<&[PriceQuote]>,
    token_meta: &HashMap<String, TokenMeta>,
    script_info: Option<&HashMap<String, ScriptInfo>>,
    explorer_url: &str,
    cfg: &DigestConfig,
) -> String {
    let xec_price = prices.and_then(|quotes| {
        quotes
            .iter()
            .find(|q| q.ticker == "XEC")
            .map(|q| q.price)
    });
    let ctx = RenderContext {
        explorer_url,
        xec_price,
        token_meta,
        script_info,
        cfg,
    };

    let mut lines: Vec<String> = Vec::new();

    // Header: always present, even for a coinbase-only block
    lines.push(format!(
        "{}{} | {} tx{} | {}",
        emoji::BLOCK,
        link(
            &format!("{}/block/{}", explorer_url, parsed.hash),
            &parsed.height.to_string()
        ),
        parsed.num_txs,
        plural(parsed.num_txs),
        parsed.miner
    ));

    // Halving countdown
    if parsed.height < cfg.halving_height {
        let blocks_left = cfg.halving_height - parsed.height;
        lines.push(format!(
            "{} {} block{} until eCash halving",
            emoji::HALVING,
            to_locale_string(blocks_left as f64, 0, 0),
            plural(blocks_left as usize)
        ));
    } else if parsed.height == cfg.halving_height {
        lines.push("🎉🎉🎉 eCash block reward reduced by 50% 🎉🎉🎉".to_string());
    }

    if let Some(staker) = &parsed.staker {
        lines.push(format!(
            "{}{} to {}",
            emoji::STAKER,
            ctx.amount(staker.reward_sats),
            link(
                &ctx.address_url(&staker.address),
                &address_preview(&staker.address, cfg.address_slice_size)
            )
        ));
    }

    if let Some(quotes) = prices {
        for quote in quotes {
            lines.push(format!(
                "1 {} = {}",
                quote.ticker,
                format_price(quote.price, &quote.fiat)
            ));
        }
    }

    // Section accumulators, block order preserved within each
    let mut genesis_lines: Vec<String> = Vec::new();
    let mut token_send_summaries: OrderedAmounts<String, u128> = OrderedAmounts::default();
    let mut token_send_counts: HashMap<String, usize> = HashMap::new();
    let mut burn_lines: Vec<String> = Vec::new();
    let mut app_lines: Vec<String> = Vec::new();
    let mut xec_lines: Vec<String> = Vec::new();

    for ptx in &parsed.txs {
        if let Some(genesis) = &ptx.genesis {
            genesis_lines.push(render_genesis_line(&genesis.token_id, &ctx));
            continue;
        }
        if let Some(fragment) = render_record(ptx, &ctx) {
            app_lines.push(fragment.text);
            continue;
        }
        if let (Some(send), None) = (&ptx.token_send, &ptx.token_burn) {
            // One line per token id, not per tx
            let atoms = token_facet_atoms(ptx);
            token_send_summaries.add(send.token_id.clone(), atoms);
            *token_send_counts.entry(send.token_id.clone()).or_insert(0) += 1;
            continue;
        }
        if let Some(burn) = &ptx.token_burn {
            burn_lines.push(render_burn_line(ptx, &burn.token_id, burn.burned_atoms, &ctx));
            continue;
        }
        xec_lines.push(render_xec_send_line(ptx, &ctx).text);
    }

    if !genesis_lines.is_empty() {
        lines.push(String::new());
        lines.push(bold(&format!(
            "{} new eToken{} created",
            genesis_lines.len(),
            plural(genesis_lines.len())
        )));
        lines.extend(genesis_lines);
    }

    if !token_send_summaries.is_empty() {
        lines.push(String::new());
        for (token_id, total_atoms) in token_send_summaries.iter() {
            let tx_count = token_send_counts.get(token_id).copied().unwrap_or(1);
            lines.push(render_token_send_summary(
                token_id,
                &TokenSendSummary {
                    tx_count,
                    total_atoms: *total_atoms,
                },
                &ctx,
            ));
        }
    }

    if !burn_lines.is_empty() {
        lines.push(String::new());
        lines.push(bold(&format!(
            "{} eToken burn tx{}",
            burn_lines.len(),
            plural(burn_lines.len())
        )));
        lines.extend(burn_lines);
    }

    if !app_lines.is_empty() {
        lines.push(String::new());
        lines.push(bold(&format!(
            "{} app tx{}",
            app_lines.len(),
            plural(app_lines.len())
        )));
        lines.extend(app_lines);
    }

    let total_xec_sends = xec_lines.len();
    if total_xec_sends > 0 {
        lines.push(String::new());
        lines.push(bold(&format!(
            "{} eCash tx{}",
            total_xec_sends,
            plural(total_xec_sends)
        )));
        if total_xec_sends > cfg.xec_send_display_count {
            xec_lines.truncate(cfg.xec_send_display_count);
            xec_lines.push(format!(
                "...and {}",
                link(
                    &format!("{}/block/{}", explorer_url, parsed.hash),
                    &format!("{} more", total_xec_sends - cfg.xec_send_display_count)
                )
            ));
        }
        lines.extend(xec_lines);
    }

    apply_char_budget(lines, cfg.msg_char_limit)
}

/// `N txs sent <qty> <token link>` with metadata fallback to the elided id
fn render_token_send_summary(
    token_id: &str,
    summary: &TokenSendSummary,
    ctx: &RenderContext,
) -> String {
    let qty = match ctx.token_meta.get(token_id) {
        Some(meta) => decimalized_amount(summary.total_atoms, meta.decimals),
        None => decimalized_amount(summary.total_atoms, 0),
    };
    let label = match ctx.token_meta.get(token_id) {
        Some(meta) => format!(
            "{} ({})",
            crate::format::markup::escape(&meta.token_name),
            crate::format::markup::escape(&meta.token_ticker)
        ),
        None => crate::format::address::elide_hex_id(token_id, ctx.cfg.address_slice_size),
    };
    format!(
        "{} tx{} sent {} {}",
        summary.tx_count,
        plural(summary.tx_count),
        qty,
        link(&ctx.tx_url(token_id), &label)
    )
}

/// Sent token quantity of a tx: the receiving outputs, or the change when
/// everything returned to the senders (token self-send)
fn token_facet_atoms(ptx: &crate::block::ParsedTx) -> u128 {
    let Some(token_flow) = &ptx.flow.token_flow else {
        return 0;
    };
    let outputs = if token_flow.receiving_outputs.is_empty() {
        &token_flow.change_outputs
    } else {
        &token_flow.receiving_outputs
    };
    outputs.iter().map(|(_, atoms)| *atoms).sum()
}

/// Append whole lines until the budget would be exceeded; never cut a line
/// mid-fragment. The header always survives.
fn apply_char_budget(lines: Vec<String>, char_limit: usize) -> String {
    let mut budget_used = 0usize;
    let mut kept: Vec<String> = Vec::new();
    for line in lines {
        let cost = line.chars().count() + if kept.is_empty() { 0 } else { 1 };
        if !kept.is_empty() && budget_used + cost > char_limit {
            break;
        }
        budget_used += cost;
        kept.push(line);
    }
    kept.join("\n")
}
