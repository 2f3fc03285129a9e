//! End-to-end interpreter and fragment tests: locking script hex in,
//! rendered digest line out, across the protocol registry.

mod common;

use std::collections::HashMap;

use ecash_digest::block::parse_tx;
use ecash_digest::config::DigestConfig;
use ecash_digest::decoder::decode_payload;
use ecash_digest::format::address::script_preview;
use ecash_digest::format::fragment::{render_record, RenderContext};
use ecash_digest::protocols::record::{ProtocolRecord, UnrecognizedReason};
use ecash_digest::protocols::interpret;
use ecash_digest::types::TokenMeta;

use common::{input, output, p2pkh_script, tx};

const EXPLORER: &str = "https://explorer.e.cash";
const XEC_PRICE: f64 = 0.00003333;

fn meta(ticker: &str, name: &str, decimals: u32) -> TokenMeta {
    TokenMeta {
        token_ticker: ticker.to_string(),
        token_name: name.to_string(),
        decimals,
        url: Some("https://cashtab.com/".to_string()),
    }
}

fn ctx<'a>(
    token_meta: &'a HashMap<String, TokenMeta>,
    cfg: &'a DigestConfig,
    priced: bool,
) -> RenderContext<'a> {
    RenderContext {
        explorer_url: EXPLORER,
        xec_price: priced.then_some(XEC_PRICE),
        token_meta,
        script_info: None,
        cfg,
    }
}

/// Build a tx whose first output carries the given OP_RETURN data payload
fn payload_tx(data_hex: &str, recipients: Vec<(String, u64)>) -> ecash_digest::types::RawTx {
    let sender = p2pkh_script(0xa1);
    let mut outputs = vec![output(&format!("6a{}", data_hex), 0)];
    for (script, sats) in recipients {
        outputs.push(output(&script, sats));
    }
    tx(0x11, vec![input(&sender, 100_000_000)], outputs)
}

const SPICE_TOKEN_ID: &str = "4de69e374a8ed21cbddd47f2338cc0f479dc58daa2bbe11cd604ca488eca0ddf";

const SPICE_SELL_DATA: &str =
    "045357500001010101204de69e374a8ed21cbddd47f2338cc0f479dc58daa2bbe11cd604ca488eca0ddf\
     0453454c4c02025801002090dfb75fef5f07e384df4703b853a2741b8e6f3ef31ef8e5187a17fb107547f8\
     01010100";

#[test]
fn swap_sell_signal_renders_the_full_line() {
    let cfg = DigestConfig::default();
    let mut token_meta = HashMap::new();
    token_meta.insert(SPICE_TOKEN_ID.to_string(), meta("SPICE", "Spice", 8));

    let ptx = parse_tx(&payload_tx(SPICE_SELL_DATA, vec![(p2pkh_script(0xb2), 546)])).unwrap();
    let fragment = render_record(&ptx, &ctx(&token_meta, &cfg, true)).unwrap();

    let expected_msg = format!(
        "Signal|SLP Atomic Swap|<a href=\"{}/tx/{}\">SPICE</a>|SELL for 6 XEC|Min trade: 0 XEC",
        EXPLORER, SPICE_TOKEN_ID
    );
    assert!(
        fragment.text.ends_with(&expected_msg),
        "got: {}",
        fragment.text
    );
    assert!(fragment.text.starts_with("🤳"));
}

#[test]
fn swap_signal_without_metadata_labels_unknown_token() {
    let cfg = DigestConfig::default();
    let token_meta = HashMap::new();

    let ptx = parse_tx(&payload_tx(SPICE_SELL_DATA, vec![(p2pkh_script(0xb2), 546)])).unwrap();
    let fragment = render_record(&ptx, &ctx(&token_meta, &cfg, true)).unwrap();
    assert!(fragment.text.contains(">Unknown Token</a>"));
}

#[test]
fn malformed_swap_subtype_recovers_the_ticker_via_token_id() {
    // Sub-type 05 instead of 01
    let data = "045357500001010105204de69e374a8ed21cbddd47f2338cc0f479dc58daa2bbe11cd604ca488eca\
                0ddf0453454c4c02025801002090dfb75fef5f07e384df4703b853a2741b8e6f3ef31ef8e5187a17\
                fb107547f801010100";
    let cfg = DigestConfig::default();
    let token_meta = HashMap::new();

    let ptx = parse_tx(&payload_tx(data, vec![(p2pkh_script(0xb2), 546)])).unwrap();

    // The record still carries the token id so the block parser can resolve
    // the ticker for context
    match ptx.record.as_ref().unwrap() {
        ProtocolRecord::Unrecognized(u) => {
            assert!(matches!(
                u.reason,
                UnrecognizedReason::UnknownSwapSubtype { class: 1, subtype: 5 }
            ));
            assert_eq!(u.token_id.as_deref(), Some(SPICE_TOKEN_ID));
        }
        other => panic!("unexpected record: {:?}", other),
    }

    let fragment = render_record(&ptx, &ctx(&token_meta, &cfg, true)).unwrap();
    assert!(fragment.text.contains("Malformed SWaP tx"));
}

#[test]
fn airdrop_line_priced_and_api_failure_variants() {
    let token_id = "1c6c9c64d70b285befe733f175d0f384538576876bd280b10587df81279d3f5e";
    let data = format!("0464726f7020{}0400746162", token_id);
    let cfg = DigestConfig::default();
    let mut token_meta = HashMap::new();
    token_meta.insert(token_id.to_string(), meta("DET", "Dividend eToken", 8));

    let recipients = vec![
        (p2pkh_script(0xc1), 2_000),
        (p2pkh_script(0xc2), 1_000),
        (p2pkh_script(0xc3), 2_000),
    ];
    let raw = payload_tx(&data, recipients);
    let ptx = parse_tx(&raw).unwrap();
    let sender_preview = script_preview(&p2pkh_script(0xa1), cfg.address_slice_size);

    // Priced: fiat amount and the resolved ticker
    let priced = render_record(&ptx, &ctx(&token_meta, &cfg, true)).unwrap();
    let expected = format!(
        "{} airdropped $0.002 to 3 holders of <a href=\"{}/tx/{}\">DET</a>",
        sender_preview, EXPLORER, token_id
    );
    assert!(priced.text.ends_with(&expected), "got: {}", priced.text);

    // API failure: raw units everywhere and the elided token id
    let no_meta = HashMap::new();
    let plain = render_record(&ptx, &ctx(&no_meta, &cfg, false)).unwrap();
    let expected_plain = format!(
        "{} airdropped 50 XEC to 3 holders of <a href=\"{}/tx/{}\">1c6...f5e</a>",
        sender_preview, EXPLORER, token_id
    );
    assert!(
        plain.text.ends_with(&expected_plain),
        "got: {}",
        plain.text
    );
    assert!(!plain.text.contains('$'));
}

#[test]
fn airdrop_with_invalid_token_id_still_renders() {
    // 31-byte token id
    let data = "0464726f701f6c9c64d70b285befe733f175d0f384538576876bd280b10587df81279d3f5e";
    let cfg = DigestConfig::default();
    let token_meta = HashMap::new();

    let ptx = parse_tx(&payload_tx(data, vec![(p2pkh_script(0xc1), 2_000)])).unwrap();
    let fragment = render_record(&ptx, &ctx(&token_meta, &cfg, true)).unwrap();
    assert!(fragment.text.contains("Invalid Airdrop"));
}

#[test]
fn encrypted_cashtab_msg_compresses_multiple_recipients() {
    let data = "04657461624c810281d8b3db5585bf24903022d9c5f3b8cafed757f254840c0f7bc872fda07074\
                5cb6cef3d645fc7e4403e2bc212e616db6691ab415cd1f7e9abcebdd8738e775a05ebeb14fadbd\
                bf5941e0e4804e0c075239d0906ca5d5c00a93ebae11df7770c4aeeaef5b804abca08c10520fa4\
                7a6dc3df018378334a15f7ea3075bc9b8840a8";
    let cfg = DigestConfig::default();
    let token_meta = HashMap::new();

    let recipients = vec![
        (p2pkh_script(0xd1), 24_242_424),
        (p2pkh_script(0xd2), 100),
    ];
    let ptx = parse_tx(&payload_tx(data, recipients)).unwrap();
    let fragment = render_record(&ptx, &ctx(&token_meta, &cfg, true)).unwrap();

    let sender_preview = script_preview(&p2pkh_script(0xa1), cfg.address_slice_size);
    let first_recipient = script_preview(&p2pkh_script(0xd1), cfg.address_slice_size);
    let expected = format!(
        "{} sent an encrypted message and $8 to {} and 1 other",
        sender_preview, first_recipient
    );
    assert!(fragment.text.ends_with(&expected), "got: {}", fragment.text);
}

#[test]
fn memo_reply_line_links_the_memo_and_escapes_the_text() {
    let tx_hash = "eae5710aba50a0a22b266ddbb445e05b7348d15c88cbc2e012a91a09bec3861a";
    // 6d03 <tx_hash> "a<b"
    let data = format!("026d0320{}03613c62", tx_hash);
    let cfg = DigestConfig::default();
    let token_meta = HashMap::new();

    let ptx = parse_tx(&payload_tx(&data, vec![(p2pkh_script(0xb2), 546)])).unwrap();
    let fragment = render_record(&ptx, &ctx(&token_meta, &cfg, true)).unwrap();

    let expected = format!(
        "Reply to memo|<a href=\"{}/tx/{}\">memo</a>|a&lt;b",
        EXPLORER, tx_hash
    );
    assert!(fragment.text.ends_with(&expected), "got: {}", fragment.text);
}

#[test]
fn unknown_prefix_renders_printable_ascii() {
    // "=:ETH.ETH:0xa9aa" - unregistered but printable
    let text = "=:ETH.ETH:0xa9aa";
    let data = format!("{:02x}{}", text.len(), hex::encode(text));
    let cfg = DigestConfig::default();
    let token_meta = HashMap::new();

    let ptx = parse_tx(&payload_tx(&data, vec![(p2pkh_script(0xb2), 546)])).unwrap();
    let fragment = render_record(&ptx, &ctx(&token_meta, &cfg, true)).unwrap();
    assert!(fragment.text.contains(">unknown:</a> =:ETH.ETH:0xa9aa"));
}

#[test]
fn unknown_binary_prefix_renders_truncated_hex_dump() {
    let data = "04deadbeef08ffffffffffffffff";
    let cfg = DigestConfig::default();
    let token_meta = HashMap::new();

    let ptx = parse_tx(&payload_tx(data, vec![(p2pkh_script(0xb2), 546)])).unwrap();
    let fragment = render_record(&ptx, &ctx(&token_meta, &cfg, true)).unwrap();
    assert!(fragment.text.contains("0xdeadbeef"));
    assert!(fragment.text.ends_with("..."));
}

#[test]
fn formatting_is_idempotent() {
    let cfg = DigestConfig::default();
    let mut token_meta = HashMap::new();
    token_meta.insert(SPICE_TOKEN_ID.to_string(), meta("SPICE", "Spice", 8));

    let ptx = parse_tx(&payload_tx(SPICE_SELL_DATA, vec![(p2pkh_script(0xb2), 546)])).unwrap();
    let render_ctx = ctx(&token_meta, &cfg, true);
    let first = render_record(&ptx, &render_ctx).unwrap();
    let second = render_record(&ptx, &render_ctx).unwrap();
    assert_eq!(first.text, second.text);
}

#[test]
fn decoder_round_trips_hand_built_pushes() {
    // Hand-build a script from known pushes, decode, compare byte-for-byte
    let pushes: Vec<Vec<u8>> = vec![
        hex::decode("53575000").unwrap(),
        vec![0x01],
        hex::decode("deadbeefcafe").unwrap(),
    ];
    let mut script = vec![0x6a];
    for push in &pushes {
        script.push(push.len() as u8);
        script.extend_from_slice(push);
    }
    let stack = decode_payload(&script).unwrap();
    assert_eq!(stack.0, pushes);

    // And the interpreter sees the same chunks the builder wrote
    let record = interpret(&stack);
    assert!(matches!(record, ProtocolRecord::Unrecognized(_)));
}
