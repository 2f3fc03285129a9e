//! Known mining pool registry.
//!
//! A pool is recognised either by a payout output script or by an ASCII
//! fragment it stamps into the coinbase scriptsig. `parse_coinbase_info`
//! marks the pools whose coinbase tag carries extra "/Mined by .../" detail.

use lazy_static::lazy_static;

#[derive(Debug, Clone)]
pub struct MinerInfo {
    pub miner: &'static str,
    /// Payout output script (hex) when the pool uses a stable address
    pub payout_output_script: Option<&'static str>,
    /// ASCII fragment of the coinbase tag, hex encoded
    pub coinbase_hex_fragment: &'static str,
    /// Whether the "/..../" sections of the coinbase tag carry worker info
    pub parse_coinbase_info: bool,
}

lazy_static! {
    /// Ordered registry. The scriptsig-fragment scan keeps the LAST match, so
    /// pools whose tag embeds another pool's software marker (ckpool forks)
    /// come after the generic entry.
    pub static ref KNOWN_MINERS: Vec<MinerInfo> = vec![
        MinerInfo {
            miner: "ViaBTC",
            payout_output_script: Some(
                "76a914f1c075a01882ae0972f95d3a4177c86c852b7d9188ac",
            ),
            // "ViaBTC"
            coinbase_hex_fragment: "566961425443",
            parse_coinbase_info: true,
        },
        MinerInfo {
            miner: "Mining-Dutch",
            payout_output_script: Some(
                "76a914a24e2b67689c3753983d3b408bc7690d31b1b74d88ac",
            ),
            // "Mining-Dutch"
            coinbase_hex_fragment: "4d696e696e672d4475746368",
            parse_coinbase_info: false,
        },
        MinerInfo {
            miner: "CK Pool",
            payout_output_script: None,
            // "ckpool"
            coinbase_hex_fragment: "636b706f6f6c",
            parse_coinbase_info: true,
        },
        MinerInfo {
            miner: "Zulu Pool",
            payout_output_script: None,
            // "ZULUPooL-XEC"
            coinbase_hex_fragment: "5a554c55506f6f4c2d584543",
            parse_coinbase_info: false,
        },
        MinerInfo {
            miner: "zpool",
            payout_output_script: None,
            // "zpool.ca"
            coinbase_hex_fragment: "7a706f6f6c2e6361",
            parse_coinbase_info: false,
        },
        MinerInfo {
            miner: "Molepool",
            payout_output_script: None,
            // "molepool.com"
            coinbase_hex_fragment: "6d6f6c65706f6f6c2e636f6d",
            parse_coinbase_info: false,
        },
        MinerInfo {
            miner: "CoinMinerz.com",
            payout_output_script: None,
            // "CoinMinerz.com"
            coinbase_hex_fragment: "436f696e4d696e65727a2e636f6d",
            parse_coinbase_info: false,
        },
        MinerInfo {
            miner: "zergpool.com",
            payout_output_script: None,
            // "zergpool.com"
            coinbase_hex_fragment: "7a657267706f6f6c2e636f6d",
            parse_coinbase_info: false,
        },
        MinerInfo {
            miner: "solopool.org",
            payout_output_script: None,
            // "solopool.org"
            coinbase_hex_fragment: "736f6c6f706f6f6c2e6f7267",
            parse_coinbase_info: false,
        },
        MinerInfo {
            miner: "p2p-spb",
            payout_output_script: None,
            // "p2p-spb"
            coinbase_hex_fragment: "7032702d737062",
            parse_coinbase_info: false,
        },
        MinerInfo {
            miner: "Kryptex",
            payout_output_script: None,
            // "pool.kryptex.com"
            coinbase_hex_fragment: "706f6f6c2e6b7279707465782e636f6d",
            parse_coinbase_info: false,
        },
        // ckpool forks - after CK Pool so the fragment scan prefers them
        MinerInfo {
            miner: "westpool",
            payout_output_script: None,
            // "westpool"
            coinbase_hex_fragment: "77657374706f6f6c",
            parse_coinbase_info: false,
        },
        MinerInfo {
            miner: "eastpool",
            payout_output_script: None,
            // "eastpool"
            coinbase_hex_fragment: "65617374706f6f6c",
            parse_coinbase_info: false,
        },
        MinerInfo {
            miner: "solo.minemine.online",
            payout_output_script: None,
            // "solo.minemine.online"
            coinbase_hex_fragment: "736f6c6f2e6d696e656d696e652e6f6e6c696e65",
            parse_coinbase_info: false,
        },
        MinerInfo {
            miner: "pool.minemine.online",
            payout_output_script: None,
            // "pool.minemine.online"
            coinbase_hex_fragment: "706f6f6c2e6d696e656d696e652e6f6e6c696e65",
            parse_coinbase_info: false,
        },
    ];
}
