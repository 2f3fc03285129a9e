//! Known address directory.
//!
//! Addresses with a tag render as the tag instead of the elided
//! `qqf...8up` preview. Exchange hot wallets are the main use.

use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    /// cashaddr -> display tag
    pub static ref ADDRESS_TAGS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert(
            "ecash:qz2708636snqhsxu8wnlka78h6fdp77ar59jrf5035",
            "Binance",
        );
        m.insert(
            "ecash:qq7yzel9zcrgqxrwn22cs3t7ml0c4pe5vqlmkyhx2z",
            "CoinEx",
        );
        m
    };
}

/// Tag for a cashaddr, if the directory knows it
pub fn address_tag(address: &str) -> Option<&'static str> {
    ADDRESS_TAGS.get(address).copied()
}
