//! Address display: cashaddr rendering, elided previews and known-label
//! substitution.

use crate::constants::addresses::address_tag;
use crate::format::cashaddr;

/// Elide an address to a fixed-size prefix/suffix pair ("qqf...8up"),
/// unless the directory has a tag for it, in which case the tag replaces
/// the elided form entirely.
pub fn address_preview(cash_address: &str, slice_size: usize) -> String {
    if let Some(tag) = address_tag(cash_address) {
        return tag.to_string();
    }
    let unprefixed = cash_address
        .rsplit(':')
        .next()
        .unwrap_or(cash_address);
    if unprefixed.len() <= slice_size * 2 {
        return unprefixed.to_string();
    }
    format!(
        "{}...{}",
        &unprefixed[..slice_size],
        &unprefixed[unprefixed.len() - slice_size..]
    )
}

/// Best-effort address for a locking script: cashaddr when the script is a
/// standard template, `script(<hex>)` otherwise
pub fn script_to_address(script_hex: &str) -> String {
    cashaddr::encode_output_script(script_hex)
        .unwrap_or_else(|_| format!("script({})", script_hex))
}

/// Elided preview (or tag) straight from a locking script
pub fn script_preview(script_hex: &str, slice_size: usize) -> String {
    address_preview(&script_to_address(script_hex), slice_size)
}

/// Elide a hex id (txid, token id): "7c0...f9a"
pub fn elide_hex_id(id: &str, slice_size: usize) -> String {
    if id.len() <= slice_size * 2 {
        return id.to_string();
    }
    format!(
        "{}...{}",
        &id[..slice_size],
        &id[id.len() - slice_size..]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_elides_the_unprefixed_address() {
        assert_eq!(
            address_preview("ecash:qpm2qsznhks23z7629mms6s4cwef74vcwva87rkuu2", 3),
            "qpm...uu2"
        );
    }

    #[test]
    fn known_address_renders_its_tag() {
        assert_eq!(
            address_preview("ecash:qz2708636snqhsxu8wnlka78h6fdp77ar59jrf5035", 3),
            "Binance"
        );
    }

    #[test]
    fn nonstandard_script_falls_back_to_script_form() {
        assert_eq!(script_to_address("51"), "script(51)");
    }

    #[test]
    fn hex_ids_elide() {
        assert_eq!(
            elide_hex_id(
                "7c06091e745037b46c5ea60def8ad526274c2caabb1fae6c4ac89fad02fedf9a",
                3
            ),
            "7c0...f9a"
        );
    }
}
