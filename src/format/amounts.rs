//! Amount rendering: fiat-equivalent strings, XEC unit strings with
//! magnitude suffixes, price lines, and decimalized token quantities.
//!
//! All thresholds mirror the digest's en-US locale conventions: comma
//! grouping, trailing zeros trimmed down to a minimum digit count, and k/M/B
//! suffix compression at fixed powers of ten.

/// Base-currency satoshis per XEC
pub const SATS_PER_XEC: f64 = 100.0;

/// en-US style number rendering: comma-grouped integer part, at most
/// `max_frac` decimals, at least `min_frac` (zero padded), trailing zeros
/// beyond the minimum trimmed.
pub fn to_locale_string(value: f64, max_frac: usize, min_frac: usize) -> String {
    let mut formatted = format!("{:.*}", max_frac, value);
    if max_frac > 0 {
        // Trim trailing zeros but keep at least min_frac fraction digits
        let (int_part, frac_part) = match formatted.split_once('.') {
            Some((i, f)) => (i.to_string(), f.to_string()),
            None => (formatted.clone(), String::new()),
        };
        let mut frac: Vec<char> = frac_part.chars().collect();
        while frac.len() > min_frac && frac.last() == Some(&'0') {
            frac.pop();
        }
        formatted = if frac.is_empty() {
            int_part
        } else {
            format!("{}.{}", int_part, frac.iter().collect::<String>())
        };
    }

    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (formatted, None),
    };
    let grouped = group_thousands(&int_part);
    match frac_part {
        Some(f) => format!("{}.{}", grouped, f),
        None => grouped,
    }
}

fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{}{}", sign, grouped)
}

/// Format an XEC amount with magnitude suffixes.
///
/// Below 10 XEC amounts keep two decimals; the k/M/B/T tiers round to whole
/// units of the suffix.
pub fn format_xec_amount(xec: f64) -> String {
    let (display, suffix, max_frac) = if xec < 10.0 {
        (xec, "", 2)
    } else if xec < 1_000.0 {
        (xec, "", 0)
    } else if xec < 1_000_000.0 {
        (xec / 1e3, "k", 0)
    } else if xec < 1_000_000_000.0 {
        (xec / 1e6, "M", 0)
    } else if xec < 1_000_000_000_000.0 {
        (xec / 1e9, "B", 0)
    } else {
        (xec / 1e12, "T", 0)
    };
    format!("{}{} XEC", to_locale_string(display, max_frac, 0), suffix)
}

/// Render satoshis as a fiat string when a price is available and the fiat
/// value clears `fiat_floor`, else as an XEC unit string.
///
/// The no-price path is the total "API failure" fallback: every amount in a
/// fragment renders in raw units, nothing mixes.
pub fn sats_to_formatted_value(sats: u64, xec_price: Option<f64>, fiat_floor: f64) -> String {
    let xec = sats as f64 / SATS_PER_XEC;

    let Some(price) = xec_price else {
        return format_xec_amount(xec);
    };
    let fiat = xec * price;
    if fiat < fiat_floor {
        return format_xec_amount(xec);
    }

    let (display, suffix, min_frac, max_frac) = if fiat == 0.0 {
        (fiat, "", 0, 2)
    } else if fiat < 0.01 {
        // Enough decimals to show one significant digit
        let digits = (-fiat.log10().floor()) as usize;
        (fiat, "", digits, digits.max(3))
    } else if fiat < 1.0 {
        (fiat, "", 2, 3)
    } else if fiat < 1_000.0 {
        (fiat, "", 0, 0)
    } else if fiat < 1_000_000.0 {
        (fiat / 1e3, "k", 0, 2)
    } else if fiat < 1_000_000_000.0 {
        (fiat / 1e6, "M", 0, 2)
    } else {
        (fiat / 1e9, "B", 0, 2)
    };
    format!("${}{}", to_locale_string(display, max_frac, min_frac), suffix)
}

/// Price line rendering: more precision the smaller the price
pub fn format_price(price: f64, fiat_code: &str) -> String {
    let symbol = crate::constants::fiat_symbol(fiat_code);
    let formatted = if price > 100.0 {
        to_locale_string(price, 0, 0)
    } else if price > 1.0 {
        to_locale_string(price, 2, 0)
    } else {
        to_locale_string(price, 8, 0)
    };
    format!("{}{}", symbol, formatted)
}

/// Convert an undecimalized atom count into a decimal string using the
/// token's declared decimals. Decimal digits are preserved verbatim
/// ("10.2000", not "10.2"): token quantities show their full precision.
pub fn decimalized_amount(atoms: u128, decimals: u32) -> String {
    let digits = atoms.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return group_thousands(&digits);
    }
    // Left-pad so there is always at least one integer digit
    let padded = format!("{:0>width$}", digits, width = decimals + 1);
    let split = padded.len() - decimals;
    format!(
        "{}.{}",
        group_thousands(&padded[..split]),
        &padded[split..]
    )
}

/// Render a swap rate given in satoshis as an XEC amount with at most two
/// decimals ("159,883.54", "0.5", "6")
pub fn format_rate_sats(sats: u128) -> String {
    to_locale_string(sats as f64 / SATS_PER_XEC, 2, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_string_groups_and_trims() {
        assert_eq!(to_locale_string(30_000.0, 0, 0), "30,000");
        assert_eq!(to_locale_string(2_000.0, 2, 0), "2,000");
        assert_eq!(to_locale_string(0.0001, 8, 0), "0.0001");
        assert_eq!(to_locale_string(12.966, 0, 0), "13");
        assert_eq!(to_locale_string(0.688, 3, 2), "0.688");
        assert_eq!(to_locale_string(584.0, 2, 0), "584");
        assert_eq!(to_locale_string(1_234_567.0, 0, 0), "1,234,567");
    }

    #[test]
    fn xec_amounts_use_suffix_tiers() {
        assert_eq!(format_xec_amount(5.46), "5.46 XEC");
        assert_eq!(format_xec_amount(42.0), "42 XEC");
        assert_eq!(format_xec_amount(625_000.0), "625k XEC");
        assert_eq!(format_xec_amount(12_966_000.0), "13M XEC");
        assert_eq!(format_xec_amount(6_000_000_000.0), "6B XEC");
        assert_eq!(format_xec_amount(2_000_000_000_000.0), "2T XEC");
    }

    #[test]
    fn fiat_rendering_tiers() {
        let price = Some(0.00003333);
        // 242424.24 XEC * price = ~$8.08
        assert_eq!(sats_to_formatted_value(24_242_424, price, 0.0), "$8");
        // Sub-cent values show one significant digit
        assert_eq!(sats_to_formatted_value(6_000, price, 0.0), "$0.002");
        // Sub-dollar values get at least two decimals
        assert_eq!(sats_to_formatted_value(2_000_000, price, 0.0), "$0.667");
        // Thousands compress with k
        assert_eq!(
            sats_to_formatted_value(3_000_000_000_000, price, 0.0),
            "$999.9k"
        );
        // Millions compress with M
        assert_eq!(
            sats_to_formatted_value(9_000_000_000_000, price, 0.0),
            "$3M"
        );
    }

    #[test]
    fn no_price_falls_back_to_xec_units_everywhere() {
        assert_eq!(sats_to_formatted_value(5_000_001, None, 0.0), "50k XEC");
        assert_eq!(sats_to_formatted_value(2_000, None, 0.0), "20 XEC");
        assert_eq!(sats_to_formatted_value(546, None, 0.0), "5.46 XEC");
    }

    #[test]
    fn materiality_floor_keeps_small_amounts_in_xec() {
        let price = Some(0.00003333);
        assert_eq!(sats_to_formatted_value(6_000, price, 0.01), "60 XEC");
        assert_eq!(sats_to_formatted_value(24_242_424, price, 0.01), "$8");
    }

    #[test]
    fn price_lines() {
        assert_eq!(format_price(0.00003333, "usd"), "$0.00003333");
        assert_eq!(format_price(0.0001, "usd"), "$0.0001");
        assert_eq!(format_price(30_000.0, "usd"), "$30,000");
        assert_eq!(format_price(25.5, "usd"), "$25.5");
        assert_eq!(format_price(1900.0, "eur"), "€1,900");
    }

    #[test]
    fn decimalized_token_amounts_preserve_precision() {
        assert_eq!(decimalized_amount(102_000, 4), "10.2000");
        assert_eq!(decimalized_amount(10_000, 2), "100.00");
        assert_eq!(decimalized_amount(55, 0), "55");
        assert_eq!(decimalized_amount(500_000_000, 2), "5,000,000.00");
        assert_eq!(decimalized_amount(109_876_543, 7), "10.9876543");
        assert_eq!(decimalized_amount(5, 3), "0.005");
        assert_eq!(decimalized_amount(0, 2), "0.00");
    }

    #[test]
    fn swap_rates_render_in_xec() {
        assert_eq!(format_rate_sats(600), "6");
        assert_eq!(format_rate_sats(50), "0.5");
        assert_eq!(format_rate_sats(15_988_354), "159,883.54");
        assert_eq!(format_rate_sats(10_000_000), "100,000");
        assert_eq!(format_rate_sats(100_000_000), "1,000,000");
    }
}
