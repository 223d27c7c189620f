//! Decimal string <-> base unit conversion.

use anyhow::{Result, anyhow, bail};

fn scale(decimals: u8) -> Result<u128> {
    10_u128
        .checked_pow(u32::from(decimals))
        .ok_or_else(|| anyhow!("unsupported decimals: {decimals}"))
}

/// Parse a non-negative decimal string into base units.
///
/// Excess fractional digits are rounded half-up at `decimals`.
pub fn parse_units(amount: &str, decimals: u8) -> Result<u128> {
    let amount = amount.trim();
    if amount.is_empty() {
        bail!("amount is empty");
    }

    let (whole, fraction) = match amount.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (amount, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        bail!("amount has no digits");
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        bail!("amount must be a non-negative decimal: {amount}");
    }

    let unit = scale(decimals)?;
    let whole_value = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<u128>()
            .map_err(|err| anyhow!("amount out of range: {err}"))?
    };

    let places = usize::from(decimals);
    let kept: String = fraction.chars().take(places).collect();
    let mut fraction_value = if kept.is_empty() {
        0
    } else {
        kept.parse::<u128>()
            .map_err(|err| anyhow!("amount out of range: {err}"))?
            * 10_u128.pow((places - kept.len()) as u32)
    };
    if fraction.len() > places && fraction.as_bytes()[places] >= b'5' {
        fraction_value += 1;
    }

    whole_value
        .checked_mul(unit)
        .and_then(|v| v.checked_add(fraction_value))
        .ok_or_else(|| anyhow!("amount out of range"))
}

/// Exact decimal rendering with trailing zeros removed (`5000000`, 6 → `"5"`).
pub fn format_units(value: u128, decimals: u8) -> String {
    let Ok(unit) = scale(decimals) else {
        return value.to_string();
    };
    let whole = value / unit;
    let fraction = value % unit;
    if fraction == 0 {
        return whole.to_string();
    }

    let padded = format!("{fraction:0width$}", width = usize::from(decimals));
    format!("{whole}.{}", padded.trim_end_matches('0'))
}

/// Rendering rounded to a fixed number of decimal places (`1234567`, 6, 2 → `"1.23"`).
pub fn format_fixed(value: u128, decimals: u8, places: u8) -> String {
    let (Ok(unit), Ok(place_unit)) = (scale(decimals), scale(places)) else {
        return value.to_string();
    };

    let rounded = if places >= decimals {
        value.saturating_mul(place_unit / unit)
    } else {
        let step = unit / place_unit;
        value.saturating_add(step / 2) / step
    };

    if places == 0 {
        return rounded.to_string();
    }
    let whole = rounded / place_unit;
    let fraction = rounded % place_unit;
    format!("{whole}.{fraction:0width$}", width = usize::from(places))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_usdc_amounts() {
        assert_eq!(parse_units("3", 6).unwrap(), 3_000_000);
        assert_eq!(parse_units("10", 6).unwrap(), 10_000_000);
        assert_eq!(parse_units("0.1", 6).unwrap(), 100_000);
        assert_eq!(parse_units(".5", 6).unwrap(), 500_000);
        assert_eq!(parse_units("2.", 6).unwrap(), 2_000_000);
        assert_eq!(parse_units(" 1.000001 ", 6).unwrap(), 1_000_001);
    }

    #[test]
    fn rounds_excess_precision_half_up() {
        assert_eq!(parse_units("0.0000004", 6).unwrap(), 0);
        assert_eq!(parse_units("0.0000005", 6).unwrap(), 1);
        assert_eq!(parse_units("1.9999999", 6).unwrap(), 2_000_000);
    }

    #[test]
    fn rejects_non_amounts() {
        for raw in ["", " ", ".", "-1", "1e6", "abc", "1.2.3", "1,5"] {
            assert!(parse_units(raw, 6).is_err(), "input {raw:?}");
        }
    }

    #[test]
    fn formats_exact_and_fixed() {
        assert_eq!(format_units(5_000_000, 6), "5");
        assert_eq!(format_units(1_500_000, 6), "1.5");
        assert_eq!(format_units(1, 6), "0.000001");
        assert_eq!(format_units(1_230_000_000_000_000_000, 18), "1.23");

        assert_eq!(format_fixed(1_234_567, 6, 2), "1.23");
        assert_eq!(format_fixed(1_235_000, 6, 2), "1.24");
        assert_eq!(format_fixed(0, 18, 2), "0.00");
        assert_eq!(format_fixed(999_999_999_999_999_999, 18, 2), "1.00");
    }
}
