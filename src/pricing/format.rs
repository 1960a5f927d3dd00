use std::sync::LazyLock;

use regex::Regex;

/// Fixed-point string: sign, integer part, optional fraction.
static FIXED_POINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-?\d+)(?:\.(\d*?)0*)?$").expect("fixed-point pattern is valid")
});

/// Strips trailing fractional zeros from a fixed-point string.
///
/// `"2.000000"` → `"2"`, `"0.500000"` → `"0.5"`, `"0.000000"` → `"0"`.
/// Strings that are not plain fixed-point numbers are returned unchanged.
pub fn trim_trailing_zeros(fixed: &str) -> String {
    let Some(caps) = FIXED_POINT.captures(fixed) else {
        return fixed.to_string();
    };
    let integer = &caps[1];
    let integer = if integer == "-0" { "0" } else { integer };
    match caps.get(2).map(|m| m.as_str()) {
        Some(fraction) if !fraction.is_empty() => format!("{integer}.{fraction}"),
        _ => integer.to_string(),
    }
}

/// Pads a trimmed price to at least two fraction digits for badge display.
///
/// `"2"` → `"2.00"`, `"0.5"` → `"0.50"`, `"0.000002"` stays as is.
pub fn format_price_display(price: &str) -> String {
    match price.split_once('.') {
        None => format!("{price}.00"),
        Some((_, fraction)) if fraction.len() < 2 => {
            format!("{price}{}", "0".repeat(2 - fraction.len()))
        }
        Some(_) => price.to_string(),
    }
}
