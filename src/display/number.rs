use crate::common::numeric::to_fixed;

const THOUSAND: f64 = 1_000.0;
const MILLION: f64 = 1_000_000.0;
const BILLION: f64 = 1_000_000_000.0;

/// Plain integers below this are printed as-is.
const COMPACT_THRESHOLD: f64 = 10_000.0;

/// Magnitude formatter for raw quota display.
///
/// `12_345` → `"12.3k"`, `1_500_000` → `"1.5M"`, `9_999` → `"9999"`.
/// Negative values keep their sign in front of the compact magnitude.
pub fn render_number(value: i64) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let magnitude = value.unsigned_abs();
    let scaled = magnitude as f64;

    let body = if scaled >= BILLION {
        format!("{}B", to_fixed(scaled / BILLION, 1))
    } else if scaled >= MILLION {
        format!("{}M", to_fixed(scaled / MILLION, 1))
    } else if scaled >= COMPACT_THRESHOLD {
        format!("{}k", to_fixed(scaled / THOUSAND, 1))
    } else {
        magnitude.to_string()
    };

    format!("{sign}{body}")
}
