use super::{DisplayConfig, Quota, render_number};
use crate::common::numeric::{finite_or_zero, to_fixed};

impl DisplayConfig {
    /// Renders a quota for display.
    ///
    /// Currency mode gives `$1.00` / `-$0.50`; raw mode gives the compact
    /// magnitude from [`render_number`]. A non-zero quota never renders as
    /// a zero amount: values that round away at `digits` show the smallest
    /// displayable step instead (`$0.01`). A zero quota stays `$0.00`.
    pub fn render_quota(&self, quota: impl Into<Quota>, digits: usize) -> String {
        let quota = quota.into();
        if !self.mode.is_currency() {
            return render_number(quota.get());
        }

        let magnitude = quota.abs();
        let mut fixed = to_fixed(self.quota_to_amount(magnitude), digits);
        if !magnitude.is_zero() && is_zero_amount(&fixed) {
            fixed = minimum_step(digits);
        }

        if quota.is_negative() {
            format!("-${fixed}")
        } else {
            format!("${fixed}")
        }
    }

    /// Only the division and fixed-point step, without currency glyph or
    /// sign handling. Used by table cells that render their own glyph.
    /// Tiny quotas round to zero here; the minimum step applies only in
    /// [`render_quota`](Self::render_quota).
    pub fn calculate_quota(&self, quota: impl Into<Quota>, digits: usize) -> String {
        to_fixed(self.quota_to_amount(quota.into()), digits)
    }

    /// Currency amount represented by `quota`.
    pub fn quota_to_amount(&self, quota: Quota) -> f64 {
        quota.as_f64() / self.quota_per_unit
    }

    /// Quota needed to represent a currency `amount`.
    pub fn quota_from_amount(&self, amount: f64) -> Quota {
        Quota::from_f64(finite_or_zero(amount) * self.quota_per_unit)
    }

    /// Renders an amount already expressed in currency, following the
    /// configured mode (raw mode shows the equivalent quota).
    pub fn render_amount(&self, amount: f64, digits: usize) -> String {
        if self.mode.is_currency() {
            let amount = finite_or_zero(amount);
            let fixed = to_fixed(amount.abs(), digits);
            if amount < 0.0 {
                format!("-${fixed}")
            } else {
                format!("${fixed}")
            }
        } else {
            render_number(self.quota_from_amount(amount).get())
        }
    }
}

fn is_zero_amount(fixed: &str) -> bool {
    fixed.bytes().all(|b| b == b'0' || b == b'.')
}

/// `"0.01"` for two digits, `"1"` for none.
fn minimum_step(digits: usize) -> String {
    match digits {
        0 => "1".to_string(),
        n => format!("0.{}1", "0".repeat(n - 1)),
    }
}
