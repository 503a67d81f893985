//! Descriptive statistics over plain `f64` samples.

/// Round to 4 decimal places, the precision of the summary output.
pub fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

/// Sort a copy of `values` ascending. NaNs are expected to be filtered
/// out upstream; `total_cmp` keeps the order total regardless.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut s = values.to_vec();
    s.sort_by(f64::total_cmp);
    s
}

/// Percentile `p` (0–100) of an ascending slice using linear interpolation
/// between closest ranks: position `(n - 1) * p / 100`.
///
/// Returns `None` for an empty slice.
pub fn percentile_of_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let h = (n - 1) as f64 * (p / 100.0).clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    let frac = h - lo as f64;
    Some(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}

// ---------------------------------------------------------------------------
// Tukey boxplot statistics
// ---------------------------------------------------------------------------

/// Five-number boxplot summary with whiskers at the most extreme data points
/// inside `[q1 - 1.5·IQR, q3 + 1.5·IQR]`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub whisker_low: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    pub const WHISKER_IQR: f64 = 1.5;

    pub fn new(values: &[f64]) -> Option<Self> {
        let s = sorted(values);
        let q1 = percentile_of_sorted(&s, 25.0)?;
        let median = percentile_of_sorted(&s, 50.0)?;
        let q3 = percentile_of_sorted(&s, 75.0)?;
        let iqr = q3 - q1;
        let low_fence = q1 - Self::WHISKER_IQR * iqr;
        let high_fence = q3 + Self::WHISKER_IQR * iqr;

        // Fences always bracket q1..q3, so both searches hit at least one value.
        let whisker_low = s.iter().copied().find(|v| *v >= low_fence).unwrap_or(q1);
        let whisker_high = s
            .iter()
            .rev()
            .copied()
            .find(|v| *v <= high_fence)
            .unwrap_or(q3);
        let outliers = s
            .iter()
            .copied()
            .filter(|v| *v < whisker_low || *v > whisker_high)
            .collect();

        Some(BoxStats {
            whisker_low,
            q1,
            median,
            q3,
            whisker_high,
            outliers,
        })
    }

    /// Whisker span widened by `pad` (a fraction of the span) on both ends.
    pub fn padded_whisker_range(&self, pad: f64) -> (f64, f64) {
        let span = self.whisker_high - self.whisker_low;
        let margin = if span > 0.0 {
            span * pad
        } else {
            // Constant sample: open a window proportional to its magnitude.
            (self.whisker_low.abs() * pad).max(pad)
        };
        (self.whisker_low - margin, self.whisker_high + margin)
    }
}
