//! Formatted terminal output for fit results.
//!
//! Formatting lives in one place so the math/fitting code stays clean and
//! output changes are localized. No charting here; callers that want plots
//! re-evaluate the fitted curve themselves.

use crate::domain::{CurveParams, SegmentFit, TwoSegmentFit};
use crate::error::FitError;

/// One-segment block: parameters and fit quality.
pub fn format_segment_fit(label: &str, fit: &SegmentFit) -> String {
    let mut out = String::new();
    out.push_str(&format!("[{label}]\n"));
    let values = fit.params.to_array();
    for (name, value) in CurveParams::names().iter().zip(values.iter()) {
        out.push_str(&format!("  {name:<14} {value:>14.4}\n"));
    }
    out.push_str(&format!(
        "  n={} sse={:.4e} rmse={:.4} iterations={}\n",
        fit.quality.n, fit.quality.sse, fit.quality.rmse, fit.quality.iterations
    ));
    if fit.covariance.is_none() {
        out.push_str("  covariance: unavailable\n");
    }
    out
}

fn format_side(label: &str, side: &Result<SegmentFit, FitError>) -> String {
    match side {
        Ok(fit) => format_segment_fit(label, fit),
        Err(e) => format!("[{label}]\n  fit failed: {e}\n"),
    }
}

/// Full two-segment summary. Failed segments are reported inline next to
/// successful ones.
pub fn format_two_segment_summary(fit: &TwoSegmentFit) -> String {
    let mut out = String::new();
    out.push_str("=== mitigation curve fit ===\n");
    out.push_str(&format_side("before mitigation", &fit.pre));
    out.push_str(&format_side("after mitigation", &fit.post));
    out
}
