//! Library error type.
//!
//! Three failure categories exist in this crate:
//!
//! - time inputs that are neither dates nor plain non-negative indices
//! - curve primitives asked to integrate over an ill-posed window
//! - bounded fits that cannot produce a result for a segment
//!
//! Curve errors propagate unmodified through the blender and evaluator: they
//! mean the current parameter vector is malformed and the residual evaluation
//! must be aborted. Fit errors are reported per segment.

#[derive(Clone, PartialEq)]
pub enum FitError {
    /// Input to the time indexer is neither a calendar date nor a plain
    /// non-negative numeric index.
    TimeConversion(String),
    /// A curve primitive was asked to integrate over a zero-width or
    /// otherwise ill-posed sampling window.
    DegenerateCurve(String),
    /// The bounded optimizer cannot produce a result consistent with the
    /// bounds and initial guess, or the fit inputs themselves are malformed
    /// (such misuse carries an `invalid segment` / `invalid series` message
    /// prefix).
    FitConvergence(String),
}

impl FitError {
    pub fn time_conversion(message: impl Into<String>) -> Self {
        FitError::TimeConversion(message.into())
    }

    pub fn degenerate_curve(message: impl Into<String>) -> Self {
        FitError::DegenerateCurve(message.into())
    }

    pub fn fit_convergence(message: impl Into<String>) -> Self {
        FitError::FitConvergence(message.into())
    }

    fn kind(&self) -> &'static str {
        match self {
            FitError::TimeConversion(_) => "time conversion",
            FitError::DegenerateCurve(_) => "degenerate curve",
            FitError::FitConvergence(_) => "fit convergence",
        }
    }

    fn message(&self) -> &str {
        match self {
            FitError::TimeConversion(m)
            | FitError::DegenerateCurve(m)
            | FitError::FitConvergence(m) => m,
        }
    }
}

impl std::fmt::Display for FitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {}", self.kind(), self.message())
    }
}

impl std::fmt::Debug for FitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FitError")
            .field("kind", &self.kind())
            .field("message", &self.message())
            .finish()
    }
}

impl std::error::Error for FitError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let err = FitError::degenerate_curve("interval must be positive");
        let text = format!("{err}");
        assert!(text.contains("degenerate curve"));
        assert!(text.contains("interval must be positive"));
    }
}
