//! Grinder scale configuration.

use serde::{Deserialize, Serialize};

/// Lowest value a grinder scale may start at.
pub const SCALE_FLOOR: i32 = 0;
/// Highest value a grinder scale may end at.
pub const SCALE_CEILING: i32 = 1000;
/// A usable scale needs at least this many steps between min and max.
pub const MIN_SPAN: i32 = 3;
/// More steps than this and the scale is not a real grinder dial.
pub const MAX_SPAN: i32 = 100;

/// Why a grinder scale failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GrinderScaleViolation {
    #[error("Scale values cannot be negative")]
    Negative,

    #[error("Scale values cannot exceed {}", SCALE_CEILING)]
    AboveCeiling,

    #[error("Minimum must be less than maximum")]
    MinNotBelowMax,

    #[error("Scale needs at least {} steps between minimum and maximum", MIN_SPAN)]
    SpanTooNarrow,

    #[error("Scale cannot span more than {} steps", MAX_SPAN)]
    SpanTooWide,
}

/// The min/max numeric range of a user's grinder dial.
///
/// Used to normalize grind-setting input across the rest of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrinderConfig {
    pub scale_min: i32,
    pub scale_max: i32,
}

impl Default for GrinderConfig {
    fn default() -> Self {
        Self {
            scale_min: 0,
            scale_max: 100,
        }
    }
}

impl GrinderConfig {
    /// Check every invariant, returning the violations in order.
    ///
    /// An empty list means the configuration is valid. The span checks only
    /// run once min sits below max, so a reversed range reports a single
    /// violation instead of a cascade.
    pub fn validate(&self) -> Vec<GrinderScaleViolation> {
        let mut violations = Vec::new();

        if self.scale_min < SCALE_FLOOR || self.scale_max < SCALE_FLOOR {
            violations.push(GrinderScaleViolation::Negative);
        }
        if self.scale_min > SCALE_CEILING || self.scale_max > SCALE_CEILING {
            violations.push(GrinderScaleViolation::AboveCeiling);
        }
        if self.scale_min >= self.scale_max {
            violations.push(GrinderScaleViolation::MinNotBelowMax);
        } else {
            let span = self.scale_max - self.scale_min;
            if span < MIN_SPAN {
                violations.push(GrinderScaleViolation::SpanTooNarrow);
            }
            if span > MAX_SPAN {
                violations.push(GrinderScaleViolation::SpanTooWide);
            }
        }

        violations
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}
