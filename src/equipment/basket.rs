//! Portafilter basket dose configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Upper plausibility bound for dose-in weights, in grams.
pub const MAX_DOSE_IN_G: u32 = 100;
/// Upper plausibility bound for dose-out weights, in grams.
pub const MAX_DOSE_OUT_G: u32 = 250;

/// Why a basket dose profile failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BasketDoseViolation {
    #[error("Weights must be greater than zero")]
    NonPositive,

    #[error("Dose in cannot exceed {}g", MAX_DOSE_IN_G)]
    DoseInTooLarge,

    #[error("Dose out cannot exceed {}g", MAX_DOSE_OUT_G)]
    DoseOutTooLarge,

    #[error("Dose in minimum must be less than maximum")]
    DoseInMinNotBelowMax,

    #[error("Dose out minimum must be less than maximum")]
    DoseOutMinNotBelowMax,
}

/// Acceptable dose-in/dose-out ranges for one basket, used for shot
/// validation across the rest of the app.
///
/// `is_active` marks the current profile. At most one row is active at a
/// time — enforced by the persistence layer, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketConfig {
    pub id: Uuid,
    pub coffee_in_min: Decimal,
    pub coffee_in_max: Decimal,
    pub coffee_out_min: Decimal,
    pub coffee_out_max: Decimal,
    pub is_active: bool,
}

impl BasketConfig {
    /// Build an inactive profile with a fresh id.
    pub fn new(
        coffee_in_min: Decimal,
        coffee_in_max: Decimal,
        coffee_out_min: Decimal,
        coffee_out_max: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            coffee_in_min,
            coffee_in_max,
            coffee_out_min,
            coffee_out_max,
            is_active: false,
        }
    }

    /// Check every invariant, returning the violations in order.
    pub fn validate(&self) -> Vec<BasketDoseViolation> {
        let mut violations = Vec::new();

        let weights = [
            self.coffee_in_min,
            self.coffee_in_max,
            self.coffee_out_min,
            self.coffee_out_max,
        ];
        if weights.iter().any(|w| *w <= Decimal::ZERO) {
            violations.push(BasketDoseViolation::NonPositive);
        }

        let max_in = Decimal::from(MAX_DOSE_IN_G);
        if self.coffee_in_min > max_in || self.coffee_in_max > max_in {
            violations.push(BasketDoseViolation::DoseInTooLarge);
        }
        let max_out = Decimal::from(MAX_DOSE_OUT_G);
        if self.coffee_out_min > max_out || self.coffee_out_max > max_out {
            violations.push(BasketDoseViolation::DoseOutTooLarge);
        }

        if self.coffee_in_min >= self.coffee_in_max {
            violations.push(BasketDoseViolation::DoseInMinNotBelowMax);
        }
        if self.coffee_out_min >= self.coffee_out_max {
            violations.push(BasketDoseViolation::DoseOutMinNotBelowMax);
        }

        violations
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn config(in_min: Decimal, in_max: Decimal, out_min: Decimal, out_max: Decimal) -> BasketConfig {
        BasketConfig::new(in_min, in_max, out_min, out_max)
    }

    #[test]
    fn typical_double_shot_ranges_are_valid() {
        let c = config(dec!(16.0), dec!(20.0), dec!(32.0), dec!(48.0));
        assert!(c.validate().is_empty());
    }

    #[test]
    fn zero_weight_reports_non_positive() {
        let c = config(dec!(0), dec!(20.0), dec!(32.0), dec!(48.0));
        assert_eq!(c.validate().first(), Some(&BasketDoseViolation::NonPositive));
    }

    #[test]
    fn reversed_dose_in_range_is_rejected() {
        let c = config(dec!(20.0), dec!(16.0), dec!(32.0), dec!(48.0));
        assert_eq!(c.validate(), vec![BasketDoseViolation::DoseInMinNotBelowMax]);
    }

    #[test]
    fn reversed_dose_out_range_is_rejected() {
        let c = config(dec!(16.0), dec!(20.0), dec!(48.0), dec!(32.0));
        assert_eq!(c.validate(), vec![BasketDoseViolation::DoseOutMinNotBelowMax]);
    }

    #[test]
    fn implausible_weights_are_bounded() {
        let c = config(dec!(16.0), dec!(120.0), dec!(32.0), dec!(300.0));
        let violations = c.validate();
        assert!(violations.contains(&BasketDoseViolation::DoseInTooLarge));
        assert!(violations.contains(&BasketDoseViolation::DoseOutTooLarge));
    }

    #[test]
    fn negative_weight_reports_non_positive_first() {
        let c = config(dec!(-1.0), dec!(20.0), dec!(32.0), dec!(48.0));
        assert_eq!(c.validate().first(), Some(&BasketDoseViolation::NonPositive));
    }

    #[test]
    fn new_profiles_start_inactive() {
        let c = config(dec!(16.0), dec!(20.0), dec!(32.0), dec!(48.0));
        assert!(!c.is_active);
    }
}
