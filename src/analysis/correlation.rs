//! Pearson correlation between two numeric series

use crate::structs::{Correlation, CorrelationSummary, RentalError, Relationship, Result};

/// Calculate the Pearson correlation coefficient between two variables
///
/// Returns `Correlation::Undefined` when either series is constant, which
/// includes empty and single-value input.
///
/// # Errors
/// Returns error if the series have different lengths
#[allow(clippy::cast_precision_loss)]
pub fn pearson(x: &[f64], y: &[f64]) -> Result<Correlation> {
    if x.len() != y.len() {
        return Err(RentalError::InvalidInput(format!(
            "correlation series differ in length ({} vs {})",
            x.len(),
            y.len()
        )));
    }
    if is_constant(x) || is_constant(y) {
        return Ok(Correlation::Undefined);
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;

    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return Ok(Correlation::Undefined);
    }

    Ok(Correlation::Defined((cov / denom).clamp(-1.0, 1.0)))
}

/// Fewer than two distinct values means zero variance
fn is_constant(values: &[f64]) -> bool {
    values.first().map_or(true, |first| values.iter().all(|v| v == first))
}

impl Correlation {
    #[must_use]
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Defined(r) => Some(r),
            Self::Undefined => None,
        }
    }

    /// Sign of the coefficient; zero and undefined both read as no relationship
    #[must_use]
    pub fn relationship(self) -> Relationship {
        match self {
            Self::Defined(r) if r > 0.0 => Relationship::Positive,
            Self::Defined(r) if r < 0.0 => Relationship::Negative,
            _ => Relationship::None,
        }
    }
}

impl Relationship {
    /// One-sentence reading of the relationship between two named quantities
    #[must_use]
    pub fn describe(self, x: &str, y: &str) -> String {
        match self {
            Self::Positive => format!("There is a positive correlation between {x} and {y}."),
            Self::Negative => format!("There is a negative correlation between {x} and {y}."),
            Self::None => format!("There is no significant linear relationship between {x} and {y}."),
        }
    }
}

impl CorrelationSummary {
    /// # Errors
    /// Returns error if the series have different lengths
    pub fn compute(x: &[f64], y: &[f64]) -> Result<Self> {
        let coefficient = pearson(x, y)?;
        Ok(Self {
            coefficient,
            relationship: coefficient.relationship(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_positive() {
        let corr = pearson(&[10.0, 20.0, 30.0], &[100.0, 200.0, 300.0]).expect("correlate");

        let r = corr.value().expect("defined");
        assert!((r - 1.0).abs() < 1e-12);
        assert_eq!(corr.relationship(), Relationship::Positive);
    }

    #[test]
    fn test_negative() {
        let corr = pearson(&[1.0, 2.0, 3.0, 4.0], &[8.0, 6.0, 5.0, 1.0]).expect("correlate");
        assert!(corr.value().expect("defined") < -0.9);
        assert_eq!(corr.relationship(), Relationship::Negative);
    }

    #[test]
    fn test_constant_series_is_undefined() {
        let counts = [500.0, 500.0, 500.0];
        assert_eq!(pearson(&[1.0, 2.0, 3.0], &counts).unwrap(), Correlation::Undefined);
        assert_eq!(pearson(&[0.1, 0.1, 0.1], &counts).unwrap(), Correlation::Undefined);
        assert_eq!(Correlation::Undefined.relationship(), Relationship::None);
    }

    #[test]
    fn test_empty_and_single_are_undefined() {
        assert_eq!(pearson(&[], &[]).unwrap(), Correlation::Undefined);
        assert_eq!(pearson(&[3.0], &[4.0]).unwrap(), Correlation::Undefined);
    }

    #[test]
    fn test_length_mismatch() {
        assert!(pearson(&[1.0, 2.0], &[1.0]).is_err());
    }

    #[test]
    fn test_exact_zero_is_no_relationship() {
        // Symmetric around the mean: covariance is exactly zero
        let corr = pearson(&[-1.0, 0.0, 1.0], &[1.0, 0.0, 1.0]).unwrap();
        assert_eq!(corr, Correlation::Defined(0.0));
        assert_eq!(corr.relationship(), Relationship::None);
    }

    #[test]
    fn test_describe() {
        let text = Relationship::Positive.describe("temperature", "total rentals");
        assert!(text.contains("positive correlation between temperature and total rentals"));
        assert!(Relationship::None.describe("a", "b").contains("no significant linear"));
    }
}
