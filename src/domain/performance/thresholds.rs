use super::stats::Stats;
use serde::Serialize;

/// Number of reference standard deviations between the mean and a threshold.
pub const DEFAULT_STD_MULTIPLIER: f64 = 3.0;

/// Alert band derived from metric values on reference chunks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Thresholds {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl Thresholds {
    /// `mean ∓ std_multiplier * population_std`, clipped to `[lower_limit, upper_limit]`.
    ///
    /// NaN reference values are ignored; with no finite value the band is open.
    pub fn from_reference(
        reference_values: &[f64],
        std_multiplier: f64,
        lower_limit: f64,
        upper_limit: f64,
    ) -> Self {
        match Stats::mean_and_std(reference_values) {
            Some((mean, std_dev)) => {
                let deviation = std_dev * std_multiplier;
                Thresholds {
                    lower: Some((mean - deviation).max(lower_limit)),
                    upper: Some((mean + deviation).min(upper_limit)),
                }
            }
            None => Thresholds::default(),
        }
    }

    /// True when `value` falls outside the band. NaN never alerts.
    pub fn is_alert(&self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }
        self.lower.is_some_and(|lower| value < lower)
            || self.upper.is_some_and(|upper| value > upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_from_reference() {
        let thresholds = Thresholds::from_reference(&[0.7, 0.8, 0.9], 1.0, 0.0, 1.0);
        assert!((thresholds.lower.unwrap() - 0.718_350_341_907_227_4).abs() < 1e-9);
        assert!((thresholds.upper.unwrap() - 0.881_649_658_092_772_6).abs() < 1e-9);
    }

    #[test]
    fn test_thresholds_are_clipped() {
        let thresholds =
            Thresholds::from_reference(&[0.1, 0.9], DEFAULT_STD_MULTIPLIER, 0.0, 1.0);
        assert_eq!(thresholds.lower, Some(0.0));
        assert_eq!(thresholds.upper, Some(1.0));
    }

    #[test]
    fn test_alerts() {
        let thresholds = Thresholds {
            lower: Some(0.7),
            upper: Some(0.9),
        };
        assert!(thresholds.is_alert(0.5));
        assert!(thresholds.is_alert(0.95));
        assert!(!thresholds.is_alert(0.8));
        assert!(!thresholds.is_alert(f64::NAN));
        assert!(!Thresholds::default().is_alert(0.0));
    }

    #[test]
    fn test_open_band_without_reference_values() {
        let thresholds = Thresholds::from_reference(&[f64::NAN], 3.0, 0.0, 1.0);
        assert_eq!(thresholds, Thresholds::default());
    }
}
