//! LMS Z-score calculation, percentile conversion and classification.
//!
//! For a measurement `X` and reference parameters `(L, M, S)`:
//!
//! ```text
//! Z = ((X / M)^L - 1) / (L * S)     when |L| >= 0.01
//! Z = ln(X / M) / S                  when |L| <  0.01
//! ```
//!
//! Z is clamped to [-5, 5].

use crate::lms;
use crate::messages::{status_message, Locale};
use crate::reference::ReferenceTable;
use crate::{
    AnalysisOptions, Error, Indicator, Lms, Result, Sex, WeightForHeightLookup, ZScoreBand,
    ZScoreResult,
};

/// Largest magnitude a Z-score is reported with
pub const Z_SCORE_LIMIT: f64 = 5.0;

/// Below this |L| the log form of the transform is used
const L_EPSILON: f64 = 0.01;

/// Apply the LMS transform to `value`
pub fn calculate_z_score(value: f64, lms: Lms) -> Result<f64> {
    if !(value.is_finite() && value > 0.0) {
        return Err(Error::Computation(format!(
            "measurement must be positive, got {}",
            value
        )));
    }
    if !(lms.m.is_finite() && lms.m > 0.0) {
        return Err(Error::Computation(format!(
            "median (M) must be positive, got {}",
            lms.m
        )));
    }
    if !(lms.s.is_finite() && lms.s > 0.0) {
        return Err(Error::Computation(format!(
            "coefficient of variation (S) must be positive, got {}",
            lms.s
        )));
    }
    if !lms.l.is_finite() {
        return Err(Error::Computation(format!(
            "power (L) must be finite, got {}",
            lms.l
        )));
    }

    let z = if lms.l.abs() < L_EPSILON {
        (value / lms.m).ln() / lms.s
    } else {
        ((value / lms.m).powf(lms.l) - 1.0) / (lms.l * lms.s)
    };

    if z.abs() > Z_SCORE_LIMIT {
        tracing::warn!(
            "Z-score {:.3} for value {} outside +/-{}, clamping",
            z,
            value,
            Z_SCORE_LIMIT
        );
    }

    Ok(z.clamp(-Z_SCORE_LIMIT, Z_SCORE_LIMIT))
}

/// Convert a Z-score to a percentile in [0, 100], rounded to 2 decimals
///
/// Uses the Abramowitz & Stegun 7.1.26 approximation of erf, which is
/// accurate to about 1.5e-7 in the CDF.
pub fn z_score_to_percentile(z: f64) -> f64 {
    let p = normal_cdf(z) * 100.0;
    ((p * 100.0).round() / 100.0).clamp(0.0, 100.0)
}

fn normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))
}

fn erf(x: f64) -> f64 {
    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;
    const P: f64 = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t) + A3) * t + A2) * t + A1;
    let y = 1.0 - poly * t * (-x * x).exp();

    sign * y
}

/// Place a Z-score in its band
pub fn classify(z: f64) -> ZScoreBand {
    if z < -3.0 {
        ZScoreBand::SeverelyLow
    } else if z < -2.0 {
        ZScoreBand::Low
    } else if z < -1.0 {
        ZScoreBand::MildlyLow
    } else if z <= 1.0 {
        ZScoreBand::Normal
    } else if z <= 2.0 {
        ZScoreBand::MildlyHigh
    } else if z <= 3.0 {
        ZScoreBand::High
    } else {
        ZScoreBand::SeverelyHigh
    }
}

/// Score `value` against an explicit table
///
/// Age-keyed tables are always interpolated; `wfh_lookup` only applies to
/// weight-for-height.
pub fn z_score_against_table(
    value: f64,
    key: f64,
    table: &ReferenceTable,
    wfh_lookup: WeightForHeightLookup,
    locale: Locale,
) -> Result<ZScoreResult> {
    let lms = match table.indicator {
        Indicator::WeightForHeight => lms::lookup(table, key, wfh_lookup)?,
        _ => lms::interpolate(table, key)?,
    };

    let z_score = calculate_z_score(value, lms)?;
    let band = classify(z_score);

    tracing::debug!(
        "{} ({}) value {} at {}: Z = {:.3}, {:?}",
        table.indicator,
        table.sex,
        value,
        key,
        z_score,
        band
    );

    Ok(ZScoreResult {
        z_score,
        percentile: z_score_to_percentile(z_score),
        status: band.status(),
        band,
        message: status_message(table.indicator, band, locale),
    })
}

/// Score `value` for an indicator using the built-in WHO table for `sex`
///
/// `key` is age in months, or height in cm for weight-for-height.
pub fn z_score_for_indicator(
    value: f64,
    key: f64,
    indicator: Indicator,
    sex: Sex,
    options: &AnalysisOptions,
) -> Result<ZScoreResult> {
    z_score_against_table(
        value,
        key,
        &indicator.table(sex),
        options.weight_for_height_lookup,
        options.locale,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GrowthStatus;

    fn lms(l: f64, m: f64, s: f64) -> Lms {
        Lms { l, m, s }
    }

    #[test]
    fn test_value_at_median_is_zero() {
        assert_eq!(calculate_z_score(3.3464, lms(0.3487, 3.3464, 0.14602)).unwrap(), 0.0);
        assert_eq!(calculate_z_score(50.0, lms(1.0, 50.0, 0.04)).unwrap(), 0.0);
        assert_eq!(calculate_z_score(10.0, lms(0.0, 10.0, 0.1)).unwrap(), 0.0);
    }

    #[test]
    fn test_general_formula() {
        // L = 1 reduces to (X - M) / (M * S)
        let z = calculate_z_score(52.0, lms(1.0, 50.0, 0.04)).unwrap();
        assert!((z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_log_formula_for_small_l() {
        let z = calculate_z_score(11.0, lms(0.005, 10.0, 0.1)).unwrap();
        assert!((z - (1.1f64).ln() / 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_clamped_to_five() {
        assert_eq!(calculate_z_score(100.0, lms(1.0, 10.0, 0.1)).unwrap(), 5.0);
        assert_eq!(calculate_z_score(0.5, lms(1.0, 10.0, 0.1)).unwrap(), -5.0);
    }

    #[test]
    fn test_output_always_within_bounds() {
        for &l in &[-1.5, -0.35, 0.0, 0.005, 0.35, 1.0, 2.0] {
            for &value in &[0.01, 0.5, 3.0, 9.9, 10.0, 25.0, 1000.0] {
                let z = calculate_z_score(value, lms(l, 10.0, 0.12)).unwrap();
                assert!((-5.0..=5.0).contains(&z), "L={} value={} z={}", l, value, z);
            }
        }
    }

    #[test]
    fn test_rejects_non_positive_inputs() {
        assert!(matches!(
            calculate_z_score(0.0, lms(1.0, 10.0, 0.1)),
            Err(Error::Computation(_))
        ));
        assert!(calculate_z_score(-1.0, lms(1.0, 10.0, 0.1)).is_err());
        assert!(calculate_z_score(5.0, lms(1.0, 0.0, 0.1)).is_err());
        assert!(calculate_z_score(5.0, lms(1.0, 10.0, -0.1)).is_err());
        assert!(calculate_z_score(f64::NAN, lms(1.0, 10.0, 0.1)).is_err());
    }

    #[test]
    fn test_percentile_of_known_z_scores() {
        assert_eq!(z_score_to_percentile(0.0), 50.0);
        assert!((z_score_to_percentile(1.0) - 84.13).abs() <= 0.1);
        assert!((z_score_to_percentile(-1.0) - 15.87).abs() <= 0.1);
        assert!((z_score_to_percentile(1.96) - 97.5).abs() <= 0.1);
        assert!((z_score_to_percentile(-2.0) - 2.28).abs() <= 0.1);
        assert!(z_score_to_percentile(-5.0) >= 0.0);
        assert!(z_score_to_percentile(5.0) <= 100.0);
    }

    #[test]
    fn test_percentile_symmetric() {
        for &z in &[0.25, 0.8, 1.5, 2.7, 4.0] {
            let sum = z_score_to_percentile(z) + z_score_to_percentile(-z);
            assert!((sum - 100.0).abs() < 0.011, "z={} sum={}", z, sum);
        }
    }

    #[test]
    fn test_percentile_rounded_to_two_decimals() {
        let p = z_score_to_percentile(0.3333);
        assert!(((p * 100.0).round() - p * 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_classification_boundaries() {
        assert_eq!(classify(-3.0001), ZScoreBand::SeverelyLow);
        assert_eq!(classify(-3.0), ZScoreBand::Low);
        assert_eq!(classify(-2.0001), ZScoreBand::Low);
        assert_eq!(classify(-2.0), ZScoreBand::MildlyLow);
        assert_eq!(classify(-1.0001), ZScoreBand::MildlyLow);
        assert_eq!(classify(-1.0), ZScoreBand::Normal);
        assert_eq!(classify(1.0), ZScoreBand::Normal);
        assert_eq!(classify(1.0001), ZScoreBand::MildlyHigh);
        assert_eq!(classify(2.0), ZScoreBand::MildlyHigh);
        assert_eq!(classify(2.0001), ZScoreBand::High);
        assert_eq!(classify(3.0), ZScoreBand::High);
        assert_eq!(classify(3.0001), ZScoreBand::SeverelyHigh);
    }

    #[test]
    fn test_status_at_boundaries() {
        assert_eq!(classify(-2.0).status(), GrowthStatus::Warning);
        assert_eq!(classify(-2.0001).status(), GrowthStatus::Alert);
        assert_eq!(classify(0.0).status(), GrowthStatus::Normal);
        assert_eq!(classify(2.5).status(), GrowthStatus::Alert);
    }

    #[test]
    fn test_z_score_for_indicator_at_birth_median() {
        let options = AnalysisOptions::default();
        let result =
            z_score_for_indicator(3.3464, 0.0, Indicator::WeightForAge, Sex::Male, &options)
                .unwrap();
        assert!(result.z_score.abs() < 1e-9);
        assert_eq!(result.percentile, 50.0);
        assert_eq!(result.status, GrowthStatus::Normal);
        assert_eq!(result.message, "Normal weight for age");
    }

    #[test]
    fn test_z_score_for_indicator_localized() {
        let options = AnalysisOptions::default().with_locale(Locale::Id);
        let result =
            z_score_for_indicator(2.2, 0.0, Indicator::WeightForAge, Sex::Female, &options)
                .unwrap();
        assert_eq!(result.status, GrowthStatus::Alert);
        assert!(result.message.starts_with("Berat badan"));
    }

    #[test]
    fn test_weight_for_height_uses_configured_lookup() {
        let nearest = AnalysisOptions::default();
        let interpolate = AnalysisOptions {
            weight_for_height_lookup: WeightForHeightLookup::Interpolate,
            ..AnalysisOptions::default()
        };

        // 8.6226 kg is the 70 cm median; at 72 cm the nearest row is still 70 cm
        let a = z_score_for_indicator(
            8.6226,
            72.0,
            Indicator::WeightForHeight,
            Sex::Male,
            &nearest,
        )
        .unwrap();
        let b = z_score_for_indicator(
            8.6226,
            72.0,
            Indicator::WeightForHeight,
            Sex::Male,
            &interpolate,
        )
        .unwrap();
        assert!(a.z_score.abs() < 1e-9);
        assert!(b.z_score < 0.0);
    }
}
