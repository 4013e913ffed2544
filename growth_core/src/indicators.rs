//! Growth indicator aggregation for a single measurement event.
//!
//! Validates the raw measurements, derives age in completed months and
//! scores every WHO indicator. Validation happens up front: either every
//! indicator is computed or the caller gets the full list of problems.

use crate::zscore::z_score_for_indicator;
use crate::{
    AnalysisOptions, Child, Error, GrowthIndicatorResult, Indicator, Measurement, Result, Sex,
    ValidationReport, ZScoreResult,
};
use chrono::{Datelike, NaiveDate};

pub const MAX_WEIGHT_KG: f64 = 50.0;
pub const MAX_HEIGHT_CM: f64 = 150.0;
pub const MAX_HEAD_CIRCUMFERENCE_CM: f64 = 70.0;
pub const MAX_AGE_MONTHS: u32 = 60;
pub const MIN_BMI: f64 = 5.0;
pub const MAX_BMI: f64 = 40.0;

/// Age in completed months between two dates
///
/// A month only counts once its day-of-month has been reached, so
/// 2023-01-15 to 2023-07-10 is 5 months. Dates before birth give 0.
pub fn age_in_months(birth_date: NaiveDate, measurement_date: NaiveDate) -> u32 {
    let mut months = (measurement_date.year() - birth_date.year()) * 12
        + (measurement_date.month() as i32 - birth_date.month() as i32);

    if measurement_date.day() < birth_date.day() {
        months -= 1;
    }

    months.max(0) as u32
}

/// Body mass index in kg/m²
pub fn bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let meters = height_cm / 100.0;
    weight_kg / (meters * meters)
}

/// Check a measurement set against plausible ranges
///
/// Every violated rule is reported. BMI is only checked once weight and
/// height are individually in range, since it is meaningless otherwise.
pub fn validate_measurements(
    weight: f64,
    height: f64,
    head_circumference: Option<f64>,
    age_in_months: u32,
) -> ValidationReport {
    let mut errors = Vec::new();

    let weight_ok = weight > 0.0 && weight <= MAX_WEIGHT_KG;
    if !weight_ok {
        errors.push(format!(
            "Weight must be greater than 0 and at most {} kg (got {})",
            MAX_WEIGHT_KG, weight
        ));
    }

    let height_ok = height > 0.0 && height <= MAX_HEIGHT_CM;
    if !height_ok {
        errors.push(format!(
            "Height must be greater than 0 and at most {} cm (got {})",
            MAX_HEIGHT_CM, height
        ));
    }

    if let Some(hc) = head_circumference {
        if !(hc > 0.0 && hc <= MAX_HEAD_CIRCUMFERENCE_CM) {
            errors.push(format!(
                "Head circumference must be greater than 0 and at most {} cm (got {})",
                MAX_HEAD_CIRCUMFERENCE_CM, hc
            ));
        }
    }

    if age_in_months > MAX_AGE_MONTHS {
        errors.push(format!(
            "Age must be between 0 and {} months (got {})",
            MAX_AGE_MONTHS, age_in_months
        ));
    }

    if weight_ok && height_ok {
        let value = bmi(weight, height);
        if !(MIN_BMI..=MAX_BMI).contains(&value) {
            errors.push(format!(
                "BMI {:.1} is outside the plausible range {}-{} (check weight and height)",
                value, MIN_BMI, MAX_BMI
            ));
        }
    }

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
    }
}

pub fn calculate_weight_for_age_z_score(
    weight: f64,
    age_in_months: f64,
    sex: Sex,
    options: &AnalysisOptions,
) -> Result<ZScoreResult> {
    z_score_for_indicator(weight, age_in_months, Indicator::WeightForAge, sex, options)
}

pub fn calculate_height_for_age_z_score(
    height: f64,
    age_in_months: f64,
    sex: Sex,
    options: &AnalysisOptions,
) -> Result<ZScoreResult> {
    z_score_for_indicator(height, age_in_months, Indicator::HeightForAge, sex, options)
}

/// Weight-for-height is keyed by height in cm, not by age
pub fn calculate_weight_for_height_z_score(
    weight: f64,
    height: f64,
    sex: Sex,
    options: &AnalysisOptions,
) -> Result<ZScoreResult> {
    z_score_for_indicator(weight, height, Indicator::WeightForHeight, sex, options)
}

pub fn calculate_head_circumference_z_score(
    head_circumference: f64,
    age_in_months: f64,
    sex: Sex,
    options: &AnalysisOptions,
) -> Result<ZScoreResult> {
    z_score_for_indicator(
        head_circumference,
        age_in_months,
        Indicator::HeadCircumferenceForAge,
        sex,
        options,
    )
}

/// Validate and score all indicators for one measurement event
///
/// Returns `Error::Validation` with every violated rule before any Z-score
/// is computed. Head circumference-for-age is only present when a head
/// circumference was supplied.
pub fn all_growth_indicators(
    weight: f64,
    height: f64,
    head_circumference: Option<f64>,
    age_in_months: u32,
    sex: Sex,
    options: &AnalysisOptions,
) -> Result<GrowthIndicatorResult> {
    let report = validate_measurements(weight, height, head_circumference, age_in_months);
    if !report.is_valid {
        tracing::warn!("Rejected measurement: {}", report.errors.join("; "));
        return Err(Error::Validation(report.errors));
    }

    let age = f64::from(age_in_months);

    let result = GrowthIndicatorResult {
        age_in_months,
        bmi: bmi(weight, height),
        weight_for_age: calculate_weight_for_age_z_score(weight, age, sex, options)?,
        height_for_age: calculate_height_for_age_z_score(height, age, sex, options)?,
        weight_for_height: calculate_weight_for_height_z_score(weight, height, sex, options)?,
        head_circumference_for_age: head_circumference
            .map(|hc| calculate_head_circumference_z_score(hc, age, sex, options))
            .transpose()?,
    };

    tracing::debug!(
        "Indicators at {} months: WFA {:.2}, HFA {:.2}, WFH {:.2}",
        age_in_months,
        result.weight_for_age.z_score,
        result.height_for_age.z_score,
        result.weight_for_height.z_score
    );

    Ok(result)
}

/// Same as [`all_growth_indicators`] but derives age from dates
///
/// A measurement dated before birth is scored at age 0.
#[allow(clippy::too_many_arguments)]
pub fn growth_indicators_from_dates(
    weight: f64,
    height: f64,
    head_circumference: Option<f64>,
    birth_date: NaiveDate,
    measurement_date: NaiveDate,
    sex: Sex,
    options: &AnalysisOptions,
) -> Result<GrowthIndicatorResult> {
    let age = age_in_months(birth_date, measurement_date);
    all_growth_indicators(weight, height, head_circumference, age, sex, options)
}

/// Score a stored measurement for a child
pub fn evaluate_measurement(
    child: &Child,
    measurement: &Measurement,
    options: &AnalysisOptions,
) -> Result<GrowthIndicatorResult> {
    growth_indicators_from_dates(
        measurement.weight,
        measurement.height,
        measurement.head_circumference,
        child.birth_date,
        measurement.date,
        child.sex,
        options,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GrowthStatus;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_age_truncates_partial_month() {
        assert_eq!(age_in_months(date(2023, 1, 15), date(2023, 7, 10)), 5);
        assert_eq!(age_in_months(date(2023, 1, 15), date(2023, 7, 15)), 6);
        assert_eq!(age_in_months(date(2023, 1, 15), date(2023, 1, 15)), 0);
    }

    #[test]
    fn test_age_across_year_boundary() {
        assert_eq!(age_in_months(date(2022, 11, 30), date(2023, 2, 28)), 2);
        assert_eq!(age_in_months(date(2020, 6, 1), date(2025, 6, 1)), 60);
    }

    #[test]
    fn test_age_floored_at_zero() {
        assert_eq!(age_in_months(date(2023, 5, 20), date(2023, 5, 2)), 0);
        assert_eq!(age_in_months(date(2023, 5, 20), date(2022, 1, 1)), 0);
    }

    #[test]
    fn test_validation_lists_every_violation() {
        let report = validate_measurements(-1.0, 200.0, Some(100.0), 70);
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 4, "{:?}", report.errors);
    }

    #[test]
    fn test_validation_accepts_typical_infant() {
        let report = validate_measurements(7.9, 67.6, Some(43.3), 6);
        assert!(report.is_valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_validation_checks_bmi() {
        // 20 kg at 60 cm is individually in range but BMI is ~55
        let report = validate_measurements(20.0, 60.0, None, 6);
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("BMI"));
    }

    #[test]
    fn test_validation_rejects_nan() {
        let report = validate_measurements(f64::NAN, 70.0, None, 6);
        assert!(!report.is_valid);
    }

    #[test]
    fn test_weight_for_age_birth_median_boys() {
        let options = AnalysisOptions::default();
        let result = calculate_weight_for_age_z_score(3.3464, 0.0, Sex::Male, &options).unwrap();
        assert!(result.z_score.abs() < 1e-9);
    }

    #[test]
    fn test_all_indicators_with_head_circumference() {
        let options = AnalysisOptions::default();
        let result =
            all_growth_indicators(7.934, 67.6236, Some(43.3306), 6, Sex::Male, &options).unwrap();

        assert_eq!(result.age_in_months, 6);
        assert!(result.weight_for_age.z_score.abs() < 1e-6);
        assert!(result.height_for_age.z_score.abs() < 1e-6);
        assert_eq!(result.height_for_age.status, GrowthStatus::Normal);
        let hc = result.head_circumference_for_age.as_ref().unwrap();
        assert!(hc.z_score.abs() < 1e-6);
        assert_eq!(
            result.get(Indicator::HeadCircumferenceForAge).map(|r| r.z_score),
            Some(hc.z_score)
        );
    }

    #[test]
    fn test_head_circumference_omitted_when_not_measured() {
        let options = AnalysisOptions::default();
        let result = all_growth_indicators(7.3, 65.7, None, 6, Sex::Female, &options).unwrap();
        assert!(result.head_circumference_for_age.is_none());
        assert!(result.get(Indicator::HeadCircumferenceForAge).is_none());
    }

    #[test]
    fn test_invalid_measurement_fails_without_partial_result() {
        let options = AnalysisOptions::default();
        let err = all_growth_indicators(0.0, 67.0, None, 6, Sex::Male, &options).unwrap_err();
        match err {
            Error::Validation(errors) => assert_eq!(errors.len(), 1),
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_dates_computes_age() {
        let options = AnalysisOptions::default();
        let result = growth_indicators_from_dates(
            7.5,
            66.0,
            None,
            date(2023, 1, 15),
            date(2023, 7, 10),
            Sex::Male,
            &options,
        )
        .unwrap();
        assert_eq!(result.age_in_months, 5);
    }

    #[test]
    fn test_from_dates_floors_pre_birth_age_to_zero() {
        let options = AnalysisOptions::default();
        let result = growth_indicators_from_dates(
            3.3464,
            49.8842,
            None,
            date(2023, 5, 20),
            date(2023, 5, 19),
            Sex::Male,
            &options,
        )
        .unwrap();
        assert_eq!(result.age_in_months, 0);
        assert!(result.weight_for_age.z_score.abs() < 1e-6);
    }

    #[test]
    fn test_from_dates_pre_birth_reports_every_violation() {
        let options = AnalysisOptions::default();
        let err = growth_indicators_from_dates(
            -1.0,
            200.0,
            Some(100.0),
            date(2023, 5, 20),
            date(2023, 5, 2),
            Sex::Female,
            &options,
        )
        .unwrap_err();

        let errors = err.validation_errors().unwrap();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].starts_with("Weight must be"));
        assert!(errors[1].starts_with("Height must be"));
        assert!(errors[2].starts_with("Head circumference must be"));
    }

    #[test]
    fn test_calculation_is_repeatable() {
        let options = AnalysisOptions::default();
        let a = all_growth_indicators(9.1, 73.0, Some(45.0), 10, Sex::Male, &options).unwrap();
        let b = all_growth_indicators(9.1, 73.0, Some(45.0), 10, Sex::Male, &options).unwrap();
        assert_eq!(a, b);
    }
}
