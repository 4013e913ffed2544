//! Measurement history loading and per-indicator series building.
//!
//! History files are either CSV with a `date,weight,height,head_circumference`
//! header (head circumference may be left empty) or a JSON array of
//! measurements. Rows are returned sorted by date.

use crate::indicators::evaluate_measurement;
use crate::{
    AnalysisOptions, Child, Error, GrowthDataPoint, GrowthIndicatorResult, Indicator,
    Measurement, Result, ZScoreResult,
};
use csv::{ReaderBuilder, Trim};
use serde::Serialize;
use std::path::Path;

/// Load a child's measurement history from a CSV or JSON file
pub fn load_measurements(path: &Path) -> Result<Vec<Measurement>> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let mut measurements = if is_json {
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str::<Vec<Measurement>>(&contents)?
    } else {
        let mut reader = ReaderBuilder::new().trim(Trim::All).from_path(path)?;
        reader
            .deserialize::<Measurement>()
            .collect::<std::result::Result<Vec<_>, csv::Error>>()?
    };

    measurements.sort_by_key(|m| m.date);

    tracing::info!(
        "Loaded {} measurements from {:?}",
        measurements.len(),
        path
    );

    Ok(measurements)
}

/// One scored measurement
#[derive(Clone, Debug, Serialize)]
pub struct Evaluation {
    pub measurement: Measurement,
    pub result: GrowthIndicatorResult,
}

/// Scored history plus one Z-score series per indicator
#[derive(Clone, Debug, Default, Serialize)]
pub struct GrowthSeries {
    pub evaluations: Vec<Evaluation>,
    pub weight_for_age: Vec<GrowthDataPoint>,
    pub height_for_age: Vec<GrowthDataPoint>,
    pub weight_for_height: Vec<GrowthDataPoint>,
    pub head_circumference_for_age: Vec<GrowthDataPoint>,
}

impl GrowthSeries {
    pub fn series(&self, indicator: Indicator) -> &[GrowthDataPoint] {
        match indicator {
            Indicator::WeightForAge => &self.weight_for_age,
            Indicator::HeightForAge => &self.height_for_age,
            Indicator::WeightForHeight => &self.weight_for_height,
            Indicator::HeadCircumferenceForAge => &self.head_circumference_for_age,
        }
    }

    fn series_mut(&mut self, indicator: Indicator) -> &mut Vec<GrowthDataPoint> {
        match indicator {
            Indicator::WeightForAge => &mut self.weight_for_age,
            Indicator::HeightForAge => &mut self.height_for_age,
            Indicator::WeightForHeight => &mut self.weight_for_height,
            Indicator::HeadCircumferenceForAge => &mut self.head_circumference_for_age,
        }
    }
}

/// Score every measurement and accumulate per-indicator series
///
/// A measurement that fails validation aborts the build; its error messages
/// are prefixed with the measurement date.
pub fn build_series(
    child: &Child,
    measurements: &[Measurement],
    options: &AnalysisOptions,
) -> Result<GrowthSeries> {
    let mut series = GrowthSeries::default();

    let mut ordered: Vec<&Measurement> = measurements.iter().collect();
    ordered.sort_by_key(|m| m.date);

    for measurement in ordered {
        let result = evaluate_measurement(child, measurement, options).map_err(|e| match e {
            Error::Validation(errors) => Error::Validation(
                errors
                    .into_iter()
                    .map(|msg| format!("{}: {}", measurement.date, msg))
                    .collect(),
            ),
            other => other,
        })?;

        for indicator in Indicator::ALL {
            let value = match indicator.measure() {
                crate::MeasureKind::Weight => Some(measurement.weight),
                crate::MeasureKind::Height => Some(measurement.height),
                crate::MeasureKind::HeadCircumference => measurement.head_circumference,
            };

            if let (Some(value), Some(scored)) = (value, result.get(indicator)) {
                series
                    .series_mut(indicator)
                    .push(data_point(measurement, &result, value, scored));
            }
        }

        series.evaluations.push(Evaluation {
            measurement: measurement.clone(),
            result,
        });
    }

    tracing::debug!(
        "Built growth series from {} measurements",
        series.evaluations.len()
    );

    Ok(series)
}

fn data_point(
    measurement: &Measurement,
    result: &GrowthIndicatorResult,
    value: f64,
    scored: &ZScoreResult,
) -> GrowthDataPoint {
    GrowthDataPoint {
        date: measurement.date,
        age_in_months: f64::from(result.age_in_months),
        value,
        z_score: scored.z_score,
        status: scored.status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sex;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn child() -> Child {
        Child {
            birth_date: date(2024, 1, 10),
            sex: Sex::Female,
        }
    }

    #[test]
    fn test_load_csv_with_optional_head_circumference() {
        crate::logging::init_test();
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("history.csv");

        let csv = "date,weight,height,head_circumference\n\
                   2024-04-10,5.9,60.1,39.4\n\
                   2024-02-10,4.2,53.8,\n";
        std::fs::write(&path, csv).unwrap();

        let measurements = load_measurements(&path).unwrap();
        assert_eq!(measurements.len(), 2);
        // Sorted by date
        assert_eq!(measurements[0].date, date(2024, 2, 10));
        assert_eq!(measurements[0].head_circumference, None);
        assert_eq!(measurements[1].head_circumference, Some(39.4));
    }

    #[test]
    fn test_load_json() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("history.json");

        let json = r#"[
            {"date": "2024-03-10", "weight": 5.8, "height": 59.8},
            {"date": "2024-02-10", "weight": 4.2, "height": 53.8, "head_circumference": 36.5}
        ]"#;
        std::fs::write(&path, json).unwrap();

        let measurements = load_measurements(&path).unwrap();
        assert_eq!(measurements.len(), 2);
        assert_eq!(measurements[0].head_circumference, Some(36.5));
    }

    #[test]
    fn test_malformed_csv_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("bad.csv");
        std::fs::write(&path, "date,weight,height\nnot-a-date,abc,1\n").unwrap();

        assert!(matches!(load_measurements(&path), Err(Error::Csv(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("missing.json");
        assert!(matches!(load_measurements(&path), Err(Error::Io(_))));
    }

    #[test]
    fn test_build_series_accumulates_per_indicator() {
        let measurements = vec![
            Measurement {
                date: date(2024, 3, 10),
                weight: 5.1,
                height: 57.0,
                head_circumference: None,
            },
            Measurement {
                date: date(2024, 1, 12),
                weight: 3.3,
                height: 49.5,
                head_circumference: Some(34.0),
            },
        ];

        let series = build_series(&child(), &measurements, &AnalysisOptions::default()).unwrap();

        assert_eq!(series.evaluations.len(), 2);
        assert_eq!(series.weight_for_age.len(), 2);
        assert_eq!(series.height_for_age.len(), 2);
        assert_eq!(series.weight_for_height.len(), 2);
        assert_eq!(series.head_circumference_for_age.len(), 1);

        // Chronological, ages from dates
        assert_eq!(series.weight_for_age[0].age_in_months, 0.0);
        assert_eq!(series.weight_for_age[1].age_in_months, 2.0);
        assert_eq!(series.height_for_age[1].value, 57.0);
        assert_eq!(series.series(Indicator::WeightForHeight)[0].value, 3.3);
    }

    #[test]
    fn test_build_series_reports_offending_date() {
        let measurements = vec![Measurement {
            date: date(2024, 2, 10),
            weight: 80.0,
            height: 55.0,
            head_circumference: None,
        }];

        let err = build_series(&child(), &measurements, &AnalysisOptions::default()).unwrap_err();
        let errors = err.validation_errors().unwrap();
        assert!(errors[0].starts_with("2024-02-10: Weight"));
    }
}
