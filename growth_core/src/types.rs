//! Core domain types for the growth engine.
//!
//! This module defines the fundamental types used throughout the system:
//! - Children, sexes and raw measurements (as handed over by the caller)
//! - Growth indicators and LMS parameters
//! - Z-score results and their classification
//! - Longitudinal analysis outputs (trend, velocity, faltering)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Child and Measurement Types
// ============================================================================

/// Biological sex, selecting the reference table
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" | "m" | "boy" | "laki-laki" => Ok(Sex::Male),
            "female" | "f" | "girl" | "perempuan" => Ok(Sex::Female),
            other => Err(format!("unknown sex '{}': expected male or female", other)),
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Male => write!(f, "male"),
            Sex::Female => write!(f, "female"),
        }
    }
}

/// The child as the engine sees it
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Child {
    pub birth_date: NaiveDate,
    pub sex: Sex,
}

/// A single anthropometric measurement event (weight in kg, lengths in cm)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Measurement {
    pub date: NaiveDate,
    pub weight: f64,
    pub height: f64,
    #[serde(default)]
    pub head_circumference: Option<f64>,
}

// ============================================================================
// Indicator and LMS Types
// ============================================================================

/// The four WHO growth indicators supported by the engine
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    WeightForAge,
    HeightForAge,
    WeightForHeight,
    HeadCircumferenceForAge,
}

/// What a reference table is keyed by
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyKind {
    AgeMonths,
    HeightCm,
}

impl Indicator {
    pub const ALL: [Indicator; 4] = [
        Indicator::WeightForAge,
        Indicator::HeightForAge,
        Indicator::WeightForHeight,
        Indicator::HeadCircumferenceForAge,
    ];

    pub fn key_kind(self) -> KeyKind {
        match self {
            Indicator::WeightForHeight => KeyKind::HeightCm,
            _ => KeyKind::AgeMonths,
        }
    }

    /// Short code used on the command line and in reports
    pub fn code(self) -> &'static str {
        match self {
            Indicator::WeightForAge => "wfa",
            Indicator::HeightForAge => "hfa",
            Indicator::WeightForHeight => "wfh",
            Indicator::HeadCircumferenceForAge => "hcfa",
        }
    }

    /// The raw measurement this indicator scores
    pub fn measure(self) -> MeasureKind {
        match self {
            Indicator::WeightForAge | Indicator::WeightForHeight => MeasureKind::Weight,
            Indicator::HeightForAge => MeasureKind::Height,
            Indicator::HeadCircumferenceForAge => MeasureKind::HeadCircumference,
        }
    }
}

impl FromStr for Indicator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "wfa" | "weight_for_age" => Ok(Indicator::WeightForAge),
            "hfa" | "lfa" | "height_for_age" => Ok(Indicator::HeightForAge),
            "wfh" | "wfl" | "weight_for_height" => Ok(Indicator::WeightForHeight),
            "hcfa" | "head_circumference_for_age" => Ok(Indicator::HeadCircumferenceForAge),
            other => Err(format!(
                "unknown indicator '{}': expected wfa, hfa, wfh or hcfa",
                other
            )),
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Indicator::WeightForAge => write!(f, "Weight-for-age"),
            Indicator::HeightForAge => write!(f, "Height-for-age"),
            Indicator::WeightForHeight => write!(f, "Weight-for-height"),
            Indicator::HeadCircumferenceForAge => write!(f, "Head circumference-for-age"),
        }
    }
}

/// Box-Cox power (L), median (M) and coefficient of variation (S)
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Lms {
    pub l: f64,
    pub m: f64,
    pub s: f64,
}

/// One tabulated reference point
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct ReferenceRow {
    /// Age in months, or height in cm for weight-for-height
    pub key: f64,
    pub l: f64,
    pub m: f64,
    pub s: f64,
}

impl ReferenceRow {
    pub fn lms(&self) -> Lms {
        Lms {
            l: self.l,
            m: self.m,
            s: self.s,
        }
    }
}

/// How weight-for-height resolves LMS parameters between table rows
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeightForHeightLookup {
    /// Use the row whose height is closest to the measured height
    #[default]
    Nearest,
    /// Linearly interpolate, like the age-keyed indicators
    Interpolate,
}

// ============================================================================
// Z-score Result Types
// ============================================================================

/// Coarse status shown to caregivers
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GrowthStatus {
    Normal,
    Warning,
    Alert,
}

impl fmt::Display for GrowthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrowthStatus::Normal => write!(f, "normal"),
            GrowthStatus::Warning => write!(f, "warning"),
            GrowthStatus::Alert => write!(f, "alert"),
        }
    }
}

/// Fine-grained Z-score band
///
/// | band | Z range |
/// |---|---|
/// | SeverelyLow | < -3 |
/// | Low | [-3, -2) |
/// | MildlyLow | [-2, -1) |
/// | Normal | [-1, 1] |
/// | MildlyHigh | (1, 2] |
/// | High | (2, 3] |
/// | SeverelyHigh | > 3 |
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ZScoreBand {
    SeverelyLow,
    Low,
    MildlyLow,
    Normal,
    MildlyHigh,
    High,
    SeverelyHigh,
}

impl ZScoreBand {
    pub fn status(self) -> GrowthStatus {
        match self {
            ZScoreBand::Normal => GrowthStatus::Normal,
            ZScoreBand::MildlyLow | ZScoreBand::MildlyHigh => GrowthStatus::Warning,
            ZScoreBand::SeverelyLow
            | ZScoreBand::Low
            | ZScoreBand::High
            | ZScoreBand::SeverelyHigh => GrowthStatus::Alert,
        }
    }
}

/// Result of scoring one measurement against one indicator
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ZScoreResult {
    pub z_score: f64,
    pub percentile: f64,
    pub status: GrowthStatus,
    pub band: ZScoreBand,
    pub message: String,
}

/// Z-scores for every indicator of a single measurement event
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GrowthIndicatorResult {
    pub age_in_months: u32,
    pub bmi: f64,
    pub weight_for_age: ZScoreResult,
    pub height_for_age: ZScoreResult,
    pub weight_for_height: ZScoreResult,
    /// Only present when head circumference was measured
    pub head_circumference_for_age: Option<ZScoreResult>,
}

impl GrowthIndicatorResult {
    /// Look up the result for one indicator
    pub fn get(&self, indicator: Indicator) -> Option<&ZScoreResult> {
        match indicator {
            Indicator::WeightForAge => Some(&self.weight_for_age),
            Indicator::HeightForAge => Some(&self.height_for_age),
            Indicator::WeightForHeight => Some(&self.weight_for_height),
            Indicator::HeadCircumferenceForAge => self.head_circumference_for_age.as_ref(),
        }
    }
}

/// Outcome of checking a measurement set against plausible ranges
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

// ============================================================================
// Longitudinal Analysis Types
// ============================================================================

/// One point of a per-indicator growth series
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GrowthDataPoint {
    pub date: NaiveDate,
    pub age_in_months: f64,
    pub value: f64,
    pub z_score: f64,
    pub status: GrowthStatus,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Stable,
    Declining,
    Fluctuating,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Significance {
    Low,
    Medium,
    High,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Which recommendation a trend analysis settled on
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TrendAdvice {
    InsufficientData,
    UrgentReview,
    OutsideNormalRange,
    SignificantDecline,
    MildDecline,
    IrregularPattern,
    StrongImprovement,
    Improvement,
    Stable,
}

/// Linear-regression view of a Z-score series
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TrendAnalysis {
    pub indicator: Indicator,
    pub direction: TrendDirection,
    /// Regression slope in Z-score units per month
    pub velocity: f64,
    /// Second-half slope minus first-half slope
    pub acceleration: f64,
    /// Coefficient of determination, floored at 0
    pub consistency: f64,
    pub significance: Significance,
    pub risk_level: RiskLevel,
    pub advice: TrendAdvice,
    pub recommendation: String,
    pub data_points: usize,
}

/// The raw quantity a velocity is measured in
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MeasureKind {
    Weight,
    Height,
    HeadCircumference,
}

impl MeasureKind {
    pub fn unit(self) -> &'static str {
        match self {
            MeasureKind::Weight => "kg",
            MeasureKind::Height | MeasureKind::HeadCircumference => "cm",
        }
    }
}

impl FromStr for MeasureKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weight" => Ok(MeasureKind::Weight),
            "height" | "length" => Ok(MeasureKind::Height),
            "head" | "head_circumference" => Ok(MeasureKind::HeadCircumference),
            other => Err(format!("unknown measure '{}'", other)),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VelocityStatus {
    Slow,
    Normal,
    Fast,
    InsufficientData,
}

/// Raw growth rate compared with what is expected at that age
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GrowthVelocity {
    pub kind: MeasureKind,
    /// Units per month (kg or cm)
    pub velocity: f64,
    /// Expected units per month for the interval's age
    pub expected: f64,
    /// velocity / expected * 100
    pub percent_of_expected: f64,
    pub interval_months: f64,
    pub status: VelocityStatus,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FalteringSeverity {
    None,
    Mild,
    Moderate,
    Severe,
}

/// A single reason faltering was flagged
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FalteringSignal {
    WeightDeclining,
    HeightDeclining,
    LowWeight,
    LowHeight,
}

/// Follow-up actions recommended after a faltering check, mildest first
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CareStep {
    RoutineMonitoring,
    ReviewFeeding,
    MonthlyWeighIns,
    PromptConsultation,
    NutritionalAssessment,
    UrgentEvaluation,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FalteringResult {
    pub has_faltering: bool,
    pub severity: FalteringSeverity,
    pub signals: Vec<FalteringSignal>,
    pub weight_trend: TrendAnalysis,
    pub height_trend: TrendAnalysis,
    /// Follow-up steps, mildest first, without duplicates
    pub care_steps: Vec<CareStep>,
    pub recommendations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_status_mapping() {
        assert_eq!(ZScoreBand::Normal.status(), GrowthStatus::Normal);
        assert_eq!(ZScoreBand::MildlyLow.status(), GrowthStatus::Warning);
        assert_eq!(ZScoreBand::MildlyHigh.status(), GrowthStatus::Warning);
        for band in [
            ZScoreBand::SeverelyLow,
            ZScoreBand::Low,
            ZScoreBand::High,
            ZScoreBand::SeverelyHigh,
        ] {
            assert_eq!(band.status(), GrowthStatus::Alert);
        }
    }

    #[test]
    fn test_parse_sex() {
        assert_eq!("male".parse::<Sex>().unwrap(), Sex::Male);
        assert_eq!("F".parse::<Sex>().unwrap(), Sex::Female);
        assert_eq!("perempuan".parse::<Sex>().unwrap(), Sex::Female);
        assert!("unknown".parse::<Sex>().is_err());
    }

    #[test]
    fn test_parse_indicator_codes() {
        for indicator in Indicator::ALL {
            assert_eq!(indicator.code().parse::<Indicator>().unwrap(), indicator);
        }
        assert_eq!(
            "wfl".parse::<Indicator>().unwrap(),
            Indicator::WeightForHeight
        );
    }

    #[test]
    fn test_measurement_head_circumference_optional() {
        let json = r#"{"date":"2024-03-01","weight":7.1,"height":66.0}"#;
        let m: Measurement = serde_json::from_str(json).unwrap();
        assert_eq!(m.head_circumference, None);
    }
}
