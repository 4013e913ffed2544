//! Growth faltering (failure-to-thrive) detection.
//!
//! Weight-for-age and height-for-age are analysed independently; faltering
//! is flagged when either declines significantly or is already below -2 SD.

use crate::messages::{care_step_text, Locale};
use crate::trend::{analyze_growth_trend, sorted_by_age};
use crate::{
    CareStep, FalteringResult, FalteringSeverity, FalteringSignal, GrowthDataPoint, Indicator,
    Significance, TrendAnalysis, TrendDirection,
};
use std::collections::BTreeSet;

const LOW_Z: f64 = -2.0;
const SEVERE_Z: f64 = -3.0;

/// Check weight and height series for growth faltering
pub fn detect_growth_faltering(
    weight: &[GrowthDataPoint],
    height: &[GrowthDataPoint],
    locale: Locale,
) -> FalteringResult {
    let weight_trend = analyze_growth_trend(weight, Indicator::WeightForAge, locale);
    let height_trend = analyze_growth_trend(height, Indicator::HeightForAge, locale);

    let mut signals = Vec::new();
    if declining_significantly(&weight_trend) {
        signals.push(FalteringSignal::WeightDeclining);
    }
    if declining_significantly(&height_trend) {
        signals.push(FalteringSignal::HeightDeclining);
    }
    if latest_below(weight, LOW_Z) {
        signals.push(FalteringSignal::LowWeight);
    }
    if latest_below(height, LOW_Z) {
        signals.push(FalteringSignal::LowHeight);
    }

    let has_faltering = !signals.is_empty();
    let any_severe = weight
        .iter()
        .chain(height.iter())
        .any(|p| p.z_score < SEVERE_Z);

    let severity = if !has_faltering {
        FalteringSeverity::None
    } else if any_severe {
        FalteringSeverity::Severe
    } else if signals.len() >= 2 {
        FalteringSeverity::Moderate
    } else {
        FalteringSeverity::Mild
    };

    let care_steps = care_steps(severity, &signals);
    let recommendations = care_steps
        .iter()
        .map(|&step| care_step_text(step, locale))
        .collect();

    if has_faltering {
        tracing::info!(
            "Growth faltering detected: {:?} ({:?})",
            severity,
            signals
        );
    }

    FalteringResult {
        has_faltering,
        severity,
        signals,
        weight_trend,
        height_trend,
        care_steps,
        recommendations,
    }
}

fn declining_significantly(trend: &TrendAnalysis) -> bool {
    trend.direction == TrendDirection::Declining && trend.significance == Significance::High
}

fn latest_below(points: &[GrowthDataPoint], threshold: f64) -> bool {
    sorted_by_age(points)
        .last()
        .map(|p| p.z_score < threshold)
        .unwrap_or(false)
}

/// Follow-up steps escalating with severity, mildest first
fn care_steps(severity: FalteringSeverity, signals: &[FalteringSignal]) -> Vec<CareStep> {
    let mut steps = BTreeSet::new();
    steps.insert(CareStep::RoutineMonitoring);

    if severity >= FalteringSeverity::Mild {
        steps.insert(CareStep::ReviewFeeding);
        steps.insert(CareStep::MonthlyWeighIns);
    }
    if severity >= FalteringSeverity::Moderate {
        steps.insert(CareStep::PromptConsultation);
    }
    if severity >= FalteringSeverity::Severe {
        steps.insert(CareStep::UrgentEvaluation);
    }

    for signal in signals {
        match signal {
            FalteringSignal::LowWeight | FalteringSignal::LowHeight => {
                steps.insert(CareStep::NutritionalAssessment);
            }
            FalteringSignal::WeightDeclining | FalteringSignal::HeightDeclining => {
                steps.insert(CareStep::ReviewFeeding);
            }
        }
    }

    steps.into_iter().collect()
}
