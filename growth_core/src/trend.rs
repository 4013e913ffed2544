//! Longitudinal Z-score trend analysis.
//!
//! Fits an ordinary least-squares line of Z-score against age and derives
//! direction, significance and risk from it. Every call recomputes from the
//! full series it is given.

use crate::messages::{trend_recommendation, Locale};
use crate::{
    GrowthDataPoint, Indicator, RiskLevel, Significance, TrendAdvice, TrendAnalysis,
    TrendDirection,
};

/// |velocity| below this (Z per month) counts as stable
const STABLE_VELOCITY: f64 = 0.05;
/// |acceleration| above this marks a fluctuating series
const FLUCTUATION_ACCELERATION: f64 = 0.1;

/// Slope, intercept and goodness of fit of a least-squares line
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Regression {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

/// Least-squares fit of `y` on `x`
///
/// Fewer than two points, or no spread in `x`, yields a flat line through
/// the mean. A series with no spread in `y` is a perfect fit (R² = 1).
pub fn linear_regression(points: &[(f64, f64)]) -> Regression {
    let n = points.len() as f64;
    if points.is_empty() {
        return Regression {
            slope: 0.0,
            intercept: 0.0,
            r_squared: 0.0,
        };
    }

    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;

    let sxx: f64 = points.iter().map(|p| (p.0 - mean_x).powi(2)).sum();
    let sxy: f64 = points
        .iter()
        .map(|p| (p.0 - mean_x) * (p.1 - mean_y))
        .sum();

    if points.len() < 2 || sxx < 1e-10 {
        return Regression {
            slope: 0.0,
            intercept: mean_y,
            r_squared: 0.0,
        };
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let ss_tot: f64 = points.iter().map(|p| (p.1 - mean_y).powi(2)).sum();
    let ss_res: f64 = points
        .iter()
        .map(|p| (p.1 - (intercept + slope * p.0)).powi(2))
        .sum();

    let r_squared = if ss_tot < 1e-12 {
        1.0
    } else {
        (1.0 - ss_res / ss_tot).max(0.0)
    };

    Regression {
        slope,
        intercept,
        r_squared,
    }
}

/// Analyse the Z-score trend of one indicator
///
/// Points are re-sorted by age. With fewer than two points the result is a
/// stable, low-significance "insufficient data" analysis.
pub fn analyze_growth_trend(
    points: &[GrowthDataPoint],
    indicator: Indicator,
    locale: Locale,
) -> TrendAnalysis {
    let sorted = sorted_by_age(points);

    if sorted.len() < 2 {
        let risk_level = sorted
            .last()
            .map(|p| risk_for(p.z_score, TrendDirection::Stable))
            .unwrap_or(RiskLevel::Low);

        tracing::debug!(
            "{}: {} point(s), not enough for a trend",
            indicator,
            sorted.len()
        );

        return TrendAnalysis {
            indicator,
            direction: TrendDirection::Stable,
            velocity: 0.0,
            acceleration: 0.0,
            consistency: 0.0,
            significance: Significance::Low,
            risk_level,
            advice: TrendAdvice::InsufficientData,
            recommendation: trend_recommendation(TrendAdvice::InsufficientData, locale),
            data_points: sorted.len(),
        };
    }

    let xy: Vec<(f64, f64)> = sorted
        .iter()
        .map(|p| (p.age_in_months, p.z_score))
        .collect();

    let fit = linear_regression(&xy);
    let velocity = fit.slope;
    let consistency = fit.r_squared;
    let acceleration = acceleration(&xy);

    let direction = if velocity.abs() < STABLE_VELOCITY {
        TrendDirection::Stable
    } else if acceleration.abs() > FLUCTUATION_ACCELERATION {
        TrendDirection::Fluctuating
    } else if velocity > 0.0 {
        TrendDirection::Improving
    } else {
        TrendDirection::Declining
    };

    let significance = if consistency > 0.7 && velocity.abs() > 0.1 {
        Significance::High
    } else if consistency > 0.4 && velocity.abs() > 0.05 {
        Significance::Medium
    } else {
        Significance::Low
    };

    let latest_z = sorted[sorted.len() - 1].z_score;
    let risk_level = risk_for(latest_z, direction);
    let advice = advise(direction, risk_level, significance);

    tracing::debug!(
        "{} trend over {} points: velocity {:.3}/mo, R² {:.2}, {:?}/{:?}/{:?}",
        indicator,
        sorted.len(),
        velocity,
        consistency,
        direction,
        significance,
        risk_level
    );

    TrendAnalysis {
        indicator,
        direction,
        velocity,
        acceleration,
        consistency,
        significance,
        risk_level,
        advice,
        recommendation: trend_recommendation(advice, locale),
        data_points: sorted.len(),
    }
}

pub(crate) fn sorted_by_age(points: &[GrowthDataPoint]) -> Vec<&GrowthDataPoint> {
    let mut sorted: Vec<&GrowthDataPoint> = points.iter().collect();
    sorted.sort_by(|a, b| {
        a.age_in_months
            .total_cmp(&b.age_in_months)
            .then(a.date.cmp(&b.date))
    });
    sorted
}

/// Slope of the later half minus slope of the earlier half
///
/// Odd-length series share their middle point between both halves.
fn acceleration(xy: &[(f64, f64)]) -> f64 {
    if xy.len() < 3 {
        return 0.0;
    }

    let half = (xy.len() + 1) / 2;
    let first = linear_regression(&xy[..half]);
    let second = linear_regression(&xy[xy.len() - half..]);

    second.slope - first.slope
}

fn risk_for(latest_z: f64, direction: TrendDirection) -> RiskLevel {
    if latest_z.abs() > 2.0 {
        RiskLevel::High
    } else if latest_z.abs() > 1.0 && direction == TrendDirection::Declining {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

fn advise(
    direction: TrendDirection,
    risk_level: RiskLevel,
    significance: Significance,
) -> TrendAdvice {
    match (direction, risk_level, significance) {
        (TrendDirection::Declining, RiskLevel::High, _) => TrendAdvice::UrgentReview,
        (_, RiskLevel::High, _) => TrendAdvice::OutsideNormalRange,
        (TrendDirection::Declining, _, Significance::High) => TrendAdvice::SignificantDecline,
        (TrendDirection::Declining, _, _) => TrendAdvice::MildDecline,
        (TrendDirection::Fluctuating, _, _) => TrendAdvice::IrregularPattern,
        (TrendDirection::Improving, _, Significance::High) => TrendAdvice::StrongImprovement,
        (TrendDirection::Improving, _, _) => TrendAdvice::Improvement,
        (TrendDirection::Stable, _, _) => TrendAdvice::Stable,
    }
}
