//! Raw growth velocity compared with age-expected rates.
//!
//! Velocity is the change in the measured value (kg or cm, not Z-score)
//! between the earliest and latest point, per month elapsed.

use crate::trend::sorted_by_age;
use crate::{GrowthDataPoint, GrowthVelocity, MeasureKind, VelocityStatus};

/// Mean Gregorian month length in days
pub const DAYS_PER_MONTH: f64 = 30.4375;

/// Expected monthly gain by age bucket: (upper age bound in months, rate)
const WEIGHT_KG_PER_MONTH: [(f64, f64); 5] = [
    (3.0, 1.0),
    (6.0, 0.5),
    (12.0, 0.3),
    (24.0, 0.2),
    (f64::INFINITY, 0.17),
];

const HEIGHT_CM_PER_MONTH: [(f64, f64); 5] = [
    (3.0, 3.8),
    (6.0, 2.0),
    (12.0, 1.4),
    (24.0, 1.0),
    (f64::INFINITY, 0.65),
];

const HEAD_CM_PER_MONTH: [(f64, f64); 5] = [
    (3.0, 2.0),
    (6.0, 1.0),
    (12.0, 0.45),
    (24.0, 0.17),
    (f64::INFINITY, 0.06),
];

const SLOW_PERCENT: f64 = 70.0;
const FAST_PERCENT: f64 = 130.0;

/// Expected monthly gain for `kind` at `age_in_months`
pub fn expected_velocity(kind: MeasureKind, age_in_months: f64) -> f64 {
    let table = match kind {
        MeasureKind::Weight => &WEIGHT_KG_PER_MONTH,
        MeasureKind::Height => &HEIGHT_CM_PER_MONTH,
        MeasureKind::HeadCircumference => &HEAD_CM_PER_MONTH,
    };

    table
        .iter()
        .find(|(upper, _)| age_in_months < *upper)
        .map(|(_, rate)| *rate)
        .unwrap_or(table[table.len() - 1].1)
}

/// Growth velocity between the first and last point of a series
///
/// The expected rate is taken at the midpoint age of the interval. With
/// fewer than two points, or no time elapsed, the status is
/// `InsufficientData` and velocity is reported as 0.
pub fn calculate_growth_velocity(points: &[GrowthDataPoint], kind: MeasureKind) -> GrowthVelocity {
    let sorted = sorted_by_age(points);

    let (first, last) = match (sorted.first(), sorted.last()) {
        (Some(first), Some(last)) if sorted.len() >= 2 => (*first, *last),
        _ => return insufficient(kind, sorted.first().map(|p| p.age_in_months)),
    };

    let interval_months = (last.date - first.date).num_days() as f64 / DAYS_PER_MONTH;
    if interval_months <= 0.0 {
        tracing::debug!(
            "{:?} velocity: no time elapsed between {} and {}",
            kind,
            first.date,
            last.date
        );
        return insufficient(kind, Some(first.age_in_months));
    }

    let velocity = (last.value - first.value) / interval_months;
    let mid_age = (first.age_in_months + last.age_in_months) / 2.0;
    let expected = expected_velocity(kind, mid_age);
    let percent_of_expected = velocity / expected * 100.0;

    let status = if percent_of_expected < SLOW_PERCENT {
        VelocityStatus::Slow
    } else if percent_of_expected > FAST_PERCENT {
        VelocityStatus::Fast
    } else {
        VelocityStatus::Normal
    };

    tracing::debug!(
        "{:?} velocity {:.3} {}/mo over {:.1} months ({:.0}% of expected {})",
        kind,
        velocity,
        kind.unit(),
        interval_months,
        percent_of_expected,
        expected
    );

    GrowthVelocity {
        kind,
        velocity,
        expected,
        percent_of_expected,
        interval_months,
        status,
    }
}

fn insufficient(kind: MeasureKind, age: Option<f64>) -> GrowthVelocity {
    GrowthVelocity {
        kind,
        velocity: 0.0,
        expected: expected_velocity(kind, age.unwrap_or(0.0)),
        percent_of_expected: 0.0,
        interval_months: 0.0,
        status: VelocityStatus::InsufficientData,
    }
}
