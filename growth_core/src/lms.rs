//! LMS parameter lookup against a reference table.
//!
//! Interpolation is piecewise linear between tabulated rows and clamps to
//! the first/last row outside the table. Results at a tabulated key are the
//! row itself, untouched by any arithmetic.

use crate::reference::ReferenceTable;
use crate::{Error, Lms, Result, WeightForHeightLookup};

/// Linearly interpolate L, M and S at `key`
///
/// - exact key match: that row's parameters, unmodified
/// - between two rows: each parameter interpolated independently
/// - outside the table: the nearest endpoint row (no extrapolation)
pub fn interpolate(table: &ReferenceTable, key: f64) -> Result<Lms> {
    let rows = table.rows();
    let (first, last) = endpoints(table, key)?;

    if key <= first.key {
        if key < first.key {
            tracing::warn!(
                "{} key {} below table start {}, clamping",
                table.indicator,
                key,
                first.key
            );
        }
        return Ok(first.lms());
    }
    if key >= last.key {
        if key > last.key {
            tracing::warn!(
                "{} key {} above table end {}, clamping",
                table.indicator,
                key,
                last.key
            );
        }
        return Ok(last.lms());
    }

    // first.key < key < last.key, so 1 <= upper_idx < rows.len()
    let upper_idx = rows.partition_point(|r| r.key < key);
    let upper = &rows[upper_idx];
    if upper.key == key {
        return Ok(upper.lms());
    }
    let lower = &rows[upper_idx - 1];

    let t = (key - lower.key) / (upper.key - lower.key);
    let lms = Lms {
        l: lerp(lower.l, upper.l, t),
        m: lerp(lower.m, upper.m, t),
        s: lerp(lower.s, upper.s, t),
    };

    tracing::debug!(
        "{} interpolated at {} between {} and {}: {:?}",
        table.indicator,
        key,
        lower.key,
        upper.key,
        lms
    );

    Ok(lms)
}

/// Parameters of the row whose key is closest to `key`
///
/// Ties go to the lower key.
pub fn nearest(table: &ReferenceTable, key: f64) -> Result<Lms> {
    endpoints(table, key)?;

    let mut best = &table.rows()[0];
    for r in table.rows() {
        if (r.key - key).abs() < (best.key - key).abs() {
            best = r;
        }
    }

    tracing::debug!(
        "{} nearest row to {} is {}",
        table.indicator,
        key,
        best.key
    );

    Ok(best.lms())
}

/// Resolve LMS with the configured lookup mode
pub fn lookup(table: &ReferenceTable, key: f64, mode: WeightForHeightLookup) -> Result<Lms> {
    match mode {
        WeightForHeightLookup::Nearest => nearest(table, key),
        WeightForHeightLookup::Interpolate => interpolate(table, key),
    }
}

fn endpoints(
    table: &ReferenceTable,
    key: f64,
) -> Result<(&'static crate::ReferenceRow, &'static crate::ReferenceRow)> {
    if !key.is_finite() {
        return Err(Error::Computation(format!(
            "{} lookup key must be finite, got {}",
            table.indicator, key
        )));
    }

    let rows = table.rows();
    match (rows.first(), rows.last()) {
        (Some(first), Some(last)) => Ok((first, last)),
        _ => Err(Error::Computation(format!(
            "{} ({}) reference table is empty",
            table.indicator, table.sex
        ))),
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
