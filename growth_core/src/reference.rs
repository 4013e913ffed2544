//! WHO Child Growth Standards (2006) reference tables in LMS form.
//!
//! Age-keyed tables run from birth to 60 months: monthly through the first
//! year, every 3 months to 24, then at 30, 36, 42, 48 and 60 months.
//! Weight-for-height is keyed by length/height in cm, 45 to 120 in 5 cm steps.
//!
//! The tables are plain `'static` data. Nothing here allocates or mutates,
//! so they are safe to share across threads without synchronisation.

use crate::types::{Indicator, ReferenceRow, Sex};

const fn row(key: f64, l: f64, m: f64, s: f64) -> ReferenceRow {
    ReferenceRow { key, l, m, s }
}

// ============================================================================
// Weight-for-age (kg)
// ============================================================================

static WEIGHT_FOR_AGE_BOYS: [ReferenceRow; 22] = [
    row(0.0, 0.3487, 3.3464, 0.14602),
    row(1.0, 0.2297, 4.4709, 0.13395),
    row(2.0, 0.1970, 5.5675, 0.12385),
    row(3.0, 0.1738, 6.3762, 0.11727),
    row(4.0, 0.1553, 7.0023, 0.11316),
    row(5.0, 0.1395, 7.5105, 0.11080),
    row(6.0, 0.1257, 7.9340, 0.10958),
    row(7.0, 0.1134, 8.2970, 0.10902),
    row(8.0, 0.1021, 8.6151, 0.10882),
    row(9.0, 0.0917, 8.9014, 0.10881),
    row(10.0, 0.0820, 9.1649, 0.10891),
    row(11.0, 0.0730, 9.4122, 0.10906),
    row(12.0, 0.0644, 9.6479, 0.10925),
    row(15.0, 0.0409, 10.3108, 0.10980),
    row(18.0, 0.0211, 10.9385, 0.11046),
    row(21.0, 0.0039, 11.5486, 0.11109),
    row(24.0, -0.0137, 12.1515, 0.11170),
    row(30.0, -0.0434, 13.3000, 0.11440),
    row(36.0, -0.0738, 14.3429, 0.11727),
    row(42.0, -0.1011, 15.3486, 0.12014),
    row(48.0, -0.1240, 16.3489, 0.12304),
    row(60.0, -0.1608, 18.3366, 0.12805),
];

static WEIGHT_FOR_AGE_GIRLS: [ReferenceRow; 22] = [
    row(0.0, 0.3809, 3.2322, 0.14171),
    row(1.0, 0.1714, 4.1873, 0.13724),
    row(2.0, 0.0962, 5.1282, 0.13000),
    row(3.0, 0.0402, 5.8458, 0.12619),
    row(4.0, -0.0050, 6.4237, 0.12402),
    row(5.0, -0.0430, 6.8985, 0.12274),
    row(6.0, -0.0756, 7.2970, 0.12204),
    row(7.0, -0.1039, 7.6422, 0.12178),
    row(8.0, -0.1288, 7.9487, 0.12181),
    row(9.0, -0.1507, 8.2254, 0.12199),
    row(10.0, -0.1700, 8.4800, 0.12223),
    row(11.0, -0.1872, 8.7192, 0.12247),
    row(12.0, -0.2024, 8.9481, 0.12268),
    row(15.0, -0.2387, 9.6008, 0.12331),
    row(18.0, -0.2637, 10.2315, 0.12404),
    row(21.0, -0.2815, 10.8534, 0.12494),
    row(24.0, -0.2941, 11.4775, 0.12602),
    row(30.0, -0.3081, 12.7055, 0.12886),
    row(36.0, -0.3172, 13.8503, 0.13158),
    row(42.0, -0.3203, 14.9525, 0.13394),
    row(48.0, -0.3230, 16.0695, 0.13606),
    row(60.0, -0.3249, 18.2193, 0.13990),
];

// ============================================================================
// Length/height-for-age (cm)
// ============================================================================

static HEIGHT_FOR_AGE_BOYS: [ReferenceRow; 22] = [
    row(0.0, 1.0, 49.8842, 0.03795),
    row(1.0, 1.0, 54.7244, 0.03557),
    row(2.0, 1.0, 58.4249, 0.03424),
    row(3.0, 1.0, 61.4292, 0.03328),
    row(4.0, 1.0, 63.8860, 0.03257),
    row(5.0, 1.0, 65.9026, 0.03204),
    row(6.0, 1.0, 67.6236, 0.03165),
    row(7.0, 1.0, 69.1645, 0.03139),
    row(8.0, 1.0, 70.5994, 0.03124),
    row(9.0, 1.0, 71.9687, 0.03117),
    row(10.0, 1.0, 73.2812, 0.03118),
    row(11.0, 1.0, 74.5388, 0.03125),
    row(12.0, 1.0, 75.7488, 0.03137),
    row(15.0, 1.0, 79.1458, 0.03197),
    row(18.0, 1.0, 82.2587, 0.03279),
    row(21.0, 1.0, 85.1348, 0.03366),
    row(24.0, 1.0, 87.1161, 0.03507),
    row(30.0, 1.0, 91.9327, 0.03624),
    row(36.0, 1.0, 96.0835, 0.03707),
    row(42.0, 1.0, 99.8532, 0.03764),
    row(48.0, 1.0, 103.3273, 0.03809),
    row(60.0, 1.0, 110.2647, 0.03884),
];

static HEIGHT_FOR_AGE_GIRLS: [ReferenceRow; 22] = [
    row(0.0, 1.0, 49.1477, 0.03790),
    row(1.0, 1.0, 53.6872, 0.03640),
    row(2.0, 1.0, 57.0673, 0.03568),
    row(3.0, 1.0, 59.8029, 0.03520),
    row(4.0, 1.0, 62.0899, 0.03486),
    row(5.0, 1.0, 64.0301, 0.03463),
    row(6.0, 1.0, 65.7311, 0.03448),
    row(7.0, 1.0, 67.2873, 0.03441),
    row(8.0, 1.0, 68.7498, 0.03440),
    row(9.0, 1.0, 70.1435, 0.03444),
    row(10.0, 1.0, 71.4818, 0.03452),
    row(11.0, 1.0, 72.7710, 0.03464),
    row(12.0, 1.0, 74.0150, 0.03479),
    row(15.0, 1.0, 77.5299, 0.03534),
    row(18.0, 1.0, 80.7079, 0.03598),
    row(21.0, 1.0, 83.6654, 0.03662),
    row(24.0, 1.0, 85.7153, 0.03764),
    row(30.0, 1.0, 90.6797, 0.03866),
    row(36.0, 1.0, 95.0515, 0.03930),
    row(42.0, 1.0, 99.0161, 0.03970),
    row(48.0, 1.0, 102.7312, 0.04002),
    row(60.0, 1.0, 109.4233, 0.04053),
];

// ============================================================================
// Weight-for-length/height (kg, keyed by cm)
// ============================================================================

static WEIGHT_FOR_HEIGHT_BOYS: [ReferenceRow; 16] = [
    row(45.0, -0.3521, 2.4410, 0.09182),
    row(50.0, -0.3521, 3.3278, 0.08752),
    row(55.0, -0.3521, 4.5408, 0.08353),
    row(60.0, -0.3521, 5.9276, 0.08147),
    row(65.0, -0.3521, 7.4327, 0.08063),
    row(70.0, -0.3521, 8.6226, 0.07931),
    row(75.0, -0.3521, 9.6453, 0.07807),
    row(80.0, -0.3521, 10.6095, 0.07751),
    row(85.0, -0.3521, 11.7193, 0.07784),
    row(90.0, -0.3521, 12.9455, 0.07880),
    row(95.0, -0.3521, 14.1174, 0.07986),
    row(100.0, -0.3521, 15.4009, 0.08114),
    row(105.0, -0.3521, 16.7849, 0.08268),
    row(110.0, -0.3521, 18.3032, 0.08460),
    row(115.0, -0.3521, 19.9936, 0.08693),
    row(120.0, -0.3521, 21.8661, 0.08960),
];

static WEIGHT_FOR_HEIGHT_GIRLS: [ReferenceRow; 16] = [
    row(45.0, -0.3833, 2.4607, 0.09029),
    row(50.0, -0.3833, 3.2999, 0.08946),
    row(55.0, -0.3833, 4.4717, 0.08863),
    row(60.0, -0.3833, 5.8152, 0.08789),
    row(65.0, -0.3833, 7.1887, 0.08730),
    row(70.0, -0.3833, 8.3602, 0.08656),
    row(75.0, -0.3833, 9.3862, 0.08589),
    row(80.0, -0.3833, 10.3948, 0.08555),
    row(85.0, -0.3833, 11.5219, 0.08565),
    row(90.0, -0.3833, 12.7387, 0.08626),
    row(95.0, -0.3833, 13.9433, 0.08716),
    row(100.0, -0.3833, 15.2461, 0.08839),
    row(105.0, -0.3833, 16.6993, 0.08996),
    row(110.0, -0.3833, 18.3164, 0.09186),
    row(115.0, -0.3833, 20.0988, 0.09396),
    row(120.0, -0.3833, 22.0520, 0.09618),
];

// ============================================================================
// Head circumference-for-age (cm)
// ============================================================================

static HEAD_CIRCUMFERENCE_BOYS: [ReferenceRow; 22] = [
    row(0.0, 1.0, 34.4618, 0.03686),
    row(1.0, 1.0, 37.2759, 0.03133),
    row(2.0, 1.0, 39.1285, 0.02997),
    row(3.0, 1.0, 40.5135, 0.02918),
    row(4.0, 1.0, 41.6317, 0.02868),
    row(5.0, 1.0, 42.5576, 0.02837),
    row(6.0, 1.0, 43.3306, 0.02817),
    row(7.0, 1.0, 43.9803, 0.02804),
    row(8.0, 1.0, 44.5300, 0.02796),
    row(9.0, 1.0, 44.9998, 0.02792),
    row(10.0, 1.0, 45.4051, 0.02790),
    row(11.0, 1.0, 45.7573, 0.02789),
    row(12.0, 1.0, 46.0661, 0.02789),
    row(15.0, 1.0, 46.7796, 0.02792),
    row(18.0, 1.0, 47.3263, 0.02798),
    row(21.0, 1.0, 47.7597, 0.02805),
    row(24.0, 1.0, 48.1125, 0.02813),
    row(30.0, 1.0, 48.6790, 0.02829),
    row(36.0, 1.0, 49.1112, 0.02845),
    row(42.0, 1.0, 49.4660, 0.02860),
    row(48.0, 1.0, 49.7625, 0.02874),
    row(60.0, 1.0, 50.2526, 0.02898),
];

static HEAD_CIRCUMFERENCE_GIRLS: [ReferenceRow; 22] = [
    row(0.0, 1.0, 33.8787, 0.03496),
    row(1.0, 1.0, 36.5463, 0.03210),
    row(2.0, 1.0, 38.2521, 0.03168),
    row(3.0, 1.0, 39.5328, 0.03140),
    row(4.0, 1.0, 40.5817, 0.03119),
    row(5.0, 1.0, 41.4590, 0.03102),
    row(6.0, 1.0, 42.1995, 0.03087),
    row(7.0, 1.0, 42.8290, 0.03075),
    row(8.0, 1.0, 43.3671, 0.03063),
    row(9.0, 1.0, 43.8300, 0.03053),
    row(10.0, 1.0, 44.2319, 0.03044),
    row(11.0, 1.0, 44.5844, 0.03035),
    row(12.0, 1.0, 44.8965, 0.03027),
    row(15.0, 1.0, 45.6425, 0.03010),
    row(18.0, 1.0, 46.2258, 0.03000),
    row(21.0, 1.0, 46.6954, 0.02994),
    row(24.0, 1.0, 47.0739, 0.02992),
    row(30.0, 1.0, 47.6884, 0.02995),
    row(36.0, 1.0, 48.1687, 0.03003),
    row(42.0, 1.0, 48.5681, 0.03013),
    row(48.0, 1.0, 48.9030, 0.03024),
    row(60.0, 1.0, 49.4570, 0.03047),
];

// ============================================================================
// Table access
// ============================================================================

/// A read-only view of one (indicator, sex) reference table
#[derive(Clone, Copy, Debug)]
pub struct ReferenceTable {
    pub indicator: Indicator,
    pub sex: Sex,
    rows: &'static [ReferenceRow],
}

impl ReferenceTable {
    /// Wrap arbitrary rows, e.g. a custom or test table.
    ///
    /// Rows must be strictly increasing by key; check with [`validate`](Self::validate).
    pub fn new(indicator: Indicator, sex: Sex, rows: &'static [ReferenceRow]) -> Self {
        Self {
            indicator,
            sex,
            rows,
        }
    }

    pub fn rows(&self) -> &'static [ReferenceRow] {
        self.rows
    }

    /// Lowest and highest key covered by the table
    pub fn key_range(&self) -> Option<(f64, f64)> {
        match (self.rows.first(), self.rows.last()) {
            (Some(first), Some(last)) => Some((first.key, last.key)),
            _ => None,
        }
    }

    /// Check table invariants, returning every problem found
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.rows.is_empty() {
            errors.push(format!(
                "{} ({}) table is empty",
                self.indicator, self.sex
            ));
            return errors;
        }

        for pair in self.rows.windows(2) {
            if pair[1].key <= pair[0].key {
                errors.push(format!(
                    "{} ({}) keys not strictly increasing: {} then {}",
                    self.indicator, self.sex, pair[0].key, pair[1].key
                ));
            }
        }

        for r in self.rows {
            if !(r.m > 0.0 && r.s > 0.0) || !r.l.is_finite() {
                errors.push(format!(
                    "{} ({}) row at key {} has invalid LMS ({}, {}, {})",
                    self.indicator, self.sex, r.key, r.l, r.m, r.s
                ));
            }
        }

        errors
    }
}

impl Indicator {
    /// Resolve the WHO reference table for this indicator and sex
    pub fn table(self, sex: Sex) -> ReferenceTable {
        let rows: &'static [ReferenceRow] = match (self, sex) {
            (Indicator::WeightForAge, Sex::Male) => &WEIGHT_FOR_AGE_BOYS,
            (Indicator::WeightForAge, Sex::Female) => &WEIGHT_FOR_AGE_GIRLS,
            (Indicator::HeightForAge, Sex::Male) => &HEIGHT_FOR_AGE_BOYS,
            (Indicator::HeightForAge, Sex::Female) => &HEIGHT_FOR_AGE_GIRLS,
            (Indicator::WeightForHeight, Sex::Male) => &WEIGHT_FOR_HEIGHT_BOYS,
            (Indicator::WeightForHeight, Sex::Female) => &WEIGHT_FOR_HEIGHT_GIRLS,
            (Indicator::HeadCircumferenceForAge, Sex::Male) => &HEAD_CIRCUMFERENCE_BOYS,
            (Indicator::HeadCircumferenceForAge, Sex::Female) => &HEAD_CIRCUMFERENCE_GIRLS,
        };
        ReferenceTable::new(self, sex, rows)
    }
}

/// Every built-in table, for validation and listing
pub fn all_tables() -> Vec<ReferenceTable> {
    Indicator::ALL
        .iter()
        .flat_map(|&indicator| [indicator.table(Sex::Male), indicator.table(Sex::Female)])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_tables_validate() {
        for table in all_tables() {
            let errors = table.validate();
            assert!(
                errors.is_empty(),
                "Reference table has validation errors: {:?}",
                errors
            );
        }
    }

    #[test]
    fn test_eight_tables() {
        assert_eq!(all_tables().len(), 8);
    }

    #[test]
    fn test_age_tables_cover_birth_to_five_years() {
        for indicator in [
            Indicator::WeightForAge,
            Indicator::HeightForAge,
            Indicator::HeadCircumferenceForAge,
        ] {
            for sex in [Sex::Male, Sex::Female] {
                assert_eq!(indicator.table(sex).key_range(), Some((0.0, 60.0)));
            }
        }
    }

    #[test]
    fn test_weight_for_height_keyed_by_cm() {
        for sex in [Sex::Male, Sex::Female] {
            assert_eq!(
                Indicator::WeightForHeight.table(sex).key_range(),
                Some((45.0, 120.0))
            );
        }
    }

    #[test]
    fn test_published_birth_medians() {
        let wfa_boys = Indicator::WeightForAge.table(Sex::Male).rows()[0];
        assert_eq!(wfa_boys.m, 3.3464);
        assert_eq!(wfa_boys.l, 0.3487);
        assert_eq!(wfa_boys.s, 0.14602);

        let wfa_girls = Indicator::WeightForAge.table(Sex::Female).rows()[0];
        assert_eq!(wfa_girls.m, 3.2322);

        let hfa_boys = Indicator::HeightForAge.table(Sex::Male).rows()[0];
        assert_eq!(hfa_boys.m, 49.8842);

        let hc_girls = Indicator::HeadCircumferenceForAge.table(Sex::Female).rows()[0];
        assert_eq!(hc_girls.m, 33.8787);
    }

    #[test]
    fn test_validate_reports_unsorted_rows() {
        static BAD: [ReferenceRow; 3] = [
            row(0.0, 1.0, 10.0, 0.1),
            row(2.0, 1.0, 11.0, 0.1),
            row(1.0, 1.0, 0.0, 0.1),
        ];
        let table = ReferenceTable::new(Indicator::WeightForAge, Sex::Male, &BAD);
        let errors = table.validate();
        assert_eq!(errors.len(), 2, "{:?}", errors);
    }
}
