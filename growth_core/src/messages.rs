//! Caregiver-facing text for results and recommendations.
//!
//! The engine decides on enums (`ZScoreBand`, `TrendAdvice`, `CareStep`);
//! this module only turns them into sentences. English and Indonesian are
//! supported.

use crate::{CareStep, Indicator, TrendAdvice, ZScoreBand};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output language
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Id,
}

impl Locale {
    fn pick(self, text: (&'static str, &'static str)) -> &'static str {
        match self {
            Locale::En => text.0,
            Locale::Id => text.1,
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Ok(Locale::En),
            "id" | "indonesian" | "bahasa" => Ok(Locale::Id),
            other => Err(format!("unsupported locale '{}': expected en or id", other)),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::En => write!(f, "en"),
            Locale::Id => write!(f, "id"),
        }
    }
}

/// Short indicator label in the chosen language
pub fn indicator_label(indicator: Indicator, locale: Locale) -> &'static str {
    locale.pick(match indicator {
        Indicator::WeightForAge => ("Weight-for-age", "BB/U"),
        Indicator::HeightForAge => ("Height-for-age", "TB/U"),
        Indicator::WeightForHeight => ("Weight-for-height", "BB/TB"),
        Indicator::HeadCircumferenceForAge => ("Head circumference-for-age", "LK/U"),
    })
}

/// Indicator-specific description of a Z-score band
pub fn status_message(indicator: Indicator, band: ZScoreBand, locale: Locale) -> String {
    use ZScoreBand::*;

    let text = match indicator {
        Indicator::WeightForAge => match band {
            SeverelyLow => ("Severely underweight", "Berat badan sangat kurang"),
            Low => ("Underweight", "Berat badan kurang"),
            MildlyLow => (
                "Weight slightly below average, monitor closely",
                "Berat badan sedikit di bawah rata-rata, perlu dipantau",
            ),
            Normal => ("Normal weight for age", "Berat badan normal sesuai usia"),
            MildlyHigh => (
                "Weight slightly above average",
                "Berat badan sedikit di atas rata-rata",
            ),
            High => ("Possible risk of overweight", "Berisiko berat badan lebih"),
            SeverelyHigh => ("Weight far above average for age", "Berat badan sangat lebih"),
        },
        Indicator::HeightForAge => match band {
            SeverelyLow => ("Severely stunted", "Sangat pendek (severely stunted)"),
            Low => ("Stunted", "Pendek (stunted)"),
            MildlyLow => (
                "Height slightly below average, monitor closely",
                "Tinggi badan sedikit di bawah rata-rata, perlu dipantau",
            ),
            Normal => ("Normal height for age", "Tinggi badan normal sesuai usia"),
            MildlyHigh => ("Taller than average", "Tinggi badan di atas rata-rata"),
            High => ("Tall for age", "Tinggi"),
            SeverelyHigh => (
                "Very tall for age, consider an endocrine review",
                "Sangat tinggi, pertimbangkan pemeriksaan endokrin",
            ),
        },
        Indicator::WeightForHeight => match band {
            SeverelyLow => ("Severely wasted", "Gizi buruk (severely wasted)"),
            Low => ("Wasted", "Gizi kurang (wasted)"),
            MildlyLow => ("At risk of wasting", "Berisiko gizi kurang"),
            Normal => ("Normal weight for height", "Gizi baik (normal)"),
            MildlyHigh => ("Possible risk of overweight", "Berisiko gizi lebih"),
            High => ("Overweight", "Gizi lebih (overweight)"),
            SeverelyHigh => ("Obese", "Obesitas"),
        },
        Indicator::HeadCircumferenceForAge => match band {
            SeverelyLow => (
                "Severe microcephaly, refer for evaluation",
                "Mikrosefali berat, perlu rujukan",
            ),
            Low => ("Microcephaly", "Mikrosefali"),
            MildlyLow => (
                "Head circumference slightly small",
                "Lingkar kepala sedikit kecil",
            ),
            Normal => ("Normal head circumference", "Lingkar kepala normal"),
            MildlyHigh => (
                "Head circumference slightly large",
                "Lingkar kepala sedikit besar",
            ),
            High => ("Macrocephaly", "Makrosefali"),
            SeverelyHigh => (
                "Severe macrocephaly, refer for evaluation",
                "Makrosefali berat, perlu rujukan",
            ),
        },
    };

    locale.pick(text).to_string()
}

/// Recommendation sentence for a trend analysis outcome
pub fn trend_recommendation(advice: TrendAdvice, locale: Locale) -> String {
    let text = match advice {
        TrendAdvice::InsufficientData => (
            "Not enough measurements to establish a trend; record at least two",
            "Data belum cukup untuk melihat tren; catat minimal dua pengukuran",
        ),
        TrendAdvice::UrgentReview => (
            "Outside the normal range and declining: see a pediatrician as soon as possible",
            "Di luar rentang normal dan menurun: segera periksakan ke dokter anak",
        ),
        TrendAdvice::OutsideNormalRange => (
            "Outside the normal range: discuss with a health professional",
            "Di luar rentang normal: konsultasikan dengan tenaga kesehatan",
        ),
        TrendAdvice::SignificantDecline => (
            "Consistent decline detected: schedule a check-up and review feeding",
            "Penurunan konsisten terdeteksi: jadwalkan pemeriksaan dan evaluasi pola makan",
        ),
        TrendAdvice::MildDecline => (
            "Slight downward trend: monitor closely and review daily intake",
            "Tren sedikit menurun: pantau lebih sering dan evaluasi asupan harian",
        ),
        TrendAdvice::IrregularPattern => (
            "Irregular pattern: check measurement technique and keep measuring regularly",
            "Pola tidak teratur: periksa cara pengukuran dan ukur secara rutin",
        ),
        TrendAdvice::StrongImprovement => (
            "Clear improvement: continue the current feeding and care routine",
            "Peningkatan yang jelas: lanjutkan pola makan dan pengasuhan saat ini",
        ),
        TrendAdvice::Improvement => (
            "Positive trend: keep up the good work",
            "Tren positif: pertahankan",
        ),
        TrendAdvice::Stable => (
            "Growth is stable: continue routine monitoring",
            "Pertumbuhan stabil: lanjutkan pemantauan rutin",
        ),
    };

    locale.pick(text).to_string()
}

/// Sentence for a faltering follow-up step
pub fn care_step_text(step: CareStep, locale: Locale) -> String {
    let text = match step {
        CareStep::RoutineMonitoring => (
            "Continue routine growth monitoring",
            "Lanjutkan pemantauan pertumbuhan rutin",
        ),
        CareStep::ReviewFeeding => (
            "Review feeding frequency, portion size and food variety",
            "Evaluasi frekuensi makan, porsi dan variasi makanan",
        ),
        CareStep::MonthlyWeighIns => (
            "Weigh and measure every month until the trend recovers",
            "Timbang dan ukur setiap bulan sampai tren membaik",
        ),
        CareStep::PromptConsultation => (
            "Consult a pediatrician promptly",
            "Segera konsultasikan dengan dokter anak",
        ),
        CareStep::NutritionalAssessment => (
            "Request a full nutritional assessment",
            "Minta penilaian status gizi lengkap",
        ),
        CareStep::UrgentEvaluation => (
            "Seek urgent medical evaluation",
            "Segera lakukan evaluasi medis",
        ),
    };

    locale.pick(text).to_string()
}
