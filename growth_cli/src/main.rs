use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use growth_core::history::{Evaluation, GrowthSeries};
use growth_core::messages::indicator_label;
use growth_core::reference::ReferenceTable;
use growth_core::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "growthz")]
#[command(about = "WHO child growth Z-score calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Output language (en, id)
    #[arg(long, global = true)]
    locale: Option<Locale>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a single measurement against every indicator
    Zscore {
        /// male or female
        #[arg(long)]
        sex: Sex,

        /// Birth date (YYYY-MM-DD)
        #[arg(long)]
        birth_date: NaiveDate,

        /// Measurement date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Weight in kg
        #[arg(long)]
        weight: f64,

        /// Length/height in cm
        #[arg(long)]
        height: f64,

        /// Head circumference in cm
        #[arg(long)]
        head: Option<f64>,
    },

    /// Analyse a measurement history file (CSV or JSON)
    Analyze {
        /// male or female
        #[arg(long)]
        sex: Sex,

        /// Birth date (YYYY-MM-DD)
        #[arg(long)]
        birth_date: NaiveDate,

        /// History file with date, weight, height, head_circumference
        #[arg(long)]
        history: PathBuf,
    },

    /// Print a WHO reference table
    Tables {
        /// wfa, hfa, wfh or hcfa
        #[arg(long)]
        indicator: Indicator,

        /// male or female
        #[arg(long)]
        sex: Sex,
    },
}

fn main() {
    growth_core::logging::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        if let Some(errors) = e.validation_errors() {
            for error in errors {
                eprintln!("  - {}", error);
            }
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let mut options = config.analysis_options();
    if let Some(locale) = cli.locale {
        options = options.with_locale(locale);
    }
    tracing::debug!("Analysis options: {:?}", options);

    match cli.command {
        Commands::Zscore {
            sex,
            birth_date,
            date,
            weight,
            height,
            head,
        } => {
            let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
            cmd_zscore(
                &Child { birth_date, sex },
                &Measurement {
                    date,
                    weight,
                    height,
                    head_circumference: head,
                },
                &options,
                cli.json,
            )
        }
        Commands::Analyze {
            sex,
            birth_date,
            history,
        } => cmd_analyze(&Child { birth_date, sex }, &history, &options, cli.json),
        Commands::Tables { indicator, sex } => cmd_tables(&indicator.table(sex), cli.json),
    }
}

fn cmd_zscore(
    child: &Child,
    measurement: &Measurement,
    options: &AnalysisOptions,
    json: bool,
) -> Result<()> {
    let result = growth_core::indicators::evaluate_measurement(child, measurement, options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!(
        "\n  {} ({}), {} months, BMI {:.1}",
        measurement.date, child.sex, result.age_in_months, result.bmi
    );
    println!();
    for indicator in Indicator::ALL {
        if let Some(r) = result.get(indicator) {
            display_z_score(indicator, r, options.locale);
        }
    }
    println!();

    Ok(())
}

/// Everything `analyze` produces, as one serializable document
#[derive(Serialize)]
struct AnalysisReport<'a> {
    child: &'a Child,
    evaluations: &'a [Evaluation],
    trends: Vec<TrendAnalysis>,
    velocities: Vec<GrowthVelocity>,
    faltering: FalteringResult,
}

fn cmd_analyze(
    child: &Child,
    history: &Path,
    options: &AnalysisOptions,
    json: bool,
) -> Result<()> {
    let measurements = load_measurements(history)?;
    if measurements.is_empty() {
        return Err(Error::Other(format!(
            "No measurements found in {}",
            history.display()
        )));
    }

    let series = build_series(child, &measurements, options)?;
    let report = build_report(child, &series, options.locale);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  GROWTH REPORT ({}, born {})", child.sex, child.birth_date);
    println!("╰─────────────────────────────────────────╯");

    for evaluation in report.evaluations {
        println!(
            "\n  {}  {} mo  {:.2} kg  {:.1} cm{}",
            evaluation.measurement.date,
            evaluation.result.age_in_months,
            evaluation.measurement.weight,
            evaluation.measurement.height,
            evaluation
                .measurement
                .head_circumference
                .map(|hc| format!("  HC {:.1} cm", hc))
                .unwrap_or_default()
        );
        for indicator in Indicator::ALL {
            if let Some(r) = evaluation.result.get(indicator) {
                display_z_score(indicator, r, options.locale);
            }
        }
    }

    println!("\n  Trends");
    for trend in &report.trends {
        println!(
            "    {:<28} {:<11} {:+.3} Z/mo  R² {:.2}  significance {}  risk {}",
            indicator_label(trend.indicator, options.locale),
            label(&trend.direction),
            trend.velocity,
            trend.consistency,
            label(&trend.significance),
            label(&trend.risk_level)
        );
        println!("      → {}", trend.recommendation);
    }

    println!("\n  Velocity");
    for velocity in &report.velocities {
        if velocity.status == VelocityStatus::InsufficientData {
            println!("    {:<18} insufficient data", label(&velocity.kind));
            continue;
        }
        println!(
            "    {:<18} {:+.2} {}/mo (expected {:.2}, {:.0}%)  {}",
            label(&velocity.kind),
            velocity.velocity,
            velocity.kind.unit(),
            velocity.expected,
            velocity.percent_of_expected,
            label(&velocity.status)
        );
    }

    let faltering = &report.faltering;
    println!("\n  Growth faltering: {}", label(&faltering.severity));
    for recommendation in &faltering.recommendations {
        println!("    • {}", recommendation);
    }
    println!();

    Ok(())
}

fn build_report<'a>(
    child: &'a Child,
    series: &'a GrowthSeries,
    locale: Locale,
) -> AnalysisReport<'a> {
    let trends = Indicator::ALL
        .iter()
        .filter(|&&indicator| !series.series(indicator).is_empty())
        .map(|&indicator| analyze_growth_trend(series.series(indicator), indicator, locale))
        .collect();

    let velocities = [
        Indicator::WeightForAge,
        Indicator::HeightForAge,
        Indicator::HeadCircumferenceForAge,
    ]
    .iter()
    .filter(|&&indicator| !series.series(indicator).is_empty())
    .map(|&indicator| calculate_growth_velocity(series.series(indicator), indicator.measure()))
    .collect();

    let faltering =
        detect_growth_faltering(&series.weight_for_age, &series.height_for_age, locale);

    AnalysisReport {
        child,
        evaluations: &series.evaluations,
        trends,
        velocities,
        faltering,
    }
}

fn cmd_tables(table: &ReferenceTable, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(table.rows())?);
        return Ok(());
    }

    let key_header = match table.indicator.key_kind() {
        KeyKind::AgeMonths => "month",
        KeyKind::HeightCm => "cm",
    };

    println!("{} ({})", table.indicator, table.sex);
    println!("{:>6}  {:>8}  {:>9}  {:>8}", key_header, "L", "M", "S");
    for row in table.rows() {
        println!(
            "{:>6}  {:>8.4}  {:>9.4}  {:>8.5}",
            row.key, row.l, row.m, row.s
        );
    }

    Ok(())
}

fn display_z_score(indicator: Indicator, result: &ZScoreResult, locale: Locale) {
    println!(
        "    {:<28} Z {:+.2}  P{:>6.2}  {:<8} {}",
        indicator_label(indicator, locale),
        result.z_score,
        result.percentile,
        result.status.to_string(),
        result.message
    );
}

/// snake_case name of a serializable enum value
fn label<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}
