// Entry point and high-level CLI flow.
//
// One run does everything, in order: load the CSV, print the dataset
// overview, then the four analyses (top schools, borough averages, the
// `percent_tested` missing-value profile and the best school per borough).
// Each section also exports a CSV and, where it has one, a chart. A failed
// export or chart is logged and the run carries on; only a load failure
// stops it.
use anyhow::{Context, Result};
use clap::Parser;
use sat_report::aggregate::{group_summaries, sort_by_avg_total, GroupSummary};
use sat_report::config::{self, Config};
use sat_report::missing::{analyze_missing, MissingnessReport};
use sat_report::overview::{correlation_matrix, summarize};
use sat_report::ranking::{best_per_group, top_k_by, SortOrder};
use sat_report::{charts, loader, output, reports, util, SchoolRecord};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const MISSING_FIELD: &str = "percent_tested";

#[derive(Parser, Debug)]
#[command(name = "sat-report", version, about = "SAT score report for NYC schools")]
struct Args {
    /// CSV file with one row per school.
    #[arg(long, env = "SAT_DATA", default_value = config::DEFAULT_DATA_PATH)]
    data: PathBuf,

    /// Number of schools in the top ranking.
    #[arg(long, env = "SAT_TOP_K", default_value_t = config::DEFAULT_TOP_K)]
    top: usize,

    /// Mean-gap (total SAT points) above which missing `percent_tested` is flagged systematic.
    #[arg(long, env = "SAT_BIAS_THRESHOLD", default_value_t = config::DEFAULT_BIAS_THRESHOLD)]
    bias_threshold: f64,

    /// Directory for CSV, JSON and SVG outputs.
    #[arg(long, env = "SAT_OUT_DIR", default_value = config::DEFAULT_OUT_DIR)]
    out_dir: PathBuf,

    /// Skip SVG charts.
    #[arg(long)]
    no_charts: bool,

    /// Skip CSV/JSON exports.
    #[arg(long)]
    no_export: bool,
}

impl From<Args> for Config {
    fn from(a: Args) -> Self {
        Config {
            data_path: a.data,
            top_k: a.top,
            bias_threshold: a.bias_threshold,
            out_dir: a.out_dir,
            charts: !a.no_charts,
            export: !a.no_export,
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Write one export file, logging instead of failing.
fn export<T: Serialize>(cfg: &Config, file: &str, rows: &[T]) {
    if !cfg.export {
        return;
    }
    let path = cfg.out_dir.join(file);
    match output::write_csv(&path, rows) {
        Ok(()) => info!(path = %path.display(), "table exported"),
        Err(e) => error!(path = %path.display(), error = %e, "export failed"),
    }
}

/// Render one chart, logging instead of failing.
fn chart(cfg: &Config, file: &str, draw: impl FnOnce(&std::path::Path) -> sat_report::Result<()>) {
    if !cfg.charts {
        return;
    }
    let path = cfg.out_dir.join(file);
    match draw(&path) {
        Ok(()) => info!(path = %path.display(), "chart written"),
        Err(e) => error!(path = %path.display(), error = %e, "chart failed"),
    }
}

fn handle_overview(data: &[SchoolRecord]) {
    let overview = summarize(data);
    output::print_section("Dataset Overview: first rows", None, &reports::head_rows(&overview));
    output::print_section("Dataset Overview: columns", None, &reports::column_rows(&overview));
    output::print_section("Dataset Overview: statistical summary", None, &reports::describe_rows(&overview));
    let incomplete = overview.columns.iter().filter(|c| c.missing > 0).count();
    output::print_insight(&format!(
        "{} schools loaded; {} of {} columns have missing values.",
        util::format_int(overview.rows),
        incomplete,
        overview.columns.len()
    ));
}

fn handle_top_schools(cfg: &Config, data: &[SchoolRecord]) {
    let top = top_k_by(data, cfg.top_k, SchoolRecord::total_score, SortOrder::Descending);
    let rows = reports::top_school_rows(&top);
    output::print_section(&format!("Top {} Schools by SAT Score", cfg.top_k), None, &rows);
    output::print_insight(&reports::top_school_insight(&top));
    export(cfg, "top_schools.csv", &rows);

    let bars: Vec<(String, f64)> = top.iter().map(|r| (r.record.name.clone(), r.value)).collect();
    chart(cfg, "top_schools.svg", |p| charts::top_schools_chart(p, &bars));
}

fn handle_boroughs(cfg: &Config, data: &[SchoolRecord]) -> Vec<(String, GroupSummary)> {
    let sorted = sort_by_avg_total(group_summaries(data, |r| r.borough.as_str()));
    let rows = reports::borough_rows(&sorted);
    output::print_section("Borough Performance", Some("sorted by AvgTotalSAT, descending"), &rows);
    output::print_insight(&reports::borough_insight(&sorted));
    export(cfg, "borough_performance.csv", &rows);

    let bars: Vec<(String, [Option<f64>; 3])> = sorted
        .iter()
        .map(|(b, g)| (b.clone(), [g.avg_math, g.avg_reading, g.avg_writing]))
        .collect();
    chart(cfg, "borough_subject_averages.svg", |p| charts::group_subject_chart(p, &bars));
    let matrix = correlation_matrix(data);
    chart(cfg, "subject_correlation.svg", |p| charts::correlation_heatmap(p, &matrix));
    sorted
}

fn handle_missing<'a>(cfg: &Config, data: &'a [SchoolRecord]) -> MissingnessReport<'a> {
    let missing = analyze_missing(data, |r| r.percent_tested, cfg.bias_threshold);
    let schools = reports::missing_school_rows(&missing);
    output::print_section(
        &format!("Schools Missing {}", MISSING_FIELD),
        Some(&format!("{} of {} schools", missing.absent.len(), data.len())),
        &schools,
    );
    output::print_section("Missing by Borough", None, &reports::missing_by_borough_rows(&missing));
    let stats = reports::missing_stat_rows(&missing);
    output::print_section("TotalSAT of Schools Missing Data", None, &stats);
    output::print_insight(&reports::missing_insight(MISSING_FIELD, &missing));
    export(cfg, "missing_percent_tested.csv", &schools);
    export(cfg, "missing_percent_tested_stats.csv", &stats);
    missing
}

fn handle_best_per_borough(cfg: &Config, data: &[SchoolRecord]) {
    let best = best_per_group(data, |r| r.borough.as_str(), SchoolRecord::total_score);
    let rows = reports::best_school_rows(&best);
    output::print_section("Best School per Borough", Some("highest TotalSAT in each borough"), &rows);
    output::print_insight(&reports::best_school_insight(&best));
    export(cfg, "best_per_borough.csv", &rows);
}

fn run(cfg: &Config) -> Result<()> {
    let (data, load_report) = loader::load_schools(&cfg.data_path)
        .with_context(|| format!("loading data from {}", cfg.data_path.display()))?;
    info!(
        rows = load_report.total_rows,
        loaded = load_report.loaded_rows,
        dropped = load_report.dropped_rows,
        parse_warnings = load_report.parse_warnings,
        "dataset ready"
    );

    if cfg.export || cfg.charts {
        std::fs::create_dir_all(&cfg.out_dir)
            .with_context(|| format!("creating output directory {}", cfg.out_dir.display()))?;
    }

    handle_overview(&data);
    handle_top_schools(cfg, &data);
    let sorted_boroughs = handle_boroughs(cfg, &data);

    let missing = handle_missing(cfg, &data);
    handle_best_per_borough(cfg, &data);

    if cfg.export {
        let top = top_k_by(&data, 1, SchoolRecord::total_score, SortOrder::Descending);
        let summary = reports::generate_summary(data.len(), &sorted_boroughs, &top, MISSING_FIELD, &missing);
        let path = cfg.out_dir.join("summary.json");
        match output::write_json(&path, &summary) {
            Ok(()) => info!(path = %path.display(), "summary written"),
            Err(e) => error!(path = %path.display(), error = %e, "summary export failed"),
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    init_logging();
    let cfg: Config = Args::parse().into();
    info!(config = ?cfg, "starting report");
    run(&cfg)
}
