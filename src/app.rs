//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - installs the logger
//! - parses CLI arguments and resolves configuration (CLI > env/.env > defaults)
//! - runs the analysis pipeline over every requested file
//! - prints reports/plots
//! - writes optional exports

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::cli::{AnalyzeArgs, Command, PlotArgs};
use crate::domain::{AnalysisConfig, ColumnMap, Field, ModeSelection};
use crate::error::AppError;
use crate::io::export::{ensure_output_dir, output_path, write_roots_report, write_series_csv};
use crate::io::ingest::discover_tensor_files;
use crate::plot::SVG_SIZE;

pub mod pipeline;

use pipeline::AnalysisOutput;

const OUTPUT_DIR_ENV: &str = "VG_OUTPUT_DIR";

/// Entry point for the `vg` binary.
pub fn run() -> Result<(), AppError> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .try_init();

    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Analyze(args) => handle_analyze(args, OutputMode::Full),
        Command::Roots(args) => handle_analyze(args, OutputMode::RootsOnly),
        Command::Plot(args) => handle_plot(args),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    RootsOnly,
}

fn handle_analyze(args: AnalyzeArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = config_from_args(&args)?;
    let paths = expand_paths(&args.paths)?;
    log::info!("analysing {} file(s)", paths.len());

    let outcomes = pipeline::analyze_batch(&paths, &config.columns);
    let total = outcomes.len();
    let mut first_failure: Option<AppError> = None;
    let mut failures = 0usize;

    for outcome in outcomes {
        let result = outcome
            .result
            .map_err(AppError::from)
            .and_then(|output| present(&output, &config, mode, total > 1));

        if let Err(err) = result {
            // One bad file must not hide the others' results.
            eprintln!("error: {err}");
            failures += 1;
            first_failure.get_or_insert(err);
        }
    }

    match first_failure {
        None => Ok(()),
        Some(first) => Err(AppError::new(
            first.exit_code(),
            format!("{failures} of {total} file(s) failed"),
        )),
    }
}

/// Print and export the results of one file.
fn present(output: &AnalysisOutput, config: &AnalysisConfig, mode: OutputMode, many: bool) -> Result<(), AppError> {
    match mode {
        OutputMode::Full => {
            println!("{}", crate::report::format_run_summary(output));
            if config.plot {
                let plot = crate::plot::render_ascii_vg(
                    &output.series,
                    &config.modes,
                    &output.title,
                    config.plot_width,
                    config.plot_height,
                );
                println!("{plot}");
            }
        }
        OutputMode::RootsOnly => {
            if many {
                println!("# {}", output.source.display());
            }
            print!("{}", crate::report::format_roots(&output.roots));
        }
    }

    if let Some(dir) = &config.output_dir {
        write_exports(dir, output, config)?;
    }
    Ok(())
}

fn write_exports(dir: &Path, output: &AnalysisOutput, config: &AnalysisConfig) -> Result<(), AppError> {
    ensure_output_dir(dir)?;

    let report = write_roots_report(dir, &output.source, &output.roots)?;
    log::info!("wrote {}", report.display());

    if config.export_series {
        let path = output_path(dir, &output.source, ".series.csv");
        write_series_csv(&path, &output.series)?;
        log::info!("wrote {}", path.display());
    }
    if config.export_chart {
        let path = output_path(dir, &output.source, ".chart.json");
        let chart = crate::io::chart::chart_from_series(
            &crate::io::ingest::file_name(&output.source),
            &output.series,
            &output.roots,
            &config.modes,
        );
        crate::io::chart::write_chart_json(&path, &chart)?;
        log::info!("wrote {}", path.display());
    }
    if config.export_svg {
        let path = output_path(dir, &output.source, ".svg");
        crate::plot::write_vg_svg(&path, &output.series, &config.modes, &output.title, SVG_SIZE)?;
        log::info!("wrote {}", path.display());
    }
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let chart = crate::io::chart::read_chart_json(&args.chart)?;
    let series = crate::io::chart::series_from_chart(&chart)?;
    let selection = if args.modes.is_empty() {
        chart.modes.clone()
    } else {
        ModeSelection::new(args.modes)
    };

    match &args.svg {
        Some(path) => {
            crate::plot::write_vg_svg(path, &series, &selection, &chart.source, SVG_SIZE)?;
            log::info!("wrote {}", path.display());
        }
        None => {
            let plot =
                crate::plot::render_ascii_vg(&series, &selection, &chart.source, args.width, args.height);
            println!("{plot}");
        }
    }

    println!("Flutter Roots:");
    print!("{}", crate::report::format_roots(&chart.roots));
    Ok(())
}

/// Resolve the run configuration: CLI flags, then environment (`.env`), then defaults.
pub fn config_from_args(args: &AnalyzeArgs) -> Result<AnalysisConfig, AppError> {
    dotenvy::dotenv().ok();
    resolve_config(args, |name| std::env::var(name).ok())
}

/// Layer CLI flags over values from `env` (a variable lookup) and the defaults.
pub fn resolve_config(
    args: &AnalyzeArgs,
    env: impl Fn(&str) -> Option<String>,
) -> Result<AnalysisConfig, AppError> {
    let cli_columns = [
        (Field::Velocity, args.velocity_col),
        (Field::Damping, args.damping_col),
        (Field::Frequency, args.frequency_col),
    ];
    let mut columns = ColumnMap::default();
    for (field, from_cli) in cli_columns {
        let column = match from_cli {
            Some(column) => Some(column),
            None => env_column(field, &env)?,
        };
        if let Some(column) = column {
            columns.set(field, column);
        }
    }

    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| env(OUTPUT_DIR_ENV).map(PathBuf::from));

    let wants_exports = args.svg || args.export_series || args.export_chart;
    if wants_exports && output_dir.is_none() {
        return Err(AppError::new(
            2,
            format!("--svg/--export-series/--export-chart need --output-dir (or {OUTPUT_DIR_ENV})."),
        ));
    }

    Ok(AnalysisConfig {
        columns,
        modes: ModeSelection::new(args.modes.clone()),
        output_dir,
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_svg: args.svg,
        export_series: args.export_series,
        export_chart: args.export_chart,
    })
}

fn env_column(field: Field, env: impl Fn(&str) -> Option<String>) -> Result<Option<usize>, AppError> {
    let name = field.env_var();
    match env(name) {
        Some(raw) => raw.trim().parse::<usize>().map(Some).map_err(|_| {
            AppError::new(2, format!("{name} must be a column index, got `{raw}`."))
        }),
        None => Ok(None),
    }
}

/// Expand directories into the tensor files they contain.
fn expand_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>, AppError> {
    let mut out = Vec::new();
    for path in paths {
        if path.is_dir() {
            out.extend(discover_tensor_files(path)?);
        } else {
            out.push(path.clone());
        }
    }

    if out.is_empty() {
        return Err(AppError::new(2, "No tensor files (.json/.csv) found."));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use std::fs;

    fn analyze_args(argv: &[&str]) -> AnalyzeArgs {
        let mut full = vec!["vg", "analyze"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Command::Analyze(args) => args,
            _ => unreachable!(),
        }
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn cli_columns_override_defaults() {
        let args = analyze_args(&["a.json", "--velocity-col", "0", "--damping-col", "1", "--frequency-col", "2"]);
        let env = |name: &str| (name == "VG_VELOCITY_COLUMN").then(|| "7".to_string());
        let config = resolve_config(&args, env).unwrap();
        assert_eq!(
            config.columns,
            ColumnMap {
                velocity: 0,
                damping: 1,
                frequency: 2
            }
        );
        assert!(config.plot);
    }

    #[test]
    fn env_columns_fill_in_for_missing_flags() {
        let args = analyze_args(&["a.json", "--damping-col", "5"]);
        let env = |name: &str| match name {
            "VG_VELOCITY_COLUMN" => Some(" 0 ".to_string()),
            "VG_DAMPING_COLUMN" => Some("9".to_string()),
            _ => None,
        };
        let config = resolve_config(&args, env).unwrap();
        assert_eq!(
            config.columns,
            ColumnMap {
                velocity: 0,
                damping: 5,
                frequency: 4
            }
        );

        let bad = |name: &str| (name == "VG_FREQUENCY_COLUMN").then(|| "four".to_string());
        assert_eq!(resolve_config(&args, bad).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn exports_need_an_output_dir() {
        let args = analyze_args(&["a.json", "--svg"]);
        assert_eq!(resolve_config(&args, no_env).unwrap_err().exit_code(), 2);

        let from_env = |name: &str| (name == OUTPUT_DIR_ENV).then(|| "out".to_string());
        let config = resolve_config(&args, from_env).unwrap();
        assert_eq!(config.output_dir, Some(PathBuf::from("out")));
        assert!(config.export_svg);

        let args = analyze_args(&["a.json", "--export-chart", "-o", "reports"]);
        let config = resolve_config(&args, no_env).unwrap();
        assert_eq!(config.output_dir, Some(PathBuf::from("reports")));
    }

    #[test]
    fn directories_expand_to_their_tensor_files() {
        let dir = std::env::temp_dir().join(format!("vg-app-expand-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("b.json"), "[]").unwrap();
        fs::write(dir.join("a.csv"), "").unwrap();

        let explicit = PathBuf::from("other.json");
        let paths = expand_paths(&[dir.clone(), explicit.clone()]).unwrap();
        assert_eq!(paths, vec![dir.join("a.csv"), dir.join("b.json"), explicit]);

        let empty = std::env::temp_dir().join(format!("vg-app-empty-{}", std::process::id()));
        let _ = fs::remove_dir_all(&empty);
        fs::create_dir_all(&empty).unwrap();
        assert!(expand_paths(&[empty]).is_err());
    }
}
