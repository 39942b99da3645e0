//! Command-line parsing for the V-g flutter root finder.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! numerical core and the presentation code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "vg", version, about = "Flutter roots and V-g diagrams from results tensors")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyse tensor files: print a summary and root table, plot, and optionally export.
    Analyze(AnalyzeArgs),
    /// Print the root table only (useful for scripting).
    Roots(AnalyzeArgs),
    /// Plot a previously exported chart JSON.
    Plot(PlotArgs),
}

/// Options shared by `analyze` and `roots`.
#[derive(Debug, Args, Clone)]
pub struct AnalyzeArgs {
    /// Tensor files (.json/.csv) or directories containing them.
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Column index of the flow velocity [env: VG_VELOCITY_COLUMN, default: 2].
    #[arg(long)]
    pub velocity_col: Option<usize>,

    /// Column index of the damping [env: VG_DAMPING_COLUMN, default: 3].
    #[arg(long)]
    pub damping_col: Option<usize>,

    /// Column index of the frequency [env: VG_FREQUENCY_COLUMN, default: 4].
    #[arg(long)]
    pub frequency_col: Option<usize>,

    /// Modes to draw, 1-based and comma-separated (default: all).
    #[arg(long, value_delimiter = ',', value_parser = parse_mode)]
    pub modes: Vec<usize>,

    /// Directory for the root report and other exports [env: VG_OUTPUT_DIR].
    #[arg(short = 'o', long)]
    pub output_dir: Option<PathBuf>,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows per panel).
    #[arg(long, default_value_t = 14)]
    pub height: usize,

    /// Also write `<stem>.svg` to the output directory.
    #[arg(long)]
    pub svg: bool,

    /// Also write `<stem>.series.csv` to the output directory.
    #[arg(long)]
    pub export_series: bool,

    /// Also write `<stem>.chart.json` to the output directory.
    #[arg(long)]
    pub export_chart: bool,
}

/// Options for plotting a saved chart.
#[derive(Debug, Args)]
pub struct PlotArgs {
    /// Chart JSON file produced by `vg analyze --export-chart`.
    #[arg(long, value_name = "JSON")]
    pub chart: PathBuf,

    /// Modes to draw, 1-based (default: the modes stored in the chart).
    #[arg(long, value_delimiter = ',', value_parser = parse_mode)]
    pub modes: Vec<usize>,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows per panel).
    #[arg(long, default_value_t = 14)]
    pub height: usize,

    /// Write an SVG here instead of printing the terminal plot.
    #[arg(long, value_name = "SVG")]
    pub svg: Option<PathBuf>,
}

/// Parse a 1-based mode number into a 0-based index.
fn parse_mode(raw: &str) -> Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err("modes are numbered from 1".to_string()),
        Ok(n) => Ok(n - 1),
        Err(_) => Err(format!("`{raw}` is not a mode number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_are_one_based_on_the_command_line() {
        let cli = Cli::try_parse_from(["vg", "analyze", "run.json", "--modes", "1,3"]).unwrap();
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.modes, vec![0, 2]);
        assert_eq!(args.paths, vec![PathBuf::from("run.json")]);
        assert_eq!(args.width, 100);
        assert!(args.velocity_col.is_none());
    }

    #[test]
    fn mode_zero_is_rejected() {
        assert!(Cli::try_parse_from(["vg", "roots", "run.json", "--modes", "0"]).is_err());
        assert!(parse_mode("x").is_err());
    }

    #[test]
    fn analyze_requires_a_path() {
        assert!(Cli::try_parse_from(["vg", "analyze"]).is_err());
    }
}
