//! CLI argument definitions for etfpulse.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `performance` | Ranked 1D/WTD/MTD/QTD/YTD table for one set |
//! | `risk` | Correlation matrix and rolling one-year returns |
//! | `dashboard` | Every performance set plus the risk section |
//! | `sets` | List the tracked instruments and benchmarks |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (table, json) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--as-of` | today (UTC) | Evaluation date |
//! | `--mock` | `false` | Use seeded synthetic prices |
//! | `--config` | none | JSON configuration file |
//!
//! # Examples
//!
//! ```bash
//! etfpulse performance sector --sort mtd --chart
//! etfpulse risk --format json --pretty
//! etfpulse dashboard --mock --as-of 2024-05-17
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Multi-period ETF performance against a benchmark, with correlation.
#[derive(Debug, Parser)]
#[command(
    name = "etfpulse",
    author,
    version,
    about = "Multi-period ETF performance dashboard",
    long_about = "etfpulse reports to-date returns for factor, regional and sector ETF sets, \
ranks each set around its benchmark, and measures cross-asset correlation.\n\
\n\
Prices come from Yahoo Finance unless --mock is given. Set YAHOO_COOKIE when \
the chart endpoint requires a consent cookie.\n\
\n\
Use 'etfpulse <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Evaluation date (YYYY-MM-DD). Defaults to today in UTC.
    #[arg(long, global = true, value_name = "YYYY-MM-DD")]
    pub as_of: Option<String>,

    /// Use seeded synthetic prices instead of Yahoo Finance.
    #[arg(long, global = true, default_value_t = false)]
    pub mock: bool,

    /// Seed for --mock price generation.
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// JSON configuration file.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable ANSI colors in table output.
    #[arg(long, global = true, default_value_t = false)]
    pub no_color: bool,

    /// Debug logging to stderr.
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored terminal tables.
    Table,
    /// Single JSON envelope.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Ranked performance table for one instrument set.
    ///
    /// # Examples
    ///
    ///   etfpulse performance factor
    ///   etfpulse performance regional --sort qtd --chart
    Performance(PerformanceArgs),

    /// Correlation of daily returns and rolling one-year returns.
    ///
    /// # Examples
    ///
    ///   etfpulse risk
    ///   etfpulse risk --rolling-rows 5
    Risk(RiskArgs),

    /// All three performance sets followed by the risk section.
    Dashboard(DashboardArgs),

    /// List instrument sets and their benchmarks.
    Sets,
}

#[derive(Debug, Args)]
pub struct PerformanceArgs {
    /// Instrument set: factor, regional or sector.
    pub set: String,

    /// Period that orders rows: 1d, wtd, mtd, qtd or ytd.
    #[arg(long)]
    pub sort: Option<String>,

    /// Draw a bar chart of the sort period below the table.
    #[arg(long, default_value_t = false)]
    pub chart: bool,
}

#[derive(Debug, Args)]
pub struct RiskArgs {
    /// Rolling-return dates shown in table output, most recent last.
    #[arg(long, default_value_t = 5)]
    pub rolling_rows: usize,
}

#[derive(Debug, Args)]
pub struct DashboardArgs {
    /// Period that orders rows: 1d, wtd, mtd, qtd or ytd.
    #[arg(long)]
    pub sort: Option<String>,

    /// Draw a bar chart under every performance table.
    #[arg(long, default_value_t = false)]
    pub chart: bool,

    /// Rolling-return dates shown in table output.
    #[arg(long, default_value_t = 5)]
    pub rolling_rows: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn performance_accepts_sort_and_chart() {
        let cli = Cli::try_parse_from(["etfpulse", "performance", "sector", "--sort", "mtd", "--chart"])
            .expect("parses");
        match cli.command {
            Command::Performance(args) => {
                assert_eq!(args.set, "sector");
                assert_eq!(args.sort.as_deref(), Some("mtd"));
                assert!(args.chart);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.format, OutputFormat::Table);
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from([
            "etfpulse", "risk", "--mock", "--as-of", "2024-05-17", "--format", "json",
        ])
        .expect("parses");
        assert!(cli.mock);
        assert_eq!(cli.as_of.as_deref(), Some("2024-05-17"));
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn performance_requires_a_set() {
        assert!(Cli::try_parse_from(["etfpulse", "performance"]).is_err());
    }
}
