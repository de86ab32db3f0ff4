pub mod palette;
pub mod table;

use std::io::{self, IsTerminal, Write};

use etfpulse_core::domain::iso_date;
use etfpulse_core::Envelope;

use crate::cli::{Cli, Command, OutputFormat};
use crate::commands::CommandData;
use crate::error::CliError;

const DEFAULT_ROLLING_ROWS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub pretty: bool,
    pub color: bool,
    pub chart: bool,
    pub rolling_rows: usize,
}

impl RenderOptions {
    pub fn from_cli(cli: &Cli) -> Self {
        let (chart, rolling_rows) = match &cli.command {
            Command::Performance(args) => (args.chart, DEFAULT_ROLLING_ROWS),
            Command::Risk(args) => (false, args.rolling_rows),
            Command::Dashboard(args) => (args.chart, args.rolling_rows),
            Command::Sets => (false, DEFAULT_ROLLING_ROWS),
        };
        Self {
            pretty: cli.pretty,
            color: !cli.no_color && io::stdout().is_terminal(),
            chart,
            rolling_rows,
        }
    }
}

pub fn render(
    envelope: &Envelope<CommandData>,
    format: OutputFormat,
    options: &RenderOptions,
) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match format {
        OutputFormat::Json => {
            let payload = if options.pretty {
                serde_json::to_string_pretty(envelope)?
            } else {
                serde_json::to_string(envelope)?
            };
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Table => {
            for line in table_lines(envelope, options) {
                writeln!(out, "{line}")?;
            }
        }
    }

    out.flush()?;
    Ok(())
}

fn table_lines(envelope: &Envelope<CommandData>, options: &RenderOptions) -> Vec<String> {
    let mut lines = Vec::new();
    match &envelope.data {
        CommandData::Performance { performance } => {
            for report in performance {
                lines.extend(table::performance(report, options));
            }
        }
        CommandData::Risk { risk } => lines.extend(table::risk(risk, options)),
        CommandData::Dashboard { performance, risk } => {
            for report in performance {
                lines.extend(table::performance(report, options));
                lines.push(String::new());
            }
            lines.extend(table::risk(risk, options));
        }
        CommandData::Sets { sets } => lines.extend(table::sets(sets, options)),
    }

    lines.push(String::new());
    lines.push(format!(
        "source: {}  cache_hit: {}  latency_ms: {}  generated: {}",
        envelope.meta.source,
        envelope.meta.cache_hit,
        envelope.meta.latency_ms,
        iso_date::format(envelope.meta.generated_at.date())
    ));

    if !envelope.meta.warnings.is_empty() {
        lines.push(String::from("warnings:"));
        lines.extend(envelope.meta.warnings.iter().map(|warning| format!("  - {warning}")));
    }
    if !envelope.errors.is_empty() {
        lines.push(String::from("errors:"));
        lines.extend(
            envelope
                .errors
                .iter()
                .map(|error| format!("  - {}: {}", error.code, error.message)),
        );
    }
    lines
}
