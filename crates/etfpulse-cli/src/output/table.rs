//! Plain-text tables for the terminal.

use etfpulse_core::domain::iso_date;
use etfpulse_core::{
    CellStyle, ChartBar, Period, PerformanceReport, ReportRow, RiskReport, RowGroup,
    SectionStatus, SetKind, Universe,
};

use super::palette::{bold, cell_background, correlation_background, paint, Rgb};
use super::RenderOptions;

const VALUE_WIDTH: usize = 9;
const MAX_LABEL_WIDTH: usize = 32;
const CHART_WIDTH: usize = 30;
const MATRIX_LABEL_WIDTH: usize = 24;

pub fn performance(report: &PerformanceReport, options: &RenderOptions) -> Vec<String> {
    let mut lines = vec![heading(
        &format!(
            "{}  as of {}, sorted by {}",
            report.title,
            iso_date::format(report.as_of),
            report.sort.as_str().to_ascii_uppercase()
        ),
        options,
    )];

    if report.status != SectionStatus::Ok {
        lines.push(format!("  {}", status_text(report.status)));
        return lines;
    }

    let width = label_width(report.rows.iter().map(|row| row.label.as_str()));
    let mut header = format!("  {:<width$}", "Instrument");
    for period in Period::ALL {
        header.push_str(&format!("{:>VALUE_WIDTH$}", period.as_str().to_ascii_uppercase()));
    }
    lines.push(header);
    lines.push(format!("  {}", "-".repeat(width + VALUE_WIDTH * Period::ALL.len())));

    for row in &report.rows {
        lines.push(performance_row(row, width, options));
    }

    if options.chart && !report.chart.is_empty() {
        lines.push(String::new());
        lines.push(format!("  {} return", report.sort.label()));
        lines.extend(chart(&report.chart, options));
    }
    lines
}

fn performance_row(row: &ReportRow, width: usize, options: &RenderOptions) -> String {
    let label = fit(&row.label, width);
    let mut line = if row.group == RowGroup::Benchmark && options.color {
        format!("  {}", bold(&format!("{label:<width$}")))
    } else {
        format!("  {label:<width$}")
    };

    for (value, style) in row.returns.values().into_iter().zip(row.styles) {
        line.push_str(&cell(&percent(value * 100.0), style, options));
    }
    if row.group == RowGroup::Benchmark {
        line.push_str("  benchmark");
    }
    line
}

fn cell(text: &str, style: CellStyle, options: &RenderOptions) -> String {
    let padded = format!("{text:>VALUE_WIDTH$}");
    if options.color {
        paint(&padded, cell_background(style))
    } else {
        padded
    }
}

fn chart(bars: &[ChartBar], options: &RenderOptions) -> Vec<String> {
    let width = label_width(bars.iter().map(|bar| bar.label.as_str()));
    let widest = bars
        .iter()
        .map(|bar| bar.value.abs())
        .fold(0.0_f64, f64::max);

    bars.iter()
        .map(|bar| {
            let length = if widest > 0.0 {
                ((bar.value.abs() / widest) * CHART_WIDTH as f64).round() as usize
            } else {
                0
            };
            let mut bar_text = "#".repeat(length.max(usize::from(bar.value != 0.0)));
            if options.color {
                let color = if bar.value >= 0.0 {
                    Rgb(0x2E, 0x7D, 0x32)
                } else {
                    Rgb(0xC6, 0x28, 0x28)
                };
                bar_text = paint(&bar_text, color);
            }
            format!(
                "  {:<width$} {:>8} {bar_text}",
                fit(&bar.label, width),
                percent(bar.value * 100.0)
            )
        })
        .collect()
}

pub fn risk(report: &RiskReport, options: &RenderOptions) -> Vec<String> {
    let mut lines = vec![heading(
        &format!(
            "Correlation of daily returns  {} to {}",
            iso_date::format(report.start),
            iso_date::format(report.as_of)
        ),
        options,
    )];

    if report.status != SectionStatus::Ok {
        lines.push(format!("  {}", status_text(report.status)));
        return lines;
    }

    if let Some(matrix) = &report.correlation {
        let mut header = format!("  {:>3} {:<MATRIX_LABEL_WIDTH$}", "", "");
        for index in 1..=matrix.len() {
            header.push_str(&format!("{index:>6}"));
        }
        lines.push(header);

        for (index, (label, values)) in matrix.labels.iter().zip(&matrix.values).enumerate() {
            let mut line = format!("  {:>3} {:<MATRIX_LABEL_WIDTH$}", index + 1, fit(label, MATRIX_LABEL_WIDTH));
            for value in values {
                let text = match value {
                    Some(value) => format!("{value:>6.2}"),
                    None => format!("{:>6}", "-"),
                };
                match (value, options.color) {
                    (Some(value), true) => line.push_str(&paint(&text, correlation_background(*value))),
                    _ => line.push_str(&text),
                }
            }
            lines.push(line);
        }
    }

    lines.push(String::new());
    lines.push(heading(
        &format!("Rolling {}-day returns", report.rolling_window),
        options,
    ));
    if report.rolling.is_empty() {
        lines.push(String::from("  not enough shared history"));
        return lines;
    }

    let shown = &report.rolling[report.rolling.len().saturating_sub(options.rolling_rows.max(1))..];
    let width = label_width(report.rolling_labels.iter().map(String::as_str));
    let mut header = format!("  {:<width$}", "Instrument");
    for row in shown {
        header.push_str(&format!("{:>12}", iso_date::format(row.date)));
    }
    lines.push(header);

    for (column, label) in report.rolling_labels.iter().enumerate() {
        let mut line = format!("  {:<width$}", fit(label, width));
        for row in shown {
            let value = row.values.get(column).copied().unwrap_or(f64::NAN);
            line.push_str(&format!("{:>12}", percent(value)));
        }
        lines.push(line);
    }
    lines
}

pub fn sets(universe: &Universe, options: &RenderOptions) -> Vec<String> {
    let mut lines = Vec::new();
    for kind in SetKind::ALL {
        let set = universe.set(kind);
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(heading(
            &format!(
                "{} ({} instruments, benchmark: {})",
                kind.title(),
                set.len(),
                set.benchmark().unwrap_or("none")
            ),
            options,
        ));
        for instrument in set.instruments() {
            lines.push(format!("  {:<8} {}", instrument.ticker.as_str(), instrument.label));
        }
    }
    lines
}

fn heading(text: &str, options: &RenderOptions) -> String {
    if options.color {
        bold(text)
    } else {
        text.to_owned()
    }
}

fn status_text(status: SectionStatus) -> &'static str {
    match status {
        SectionStatus::Ok => "ok",
        SectionStatus::NoData => "No data available.",
        SectionStatus::CouldNotCalculate => "Could not calculate performance.",
        SectionStatus::SourceUnavailable => "Price source unavailable.",
    }
}

/// `value` is already in percent.
fn percent(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.2}%")
    } else {
        String::from("-")
    }
}

fn label_width<'a>(labels: impl Iterator<Item = &'a str>) -> usize {
    labels
        .map(|label| label.chars().count())
        .max()
        .unwrap_or(0)
        .clamp("Instrument".len(), MAX_LABEL_WIDTH)
}

fn fit(label: &str, width: usize) -> String {
    if label.chars().count() <= width {
        return label.to_owned();
    }
    let mut fitted: String = label.chars().take(width.saturating_sub(1)).collect();
    fitted.push('~');
    fitted
}
