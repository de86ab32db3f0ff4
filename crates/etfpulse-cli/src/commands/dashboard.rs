use etfpulse_core::{Dashboard, SetKind};
use time::Date;

use crate::cli::DashboardArgs;
use crate::error::CliError;

use super::{collect_performance, resolve_sort, section_error, CommandData, CommandResult};

/// Every section in display order: factor, regional, sector, then risk.
pub async fn run(
    args: &DashboardArgs,
    dashboard: &Dashboard,
    as_of: Date,
) -> Result<CommandResult, CliError> {
    let sort = resolve_sort(args.sort.as_deref(), dashboard)?;

    let (factor, regional, sector, risk) = tokio::join!(
        dashboard.performance_section(SetKind::Factor, as_of, sort),
        dashboard.performance_section(SetKind::Regional, as_of, sort),
        dashboard.performance_section(SetKind::Sector, as_of, sort),
        dashboard.risk_section(as_of),
    );
    let performance = vec![factor, regional, sector];

    let (mut warnings, mut errors, cache_hit) = collect_performance(&performance)?;
    warnings.extend(risk.warnings.iter().cloned());
    errors.extend(section_error("Correlation", risk.status)?);
    let cache_hit = cache_hit && risk.cache_hit;

    Ok(CommandResult::ok(CommandData::Dashboard { performance, risk })
        .with_warnings(warnings)
        .with_errors(errors)
        .with_cache_hit(cache_hit))
}
