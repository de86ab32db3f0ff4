use etfpulse_core::{Dashboard, SetKind};
use time::Date;

use crate::cli::PerformanceArgs;
use crate::error::CliError;

use super::{collect_performance, resolve_sort, CommandData, CommandResult};

pub async fn run(
    args: &PerformanceArgs,
    dashboard: &Dashboard,
    as_of: Date,
) -> Result<CommandResult, CliError> {
    let kind = args.set.parse::<SetKind>()?;
    let sort = resolve_sort(args.sort.as_deref(), dashboard)?;

    let report = dashboard.performance_section(kind, as_of, sort).await;
    let performance = vec![report];
    let (warnings, errors, cache_hit) = collect_performance(&performance)?;

    Ok(CommandResult::ok(CommandData::Performance { performance })
        .with_warnings(warnings)
        .with_errors(errors)
        .with_cache_hit(cache_hit))
}
