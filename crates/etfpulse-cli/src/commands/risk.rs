use etfpulse_core::Dashboard;
use time::Date;

use crate::error::CliError;

use super::{section_error, CommandData, CommandResult};

pub async fn run(dashboard: &Dashboard, as_of: Date) -> Result<CommandResult, CliError> {
    let risk = dashboard.risk_section(as_of).await;
    let errors = section_error("Correlation", risk.status)?
        .into_iter()
        .collect();
    let warnings = risk.warnings.clone();
    let cache_hit = risk.cache_hit;

    Ok(CommandResult::ok(CommandData::Risk { risk })
        .with_warnings(warnings)
        .with_errors(errors)
        .with_cache_hit(cache_hit))
}
