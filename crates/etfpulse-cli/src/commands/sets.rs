use etfpulse_core::Dashboard;

use super::{CommandData, CommandResult};

pub fn run(dashboard: &Dashboard) -> CommandResult {
    CommandResult::ok(CommandData::Sets {
        sets: dashboard.universe().clone(),
    })
}
