use clap::Subcommand;

use super::{CliResult, Context};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Totals as JSON
    Show,
    /// Reset all totals to zero
    Reset,
}

pub fn run(action: StatsAction) -> CliResult {
    let ctx = Context::open()?;
    let store = ctx.stats();

    match action {
        StatsAction::Show => {
            let stats = store.load();
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::Reset => {
            store.reset()?;
            println!("stats reset");
        }
    }
    Ok(())
}
