//! Report aggregated rule usage.

use clap::Args;
use color_eyre::eyre::{Context, Result};
use tally::report::{self, RuleSummary, SortKey};
use tally::store;

use crate::cmd::StoreArgs;

#[derive(Args, Clone, Debug)]
pub struct Config {
    /// Sort by last/recent usage (default), first usage, or name.
    #[arg(long, value_enum, default_value_t = SortKey::Last)]
    pub sort: SortKey,

    /// Only show rules used by agents matching this name.
    #[arg(long)]
    pub filter: Option<String>,

    #[command(flatten)]
    pub store: StoreArgs,
}

pub fn main(config: Config) -> Result<()> {
    let path = config.store.resolve()?;
    let store = store::load(&path).context("load analytics store")?;

    tracing::debug!(sort = %config.sort, filter = ?config.filter, "building report");
    let rows = report::summarize(&store, config.sort, config.filter.as_deref());
    if rows.is_empty() {
        println!("No analytics data found.");
        return Ok(());
    }

    print_table(&rows);
    Ok(())
}

/// Render the summaries as a fixed-width table. The Previous Names
/// column only appears when at least one rule has any.
fn print_table(rows: &[RuleSummary]) {
    let has_previous = rows.iter().any(|row| !row.previous_names.is_empty());

    let header = format!(
        "{:<30} | {:<12} | {:<20} | {:<25}",
        "Filename", "Total Usage", "Last Agent", "Last Used"
    );
    if has_previous {
        println!("{header} | Previous Names");
    } else {
        println!("{header}");
    }
    println!("{}", "-".repeat(if has_previous { 110 } else { 93 }));

    for row in rows {
        let last_used = row.last_used.format("%Y-%m-%d %H:%M:%S").to_string();
        let line = format!(
            "{:<30} | {:<12} | {:<20} | {:<25}",
            row.filename, row.total_usage, row.last_agent, last_used
        );
        if has_previous {
            println!("{line} | {}", row.previous_names.join(", "));
        } else {
            println!("{line}");
        }
    }
}
