//! Record one use of a rule file.

use chrono::{SubsecRound, Utc};
use clap::Args;
use color_eyre::eyre::{Context, Result};
use tally::store;

use crate::cmd::StoreArgs;

#[derive(Args, Clone, Debug)]
pub struct Config {
    /// The name of the rule file being used.
    #[arg(long)]
    pub filename: String,

    /// The name of the agent using it.
    #[arg(long = "by", value_name = "AGENT")]
    pub agent: String,

    #[command(flatten)]
    pub store: StoreArgs,
}

pub fn main(config: Config) -> Result<()> {
    let path = config.store.resolve()?;
    let mut store = store::load(&path).context("load analytics store")?;

    // Whole seconds only, so the in-memory record matches what a reload
    // of the serialized form yields.
    let now = Utc::now().trunc_subsecs(0);
    store.record(&config.filename, &config.agent, now);

    store::save(&path, &store).context("save analytics store")?;

    println!(
        "Analytics updated for rule \"{}\" used by \"{}\"",
        config.filename, config.agent
    );
    Ok(())
}
