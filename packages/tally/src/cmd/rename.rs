//! Rename a rule file, preserving its usage history.

use clap::Args;
use color_eyre::eyre::{Context, Result};
use tally::store;

use crate::cmd::StoreArgs;

#[derive(Args, Clone, Debug)]
pub struct Config {
    /// The old name of the rule file.
    pub old_name: String,

    /// The new name of the rule file.
    pub new_name: String,

    #[command(flatten)]
    pub store: StoreArgs,
}

pub fn main(config: Config) -> Result<()> {
    let path = config.store.resolve()?;
    let mut store = store::load(&path).context("load analytics store")?;

    let merging =
        config.old_name != config.new_name && store.rules.contains_key(&config.new_name);

    store
        .rename(&config.old_name, &config.new_name)
        .context("rename rule")?;

    store::save(&path, &store).context("save analytics store")?;

    if merging {
        println!(
            "Rule \"{}\" already existed; merged the history from \"{}\".",
            config.new_name, config.old_name
        );
    } else {
        println!(
            "Rule renamed from \"{}\" to \"{}\" while preserving history.",
            config.old_name, config.new_name
        );
    }
    Ok(())
}
