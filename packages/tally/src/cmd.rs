//! Subcommand implementations.

use std::path::PathBuf;

use clap::Args;
use color_eyre::eyre::{Result, eyre};
use tally::store;

pub mod read;
pub mod rename;
pub mod write;

/// Store location, shared by every subcommand.
#[derive(Args, Clone, Debug)]
pub struct StoreArgs {
    /// Path to the analytics store file.
    #[arg(long, env = "TALLY_STORE", value_name = "PATH")]
    pub store: Option<PathBuf>,
}

impl StoreArgs {
    /// Resolve the store path, falling back to the platform data
    /// directory.
    pub fn resolve(&self) -> Result<PathBuf> {
        match &self.store {
            Some(path) => Ok(path.clone()),
            None => store::default_path()
                .ok_or_else(|| eyre!("could not determine a data directory for the analytics store")),
        }
    }
}
