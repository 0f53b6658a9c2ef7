//! Persistence for the analytics store.
//!
//! The whole store is one JSON document:
//!
//! ```json
//! {
//!   "rules": {
//!     "commit-style.mdc": {
//!       "usage": {
//!         "roo-code": {
//!           "usageCount": 3,
//!           "firstUsed": "2025-04-04T14:43:24+00:00",
//!           "lastUsed": "2025-04-05T09:12:01+00:00"
//!         }
//!       },
//!       "previousNames": []
//!     }
//!   }
//! }
//! ```
//!
//! By default it lives at `usage.json` under the platform data directory;
//! the `--store` flag or `TALLY_STORE` environment variable override the
//! location. The store is treated as a cache: a corrupt file is logged
//! and replaced with an empty store rather than blocking the user, and
//! two historical flat layouts are still readable (see [`migrate`]).

use std::fs::{create_dir_all, read_to_string};
use std::io::{ErrorKind, Write as _};
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use tap::{Pipe, Tap};
use tempfile::NamedTempFile;

pub use schema::*;

mod migrate;
mod schema;

/// Get the project directories for the application.
#[tracing::instrument]
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "attunehq", "tally")
}

/// Default store location: `usage.json` under the platform data directory.
#[tracing::instrument]
pub fn default_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().join("usage.json"))
}

/// Load the store from `path`.
///
/// A missing file yields an empty store. A file that exists but is not
/// valid JSON also yields an empty store, with a warning: analytics must
/// never block the commands that record them. Documents in either legacy
/// flat layout are rebuilt in memory into the current shape. Only a file
/// that cannot be read at all (permissions, hardware) is an error.
#[tracing::instrument]
pub fn load(path: &Path) -> Result<Store, StoreError> {
    let content = match read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Store::default()),
        Err(e) => return Err(StoreError::Io(e)),
    };

    let value = match serde_json::from_str::<serde_json::Value>(&content) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(?error, ?path, "store is not valid JSON, starting fresh");
            return Ok(Store::default());
        }
    };

    match Store::deserialize(&value) {
        Ok(store) => Ok(store),
        Err(_) => migrate::flat_layout(&value)
            .tap(|store| {
                tracing::info!(rules = store.rules.len(), "rebuilt store from legacy layout");
            })
            .pipe(Ok),
    }
}

/// Save the store to `path`, pretty-printed, replacing the previous file
/// atomically (write to a temporary file in the same directory, then
/// rename over the target). Creates the parent directory if needed.
#[tracing::instrument(skip(store))]
pub fn save(path: &Path, store: &Store) -> Result<(), StoreError> {
    let dir = match path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        Some(parent) => {
            create_dir_all(parent)?;
            parent
        }
        None => Path::new("."),
    };

    let json = serde_json::to_string_pretty(store)?;

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(json.as_bytes())?;
    file.write_all(b"\n")?;
    file.persist(path).map_err(|e| StoreError::Io(e.error))?;

    Ok(())
}
