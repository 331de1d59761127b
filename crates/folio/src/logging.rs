//! File logging. The terminal belongs to the UI, so log output goes to a
//! file under the platform cache directory.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use directories::ProjectDirs;
use env_logger::{Builder, Env, Target};

/// Environment variable holding the log filter, e.g. `FOLIO_LOG=debug`.
pub const LOG_ENV: &str = "FOLIO_LOG";

/// `<cache_dir>/folio.log`, if the platform has a cache directory.
pub fn log_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "folio").map(|dirs| dirs.cache_dir().join("folio.log"))
}

/// Install the global logger. Logging stays off if the file cannot be opened.
pub fn init() {
    let Some(path) = log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    Builder::from_env(Env::default().filter_or(LOG_ENV, "warn"))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .init();
}
