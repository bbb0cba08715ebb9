//! File logging.
//!
//! The terminal belongs to the menu, so log records go to a file through
//! `simplelog::WriteLogger`. Failing to set up logging never stops the
//! program.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};

/// Open (truncating) `path` and install it as the global logger.
///
/// Parent directories are created as needed. A level of `Off` installs
/// nothing.
///
/// # Errors
/// Returns the I/O error if the file cannot be created. Installing a
/// second logger is silently ignored.
pub fn init(path: &Path, level: LevelFilter) -> io::Result<()> {
    if level == LevelFilter::Off {
        return Ok(());
    }
    let file = open_log_file(path)?;

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();
    let _ = WriteLogger::init(level, config, file);

    log::info!("numcrypt {} logging at {level}", env!("CARGO_PKG_VERSION"));
    Ok(())
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    File::create(path)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn open_log_file_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("app.log");
        open_log_file(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn off_level_creates_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("off.log");
        init(&path, LevelFilter::Off).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn unwritable_location_is_an_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"").unwrap();
        // A regular file cannot be a parent directory.
        assert!(init(&blocker.join("app.log"), LevelFilter::Info).is_err());
    }
}
