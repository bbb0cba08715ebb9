//! # Configuration
//!
//! Override order: defaults → config file → CLI flags.
//!
//! The file is optional JSON at `<config dir>/numcrypt/config.json`; every
//! field may be omitted. A missing default file means "use defaults", a
//! missing file named explicitly on the command line is an error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{debug, LevelFilter};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::menu::theme::{self, parse_color};
use crate::rsa::MIN_BITS;
use crate::types::{ColorPair, EntryColors, WrapPolicy};

// ============================================================================
// FILE SHAPE (sparse)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub wrap: Option<WrapPolicy>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
    pub prime_bits: Option<u64>,
    pub rsa_bits: Option<u64>,
    #[serde(default)]
    pub colors: ColorConfig,
}

/// Color names as crossterm spells them ("white", "dark_blue", ...).
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ColorConfig {
    pub normal_fg: Option<String>,
    pub normal_bg: Option<String>,
    pub selected_fg: Option<String>,
    pub selected_bg: Option<String>,
}

/// Values given on the command line. `None` leaves the file value alone.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub wrap: Option<WrapPolicy>,
    pub log_file: Option<PathBuf>,
}

// ============================================================================
// DEFAULTS
// ============================================================================

pub const DEFAULT_PRIME_BITS: u64 = 64;
pub const DEFAULT_RSA_BITS: u64 = 512;
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

/// Upper bound on generated prime and modulus sizes.
pub const MAX_BITS: u64 = 4096;

// ============================================================================
// RESOLVED CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub wrap: WrapPolicy,
    pub log_level: LevelFilter,
    /// `None` disables file logging.
    pub log_file: Option<PathBuf>,
    pub prime_bits: u64,
    pub rsa_bits: u64,
    pub colors: EntryColors,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        ResolvedConfig {
            wrap: WrapPolicy::default(),
            log_level: DEFAULT_LOG_LEVEL,
            log_file: default_log_file(),
            prime_bits: DEFAULT_PRIME_BITS,
            rsa_bits: DEFAULT_RSA_BITS,
            colors: theme::DEFAULT_COLORS,
        }
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("cannot parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("unknown color '{0}'")]
    InvalidColor(String),

    #[error("unknown log level '{0}'")]
    InvalidLevel(String),

    #[error("{field} must be between {min} and {max}, got {value}", max = MAX_BITS)]
    InvalidBits {
        field: &'static str,
        min: u64,
        value: u64,
    },
}

// ============================================================================
// LOADING
// ============================================================================

/// `<config dir>/numcrypt/config.json`, if the platform has a config dir.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("numcrypt").join("config.json"))
}

/// `<cache dir>/numcrypt/numcrypt.log`, if the platform has a cache dir.
pub fn default_log_file() -> Option<PathBuf> {
    dirs::cache_dir().map(|d| d.join("numcrypt").join("numcrypt.log"))
}

/// Load the config file.
///
/// With `explicit` set, that file must exist. Without it, the default
/// location is tried and a missing file yields [`FileConfig::default`].
///
/// # Errors
/// I/O failures other than a missing default file, and malformed JSON.
pub fn load_config(explicit: Option<&Path>) -> Result<FileConfig, ConfigError> {
    let (path, required) = match explicit {
        Some(p) => (p.to_path_buf(), true),
        None => match config_path() {
            Some(p) => (p, false),
            None => {
                debug!("no config directory on this platform, using defaults");
                return Ok(FileConfig::default());
            }
        },
    };

    let text = match fs::read_to_string(&path) {
        Ok(t) => t,
        Err(e) if e.kind() == io::ErrorKind::NotFound && !required => {
            debug!("no config at {}, using defaults", path.display());
            return Ok(FileConfig::default());
        }
        Err(source) => return Err(ConfigError::Io { path, source }),
    };

    serde_json::from_str(&text).map_err(|source| ConfigError::Parse { path, source })
}

/// Merge defaults, file values and CLI overrides into concrete settings.
///
/// # Errors
/// Unknown color or level names, and out-of-range bit sizes.
pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<ResolvedConfig, ConfigError> {
    let defaults = ResolvedConfig::default();

    let log_level = match file.log_level {
        Some(name) => {
            LevelFilter::from_str(&name).map_err(|_| ConfigError::InvalidLevel(name))?
        }
        None => defaults.log_level,
    };

    let prime_bits = check_bits("prime_bits", 2, file.prime_bits.unwrap_or(defaults.prime_bits))?;
    let rsa_bits = check_bits("rsa_bits", MIN_BITS, file.rsa_bits.unwrap_or(defaults.rsa_bits))?;

    let base = defaults.colors;
    let colors = EntryColors {
        normal: ColorPair::new(
            color_or(file.colors.normal_fg, base.normal.fg)?,
            color_or(file.colors.normal_bg, base.normal.bg)?,
        ),
        selected: ColorPair::new(
            color_or(file.colors.selected_fg, base.selected.fg)?,
            color_or(file.colors.selected_bg, base.selected.bg)?,
        ),
    };

    Ok(ResolvedConfig {
        wrap: overrides.wrap.or(file.wrap).unwrap_or(defaults.wrap),
        log_level,
        log_file: overrides.log_file.or(file.log_file).or(defaults.log_file),
        prime_bits,
        rsa_bits,
        colors,
    })
}

/// `value` if it lies in `min..=MAX_BITS`.
pub fn check_bits(field: &'static str, min: u64, value: u64) -> Result<u64, ConfigError> {
    if (min..=MAX_BITS).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::InvalidBits { field, min, value })
    }
}

fn color_or(
    name: Option<String>,
    fallback: crossterm::style::Color,
) -> Result<crossterm::style::Color, ConfigError> {
    match name {
        Some(n) => parse_color(&n).ok_or(ConfigError::InvalidColor(n)),
        None => Ok(fallback),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::style::Color;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn write_config(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{json}").unwrap();
        file
    }

    #[test]
    fn empty_file_resolves_to_defaults() {
        let file = write_config("{}");
        let loaded = load_config(Some(file.path())).unwrap();
        let resolved = resolve(loaded, Overrides::default()).unwrap();
        assert_eq!(resolved, ResolvedConfig::default());
    }

    #[test]
    fn file_values_override_defaults() {
        let file = write_config(
            r#"{
                "wrap": "reset",
                "log_level": "debug",
                "prime_bits": 128,
                "rsa_bits": 1024,
                "colors": { "selected_bg": "dark_blue" }
            }"#,
        );
        let resolved = resolve(load_config(Some(file.path())).unwrap(), Overrides::default()).unwrap();
        assert_eq!(resolved.wrap, WrapPolicy::ResetOnUnderflow);
        assert_eq!(resolved.log_level, LevelFilter::Debug);
        assert_eq!(resolved.prime_bits, 128);
        assert_eq!(resolved.rsa_bits, 1024);
        assert_eq!(resolved.colors.selected.bg, Color::DarkBlue);
        assert_eq!(resolved.colors.normal, theme::NORMAL);
    }

    #[test]
    fn cli_overrides_beat_file_values() {
        let file = write_config(r#"{ "wrap": "reset", "log_file": "/tmp/from-file.log" }"#);
        let overrides = Overrides {
            wrap: Some(WrapPolicy::Symmetric),
            log_file: Some(PathBuf::from("/tmp/from-cli.log")),
        };
        let resolved = resolve(load_config(Some(file.path())).unwrap(), overrides).unwrap();
        assert_eq!(resolved.wrap, WrapPolicy::Symmetric);
        assert_eq!(resolved.log_file, Some(PathBuf::from("/tmp/from-cli.log")));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = load_config(Some(&dir.path().join("nope.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let file = write_config("{ wrap: ");
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("cannot parse config"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let file = write_config(r#"{ "wrapp": "reset" }"#);
        assert!(matches!(
            load_config(Some(file.path())),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn bad_color_name_is_reported() {
        let file = write_config(r#"{ "colors": { "normal_fg": "mauve" } }"#);
        let err = resolve(load_config(Some(file.path())).unwrap(), Overrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidColor(ref n) if n == "mauve"));
    }

    #[test]
    fn bad_log_level_is_reported() {
        let file = write_config(r#"{ "log_level": "loud" }"#);
        let err = resolve(load_config(Some(file.path())).unwrap(), Overrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLevel(_)));
    }

    #[test]
    fn bit_sizes_are_range_checked() {
        let file = write_config(r#"{ "rsa_bits": 8 }"#);
        let err = resolve(load_config(Some(file.path())).unwrap(), Overrides::default()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidBits { field: "rsa_bits", value: 8, .. }
        ));

        let file = write_config(r#"{ "prime_bits": 100000 }"#);
        assert!(resolve(load_config(Some(file.path())).unwrap(), Overrides::default()).is_err());
    }

    #[test]
    fn config_path_ends_in_app_dir() {
        if let Some(path) = config_path() {
            assert!(path.ends_with("numcrypt/config.json"));
        }
    }
}
