//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;
use std::str::FromStr;

use super::defaults::MAX_SNAP_DECIMALS;
use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [grid] section
    if let Some(section) = ini.section(Some("grid")) {
        if let Some(v) = section.get("nx") {
            config.grid.nx = parse_positive("grid", "nx", v)?;
        }
        if let Some(v) = section.get("ny") {
            config.grid.ny = parse_positive("grid", "ny", v)?;
        }
    }

    // [resolver] section
    if let Some(section) = ini.section(Some("resolver")) {
        if let Some(v) = section.get("max_rounds") {
            config.resolver.max_rounds = parse_positive("resolver", "max_rounds", v)?;
        }
        if let Some(v) = section.get("snap_decimals") {
            let decimals: u32 = parse_number("resolver", "snap_decimals", v)?;
            if decimals > MAX_SNAP_DECIMALS {
                return Err(invalid(
                    "resolver",
                    "snap_decimals",
                    v,
                    &format!("must be between 0 and {}", MAX_SNAP_DECIMALS),
                ));
            }
            config.resolver.snap_decimals = decimals;
        }
        if let Some(v) = section.get("fail_on_incomplete") {
            config.resolver.fail_on_incomplete = parse_bool(v);
        }
    }

    // [input] section
    if let Some(section) = ini.section(Some("input")) {
        if let Some(v) = section.get("crs") {
            let v = v.trim();
            if v.is_empty() {
                return Err(invalid("input", "crs", v, "must not be empty"));
            }
            config.input.crs = v.to_string();
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = resolve_dir(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if v.is_empty() || v.contains(['/', '\\']) {
                return Err(invalid(
                    "logging",
                    "file",
                    v,
                    "must be a plain file name",
                ));
            }
            config.logging.file = v.to_string();
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_number<T: FromStr>(section: &str, key: &str, value: &str) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, "must be a non-negative integer"))
}

fn parse_positive<T>(section: &str, key: &str, value: &str) -> Result<T, ConfigFileError>
where
    T: FromStr + PartialOrd + Default,
{
    let n: T = value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, "must be a positive integer"))?;
    if n <= T::default() {
        return Err(invalid(section, key, value, "must be a positive integer"));
    }
    Ok(n)
}

/// Parse a boolean value from a config string.
pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

/// Relative log directories live under the config directory.
fn resolve_dir(path: &str) -> PathBuf {
    let expanded = expand_tilde(path);
    if expanded.is_absolute() {
        expanded
    } else {
        super::file::config_directory().join(expanded)
    }
}
