//! Configuration file loading.
//!
//! The deserializer is picked from the file extension:
//!
//! | suffix  | format                         |
//! |---------|--------------------------------|
//! | `json`  | JSON via `serde_json`          |
//! | `toml`  | TOML via `toml`                |
//! | `conf`  | INI-style sections via `rust-ini` |
//!
//! Matching is case-insensitive. Read and parse errors are returned as-is,
//! nothing is retried and the target is never partially filled.

use std::fs;
use std::path::{Path, PathBuf};

use ini::{Ini, ParseOption};
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};
use tracing::debug;

use crate::error::ConfigError;

/// Supported configuration formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Toml,
    Conf,
}

impl Format {
    /// Map a file suffix (with or without the leading `.`) to a format.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        let suffix = suffix.strip_prefix('.').unwrap_or(suffix);
        match suffix.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            "conf" => Some(Self::Conf),
            _ => None,
        }
    }
}

/// Load `path`, inferring the format from its extension.
pub fn load<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let suffix = path
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default();
    load_with_suffix(path, &suffix)
}

/// Load `path` as the format named by `suffix`.
pub fn load_with_suffix<T: DeserializeOwned>(
    path: impl AsRef<Path>,
    suffix: &str,
) -> Result<T, ConfigError> {
    let path = resolve(path.as_ref())?;
    let bytes = fs::read(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;

    let format = Format::from_suffix(suffix).ok_or_else(|| ConfigError::UnsupportedFormat {
        suffix: suffix.to_string(),
        path: path.clone(),
    })?;
    debug!(path = %path.display(), ?format, len = bytes.len(), "loading config");

    decode(&bytes, format, &path)
}

/// Load `path` into an existing value. `target` is only replaced when the
/// whole file parsed.
pub fn load_into<T: DeserializeOwned>(
    path: impl AsRef<Path>,
    target: &mut T,
) -> Result<(), ConfigError> {
    *target = load(path)?;
    Ok(())
}

fn decode<T: DeserializeOwned>(bytes: &[u8], format: Format, path: &Path) -> Result<T, ConfigError> {
    match format {
        Format::Json => serde_json::from_slice(bytes).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        }),
        Format::Toml => {
            let text = utf8(bytes, format, path)?;
            toml::from_str(text).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            })
        }
        Format::Conf => {
            let text = utf8(bytes, format, path)?;
            let tree = conf_to_value(text).map_err(|message| ConfigError::Ini {
                path: path.to_path_buf(),
                message,
            })?;
            serde_json::from_value(tree).map_err(|e| ConfigError::Ini {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        }
    }
}

fn utf8<'a>(bytes: &'a [u8], format: Format, path: &Path) -> Result<&'a str, ConfigError> {
    std::str::from_utf8(bytes).map_err(|source| ConfigError::Encoding {
        format,
        path: path.to_path_buf(),
        source,
    })
}

// ── conf (INI) ────────────────────────────────────────────────────────────────

/// Parse INI text into a JSON tree: top-level properties stay at the root,
/// each `[section]` becomes a nested object.
fn conf_to_value(text: &str) -> Result<Value, String> {
    let opt = ParseOption {
        enabled_quote: false,
        ..ParseOption::default()
    };
    let ini = Ini::load_from_str_opt(text, opt).map_err(|e| e.to_string())?;

    let mut root = Map::new();
    for (section, props) in ini.iter() {
        let table = match section {
            None => &mut root,
            Some(name) => {
                let entry = root
                    .entry(name.to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                match entry {
                    Value::Object(map) => map,
                    _ => return Err(format!("section [{name}] clashes with a top-level key")),
                }
            }
        };
        for (key, raw) in props.iter() {
            table.insert(key.to_string(), conf_scalar(raw));
        }
    }
    Ok(Value::Object(root))
}

/// Unquoted `true`/`false` and numbers are typed; anything else, including
/// every double-quoted value, is a string.
fn conf_scalar(raw: &str) -> Value {
    let raw = raw.trim();
    if let Some(inner) = raw.strip_prefix('"').and_then(|r| r.strip_suffix('"')) {
        return Value::String(inner.to_string());
    }
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Value::Number(n.into());
    }
    if let Some(n) = raw.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(n);
    }
    Value::String(raw.to_string())
}

// ── paths ─────────────────────────────────────────────────────────────────────

/// Expand `~`, then make the path absolute against the current directory.
/// The file does not have to exist.
fn resolve(path: &Path) -> Result<PathBuf, ConfigError> {
    let expanded = match path.to_str() {
        Some(s) => expand_home(s),
        None => path.to_path_buf(),
    };
    std::path::absolute(&expanded).map_err(|source| ConfigError::Io {
        path: expanded,
        source,
    })
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}
