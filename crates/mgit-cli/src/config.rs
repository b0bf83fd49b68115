//! `-c key=value` overrides.
//!
//! Only the compression keys have an effect; other well-formed keys are
//! accepted and ignored.

use anyhow::{anyhow, bail, Result};

/// Settings collected from `-c` arguments.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Settings {
    /// `core.compression`
    pub compression: Option<i32>,
    /// `core.looseCompression`, which wins over `core.compression`.
    pub loose_compression: Option<i32>,
}

impl Settings {
    pub fn from_args(args: &[String]) -> Result<Self> {
        let mut settings = Settings::default();
        for raw in args {
            let (key, value) = split_pair(raw)?;
            match key.to_ascii_lowercase().as_str() {
                "core.compression" => settings.compression = Some(parse_level(&key, value)?),
                "core.loosecompression" => {
                    settings.loose_compression = Some(parse_level(&key, value)?)
                }
                _ => tracing::debug!(key = %key, "ignoring config key"),
            }
        }
        Ok(settings)
    }

    /// Zlib level for stored objects, or `None` for the library default.
    pub fn loose_level(&self) -> Option<u32> {
        let level = self.loose_compression.or(self.compression)?;
        u32::try_from(level).ok()
    }
}

fn split_pair(raw: &str) -> Result<(String, &str)> {
    let (key, value) = raw.split_once('=').unwrap_or((raw, "true"));
    let (section, name) = key
        .split_once('.')
        .ok_or_else(|| anyhow!("key does not contain a section: {key}"))?;
    if section.is_empty() || name.is_empty() {
        bail!("invalid config key: {key}");
    }
    Ok((key.to_string(), value))
}

/// `-1` means default; otherwise 0 through 9.
fn parse_level(key: &str, value: &str) -> Result<i32> {
    let level: i32 = value
        .trim()
        .parse()
        .map_err(|_| anyhow!("bad numeric config value '{value}' for '{key}'"))?;
    if !(-1..=9).contains(&level) {
        bail!("bad zlib compression level {level}");
    }
    Ok(level)
}
