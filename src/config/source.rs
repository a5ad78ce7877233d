use anyhow::{Context, Result};
use std::collections::HashMap;
use std::env;

/// Key/value lookup behind configuration loading.
pub trait ConfigSource {
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads process environment variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSource;

impl ConfigSource for EnvSource {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

pub(crate) fn parse_usize(source: &dyn ConfigSource, key: &str, default: usize) -> Result<usize> {
    source
        .get(key)
        .unwrap_or_else(|| default.to_string())
        .trim()
        .parse::<usize>()
        .context(format!("Failed to parse {}", key))
}

pub(crate) fn parse_u64(source: &dyn ConfigSource, key: &str, default: u64) -> Result<u64> {
    source
        .get(key)
        .unwrap_or_else(|| default.to_string())
        .trim()
        .parse::<u64>()
        .context(format!("Failed to parse {}", key))
}

pub(crate) fn parse_f64(source: &dyn ConfigSource, key: &str, default: f64) -> Result<f64> {
    source
        .get(key)
        .unwrap_or_else(|| default.to_string())
        .trim()
        .parse::<f64>()
        .context(format!("Failed to parse {}", key))
}

/// Unset or empty means `None`.
pub(crate) fn parse_optional_u16(source: &dyn ConfigSource, key: &str) -> Result<Option<u16>> {
    match source.get(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<u16>()
            .map(Some)
            .context(format!("Failed to parse {}", key)),
        _ => Ok(None),
    }
}
