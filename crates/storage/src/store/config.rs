#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

pub const STORAGE_DIR_ENV: &str = "STOCKROOM_STORAGE_DIR";
pub const FAST_PRAGMAS_ENV: &str = "STOCKROOM_FAST_PRAGMAS";

const DEFAULT_STORAGE_DIR: &str = "stockroom-data";
const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    pub storage_dir: PathBuf,
    pub busy_timeout: Duration,
    /// `synchronous=OFF`, in-memory journal and temp store. Trades durability for
    /// speed; meant for benchmark runs only.
    pub fast_pragmas: bool,
}

impl StoreConfig {
    pub fn new(storage_dir: impl AsRef<Path>) -> Self {
        Self {
            storage_dir: storage_dir.as_ref().to_path_buf(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            fast_pragmas: false,
        }
    }

    pub fn with_fast_pragmas(mut self, enabled: bool) -> Self {
        self.fast_pragmas = enabled;
        self
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let storage_dir = value(STORAGE_DIR_ENV).unwrap_or_else(|| DEFAULT_STORAGE_DIR.to_string());
        let fast_pragmas = value(FAST_PRAGMAS_ENV).is_some_and(|v| is_truthy(&v));
        Self::new(storage_dir).with_fast_pragmas(fast_pragmas)
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_defaults_when_unset() {
        let config = StoreConfig::from_lookup(|_| None);
        assert_eq!(config.storage_dir, PathBuf::from(DEFAULT_STORAGE_DIR));
        assert_eq!(config.busy_timeout, DEFAULT_BUSY_TIMEOUT);
        assert!(!config.fast_pragmas);
    }

    #[test]
    fn lookup_reads_dir_and_flag() {
        let config = StoreConfig::from_lookup(|name| match name {
            STORAGE_DIR_ENV => Some(" /tmp/stockroom ".to_string()),
            FAST_PRAGMAS_ENV => Some("YES".to_string()),
            _ => None,
        });
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/stockroom"));
        assert!(config.fast_pragmas);

        let off = StoreConfig::from_lookup(|name| {
            (name == FAST_PRAGMAS_ENV).then(|| "0".to_string())
        });
        assert!(!off.fast_pragmas);
    }
}
