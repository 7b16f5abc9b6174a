use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::scoreboard::DEFAULT_SCOREBOARD_URL;
use crate::storage::default_store_dir;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub scoreboard_url: String,
    pub http_timeout: Duration,
    pub storage_dir: Option<PathBuf>,
    pub offline: bool,
    pub log_filter: String,
    pub log_file: Option<PathBuf>,
    pub prediction_seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scoreboard_url: DEFAULT_SCOREBOARD_URL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            storage_dir: default_store_dir(),
            offline: false,
            log_filter: "info".to_string(),
            log_file: None,
            prediction_seed: None,
        }
    }
}

impl AppConfig {
    /// Reads `GRIDIRON_*` variables; anything unset or unparsable keeps its default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let http_timeout = non_empty("GRIDIRON_HTTP_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(|secs| Duration::from_secs(secs.max(1)))
            .unwrap_or(defaults.http_timeout);

        Self {
            scoreboard_url: non_empty("GRIDIRON_SCOREBOARD_URL")
                .unwrap_or(defaults.scoreboard_url),
            http_timeout,
            storage_dir: non_empty("GRIDIRON_STORAGE_DIR")
                .map(PathBuf::from)
                .or(defaults.storage_dir),
            offline: non_empty("GRIDIRON_OFFLINE").is_some_and(|v| is_truthy(&v)),
            log_filter: non_empty("GRIDIRON_LOG").unwrap_or(defaults.log_filter),
            log_file: non_empty("GRIDIRON_LOG_FILE").map(PathBuf::from),
            prediction_seed: non_empty("GRIDIRON_PREDICTION_SEED")
                .and_then(|v| v.trim().parse::<u64>().ok()),
        }
    }
}

fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = config(&[]);
        assert_eq!(cfg.scoreboard_url, DEFAULT_SCOREBOARD_URL);
        assert_eq!(cfg.http_timeout, Duration::from_secs(10));
        assert!(!cfg.offline);
        assert_eq!(cfg.prediction_seed, None);
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = config(&[
            ("GRIDIRON_HTTP_TIMEOUT_SECS", "0"),
            ("GRIDIRON_OFFLINE", "Yes"),
            ("GRIDIRON_STORAGE_DIR", "/tmp/gridiron"),
            ("GRIDIRON_PREDICTION_SEED", "42"),
            ("GRIDIRON_SCOREBOARD_URL", " "),
        ]);
        assert_eq!(cfg.http_timeout, Duration::from_secs(1));
        assert!(cfg.offline);
        assert_eq!(cfg.storage_dir, Some(PathBuf::from("/tmp/gridiron")));
        assert_eq!(cfg.prediction_seed, Some(42));
        assert_eq!(cfg.scoreboard_url, DEFAULT_SCOREBOARD_URL);
    }
}
