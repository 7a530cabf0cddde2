/// Runtime configuration.
///
/// Everything has a sensible default; environment variables override:
///
/// - `CSVSLEUTH_HISTORY`: path of the history JSON file.
/// - `CSVSLEUTH_ROWS_PER_PARTIAL`: rows between two streamed snapshots.
/// - `CSVSLEUTH_GENERATOR_ROWS`: row count of generated sample reports.
use crate::analysis::DEFAULT_ROWS_PER_PARTIAL;
use crate::generator::DEFAULT_GENERATOR_ROWS;
use std::path::PathBuf;
use tracing::warn;

pub const ENV_HISTORY_PATH: &str = "CSVSLEUTH_HISTORY";
pub const ENV_ROWS_PER_PARTIAL: &str = "CSVSLEUTH_ROWS_PER_PARTIAL";
pub const ENV_GENERATOR_ROWS: &str = "CSVSLEUTH_GENERATOR_ROWS";

/// Resolved application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub history_path: PathBuf,
    pub rows_per_partial: usize,
    pub generator_rows: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            history_path: default_history_path(),
            rows_per_partial: DEFAULT_ROWS_PER_PARTIAL,
            generator_rows: DEFAULT_GENERATOR_ROWS,
        }
    }
}

impl AppConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by `lookup`. Unparseable numbers are logged and
    /// ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_HISTORY_PATH).filter(|p| !p.trim().is_empty()) {
            config.history_path = PathBuf::from(path);
        }
        if let Some(n) = parse_usize(&lookup, ENV_ROWS_PER_PARTIAL) {
            config.rows_per_partial = n;
        }
        if let Some(n) = parse_usize(&lookup, ENV_GENERATOR_ROWS) {
            config.generator_rows = n;
        }
        config
    }
}

fn parse_usize(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<usize> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(n) => Some(n),
        Err(e) => {
            warn!("Ignoring {key}={raw:?}: {e}");
            None
        }
    }
}

/// `<platform data dir>/csvsleuth/history.json`, or `./csvsleuth/history.json`
/// when the platform has no data directory.
pub fn default_history_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("csvsleuth")
        .join("history.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config, AppConfig::default());
        assert!(config.history_path.ends_with("csvsleuth/history.json"));
    }

    #[test]
    fn environment_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (ENV_HISTORY_PATH, "/tmp/h.json"),
            (ENV_ROWS_PER_PARTIAL, "250"),
            (ENV_GENERATOR_ROWS, " 42 "),
        ]));
        assert_eq!(config.history_path, PathBuf::from("/tmp/h.json"));
        assert_eq!(config.rows_per_partial, 250);
        assert_eq!(config.generator_rows, 42);
    }

    #[test]
    fn bad_numbers_fall_back_to_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[(ENV_ROWS_PER_PARTIAL, "lots")]));
        assert_eq!(config.rows_per_partial, DEFAULT_ROWS_PER_PARTIAL);
    }
}
