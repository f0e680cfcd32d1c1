//! Runtime configuration read from the environment.
//!
//! Values come from process environment variables, with a `.env` file in the
//! working directory loaded first when present. Command-line flags parsed by
//! the binary are applied on top with the `with_*` methods.

use std::path::PathBuf;

use exam_core::model::SelectionPolicy;

use crate::error::ConfigError;

pub const BANK_DIR_VAR: &str = "EXAM_BANK_DIR";
pub const POLICY_VAR: &str = "EXAM_POLICY";
pub const HOST_VAR: &str = "EXAM_HOST";
pub const PORT_VAR: &str = "EXAM_PORT";
pub const LOG_VAR: &str = "EXAM_LOG";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamConfig {
    /// Directory holding the three bank files.
    pub bank_dir: PathBuf,
    pub policy: SelectionPolicy,
    pub host: String,
    pub port: u16,
    /// `tracing_subscriber::EnvFilter` directive.
    pub log_filter: String,
}

impl Default for ExamConfig {
    fn default() -> Self {
        Self {
            bank_dir: PathBuf::from("."),
            policy: SelectionPolicy::Random,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ExamConfig {
    /// Load `.env` if present, then read the `EXAM_*` variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `EXAM_POLICY` or `EXAM_PORT` is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup. Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the policy or port value is malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(dir) = get(BANK_DIR_VAR) {
            config.bank_dir = PathBuf::from(dir);
        }
        if let Some(raw) = get(POLICY_VAR) {
            config.policy = raw.parse::<SelectionPolicy>().map_err(|source| ConfigError::Policy {
                var: POLICY_VAR,
                source,
            })?;
        }
        if let Some(host) = get(HOST_VAR) {
            config.host = host;
        }
        if let Some(raw) = get(PORT_VAR) {
            config.port = parse_port(PORT_VAR, &raw)?;
        }
        if let Some(filter) = get(LOG_VAR).or_else(|| get("RUST_LOG")) {
            config.log_filter = filter;
        }
        Ok(config)
    }

    #[must_use]
    pub fn with_bank_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.bank_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// `host:port` for binding the web server.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse a TCP port, naming `var` in the error.
///
/// # Errors
///
/// Returns `ConfigError::Port` if `raw` is not a number in `0..=65535`.
pub fn parse_port(var: &'static str, raw: &str) -> Result<u16, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Port {
        var,
        raw: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ExamConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ExamConfig::default());
        assert_eq!(config.bind_addr(), "127.0.0.1:5000");
    }

    #[test]
    fn reads_every_variable() {
        let config = ExamConfig::from_lookup(lookup(&[
            ("EXAM_BANK_DIR", "/srv/bank"),
            ("EXAM_POLICY", "fixed"),
            ("EXAM_HOST", "0.0.0.0"),
            ("EXAM_PORT", "8080"),
            ("EXAM_LOG", "debug"),
        ]))
        .unwrap();
        assert_eq!(config.bank_dir, PathBuf::from("/srv/bank"));
        assert_eq!(config.policy, SelectionPolicy::FixedSequence);
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = ExamConfig::from_lookup(lookup(&[("EXAM_HOST", "  "), ("RUST_LOG", "warn")]))
            .unwrap();
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn rejects_malformed_values() {
        let err = ExamConfig::from_lookup(lookup(&[("EXAM_PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::Port { var: "EXAM_PORT", .. }));

        let err = ExamConfig::from_lookup(lookup(&[("EXAM_POLICY", "shuffle")])).unwrap_err();
        assert!(matches!(err, ConfigError::Policy { .. }));
    }

    #[test]
    fn overrides_apply_on_top() {
        let config = ExamConfig::default()
            .with_bank_dir("bank")
            .with_policy(SelectionPolicy::FixedSequence)
            .with_host("localhost")
            .with_port(9000);
        assert_eq!(config.bind_addr(), "localhost:9000");
        assert_eq!(config.bank_dir, PathBuf::from("bank"));
    }
}
