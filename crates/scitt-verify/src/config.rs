//! Verifier configuration.
//!
//! Defaults favour throughput: receipts are verified in parallel when the
//! `parallel` feature is compiled in. Override via environment variables or
//! explicit construction.

/// Environment variable controlling parallel receipt verification.
pub const PARALLEL_ENV: &str = "SCITT_VERIFY_PARALLEL";

/// Configuration for a [`crate::Verifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifierConfig {
    /// Fan out across receipts with rayon. Ignored without the `parallel`
    /// feature.
    pub parallel: bool,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            parallel: cfg!(feature = "parallel"),
        }
    }
}

impl VerifierConfig {
    /// Sequential verification, stopping at the first failing receipt.
    pub fn sequential() -> Self {
        Self { parallel: false }
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `SCITT_VERIFY_PARALLEL` (`1`/`true`/`yes` or `0`/`false`/`no`;
    ///   default: enabled when built with `parallel`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(raw) = lookup(PARALLEL_ENV) {
            config.parallel = parse_bool(PARALLEL_ENV, &raw)?;
        }
        Ok(config)
    }
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue(var.to_string(), raw.to_string())),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1:?}")]
    InvalidValue(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(value: Option<&'static str>) -> impl Fn(&str) -> Option<String> {
        move |var: &str| {
            assert_eq!(var, PARALLEL_ENV);
            value.map(str::to_string)
        }
    }

    #[test]
    fn unset_uses_default() {
        assert_eq!(
            VerifierConfig::from_lookup(env(None)).unwrap(),
            VerifierConfig::default()
        );
    }

    #[test]
    fn accepts_boolean_spellings() {
        for raw in ["1", "true", "YES", " yes "] {
            assert!(VerifierConfig::from_lookup(env(Some(raw))).unwrap().parallel);
        }
        for raw in ["0", "false", "No"] {
            assert!(!VerifierConfig::from_lookup(env(Some(raw))).unwrap().parallel);
        }
    }

    #[test]
    fn rejects_garbage() {
        let err = VerifierConfig::from_lookup(env(Some("sometimes"))).unwrap_err();
        assert!(err.to_string().contains(PARALLEL_ENV));
    }

    #[test]
    fn sequential_disables_fan_out() {
        assert!(!VerifierConfig::sequential().parallel);
    }
}
