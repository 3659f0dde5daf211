use std::env;
use std::time::Duration;

use crate::error::ConfigError;

/// Upper bound on rounds per session.
pub const DEFAULT_TARGET_ROUNDS: usize = 10;

/// Delay between a correct answer and the next round.
pub const DEFAULT_ADVANCE_DELAY: Duration = Duration::from_millis(650);

pub const TARGET_ROUNDS_ENV: &str = "QUIZ_TARGET_ROUNDS";
pub const ADVANCE_DELAY_ENV: &str = "QUIZ_ADVANCE_DELAY_MS";
pub const SHUFFLE_SEED_ENV: &str = "QUIZ_SHUFFLE_SEED";

/// Tunables for the session engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizConfig {
    target_rounds: usize,
    advance_delay: Duration,
    shuffle_seed: Option<u64>,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            target_rounds: DEFAULT_TARGET_ROUNDS,
            advance_delay: DEFAULT_ADVANCE_DELAY,
            shuffle_seed: None,
        }
    }
}

impl QuizConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read overrides from `QUIZ_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if a variable is set but unparsable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading values through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if a value is present but unparsable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup(TARGET_ROUNDS_ENV) {
            let rounds = parse_u64(TARGET_ROUNDS_ENV, &raw)?;
            let rounds = usize::try_from(rounds)
                .ok()
                .filter(|rounds| *rounds > 0)
                .ok_or_else(|| invalid(TARGET_ROUNDS_ENV, &raw))?;
            config.target_rounds = rounds;
        }
        if let Some(raw) = lookup(ADVANCE_DELAY_ENV) {
            config.advance_delay = Duration::from_millis(parse_u64(ADVANCE_DELAY_ENV, &raw)?);
        }
        if let Some(raw) = lookup(SHUFFLE_SEED_ENV) {
            config.shuffle_seed = Some(parse_u64(SHUFFLE_SEED_ENV, &raw)?);
        }

        Ok(config)
    }

    #[must_use]
    pub fn with_target_rounds(mut self, target_rounds: usize) -> Self {
        self.target_rounds = target_rounds;
        self
    }

    #[must_use]
    pub fn with_advance_delay(mut self, advance_delay: Duration) -> Self {
        self.advance_delay = advance_delay;
        self
    }

    /// Fix the shuffle seed so play orders are reproducible.
    #[must_use]
    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }

    #[must_use]
    pub fn target_rounds(&self) -> usize {
        self.target_rounds
    }

    #[must_use]
    pub fn advance_delay(&self) -> Duration {
        self.advance_delay
    }

    #[must_use]
    pub fn shuffle_seed(&self) -> Option<u64> {
        self.shuffle_seed
    }
}

fn invalid(key: &'static str, raw: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: raw.to_string(),
    }
}

fn parse_u64(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|_| invalid(key, raw))
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
    fn defaults_match_reference_behavior() {
        let config = QuizConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.target_rounds(), 10);
        assert_eq!(config.advance_delay(), Duration::from_millis(650));
        assert_eq!(config.shuffle_seed(), None);
    }

    #[test]
    fn reads_overrides() {
        let config = QuizConfig::from_lookup(lookup(&[
            (TARGET_ROUNDS_ENV, "5"),
            (ADVANCE_DELAY_ENV, " 100 "),
            (SHUFFLE_SEED_ENV, "42"),
        ]))
        .unwrap();
        assert_eq!(config.target_rounds(), 5);
        assert_eq!(config.advance_delay(), Duration::from_millis(100));
        assert_eq!(config.shuffle_seed(), Some(42));
    }

    #[test]
    fn rejects_bad_values() {
        let err = QuizConfig::from_lookup(lookup(&[(TARGET_ROUNDS_ENV, "0")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: TARGET_ROUNDS_ENV,
                value: "0".into()
            }
        );
        assert!(QuizConfig::from_lookup(lookup(&[(ADVANCE_DELAY_ENV, "soon")])).is_err());
    }
}
