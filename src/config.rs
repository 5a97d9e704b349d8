//! Runtime configuration from the environment

use crate::runtime::{InstantPacer, Pacer, TimerPacer};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

pub const SEED_VAR: &str = "COCKTAIL_CHAT_SEED";
pub const PACING_VAR: &str = "COCKTAIL_CHAT_PACING";
pub const PACING_SCALE_VAR: &str = "COCKTAIL_CHAT_PACING_SCALE";

#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// Fixed seed for reproducible names and picks; entropy when unset
    pub seed: Option<u64>,
    /// When false the bot answers without conversational pauses
    pub pacing: bool,
    /// Multiplier applied to every pause
    pub pacing_scale: f64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            seed: None,
            pacing: true,
            pacing_scale: 1.0,
        }
    }
}

impl ChatConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source. Unparseable values fall back to the
    /// defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let seed = lookup(SEED_VAR).and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(e) => {
                tracing::warn!(var = SEED_VAR, value = %raw, error = %e, "Ignoring invalid seed");
                None
            }
        });

        let pacing = lookup(PACING_VAR).map_or(defaults.pacing, |raw| {
            !matches!(
                raw.trim().to_lowercase().as_str(),
                "off" | "0" | "false" | "no"
            )
        });

        let pacing_scale = lookup(PACING_SCALE_VAR).map_or(defaults.pacing_scale, |raw| {
            match raw.trim().parse::<f64>() {
                Ok(scale) if scale.is_finite() && scale >= 0.0 => scale,
                _ => {
                    tracing::warn!(
                        var = PACING_SCALE_VAR,
                        value = %raw,
                        "Ignoring invalid pacing scale"
                    );
                    defaults.pacing_scale
                }
            }
        });

        Self {
            seed,
            pacing,
            pacing_scale,
        }
    }

    pub fn pacer(&self) -> Arc<dyn Pacer> {
        if self.pacing {
            Arc::new(TimerPacer::new(self.pacing_scale))
        } else {
            Arc::new(InstantPacer)
        }
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> ChatConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ChatConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(config_from(&[]), ChatConfig::default());
    }

    #[test]
    fn test_reads_all_vars() {
        let config = config_from(&[
            (SEED_VAR, " 42 "),
            (PACING_VAR, "OFF"),
            (PACING_SCALE_VAR, "0.25"),
        ]);
        assert_eq!(config.seed, Some(42));
        assert!(!config.pacing);
        assert!((config.pacing_scale - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[(SEED_VAR, "soon"), (PACING_SCALE_VAR, "-3")]);
        assert_eq!(config.seed, None);
        assert!(config.pacing);
        assert!((config.pacing_scale - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let config = config_from(&[(SEED_VAR, "7")]);
        let a: u64 = config.rng().gen();
        let b: u64 = config.rng().gen();
        assert_eq!(a, b);
    }
}
