use crate::chess::MoraleConfig;
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Configuration for a [`Game`][`crate::game::Game`].
#[derive(Debug, Default, Copy, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename = "config", default)]
pub struct GameConfig {
    /// Seeds the random source of the morale check.
    ///
    /// Drawn from system entropy if omitted.
    pub seed: Option<u64>,

    /// Rules for pawn defections.
    pub morale: MoraleConfig,
}

impl fmt::Display for GameConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&ron::ser::to_string(self).map_err(|_| fmt::Error)?)
    }
}

/// The reason why parsing [`GameConfig`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error, From)]
#[display("failed to parse game configuration")]
pub struct ParseGameConfigError(ron::de::SpannedError);

impl FromStr for GameConfig {
    type Err = ParseGameConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ron::de::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    #[proptest]
    fn parsing_printed_config_is_an_identity(seed: Option<u64>) {
        let config = GameConfig {
            seed,
            ..GameConfig::default()
        };

        assert_eq!(config.to_string().parse(), Ok(config));
    }

    #[test]
    fn empty_config_is_the_default() {
        assert_eq!("()".parse(), Ok(GameConfig::default()));
        assert_eq!("config()".parse(), Ok(GameConfig::default()));
    }

    #[test]
    fn config_is_deserializable() {
        assert_eq!(
            "config(seed: Some(7), morale: (threshold: 2.5))".parse(),
            Ok(GameConfig {
                seed: Some(7),
                morale: MoraleConfig {
                    threshold: 2.5,
                    ..MoraleConfig::default()
                },
            })
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!("config(depth: 3)".parse::<GameConfig>().is_err());
    }
}
