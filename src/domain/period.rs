use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::ConfigError;
use crate::utils::TimeUtils;

/// Candle bucket width. The string form is the shorthand used on the command
/// line and in series file names (e.g. `15m`, `1d`).
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    Hash,
    Eq,
    PartialEq,
    EnumString,
    Display,
    EnumIter,
    IntoStaticStr,
)]
pub enum Period {
    #[strum(serialize = "1m")]
    Minute1,
    #[strum(serialize = "3m")]
    Minute3,
    #[strum(serialize = "5m")]
    Minute5,
    #[strum(serialize = "15m")]
    Minute15,
    #[strum(serialize = "30m")]
    Minute30,
    #[strum(serialize = "1h")]
    Hour1,
    #[strum(serialize = "2h")]
    Hour2,
    #[strum(serialize = "4h")]
    Hour4,
    #[strum(serialize = "6h")]
    Hour6,
    #[strum(serialize = "12h")]
    Hour12,
    #[strum(serialize = "1d")]
    Day1,
    #[strum(serialize = "3d")]
    Day3,
    #[strum(serialize = "1w")]
    Week1,
}

impl Period {
    pub fn seconds(self) -> u32 {
        match self {
            Period::Minute1 => TimeUtils::S_IN_MIN,
            Period::Minute3 => TimeUtils::S_IN_3_MIN,
            Period::Minute5 => TimeUtils::S_IN_5_MIN,
            Period::Minute15 => TimeUtils::S_IN_15_MIN,
            Period::Minute30 => TimeUtils::S_IN_30_MIN,
            Period::Hour1 => TimeUtils::S_IN_H,
            Period::Hour2 => TimeUtils::S_IN_2_H,
            Period::Hour4 => TimeUtils::S_IN_4_H,
            Period::Hour6 => TimeUtils::S_IN_6_H,
            Period::Hour12 => TimeUtils::S_IN_12_H,
            Period::Day1 => TimeUtils::S_IN_D,
            Period::Day3 => TimeUtils::S_IN_3_D,
            Period::Week1 => TimeUtils::S_IN_W,
        }
    }

    pub fn code(self) -> &'static str {
        self.into()
    }

    // Parse a CLI-style code, returning Err rather than panicking on unknown input.
    pub fn from_code(code: &str) -> Result<Self, ConfigError> {
        Period::from_str(code).map_err(|_| ConfigError::UnknownPeriod {
            code: code.to_string(),
            supported: Self::supported_codes(),
        })
    }

    pub fn from_seconds(seconds: u32) -> Option<Self> {
        Period::iter().find(|p| p.seconds() == seconds)
    }

    pub fn supported_codes() -> String {
        Period::iter()
            .map(Period::code)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_map_to_expected_seconds() {
        let expected = [
            ("1m", 60),
            ("3m", 180),
            ("5m", 300),
            ("15m", 900),
            ("30m", 1800),
            ("1h", 3600),
            ("2h", 7200),
            ("4h", 14400),
            ("6h", 21600),
            ("12h", 43200),
            ("1d", 86400),
            ("3d", 259200),
            ("1w", 604800),
        ];
        assert_eq!(Period::iter().count(), expected.len());
        for (code, secs) in expected {
            let period = Period::from_code(code).unwrap();
            assert_eq!(period.seconds(), secs, "{}", code);
            assert_eq!(period.to_string(), code);
            assert_eq!(Period::from_seconds(secs), Some(period));
        }
    }

    #[test]
    fn unknown_code_is_a_config_error() {
        let err = Period::from_code("7h").unwrap_err();
        match err {
            ConfigError::UnknownPeriod { code, supported } => {
                assert_eq!(code, "7h");
                assert!(supported.starts_with("1m, 3m"));
                assert!(supported.ends_with("1w"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(Period::from_code("").is_err());
        assert!(Period::from_code("1H").is_err());
        assert_eq!(Period::from_seconds(61), None);
    }
}
