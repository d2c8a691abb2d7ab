use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// A human-writable duration such as `30s`, `500ms` or `5min`.
///
/// Bare integers are read as seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timeframe(Duration);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timeframe {input:?}: {reason}")]
pub struct TimeframeParseError {
    input: String,
    reason: &'static str,
}

impl Timeframe {
    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self(Duration::from_secs(secs))
    }

    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(Duration::from_millis(millis))
    }

    #[must_use]
    pub const fn duration(self) -> Duration {
        self.0
    }

    pub fn parse_str(arg: &str) -> Result<Self, TimeframeParseError> {
        let arg = arg.trim().to_lowercase();
        let err = |reason| TimeframeParseError {
            input: arg.clone(),
            reason,
        };

        let digits_end = arg
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(arg.len());
        let (num, unit) = arg.split_at(digits_end);

        if num.is_empty() {
            return Err(err("no number found"));
        }

        let num = num.parse::<u64>().map_err(|_| err("number is too large"))?;

        let millis_per_unit = match unit.trim() {
            "ms" | "msec" | "msecs" | "millisecond" | "milliseconds" => 1,
            "" | "s" | "sec" | "secs" | "second" | "seconds" => 1000,
            "m" | "min" | "mins" | "minute" | "minutes" => MINUTE * 1000,
            "h" | "hr" | "hrs" | "hour" | "hours" => HOUR * 1000,
            "d" | "day" | "days" => DAY * 1000,
            _ => return Err(err("unknown unit")),
        };

        num.checked_mul(millis_per_unit)
            .map(Self::from_millis)
            .ok_or_else(|| err("duration overflows"))
    }
}

/// Adapter for clap's `value_parser`.
pub fn parse_timeframe(arg: &str) -> Result<Timeframe, TimeframeParseError> {
    Timeframe::parse_str(arg)
}

impl FromStr for Timeframe {
    type Err = TimeframeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let millis = self.0.as_millis();
        if millis % 1000 != 0 {
            return write!(f, "{millis}ms");
        }

        let secs = self.0.as_secs();
        match secs {
            0 => write!(f, "0s"),
            s if s % DAY == 0 => write!(f, "{}d", s / DAY),
            s if s % HOUR == 0 => write!(f, "{}h", s / HOUR),
            s if s % MINUTE == 0 => write!(f, "{}min", s / MINUTE),
            s => write!(f, "{s}s"),
        }
    }
}

impl From<Timeframe> for Duration {
    fn from(value: Timeframe) -> Self {
        value.0
    }
}

impl From<Duration> for Timeframe {
    fn from(value: Duration) -> Self {
        Self(value)
    }
}

impl Serialize for Timeframe {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timeframe {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_units() {
        assert_eq!(Timeframe::parse_str("30s"), Ok(Timeframe::from_secs(30)));
        assert_eq!(Timeframe::parse_str("30"), Ok(Timeframe::from_secs(30)));
        assert_eq!(Timeframe::parse_str(" 5 MIN "), Ok(Timeframe::from_secs(300)));
        assert_eq!(Timeframe::parse_str("250ms"), Ok(Timeframe::from_millis(250)));
        assert_eq!(Timeframe::parse_str("2h"), Ok(Timeframe::from_secs(7200)));
        assert_eq!(Timeframe::parse_str("1day"), Ok(Timeframe::from_secs(86_400)));
    }

    #[test]
    fn rejects_garbage() {
        assert!(Timeframe::parse_str("").is_err());
        assert!(Timeframe::parse_str("s").is_err());
        assert!(Timeframe::parse_str("10 fortnights").is_err());
        assert!(Timeframe::parse_str("99999999999999999999s").is_err());
    }

    #[test]
    fn display_uses_largest_exact_unit() {
        assert_eq!(Timeframe::from_secs(30).to_string(), "30s");
        assert_eq!(Timeframe::from_secs(300).to_string(), "5min");
        assert_eq!(Timeframe::from_secs(7200).to_string(), "2h");
        assert_eq!(Timeframe::from_millis(1500).to_string(), "1500ms");
    }

    #[test]
    fn display_output_parses_back() {
        for secs in [1, 59, 60, 90, 3600, 86_400] {
            let tf = Timeframe::from_secs(secs);
            assert_eq!(tf.to_string().parse::<Timeframe>(), Ok(tf));
        }
    }
}
