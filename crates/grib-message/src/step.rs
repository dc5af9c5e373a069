//! Forecast step units (GRIB2 Code Table 4.4).

use chrono::Duration;

use crate::value::KeyValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepUnit {
    Minute,
    Hour,
    Day,
    ThreeHours,
    SixHours,
    TwelveHours,
    Second,
}

impl StepUnit {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Minute),
            1 => Some(Self::Hour),
            2 => Some(Self::Day),
            10 => Some(Self::ThreeHours),
            11 => Some(Self::SixHours),
            12 => Some(Self::TwelveHours),
            13 => Some(Self::Second),
            _ => None,
        }
    }

    /// Parse the abbreviation decoders use for `stepUnits` as text.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "m" => Some(Self::Minute),
            "h" => Some(Self::Hour),
            "D" | "d" => Some(Self::Day),
            "3h" => Some(Self::ThreeHours),
            "6h" => Some(Self::SixHours),
            "12h" => Some(Self::TwelveHours),
            "s" => Some(Self::Second),
            _ => None,
        }
    }

    pub fn from_value(value: &KeyValue) -> Option<Self> {
        match value {
            KeyValue::Text(name) => Self::from_name(name),
            other => other.as_long().and_then(Self::from_code),
        }
    }

    /// Length of `steps` units, or `None` when it overflows.
    pub fn duration(&self, steps: i64) -> Option<Duration> {
        let seconds_per_step = match self {
            Self::Minute => 60,
            Self::Hour => 3_600,
            Self::Day => 86_400,
            Self::ThreeHours => 3 * 3_600,
            Self::SixHours => 6 * 3_600,
            Self::TwelveHours => 12 * 3_600,
            Self::Second => 1,
        };
        steps
            .checked_mul(seconds_per_step)
            .and_then(Duration::try_seconds)
    }

    /// Unit label used in message summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Minute => "mins",
            Self::Hour => "hrs",
            Self::Day => "days",
            Self::ThreeHours => "3 hrs",
            Self::SixHours => "6 hrs",
            Self::TwelveHours => "12 hrs",
            Self::Second => "secs",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_and_names_agree() {
        for (code, name) in [(0, "m"), (1, "h"), (2, "D"), (10, "3h"), (11, "6h"), (12, "12h"), (13, "s")] {
            assert_eq!(StepUnit::from_code(code), StepUnit::from_name(name));
        }
        assert_eq!(StepUnit::from_code(254), None);
    }

    #[test]
    fn test_durations() {
        assert_eq!(StepUnit::SixHours.duration(2), Some(Duration::hours(12)));
        assert_eq!(
            StepUnit::Minute.duration(90),
            Some(Duration::hours(1) + Duration::minutes(30))
        );
        assert_eq!(StepUnit::Day.duration(-1), Some(Duration::days(-1)));
    }

    #[test]
    fn test_duration_overflow() {
        assert_eq!(StepUnit::TwelveHours.duration(i64::MAX / 2), None);
        assert_eq!(StepUnit::Second.duration(i64::MAX), None);
    }

    #[test]
    fn test_from_value() {
        assert_eq!(StepUnit::from_value(&KeyValue::Long(1)), Some(StepUnit::Hour));
        assert_eq!(StepUnit::from_value(&KeyValue::from("D")), Some(StepUnit::Day));
        assert_eq!(StepUnit::from_value(&KeyValue::from(vec![1.0, 2.0])), None);
    }
}
