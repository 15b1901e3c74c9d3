use chrono::{Local, Timelike};

/// Top-level weather classification reported in `weather[0].main`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Clear,
    Clouds,
    Rain,
    Snow,
    Thunderstorm,
    Other(String),
}

impl Condition {
    pub fn as_str(&self) -> &str {
        match self {
            Condition::Clear => "Clear",
            Condition::Clouds => "Clouds",
            Condition::Rain => "Rain",
            Condition::Snow => "Snow",
            Condition::Thunderstorm => "Thunderstorm",
            Condition::Other(s) => s.as_str(),
        }
    }
}

impl From<&str> for Condition {
    /// Matching is exact: the API always capitalises these names.
    fn from(value: &str) -> Self {
        match value {
            "Clear" => Condition::Clear,
            "Clouds" => Condition::Clouds,
            "Rain" => Condition::Rain,
            "Snow" => Condition::Snow,
            "Thunderstorm" => Condition::Thunderstorm,
            other => Condition::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded result of a single lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub location_name: String,
    pub temperature_c: f64,
    pub condition: Condition,
    pub description: String,
    pub icon_code: String,
}

/// Day or night, derived from the local wall-clock hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayPhase {
    Day,
    Night,
}

impl DayPhase {
    /// Night is `[18, 24) ∪ [0, 6)`.
    pub fn from_hour(hour: u32) -> Self {
        if hour >= 18 || hour < 6 {
            DayPhase::Night
        } else {
            DayPhase::Day
        }
    }

    pub fn is_night(self) -> bool {
        self == DayPhase::Night
    }
}

/// Source of the local hour used to pick the day phase.
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn local_hour(&self) -> u32;

    fn day_phase(&self) -> DayPhase {
        DayPhase::from_hour(self.local_hour())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn local_hour(&self) -> u32 {
        Local::now().hour()
    }
}

/// Always reports the same hour.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u32);

impl Clock for FixedClock {
    fn local_hour(&self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn night_covers_evening_and_early_morning() {
        for hour in (18..24).chain(0..6) {
            assert_eq!(DayPhase::from_hour(hour), DayPhase::Night, "hour {hour}");
        }
        for hour in 6..18 {
            assert_eq!(DayPhase::from_hour(hour), DayPhase::Day, "hour {hour}");
        }
    }

    #[test]
    fn condition_parses_known_and_unknown_names() {
        assert_eq!(Condition::from("Thunderstorm"), Condition::Thunderstorm);
        assert_eq!(Condition::from("Mist"), Condition::Other("Mist".into()));
        assert_eq!(Condition::from("clear"), Condition::Other("clear".into()));
        assert_eq!(Condition::from("Mist").to_string(), "Mist");
    }

    #[test]
    fn fixed_clock_drives_day_phase() {
        assert_eq!(FixedClock(12).day_phase(), DayPhase::Day);
        assert_eq!(FixedClock(18).day_phase(), DayPhase::Night);
    }
}
