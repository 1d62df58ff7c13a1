use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

// ── Prayer names ──────────────────────────────────────────────────────────────

/// The six daily timetable entries. Sunrise is informational rather than a
/// liturgical prayer, but it is carried uniformly — whether it gets an audio
/// cue is purely a question of what the library maps it to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrayerName {
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerName {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fajr" => Some(Self::Fajr),
            "sunrise" => Some(Self::Sunrise),
            "dhuhr" => Some(Self::Dhuhr),
            "asr" => Some(Self::Asr),
            "maghrib" => Some(Self::Maghrib),
            "isha" => Some(Self::Isha),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fajr => "fajr",
            Self::Sunrise => "sunrise",
            Self::Dhuhr => "dhuhr",
            Self::Asr => "asr",
            Self::Maghrib => "maghrib",
            Self::Isha => "isha",
        }
    }
}

impl std::fmt::Display for PrayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Prayer times ──────────────────────────────────────────────────────────────

/// A named wall-clock time, interpreted against the current calendar day in
/// the local timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerTime {
    pub name: PrayerName,
    pub time: NaiveTime,
}

impl PrayerTime {
    pub fn new(name: PrayerName, time: NaiveTime) -> Self {
        Self { name, time }
    }
}

/// Parse `"5:15 AM"` / `"05:15 PM"` / 24-hour `"17:30"` into a time of day.
pub fn parse_time_of_day(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%I:%M %p")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn parses_twelve_hour_clock() {
        assert_eq!(parse_time_of_day("5:15 AM"), Some(t(5, 15)));
        assert_eq!(parse_time_of_day("12:30 PM"), Some(t(12, 30)));
        assert_eq!(parse_time_of_day("12:05 AM"), Some(t(0, 5)));
        assert_eq!(parse_time_of_day(" 6:45 pm "), Some(t(18, 45)));
    }

    #[test]
    fn parses_twenty_four_hour_clock() {
        assert_eq!(parse_time_of_day("05:15"), Some(t(5, 15)));
        assert_eq!(parse_time_of_day("19:45"), Some(t(19, 45)));
        assert_eq!(
            parse_time_of_day("19:45:30"),
            NaiveTime::from_hms_opt(19, 45, 30)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_time_of_day(""), None);
        assert_eq!(parse_time_of_day("half past five"), None);
        assert_eq!(parse_time_of_day("25:00"), None);
    }

    #[test]
    fn name_round_trips_through_strings() {
        for name in [
            PrayerName::Fajr,
            PrayerName::Sunrise,
            PrayerName::Dhuhr,
            PrayerName::Asr,
            PrayerName::Maghrib,
            PrayerName::Isha,
        ] {
            assert_eq!(PrayerName::from_str(name.as_str()), Some(name));
        }
        assert_eq!(PrayerName::from_str("Maghrib"), Some(PrayerName::Maghrib));
        assert_eq!(PrayerName::from_str("tahajjud"), None);
    }
}
