use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::audio::library::AzanLibrary;
use crate::schedule::prayer::{parse_time_of_day, PrayerName, PrayerTime};
use crate::schedule::timetable::Timetable;

/// One configured prayer time, as written in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableEntry {
    pub name: String,
    /// "H:MM AM/PM" or 24-hour "HH:MM"
    pub time: String,
}

/// Daemon configuration, loaded from a JSON file.
///
/// The timetable is one day's worth of wall-clock times — where it comes
/// from (a prayer-time calculation service, a masjid website) is the
/// operator's concern; the daemon only consumes the result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Display name of the masjid this schedule belongs to.
    #[serde(default = "default_masjid")]
    pub masjid: String,
    /// Master playback gain, 0.0 – 1.0.
    #[serde(default = "default_volume")]
    pub volume: f32,
    #[serde(default)]
    pub audio: AzanLibrary,
    #[serde(default)]
    pub timetable: Vec<TimetableEntry>,
}

fn default_masjid() -> String {
    "Local Masjid".to_string()
}

fn default_volume() -> f32 {
    1.0
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            masjid: default_masjid(),
            volume: default_volume(),
            audio: AzanLibrary::default(),
            timetable: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, String> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read {}: {e}", path.display()))?;
        serde_json::from_str(&raw).map_err(|e| format!("Invalid config: {e}"))
    }

    /// Convert the configured entries into a day timetable.
    ///
    /// Entries with an unknown prayer name or an unparseable time are
    /// skipped with a warning, matching the tolerant input policy — a bad
    /// line costs one azan, not the daemon.
    pub fn timetable(&self) -> Timetable {
        let mut entries = Vec::new();
        for entry in &self.timetable {
            let name = PrayerName::from_str(&entry.name);
            let time = parse_time_of_day(&entry.time);
            match (name, time) {
                (Some(name), Some(time)) => entries.push(PrayerTime::new(name, time)),
                _ => log::warn!(
                    "skipping unrecognised timetable entry: {} @ {}",
                    entry.name,
                    entry.time
                ),
            }
        }
        Timetable::new(entries)
    }
}
