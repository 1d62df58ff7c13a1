use std::{collections::HashMap, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::schedule::prayer::PrayerName;

/// Which audio file each prayer plays.
///
/// Fajr traditionally uses its own azan, so per-prayer overrides come first;
/// anything unmapped falls back to `default_file`. A prayer with neither
/// resolves to nothing and its trigger is skipped with a warning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AzanLibrary {
    #[serde(default)]
    pub default_file: Option<PathBuf>,
    #[serde(default)]
    pub files: HashMap<PrayerName, PathBuf>,
}

impl AzanLibrary {
    pub fn resolve(&self, prayer: PrayerName) -> Option<&PathBuf> {
        self.files.get(&prayer).or(self.default_file.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_beats_default() {
        let mut library = AzanLibrary {
            default_file: Some(PathBuf::from("azan.mp3")),
            files: HashMap::new(),
        };
        library
            .files
            .insert(PrayerName::Fajr, PathBuf::from("azan_fajr.mp3"));

        assert_eq!(
            library.resolve(PrayerName::Fajr),
            Some(&PathBuf::from("azan_fajr.mp3"))
        );
        assert_eq!(
            library.resolve(PrayerName::Isha),
            Some(&PathBuf::from("azan.mp3"))
        );
    }

    #[test]
    fn unmapped_prayer_resolves_to_nothing() {
        let library = AzanLibrary::default();
        assert_eq!(library.resolve(PrayerName::Dhuhr), None);
    }

    #[test]
    fn deserializes_from_config_json() {
        let library: AzanLibrary = serde_json::from_str(
            r#"{
                "default_file": "sounds/azan.mp3",
                "files": { "fajr": "sounds/azan_fajr.mp3" }
            }"#,
        )
        .unwrap();
        assert_eq!(
            library.resolve(PrayerName::Fajr),
            Some(&PathBuf::from("sounds/azan_fajr.mp3"))
        );
        assert_eq!(
            library.resolve(PrayerName::Sunrise),
            Some(&PathBuf::from("sounds/azan.mp3"))
        );
    }
}
