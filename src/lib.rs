pub mod audio;
pub mod config;
pub mod schedule;

pub use audio::{AzanLibrary, AzanPlayer, CpalPlayer};
pub use config::AppConfig;
pub use schedule::{AzanScheduler, PrayerName, PrayerTime, Timetable};
