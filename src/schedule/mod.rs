/// `schedule/` — prayer times and the azan scheduler.
///
/// `prayer` and `timetable` are pure: names, wall-clock times, and the
/// current/next/passed classification. `scheduler` owns the side effects —
/// the single armed wake-up and the single active playback.
pub mod prayer;
pub mod scheduler;
pub mod timetable;

pub use prayer::{PrayerName, PrayerTime};
pub use scheduler::AzanScheduler;
pub use timetable::Timetable;
