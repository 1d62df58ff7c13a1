use chrono::NaiveTime;
use serde::Serialize;

use super::prayer::PrayerTime;

// ── Classification ────────────────────────────────────────────────────────────

/// Where one timetable entry stands relative to the present moment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PrayerStatus {
    /// The entry's time has been reached (`time <= now`).
    pub is_past: bool,
    /// Earliest entry strictly after `now`. At most one entry carries this.
    pub is_next: bool,
    /// Latest entry already reached — the active period the day is in.
    pub is_current: bool,
}

// ── Timetable ─────────────────────────────────────────────────────────────────

/// A single day's prayer times, in the order the caller supplied them.
///
/// Chronological ordering is the caller's contract. The timetable records
/// whether the sequence it was handed actually ascends, and an out-of-order
/// sequence is tolerated: classification still answers positionally, but the
/// scheduler will refuse to arm a timer from it.
#[derive(Debug, Clone)]
pub struct Timetable {
    entries: Vec<PrayerTime>,
    ordered: bool,
}

impl Default for Timetable {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Timetable {
    pub fn new(entries: Vec<PrayerTime>) -> Self {
        let ordered = entries.windows(2).all(|w| w[0].time <= w[1].time);
        Self { entries, ordered }
    }

    pub fn entries(&self) -> &[PrayerTime] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the entries ascend chronologically. Always true when empty.
    pub fn is_ordered(&self) -> bool {
        self.ordered
    }

    /// Index of the earliest entry strictly after `now`, scanning in list
    /// order. `None` once every time today has passed.
    pub fn next_index(&self, now: NaiveTime) -> Option<usize> {
        self.entries.iter().position(|p| p.time > now)
    }

    /// Index of the latest entry already reached — after Dhuhr passes and
    /// before Asr arrives, Dhuhr is current. `None` before the first entry.
    pub fn current_index(&self, now: NaiveTime) -> Option<usize> {
        self.entries.iter().rposition(|p| p.time <= now)
    }

    pub fn status_at(&self, index: usize, now: NaiveTime) -> PrayerStatus {
        PrayerStatus {
            is_past: self.entries[index].time <= now,
            is_next: self.next_index(now) == Some(index),
            is_current: self.current_index(now) == Some(index),
        }
    }

    /// Every entry paired with its classification at `now`.
    pub fn statuses(&self, now: NaiveTime) -> Vec<(PrayerTime, PrayerStatus)> {
        (0..self.entries.len())
            .map(|i| (self.entries[i], self.status_at(i, now)))
            .collect()
    }

    /// Percentage of the active period elapsed, clamped to 0–100.
    ///
    /// Defined only between two entries: `None` before the first prayer of
    /// the day and after the last one.
    pub fn progress_percent(&self, now: NaiveTime) -> Option<f64> {
        let current = self.entries[self.current_index(now)?];
        let next = self.entries[self.next_index(now)?];
        let span = (next.time - current.time).num_seconds();
        if span <= 0 {
            return None;
        }
        let elapsed = (now - current.time).num_seconds();
        Some((elapsed as f64 / span as f64 * 100.0).clamp(0.0, 100.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::prayer::PrayerName;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn day() -> Timetable {
        Timetable::new(vec![
            PrayerTime::new(PrayerName::Fajr, t(5, 15)),
            PrayerTime::new(PrayerName::Dhuhr, t(12, 30)),
            PrayerTime::new(PrayerName::Asr, t(15, 45)),
            PrayerTime::new(PrayerName::Maghrib, t(18, 15)),
            PrayerTime::new(PrayerName::Isha, t(19, 45)),
        ])
    }

    #[test]
    fn midafternoon_classification() {
        // 14:00 sits between Dhuhr and Asr.
        let tt = day();
        let now = t(14, 0);

        assert_eq!(tt.entries()[tt.current_index(now).unwrap()].name, PrayerName::Dhuhr);
        assert_eq!(tt.entries()[tt.next_index(now).unwrap()].name, PrayerName::Asr);

        let progress = tt.progress_percent(now).unwrap();
        assert!((progress - 46.2).abs() < 0.1, "got {progress}");
    }

    #[test]
    fn before_first_prayer_has_no_current() {
        let tt = day();
        let now = t(4, 0);

        assert_eq!(tt.current_index(now), None);
        assert_eq!(tt.entries()[tt.next_index(now).unwrap()].name, PrayerName::Fajr);
        assert_eq!(tt.progress_percent(now), None);
    }

    #[test]
    fn after_last_prayer_has_no_next() {
        let tt = day();
        let now = t(20, 0);

        assert_eq!(tt.next_index(now), None);
        assert_eq!(tt.entries()[tt.current_index(now).unwrap()].name, PrayerName::Isha);
        assert_eq!(tt.progress_percent(now), None);
    }

    #[test]
    fn at_most_one_next_and_one_current() {
        let tt = day();
        for minutes in (0..24 * 60).step_by(7) {
            let now = t(minutes as u32 / 60, minutes as u32 % 60);
            let statuses = tt.statuses(now);
            let next = statuses.iter().filter(|(_, s)| s.is_next).count();
            let current = statuses.iter().filter(|(_, s)| s.is_current).count();
            assert!(next <= 1, "{next} next entries at {now}");
            assert!(current <= 1, "{current} current entries at {now}");
        }
    }

    #[test]
    fn next_is_the_earliest_future_entry() {
        let tt = day();
        let now = t(12, 30); // exactly Dhuhr: Dhuhr is past, Asr is next
        let statuses = tt.statuses(now);
        assert!(statuses[1].1.is_past);
        assert!(statuses[1].1.is_current);
        assert!(statuses[2].1.is_next);
    }

    #[test]
    fn progress_is_clamped() {
        let tt = day();
        assert_eq!(tt.progress_percent(t(12, 30)), Some(0.0));
        let nearly = tt.progress_percent(t(15, 44)).unwrap();
        assert!(nearly > 99.0 && nearly <= 100.0);
    }

    #[test]
    fn out_of_order_entries_are_recorded_not_repaired() {
        let tt = Timetable::new(vec![
            PrayerTime::new(PrayerName::Dhuhr, t(12, 30)),
            PrayerTime::new(PrayerName::Fajr, t(5, 15)),
        ]);
        assert!(!tt.is_ordered());
        assert_eq!(tt.entries()[0].name, PrayerName::Dhuhr);
    }

    #[test]
    fn empty_timetable_is_neutral() {
        let tt = Timetable::new(Vec::new());
        assert!(tt.is_ordered());
        assert_eq!(tt.next_index(t(12, 0)), None);
        assert_eq!(tt.current_index(t(12, 0)), None);
        assert_eq!(tt.progress_percent(t(12, 0)), None);
        assert!(tt.statuses(t(12, 0)).is_empty());
    }
}
