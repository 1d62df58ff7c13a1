use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;
use tokio::task::JoinHandle;

use crate::audio::player::AzanPlayer;

use super::{prayer::PrayerName, timetable::Timetable};

// ── Clock ─────────────────────────────────────────────────────────────────────

/// Wall-clock source, injectable so scheduler tests can run on a fake.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

// ── Status snapshot ───────────────────────────────────────────────────────────

/// Per-prayer classification, serialisable for an embedding frontend.
#[derive(Debug, Clone, Serialize)]
pub struct PrayerStatusEvent {
    pub prayer: PrayerName,
    /// "HH:MM" local time
    pub time: String,
    pub is_past: bool,
    pub is_next: bool,
    pub is_current: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleSnapshot {
    pub prayers: Vec<PrayerStatusEvent>,
    /// Elapsed share of the active period, 0–100. Absent outside one.
    pub progress_pct: Option<f64>,
    pub active: Option<PrayerName>,
    pub paused: bool,
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

struct Inner {
    clock: Arc<dyn Clock>,
    player: Arc<dyn AzanPlayer>,
    timetable: Timetable,
    /// The single outstanding wake-up. Replaced, never stacked.
    pending: Option<JoinHandle<()>>,
    /// Bumped on every cancel/re-arm. A firing whose generation no longer
    /// matches was superseded and must not act.
    generation: u64,
    /// The at-most-one active playback, by the prayer that started it.
    active: Option<PrayerName>,
    paused: bool,
}

/// The azan scheduler.
///
/// Holds an always-accurate "next prayer" pointer over one day's timetable
/// and triggers exactly one playback as each prayer time arrives. There is
/// no polling loop: a single Tokio task sleeps until the next prayer, and
/// each firing re-arms exactly one future firing. Manual play controls go
/// through the same exclusive playback gate as the automatic trigger.
///
/// Cloning hands out another handle to the same scheduler. When the last
/// handle drops, the armed timer is cancelled and playback stops.
#[derive(Clone)]
pub struct AzanScheduler {
    inner: Arc<Mutex<Inner>>,
}

impl AzanScheduler {
    pub fn new(player: Arc<dyn AzanPlayer>) -> Self {
        Self::with_clock(player, Arc::new(SystemClock))
    }

    pub fn with_clock(player: Arc<dyn AzanPlayer>, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                clock,
                player,
                timetable: Timetable::default(),
                pending: None,
                generation: 0,
                active: None,
                paused: false,
            })),
        }
    }

    /// Replace the timetable and arm the timer for the next prayer,
    /// cancelling any previously armed timer first.
    ///
    /// Entries must ascend chronologically; an empty or out-of-order list is
    /// tolerated and simply arms nothing. Must be called inside a Tokio
    /// runtime. Once the last prayer of the day has fired the scheduler goes
    /// idle — supplying the next day's list is the caller's job.
    pub fn initialize(&self, timetable: Timetable) {
        let mut inner = self.inner.lock().unwrap();
        inner.timetable = timetable;
        Self::arm_next(&self.inner, &mut inner);
    }

    /// Manual play button for one prayer.
    ///
    /// Pressing the already-active prayer toggles pause/resume instead of
    /// restarting from the beginning; anything else stops the current
    /// playback before starting the new one.
    pub fn play_manually(&self, prayer: PrayerName) {
        let mut inner = self.inner.lock().unwrap();
        if inner.active == Some(prayer) {
            Self::toggle(&mut inner);
        } else {
            Self::start_playback(&mut inner, prayer);
        }
    }

    /// Pause if playing, resume if paused; no-op when nothing is active.
    pub fn toggle_play_pause(&self) {
        let mut inner = self.inner.lock().unwrap();
        Self::toggle(&mut inner);
    }

    /// Stop playback and cancel the armed timer.
    pub fn shutdown(&self) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(handle) = inner.pending.take() {
            handle.abort();
        }
        inner.generation += 1;
        inner.player.stop();
        inner.active = None;
        inner.paused = false;
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn active_playback(&self) -> Option<PrayerName> {
        self.inner.lock().unwrap().active
    }

    pub fn is_paused(&self) -> bool {
        self.inner.lock().unwrap().paused
    }

    /// Whether a wake-up is currently armed and has not fired yet.
    pub fn has_pending_timer(&self) -> bool {
        self.inner
            .lock()
            .unwrap()
            .pending
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    /// Classification of every timetable entry at this instant, plus the
    /// progress through the active period.
    pub fn snapshot(&self) -> ScheduleSnapshot {
        let inner = self.inner.lock().unwrap();
        let now = inner.clock.now().time();
        ScheduleSnapshot {
            prayers: inner
                .timetable
                .statuses(now)
                .into_iter()
                .map(|(entry, status)| PrayerStatusEvent {
                    prayer: entry.name,
                    time: entry.time.format("%H:%M").to_string(),
                    is_past: status.is_past,
                    is_next: status.is_next,
                    is_current: status.is_current,
                })
                .collect(),
            progress_pct: inner.timetable.progress_percent(now),
            active: inner.active,
            paused: inner.paused,
        }
    }

    // ── Scheduling loop ───────────────────────────────────────────────────

    /// Cancel-then-arm: replace the pending wake-up with one targeting the
    /// earliest entry strictly after now.
    fn arm_next(inner_arc: &Arc<Mutex<Inner>>, inner: &mut Inner) {
        if let Some(handle) = inner.pending.take() {
            handle.abort();
        }
        inner.generation += 1;

        if !inner.timetable.is_ordered() {
            // Malformed input is tolerated; it just never schedules.
            log::warn!("timetable entries out of order; azan timer not armed");
            return;
        }

        let now = inner.clock.now();
        let Some(index) = inner.timetable.next_index(now.time()) else {
            if !inner.timetable.is_empty() {
                log::info!("all prayers for today have passed; scheduler idle");
            }
            return;
        };
        let entry = inner.timetable.entries()[index];

        let fire_at = Local
            .from_local_datetime(&now.date_naive().and_time(entry.time))
            .single()
            .unwrap_or(now);
        let delay = (fire_at - now).to_std().unwrap_or_default();

        let generation = inner.generation;
        let weak = Arc::downgrade(inner_arc);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner_arc) = weak.upgrade() {
                Self::timer_fired(&inner_arc, generation, entry.name);
            }
        });
        inner.pending = Some(handle);

        log::info!(
            "azan for {} armed, fires in {}s",
            entry.name,
            delay.as_secs()
        );
    }

    /// Timer re-entry point: play the prayer whose time arrived, then re-arm
    /// for the following entry. A superseded firing (newer arm since this
    /// one) is dropped here; `abort` normally catches it first.
    fn timer_fired(inner_arc: &Arc<Mutex<Inner>>, generation: u64, prayer: PrayerName) {
        let mut inner = inner_arc.lock().unwrap();
        if generation != inner.generation {
            log::debug!("stale azan timer for {prayer} ignored");
            return;
        }
        Self::start_playback(&mut inner, prayer);
        Self::arm_next(inner_arc, &mut inner);
    }

    /// The exclusive playback gate: stop whatever plays, then start `prayer`.
    /// A failed start is best-effort — logged, active playback left unset.
    fn start_playback(inner: &mut Inner, prayer: PrayerName) {
        inner.player.stop();
        inner.paused = false;
        match inner.player.play(prayer) {
            Ok(()) => {
                inner.active = Some(prayer);
                log::info!("azan playing for {prayer}");
            }
            Err(e) => {
                inner.active = None;
                log::warn!("azan playback for {prayer} unavailable: {e}");
            }
        }
    }

    fn toggle(inner: &mut Inner) {
        if inner.active.is_none() {
            return;
        }
        if inner.paused {
            inner.player.resume();
            inner.paused = false;
        } else {
            inner.player.pause();
            inner.paused = true;
        }
    }
}

// The timer task holds only a Weak reference, so dropping the last external
// handle reaches this and tears the timer and playback down.
impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        self.player.stop();
    }
}
