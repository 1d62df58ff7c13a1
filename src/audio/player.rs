use crate::schedule::prayer::PrayerName;

/// The playback capability the scheduler drives.
///
/// The scheduler is the only owner of this handle and guarantees
/// stop-before-start, so implementations never see two overlapping plays.
/// A failed `play` (missing file, blocked output) is reported as `Err` and
/// treated upstream as best-effort: logged, never surfaced to the user.
pub trait AzanPlayer: Send + Sync {
    /// Start the azan for `prayer` from the beginning.
    fn play(&self, prayer: PrayerName) -> Result<(), String>;

    fn pause(&self);

    fn resume(&self);

    fn stop(&self);
}
