use std::{path::PathBuf, sync::Arc, time::Duration};

use chrono::{Local, TimeZone};

use muezzin::{audio::CpalPlayer, config::AppConfig, schedule::AzanScheduler};

/// Muezzin daemon: load the day's timetable, arm the azan scheduler, and
/// re-arm it after each local midnight. The scheduler itself never rolls
/// the day over — that is this caller's job.
#[tokio::main]
async fn main() {
    env_logger::init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("muezzin.json"));

    let config = AppConfig::load(&config_path).expect("Failed to load configuration");
    let timetable = config.timetable();
    log::info!(
        "{}: {} prayer times loaded from {}",
        config.masjid,
        timetable.len(),
        config_path.display()
    );

    let player =
        Arc::new(CpalPlayer::new(config.audio.clone(), config.volume)
            .expect("Failed to initialise audio output"));

    let scheduler = AzanScheduler::new(player);
    scheduler.initialize(timetable.clone());
    log_upcoming(&scheduler);

    loop {
        tokio::time::sleep(until_next_midnight()).await;
        log::info!("new day; re-arming azan schedule for {}", config.masjid);
        scheduler.initialize(timetable.clone());
        log_upcoming(&scheduler);
    }
}

fn log_upcoming(scheduler: &AzanScheduler) {
    let snapshot = scheduler.snapshot();
    match snapshot.prayers.iter().find(|p| p.is_next) {
        Some(next) => log::info!("next prayer: {} at {}", next.prayer, next.time),
        None => log::info!("no prayers remaining today"),
    }
}

/// Sleep target shortly past local midnight; the few-second margin keeps the
/// re-arm clear of the date boundary.
fn until_next_midnight() -> Duration {
    let now = Local::now();
    let next_day = now.date_naive() + chrono::Duration::days(1);
    let wake = next_day
        .and_hms_opt(0, 0, 5)
        .unwrap_or_else(|| next_day.and_time(chrono::NaiveTime::MIN));
    let wake = Local.from_local_datetime(&wake).single().unwrap_or(now);
    (wake - now)
        .to_std()
        .unwrap_or_default()
        .max(Duration::from_secs(60))
}
