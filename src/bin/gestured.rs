//! gestured - gesture recognition daemon
//!
//! This daemon:
//! 1. Loads settings from `GESTURE_CONFIG` and `GESTURE_*` overrides
//! 2. Reads body frames from the configured source (synthetic or recording)
//! 3. Runs every frame through the people table
//! 4. Logs each delivered gesture until Ctrl-C or the end of a recording

use anyhow::{anyhow, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use gesture_kernel::{FrameSource, GestureConfig, PersonTable};

const HEALTH_LOG_INTERVAL: Duration = Duration::from_secs(5);

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = GestureConfig::load()?;
    let mut people = PersonTable::new(config.settings.clone())?;
    let mut source = FrameSource::open(&config.source)?;
    source.connect()?;

    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = running.clone();
    ctrlc::set_handler(move || handler_flag.store(false, Ordering::SeqCst))
        .map_err(|e| anyhow!("failed to set Ctrl-C handler: {}", e))?;

    let frame_interval = config.source.frame_interval();
    log::info!(
        "gestured running: source={} fps={} max_players={} cooldown={}ms gestures={}",
        config.source.uri,
        config.source.target_fps,
        config.settings.max_players,
        config.settings.cooldown.as_millis(),
        config.settings.gestures.len()
    );

    let mut last_health_log = Instant::now();
    let mut event_count = 0u64;

    while running.load(Ordering::SeqCst) {
        let tick = Instant::now();

        let Some(frame) = source.next_frame()? else {
            log::info!("source exhausted");
            break;
        };
        let timestamp = frame.timestamp;
        for event in people.process_frame(frame) {
            event_count += 1;
            log::info!(
                "gesture #{}: {} body={} at={}ms",
                event_count,
                event.gesture,
                event.tracking_id,
                timestamp.as_millis()
            );
        }

        if last_health_log.elapsed() >= HEALTH_LOG_INTERVAL {
            let stats = source.stats();
            log::info!(
                "source health={} frames={} uri={} people={:?}",
                source.is_healthy(),
                stats.frames_delivered,
                stats.uri,
                people.tracking_ids()
            );
            last_health_log = Instant::now();
        }

        if let Some(remaining) = frame_interval.checked_sub(tick.elapsed()) {
            std::thread::sleep(remaining);
        }
    }

    log::info!(
        "gestured stopped after {} frames, {} gestures",
        source.stats().frames_delivered,
        event_count
    );
    Ok(())
}
