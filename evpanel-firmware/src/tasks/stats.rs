//! Link diagnostics task

use defmt::*;
use embassy_time::Ticker;

use crate::channels::{LINK_STATS, SHARED_STATE};
use crate::config::STATS_INTERVAL;

/// Stats task - periodically logs link counters and the current readings
#[embassy_executor::task]
pub async fn stats_task() {
    let mut ticker = Ticker::every(STATS_INTERVAL);

    loop {
        ticker.next().await;

        let Some(stats) = LINK_STATS.try_take() else {
            trace!("No link activity");
            continue;
        };

        if stats.is_clean() {
            info!("Link: {} frames applied", stats.dispatch.applied);
        } else {
            warn!("Link: {} noise events, {:?}", stats.noise_events(), stats);
        }

        let (state, updates) = SHARED_STATE.running_state_versioned();
        if state.charge_status.is_charging() {
            info!("Charging: {} W at {} A", state.power, state.current);
        }
        debug!("Running state #{}: {:?}", updates, state);
    }
}
