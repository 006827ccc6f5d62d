//! Protocol service task
//!
//! Consumer side of the receive ring. Runs the frame engine on a fixed
//! tick so frames are applied within one interval of arriving.

use defmt::*;
use embassy_time::Ticker;

use evpanel_core::DefaultEngine;

use crate::channels::{LINK_STATS, RX_RING, SHARED_STATE};
use crate::config::SERVICE_INTERVAL;

/// Service task - drains the ring and applies frames
#[embassy_executor::task]
pub async fn service_task() {
    info!("Service task started");

    let mut engine = DefaultEngine::new(&RX_RING, &SHARED_STATE);
    let mut ticker = Ticker::every(SERVICE_INTERVAL);

    loop {
        ticker.next().await;

        let report = engine.service();
        if report.scan.frames > 0 {
            debug!(
                "{} frames: {} applied, {} unhandled, {} rejected",
                report.scan.frames, report.applied, report.unhandled, report.rejected
            );
        }
        if report.scan.drained > 0 || report.newly_dropped > 0 {
            LINK_STATS.signal(engine.stats());
        }
    }
}
