//! Completion markers: the only synchronization between stages.
//!
//! A producer writes its marker as the very last step (atomically, after
//! every other output is durable). A consumer polls for the marker path at a
//! fixed interval and blocks until it appears. There is no timeout: if the
//! producer dies before signalling, the consumer waits forever.

use std::path::Path;
use std::thread;
use std::time::Duration;

use serde::Serialize;
use tracing::info;

use crate::error::{PipelineError, Result};
use crate::utils::write_json_atomic;

/// Source of delay between probes, injectable for tests.
pub trait Clock {
    fn sleep(&self, interval: Duration);
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&self, interval: Duration) {
        thread::sleep(interval);
    }
}

/// Blocks until an external milestone is reached.
pub trait MarkerWatch {
    /// Returns the number of unsuccessful probes before the marker appeared.
    fn wait_for(&self, marker: &Path) -> Result<u64>;
}

pub struct PollingWatch<C: Clock> {
    interval: Duration,
    clock: C,
}

impl PollingWatch<SystemClock> {
    pub fn new(interval: Duration) -> Self {
        PollingWatch {
            interval,
            clock: SystemClock,
        }
    }
}

impl<C: Clock> PollingWatch<C> {
    pub fn with_clock(interval: Duration, clock: C) -> Self {
        PollingWatch { interval, clock }
    }
}

impl<C: Clock> MarkerWatch for PollingWatch<C> {
    fn wait_for(&self, marker: &Path) -> Result<u64> {
        let mut misses = 0u64;
        // A stat failure other than "not found" is fatal, not a wait.
        while !marker
            .try_exists()
            .map_err(|e| PipelineError::io(marker, e))?
        {
            info!(marker = %marker.display(), "Waiting for marker");
            misses += 1;
            self.clock.sleep(self.interval);
        }
        info!(marker = %marker.display(), probes = misses + 1, "Marker observed");
        Ok(misses)
    }
}

/// Signal completion. Must be the producer's last action.
pub fn write_marker<T: Serialize>(marker: &Path, payload: &T) -> Result<()> {
    write_json_atomic(marker, payload)?;
    info!(marker = %marker.display(), "Marker written");
    Ok(())
}
