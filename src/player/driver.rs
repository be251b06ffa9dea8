// Copyright © 2026 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Drive the animator from a fixed-interval tick loop.
// Author: Lukas Bower

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::info;

use super::animator::{TickOutput, TrailAnimator};
use crate::error::Result;

/// Rendering collaborator. Owns the actual output; receives one
/// [`TickOutput`] per tick.
pub trait RenderDriver {
    fn draw(&mut self, out: &TickOutput) -> Result<()>;
}

/// Synchronous tick loop. Ticks never overlap; the loop ends only when the
/// stop flag is raised, `max_ticks` is reached, or the driver fails.
pub struct PlaybackLoop {
    interval: Duration,
    max_ticks: Option<u64>,
    stop: Arc<AtomicBool>,
}

impl PlaybackLoop {
    pub fn new(interval: Duration, max_ticks: Option<u64>) -> Self {
        Self {
            interval,
            max_ticks,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that stops the loop before its next tick once set.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Start `animator` and tick it until stopped. Returns the tick count.
    pub fn run(&self, animator: &mut TrailAnimator, driver: &mut dyn RenderDriver) -> Result<u64> {
        animator.start()?;
        let result = self.pump(animator, driver);
        animator.stop();
        let ticks = result?;
        info!("playback ended after {ticks} ticks");
        Ok(ticks)
    }

    fn pump(&self, animator: &mut TrailAnimator, driver: &mut dyn RenderDriver) -> Result<u64> {
        let mut ticks = 0u64;
        while !self.stop.load(Ordering::Relaxed) {
            if self.max_ticks.is_some_and(|max| ticks >= max) {
                break;
            }
            let out = animator.tick()?;
            driver.draw(&out)?;
            ticks += 1;
            thread::sleep(self.interval);
        }
        Ok(ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TelemetryError;
    use crate::geometry::Point3;
    use crate::loader::TelemetryDataset;
    use crate::player::animator::PlaybackState;
    use crate::recorder::{signature, Frame};

    struct Capture(Vec<usize>);

    impl RenderDriver for Capture {
        fn draw(&mut self, out: &TickOutput) -> Result<()> {
            self.0.push(out.idx);
            Ok(())
        }
    }

    struct StopAfter {
        seen: u64,
        limit: u64,
        stop: Arc<AtomicBool>,
    }

    impl RenderDriver for StopAfter {
        fn draw(&mut self, _out: &TickOutput) -> Result<()> {
            self.seen += 1;
            if self.seen == self.limit {
                self.stop.store(true, Ordering::Relaxed);
            }
            Ok(())
        }
    }

    struct Broken;

    impl RenderDriver for Broken {
        fn draw(&mut self, _out: &TickOutput) -> Result<()> {
            Err(TelemetryError::InvalidConfig("no display".into()))
        }
    }

    fn animator(len: u64) -> TrailAnimator {
        let frames = (0..len)
            .map(|i| {
                let entities = vec![Point3::new(i as f64, 1.0, 0.0)];
                Frame {
                    frame_index: i,
                    target_id: 15,
                    smoothness_gain: 0.5,
                    integrity_digest: signature(&entities),
                    entities,
                }
            })
            .collect();
        let ds = Arc::new(TelemetryDataset::new(1, frames).unwrap());
        let scale = ds.scale(1e-4);
        TrailAnimator::new(ds, scale, 20)
    }

    #[test]
    fn bounded_run_loops_and_stops() {
        let mut a = animator(3);
        let mut capture = Capture(Vec::new());
        let ticks = PlaybackLoop::new(Duration::ZERO, Some(5))
            .run(&mut a, &mut capture)
            .unwrap();
        assert_eq!(ticks, 5);
        assert_eq!(capture.0, vec![0, 1, 2, 0, 1]);
        assert_eq!(a.state(), PlaybackState::Stopped);
    }

    #[test]
    fn stop_flag_ends_unbounded_run() {
        let mut a = animator(4);
        let lp = PlaybackLoop::new(Duration::ZERO, None);
        let mut driver = StopAfter {
            seen: 0,
            limit: 9,
            stop: lp.stop_handle(),
        };
        assert_eq!(lp.run(&mut a, &mut driver).unwrap(), 9);
    }

    #[test]
    fn driver_failure_stops_session() {
        let mut a = animator(2);
        let err = PlaybackLoop::new(Duration::ZERO, None).run(&mut a, &mut Broken);
        assert!(err.is_err());
        assert_eq!(a.state(), PlaybackState::Stopped);
    }
}
