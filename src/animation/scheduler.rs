use crate::{
    animation::state::AnimationState,
    core::{config::AnimationConfig, slot::MapSlot},
    runtime::{FrameHost, FrameId},
};
use std::cell::Cell;
use std::rc::Rc;

/// Idle globe rotation driven by a self-rescheduling frame callback.
///
/// While running, exactly one frame is pending on the host. Every frame
/// re-arms the next one whether or not the camera moved; only [`stop`]
/// (also run on drop) ends the loop.
///
/// [`stop`]: AnimationScheduler::stop
pub struct AnimationScheduler {
    inner: Rc<SchedulerInner>,
}

struct SchedulerInner {
    map: MapSlot,
    host: Rc<dyn FrameHost>,
    state: Rc<AnimationState>,
    config: AnimationConfig,
    pending: Cell<Option<FrameId>>,
    running: Cell<bool>,
}

impl AnimationScheduler {
    pub fn new(
        map: MapSlot,
        host: Rc<dyn FrameHost>,
        state: Rc<AnimationState>,
        config: AnimationConfig,
    ) -> Self {
        Self {
            inner: Rc::new(SchedulerInner {
                map,
                host,
                state,
                config,
                pending: Cell::new(None),
                running: Cell::new(false),
            }),
        }
    }

    /// Starts the loop; a second call while running is ignored
    pub fn start(&self) {
        if self.inner.running.replace(true) {
            log::debug!("animation loop already running");
            return;
        }
        log::debug!(
            "starting idle rotation ({}° every {} ms)",
            self.inner.config.rotation_step_deg,
            self.inner.config.throttle_interval_ms
        );
        self.inner.arm();
    }

    /// Cancels the pending frame. Safe to call any number of times.
    pub fn stop(&self) {
        self.inner.stop();
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }

    pub fn has_pending_frame(&self) -> bool {
        self.inner.pending.get().is_some()
    }

    pub fn state(&self) -> &Rc<AnimationState> {
        &self.inner.state
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.inner.config
    }

    /// Applies one tick at `timestamp` without touching the frame loop.
    /// Returns whether the camera moved.
    pub fn advance(&self, timestamp: f64) -> bool {
        self.inner.advance(timestamp)
    }
}

impl SchedulerInner {
    fn arm(self: &Rc<Self>) {
        if let Some(previous) = self.pending.take() {
            self.host.cancel_frame(previous);
        }

        let weak = Rc::downgrade(self);
        let id = self.host.request_frame(Box::new(move |timestamp| {
            if let Some(inner) = weak.upgrade() {
                inner.on_frame(timestamp);
            }
        }));
        self.pending.set(Some(id));
    }

    fn on_frame(self: &Rc<Self>, timestamp: f64) {
        self.pending.set(None);
        if !self.running.get() {
            return;
        }
        self.advance(timestamp);
        if self.running.get() {
            self.arm();
        }
    }

    fn advance(&self, timestamp: f64) -> bool {
        if !self.state.is_idle() {
            return false;
        }
        // no map yet: keep looping until one is attached
        let Some(map) = self.map.get() else {
            return false;
        };
        if timestamp - self.state.last_applied() < self.config.throttle_interval_ms {
            return false;
        }

        let center = map.center();
        map.set_center(center.offset_lng(self.config.rotation_step_deg));
        self.state.mark_applied(timestamp);
        true
    }

    fn stop(&self) {
        let was_running = self.running.replace(false);
        if let Some(id) = self.pending.take() {
            self.host.cancel_frame(id);
        }
        if was_running {
            log::debug!("idle rotation stopped");
        }
    }
}

impl Drop for AnimationScheduler {
    fn drop(&mut self) {
        self.inner.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{geo::LatLng, map::HeadlessMap};
    use crate::runtime::ManualFrameHost;
    use crate::traits::MapFacade;

    fn setup() -> (Rc<HeadlessMap>, Rc<ManualFrameHost>, AnimationScheduler) {
        let map = Rc::new(HeadlessMap::new(LatLng::new(20.0, 0.0)));
        let host = Rc::new(ManualFrameHost::new());
        let scheduler = AnimationScheduler::new(
            MapSlot::with_map(map.clone()),
            host.clone(),
            Rc::new(AnimationState::new(false)),
            AnimationConfig::default(),
        );
        (map, host, scheduler)
    }

    #[test]
    fn test_single_pending_frame() {
        let (_map, host, scheduler) = setup();
        scheduler.start();
        scheduler.start();
        assert_eq!(host.pending_frames(), 1);

        for frame in 1..=5 {
            host.run_frame(frame as f64 * 16.0);
            assert_eq!(host.pending_frames(), 1);
        }
    }

    #[test]
    fn test_advance_moves_longitude_only() {
        let (map, _host, scheduler) = setup();
        assert!(scheduler.advance(16.0));
        let center = map.center();
        assert_eq!(center.lat, 20.0);
        assert!((center.lng - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let (_map, host, scheduler) = setup();
        scheduler.start();
        scheduler.stop();
        scheduler.stop();
        assert!(!scheduler.is_running());
        assert_eq!(host.pending_frames(), 0);
        assert_eq!(host.run_frame(100.0), 0);
    }

    #[test]
    fn test_drop_cancels_pending_frame() {
        let (_map, host, scheduler) = setup();
        scheduler.start();
        drop(scheduler);
        assert_eq!(host.pending_frames(), 0);
    }
}
