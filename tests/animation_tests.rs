use globeview::prelude::*;

/// Idle rotation and interaction gating, stepped frame by frame
#[cfg(test)]
mod animation_tests {
    use super::*;

    const START: LatLng = LatLng { lat: 30.0, lng: 10.0 };

    struct Rig {
        map: Rc<HeadlessMap>,
        slot: MapSlot,
        host: Rc<ManualFrameHost>,
        state: Rc<AnimationState>,
        tracker: InteractionTracker,
        scheduler: AnimationScheduler,
    }

    fn rig(config: AnimationConfig) -> Rig {
        let map = Rc::new(HeadlessMap::new(START));
        let slot = MapSlot::with_map(map.clone());
        let host = Rc::new(ManualFrameHost::new());
        let state = Rc::new(AnimationState::new(false));

        let tracker = InteractionTracker::new(state.clone());
        assert!(tracker.setup(slot.get()));
        let scheduler = AnimationScheduler::new(slot.clone(), host.clone(), state.clone(), config);

        Rig {
            map,
            slot,
            host,
            state,
            tracker,
            scheduler,
        }
    }

    fn rotated_by(map: &HeadlessMap) -> f64 {
        map.center().lng - START.lng
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_rotation_while_idle() {
        let rig = rig(AnimationConfig::default());
        rig.scheduler.start();

        rig.host.run_frame(16.0);
        rig.host.run_frame(32.0);

        assert!(close(rotated_by(&rig.map), 0.1));
        assert_eq!(rig.map.center().lat, START.lat);
        assert_eq!(rig.state.last_applied(), 32.0);
    }

    #[test]
    fn test_interaction_freezes_camera() {
        let rig = rig(AnimationConfig::default());
        rig.scheduler.start();

        rig.map.emit(&MapEvent::DragStart);
        for frame in 1..=50 {
            rig.host.run_frame(frame as f64 * 16.0);
        }

        assert_eq!(rig.map.center(), START);
        assert!(rig.scheduler.has_pending_frame());
    }

    #[test]
    fn test_hover_freezes_camera() {
        let rig = rig(AnimationConfig::default());
        rig.scheduler.start();

        rig.state.set_hovering_project(true);
        for frame in 1..=10 {
            rig.host.run_frame(frame as f64 * 16.0);
        }
        assert_eq!(rig.map.center(), START);

        rig.state.set_hovering_project(false);
        rig.host.run_frame(200.0);
        assert!(close(rotated_by(&rig.map), 0.05));
    }

    #[test]
    fn test_throttle_between_close_ticks() {
        let rig = rig(AnimationConfig::default());
        rig.scheduler.start();

        rig.host.run_frame(100.0);
        rig.host.run_frame(103.0);

        assert!(close(rotated_by(&rig.map), 0.05));
        assert_eq!(rig.state.last_applied(), 100.0);
    }

    #[test]
    fn test_throttle_over_many_frames() {
        let rig = rig(AnimationConfig::default());
        rig.scheduler.start();

        // applied at 12, 24 and 36
        for frame in 1..=10 {
            rig.host.run_frame(frame as f64 * 4.0);
        }
        assert!(close(rotated_by(&rig.map), 0.15));
    }

    #[test]
    fn test_start_then_end_leaves_flag_clear() {
        let rig = rig(AnimationConfig::default());
        rig.scheduler.start();

        rig.map.emit(&MapEvent::MouseDown);
        rig.map.emit(&MapEvent::MouseUp);
        assert!(!rig.state.is_user_interacting());

        for frame in 1..=5 {
            rig.host.run_frame(frame as f64 * 16.0);
            assert!(!rig.state.is_user_interacting());
        }
        assert!(close(rotated_by(&rig.map), 0.25));
    }

    #[test]
    fn test_overlapping_gestures() {
        let rig = rig(AnimationConfig::default());
        rig.map.emit(&MapEvent::ZoomStart);
        rig.map.emit(&MapEvent::RotateStart);
        assert!(rig.tracker.is_user_interacting());

        rig.map.emit(&MapEvent::RotateEnd);
        assert!(!rig.tracker.is_user_interacting());
    }

    #[test]
    fn test_loop_survives_missing_map() {
        let rig = rig(AnimationConfig::default());
        let map = rig.slot.detach().unwrap();
        rig.scheduler.start();

        for frame in 1..=5 {
            rig.host.run_frame(frame as f64 * 16.0);
            assert_eq!(rig.host.pending_frames(), 1);
        }

        rig.slot.attach(map);
        rig.host.run_frame(100.0);
        assert!(close(rotated_by(&rig.map), 0.05));
    }

    #[test]
    fn test_stop_cancels_pending_tick() {
        let rig = rig(AnimationConfig::default());
        rig.scheduler.start();
        rig.scheduler.stop();
        rig.scheduler.stop();

        assert_eq!(rig.host.run_frame(16.0), 0);
        assert_eq!(rig.map.center(), START);

        // restart after stop re-arms exactly one frame
        rig.scheduler.start();
        assert_eq!(rig.host.pending_frames(), 1);
    }

    #[test]
    fn test_custom_profile() {
        let config = RotationProfile::Custom(AnimationConfig {
            throttle_interval_ms: 50.0,
            rotation_step_deg: 1.0,
            ..AnimationConfig::default()
        })
        .resolve();
        let rig = rig(config);
        rig.scheduler.start();

        for frame in 1..=10 {
            rig.host.run_frame(frame as f64 * 10.0);
        }
        // applied at 50 and 100
        assert!(close(rotated_by(&rig.map), 2.0));
    }
}
