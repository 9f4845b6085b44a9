//! One interactive map session
//!
//! Wires the interaction tracker, the idle rotation and the preview manager
//! around a single map slot and hover store. Everything is released by
//! [`MapSession::teardown`], which also runs on drop.

use crate::{
    animation::{scheduler::AnimationScheduler, state::AnimationState},
    core::{config::SessionConfig, slot::MapSlot},
    hover::{HoverStore, WatchId},
    input::tracker::InteractionTracker,
    layers::{manager::LayerLifecycleManager, registry::ProjectRegistry},
    runtime::FrameHost,
    traits::MapFacade,
};
use std::cell::Cell;
use std::rc::Rc;

pub struct MapSession {
    slot: MapSlot,
    hover: HoverStore,
    state: Rc<AnimationState>,
    tracker: InteractionTracker,
    scheduler: AnimationScheduler,
    layers: LayerLifecycleManager,
    hover_watch: Cell<Option<WatchId>>,
}

impl MapSession {
    pub fn new(
        config: SessionConfig,
        registry: Rc<ProjectRegistry>,
        hover: HoverStore,
        host: Rc<dyn FrameHost>,
    ) -> Self {
        let slot = MapSlot::new();
        let state = Rc::new(AnimationState::new(config.animation.start_interacting));

        let tracker = InteractionTracker::new(state.clone());
        let scheduler =
            AnimationScheduler::new(slot.clone(), host, state.clone(), config.animation);
        let layers =
            LayerLifecycleManager::new(slot.clone(), hover.clone(), registry, config.preview);
        layers.attach();

        // hovering a marker pauses the rotation
        let hovering = state.clone();
        let hover_watch = hover.subscribe(Rc::new(move |_, new| {
            hovering.set_hovering_project(new.is_some());
        }));
        state.set_hovering_project(hover.get().is_some());

        Self {
            slot,
            hover,
            state,
            tracker,
            scheduler,
            layers,
            hover_watch: Cell::new(Some(hover_watch)),
        }
    }

    /// Installs (or replaces) the map instance and binds gesture tracking to it
    ///
    /// Previews mounted on an outgoing instance are removed from it first;
    /// the live hover target is then re-applied to the new one.
    pub fn attach_map(&self, map: Rc<dyn MapFacade>) {
        if let Some(previous) = self.slot.get() {
            if Rc::ptr_eq(&previous, &map) {
                self.tracker.setup(Some(map));
                return;
            }
            self.layers.release();
            log::info!("map instance replaced");
        }
        self.slot.attach(map.clone());
        self.tracker.setup(Some(map));
        self.layers.sync_to_hover();
    }

    /// Starts the idle rotation loop
    pub fn start(&self) {
        self.scheduler.start();
    }

    /// Stops every loop and releases every listener. Idempotent.
    pub fn teardown(&self) {
        self.scheduler.stop();
        self.tracker.detach();
        self.layers.cleanup();
        if let Some(id) = self.hover_watch.take() {
            self.hover.unsubscribe(id);
        }
    }

    pub fn map(&self) -> Option<Rc<dyn MapFacade>> {
        self.slot.get()
    }

    pub fn hover(&self) -> &HoverStore {
        &self.hover
    }

    pub fn state(&self) -> &Rc<AnimationState> {
        &self.state
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }

    pub fn tracker(&self) -> &InteractionTracker {
        &self.tracker
    }

    pub fn layers(&self) -> &LayerLifecycleManager {
        &self.layers
    }
}

impl Drop for MapSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
