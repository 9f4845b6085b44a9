//! Hover-driven preview layers
//!
//! [`LayerLifecycleManager`] mounts a temporary `<id>-preview` layer for the
//! hovered project and tears it down when the hover moves on. Source loads
//! complete asynchronously and the hover target can change many times while
//! one is in flight, so every completion is checked against the live loading
//! id before it touches any state.
//!
//! Per project id there is at most one mounted (source, layer) pair and at
//! most one pending source-data listener at any time.

use crate::{
    core::{config::PreviewConfig, slot::MapSlot},
    hover::{HoverStore, WatchId},
    input::events::MapEventKind,
    layers::{filter::Filter, registry::ProjectRegistry},
    prelude::HashMap,
    traits::{ListenerId, MapFacade},
    Result,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Observer of the derived loading indicator
pub type LoadingCallback = Rc<dyn Fn(Option<&str>)>;

/// Keeps preview layers in step with the hover target of one map session
pub struct LayerLifecycleManager {
    inner: Rc<ManagerInner>,
}

struct ManagerInner {
    map: MapSlot,
    hover: HoverStore,
    registry: Rc<ProjectRegistry>,
    config: PreviewConfig,
    /// Project currently being mounted
    loading: RefCell<Option<String>>,
    /// Pending source-data listener per project id, with the map it was registered on
    listeners: RefCell<HashMap<String, (Rc<dyn MapFacade>, ListenerId)>>,
    /// Style-ready continuation waiting on a map whose style is not loaded
    deferred: RefCell<Option<(Rc<dyn MapFacade>, ListenerId)>>,
    watch: Cell<Option<WatchId>>,
    loading_watchers: RefCell<Vec<LoadingCallback>>,
}

impl LayerLifecycleManager {
    pub fn new(
        map: MapSlot,
        hover: HoverStore,
        registry: Rc<ProjectRegistry>,
        config: PreviewConfig,
    ) -> Self {
        Self {
            inner: Rc::new(ManagerInner {
                map,
                hover,
                registry,
                config,
                loading: RefCell::new(None),
                listeners: RefCell::new(HashMap::default()),
                deferred: RefCell::new(None),
                watch: Cell::new(None),
                loading_watchers: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Subscribes to hover-target transitions. Calling it again is a no-op.
    pub fn attach(&self) {
        if self.inner.watch.get().is_some() {
            return;
        }
        let weak = Rc::downgrade(&self.inner);
        let id = self.inner.hover.subscribe(Rc::new(move |old, new| {
            if let Some(inner) = weak.upgrade() {
                inner.handle_transition(old, new);
            }
        }));
        self.inner.watch.set(Some(id));
    }

    /// Stops observing the hover target; mounted previews stay in place
    pub fn detach(&self) {
        if let Some(id) = self.inner.watch.take() {
            self.inner.hover.unsubscribe(id);
        }
    }

    /// Runs the lifecycle for one hover transition `old -> new`
    pub fn handle_transition(&self, old: Option<&str>, new: Option<&str>) {
        self.inner.handle_transition(old, new);
    }

    pub fn loading_project_id(&self) -> Option<String> {
        self.inner.loading.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.loading.borrow().is_some()
    }

    /// Registers an observer called whenever the loading id changes
    pub fn on_loading_change(&self, callback: LoadingCallback) {
        self.inner.loading_watchers.borrow_mut().push(callback);
    }

    pub fn has_listener(&self, project_id: &str) -> bool {
        self.inner.listeners.borrow().contains_key(project_id)
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Whether a transition is waiting for the style to load
    pub fn has_deferred_transition(&self) -> bool {
        self.inner.deferred.borrow().is_some()
    }

    pub fn preview_layer_id(&self, project_id: &str) -> String {
        self.inner.config.preview_layer_id(project_id)
    }

    /// Tears down one project's preview; unmounted ids are ignored
    pub fn remove_preview(&self, project_id: &str) {
        if let Some(map) = self.inner.map.get() {
            self.inner.remove_preview(map.as_ref(), project_id);
        }
    }

    /// Tears down the preview of every configured project
    pub fn remove_all_previews(&self) {
        if let Some(map) = self.inner.map.get() {
            self.inner.remove_all_previews(map.as_ref());
        }
    }

    /// Filters the base markers down to the hovered project, or clears the filter
    pub fn update_visibility(&self) {
        if let Some(map) = self.inner.map.get() {
            self.inner.update_visibility(map.as_ref());
        }
    }

    /// Drops the hover subscription, the deferred continuation and every
    /// pending source listener
    pub fn cleanup(&self) {
        self.inner.cleanup();
    }

    /// Tears down everything mounted on the attached map. Called before the
    /// map instance is replaced; the hover subscription stays active.
    pub fn release(&self) {
        self.inner.release();
    }

    /// Applies the live hover target to the attached map as if it had just
    /// been hovered
    pub fn sync_to_hover(&self) {
        if let Some(target) = self.inner.hover.get() {
            self.inner.handle_transition(None, Some(&target));
        }
    }
}

impl Drop for LayerLifecycleManager {
    fn drop(&mut self) {
        self.inner.cleanup();
    }
}

impl ManagerInner {
    fn handle_transition(self: &Rc<Self>, old: Option<&str>, new: Option<&str>) {
        log::debug!("hovered project changed: {:?} -> {:?}", old, new);

        let Some(map) = self.map.get() else {
            log::debug!("map not initialized");
            return;
        };

        if !map.is_style_loaded() {
            log::debug!("style not loaded, queuing {:?} for later", new);
            self.defer(&map, new);
            return;
        }
        self.cancel_deferred();

        if let Some(old) = old {
            if Some(old) != new {
                self.remove_preview(map.as_ref(), old);
            }
        }

        match new {
            Some(project_id) => self.mount(&map, project_id),
            None => {
                self.set_loading(None);
                self.remove_all_previews(map.as_ref());
                self.update_visibility(map.as_ref());
            }
        }
    }

    /// Parks the transition until the style loads. Only the latest one is
    /// kept; it reconciles against the live target when it resumes.
    fn defer(self: &Rc<Self>, map: &Rc<dyn MapFacade>, target: Option<&str>) {
        self.cancel_deferred();

        let weak = Rc::downgrade(self);
        let target = target.map(String::from);
        let id = map.once(
            MapEventKind::StyleData,
            Rc::new(move |_| {
                if let Some(inner) = weak.upgrade() {
                    inner.resume(target.as_deref());
                }
            }),
        );
        *self.deferred.borrow_mut() = Some((map.clone(), id));
    }

    fn resume(self: &Rc<Self>, target: Option<&str>) {
        self.deferred.borrow_mut().take();

        if !self.hover.is(target) {
            log::debug!("dropping stale deferred transition to {:?}", target);
            return;
        }
        let Some(map) = self.map.get() else {
            return;
        };
        if !map.is_style_loaded() {
            self.defer(&map, target);
            return;
        }

        // whatever was mounted before the deferral is unknown here
        for project_id in self.other_project_ids(target) {
            self.remove_preview(map.as_ref(), &project_id);
        }
        match target {
            Some(project_id) => self.mount(&map, project_id),
            None => {
                self.set_loading(None);
                self.update_visibility(map.as_ref());
            }
        }
    }

    fn cancel_deferred(&self) {
        let pending = self.deferred.borrow_mut().take();
        if let Some((map, id)) = pending {
            map.off(id);
        }
    }

    fn other_project_ids(&self, keep: Option<&str>) -> Vec<String> {
        self.registry
            .ids()
            .filter(|id| Some(*id) != keep)
            .map(String::from)
            .collect()
    }

    fn mount(self: &Rc<Self>, map: &Rc<dyn MapFacade>, project_id: &str) {
        let map_ref = map.as_ref();
        // optimistic: markers narrow to the target before any data arrives
        self.set_loading(Some(project_id));
        self.update_visibility(map_ref);

        if self.registry.layer(project_id).is_none() {
            log::warn!("no layer config found for: {}", project_id);
            self.set_loading(None);
            self.update_visibility(map_ref);
            return;
        }

        log::info!("adding preview for: {}", project_id);
        if let Err(e) = self.mount_entities(map_ref, project_id) {
            log::error!("error adding preview layer for {}: {}", project_id, e);
            self.remove_preview(map_ref, project_id);
            self.set_loading(None);
            self.update_visibility(map_ref);
            return;
        }

        self.watch_source(map, project_id);
    }

    fn mount_entities(&self, map: &dyn MapFacade, project_id: &str) -> Result<()> {
        let Some(config) = self.registry.layer(project_id) else {
            return Ok(());
        };

        if map.has_source(project_id) {
            log::debug!("reusing source: {}", project_id);
        } else {
            map.add_source(project_id, &config.source)?;
        }

        let layer_id = self.config.preview_layer_id(project_id);
        if map.has_layer(&layer_id) {
            log::debug!("preview layer already mounted: {}", layer_id);
            return Ok(());
        }
        if let Some(preview) = self
            .registry
            .preview_layer(project_id, &self.config.preview_suffix)
        {
            map.add_layer(preview, Some(&self.config.base_layer_id))?;
        }
        Ok(())
    }

    fn watch_source(self: &Rc<Self>, map: &Rc<dyn MapFacade>, project_id: &str) {
        if self.listeners.borrow().contains_key(project_id) {
            log::debug!("source listener already pending for: {}", project_id);
            return;
        }
        if map.is_source_loaded(project_id) {
            self.resolve(map.as_ref(), project_id);
            return;
        }

        let weak = Rc::downgrade(self);
        let source_map = Rc::downgrade(map);
        let project = project_id.to_string();
        let own_id = Rc::new(Cell::new(None));
        let own = own_id.clone();
        let id = map.on(
            MapEventKind::SourceData,
            Rc::new(move |event| {
                if !event.is_loaded_source(&project) {
                    return;
                }
                let (Some(inner), Some(map), Some(id)) =
                    (weak.upgrade(), source_map.upgrade(), own.get())
                else {
                    return;
                };
                inner.on_source_loaded(&map, &project, id);
            }),
        );
        own_id.set(Some(id));
        self.listeners
            .borrow_mut()
            .insert(project_id.to_string(), (map.clone(), id));
    }

    fn on_source_loaded(&self, map: &Rc<dyn MapFacade>, project_id: &str, own: ListenerId) {
        log::info!("source loaded: {}", project_id);
        let current = self
            .map
            .get()
            .is_some_and(|attached| Rc::ptr_eq(&attached, map));
        if current {
            self.resolve(map.as_ref(), project_id);
        } else {
            log::debug!("ignoring load of {} on a detached map", project_id);
        }

        // a newer listener for the same id must survive
        {
            let mut listeners = self.listeners.borrow_mut();
            let ours = listeners
                .get(project_id)
                .is_some_and(|(owner, id)| *id == own && Rc::ptr_eq(owner, map));
            if ours {
                listeners.remove(project_id);
            }
        }
        map.off(own);
    }

    /// Clears the loading id if `project_id` is still the one being loaded
    fn resolve(&self, map: &dyn MapFacade, project_id: &str) {
        let current = self.loading.borrow().as_deref() == Some(project_id);
        if current {
            self.set_loading(None);
            self.update_visibility(map);
        } else {
            log::debug!("ignoring superseded load of: {}", project_id);
        }
    }

    fn remove_preview(&self, map: &dyn MapFacade, project_id: &str) {
        log::debug!("removing preview layer: {}", project_id);

        // the listener lives on whichever map it was registered on
        let listener = self.listeners.borrow_mut().remove(project_id);
        if let Some((owner, id)) = listener {
            owner.off(id);
        }

        let layer_id = self.config.preview_layer_id(project_id);
        if map.has_layer(&layer_id) {
            if let Err(e) = map.remove_layer(&layer_id) {
                log::warn!("failed to remove layer {}: {}", layer_id, e);
            }
        }
        if map.has_source(project_id) {
            if let Err(e) = map.remove_source(project_id) {
                log::warn!("failed to remove source {}: {}", project_id, e);
            }
        }
    }

    fn remove_all_previews(&self, map: &dyn MapFacade) {
        log::debug!("removing all preview layers");
        for project_id in self.other_project_ids(None) {
            self.remove_preview(map, &project_id);
        }
    }

    fn update_visibility(&self, map: &dyn MapFacade) {
        let base = &self.config.base_layer_id;
        if !map.has_layer(base) {
            log::debug!("cannot update visibility - base layer {} not ready", base);
            return;
        }

        let filter = match self.hover.get() {
            Some(project_id) => {
                log::debug!("showing only project: {}", project_id);
                Some(Filter::equals(
                    self.config.feature_id_property.as_str(),
                    project_id,
                ))
            }
            None => {
                log::debug!("showing all projects");
                None
            }
        };
        if let Err(e) = map.set_filter(base, filter) {
            log::warn!("failed to filter {}: {}", base, e);
        }
    }

    fn set_loading(&self, value: Option<&str>) {
        let changed = {
            let mut loading = self.loading.borrow_mut();
            if loading.as_deref() == value {
                false
            } else {
                *loading = value.map(String::from);
                true
            }
        };
        if !changed {
            return;
        }

        let watchers: Vec<LoadingCallback> = self.loading_watchers.borrow().clone();
        for watcher in watchers {
            watcher(value);
        }
    }

    fn cleanup(&self) {
        if let Some(id) = self.watch.take() {
            self.hover.unsubscribe(id);
        }
        self.cancel_deferred();
        self.cleanup_listeners();
    }

    /// Removes every preview, listener and deferred continuation from the
    /// attached map and resets the loading id
    fn release(&self) {
        self.cancel_deferred();
        if let Some(map) = self.map.get() {
            self.remove_all_previews(map.as_ref());
        }
        self.cleanup_listeners();
        self.set_loading(None);
    }

    fn cleanup_listeners(&self) {
        let listeners: Vec<(Rc<dyn MapFacade>, ListenerId)> = self
            .listeners
            .borrow_mut()
            .drain()
            .map(|(_, entry)| entry)
            .collect();
        for (owner, id) in listeners {
            owner.off(id);
        }
    }
}
