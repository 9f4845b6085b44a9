//! In-memory map facade
//!
//! `HeadlessMap` keeps a layer stack, a source registry and an event bus
//! without drawing anything. It is the reference [`MapFacade`] used by the
//! demo application and the tests; hosts with a real renderer implement the
//! trait over their own engine.

use crate::{
    core::geo::LatLng,
    input::events::{MapEvent, MapEventKind},
    layers::{
        filter::Filter,
        registry::{LayerSpec, SourceSpec},
    },
    prelude::{HashMap, HashSet},
    traits::{EventCallback, ListenerId, MapFacade},
    Error, Result,
};
use serde_json::{json, Value};
use std::cell::{Cell, RefCell};

/// Source id used for the base project markers
pub const MARKER_SOURCE: &str = "projects";

#[derive(Debug, Clone)]
struct HeadlessSource {
    spec: SourceSpec,
    loaded: bool,
}

#[derive(Debug, Clone)]
struct HeadlessLayer {
    spec: LayerSpec,
    filter: Option<Filter>,
}

struct ListenerEntry {
    id: ListenerId,
    kind: MapEventKind,
    callback: EventCallback,
    once: bool,
}

pub struct HeadlessMap {
    center: Cell<LatLng>,
    style_loaded: Cell<bool>,
    sources: RefCell<HashMap<String, HeadlessSource>>,
    /// Bottom to top
    layers: RefCell<Vec<HeadlessLayer>>,
    listeners: RefCell<Vec<ListenerEntry>>,
    next_listener: Cell<u64>,
    rejected_layers: RefCell<HashSet<String>>,
}

impl HeadlessMap {
    pub fn new(center: LatLng) -> Self {
        Self {
            center: Cell::new(center),
            style_loaded: Cell::new(false),
            sources: RefCell::new(HashMap::default()),
            layers: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(1),
            rejected_layers: RefCell::new(HashSet::default()),
        }
    }

    /// Adds the GeoJSON marker source and the circle layer drawn on top of it
    pub fn install_markers(&self, layer_id: &str, collection: Value) -> Result<()> {
        let source = SourceSpec::new("geojson").with_option("data", collection);
        self.add_source(MARKER_SOURCE, &source)?;
        self.set_source_loaded(MARKER_SOURCE, true);

        let mut layer = LayerSpec::new(layer_id, "circle").with_source(MARKER_SOURCE);
        layer.style.insert(
            "paint".to_string(),
            json!({ "circle-radius": 6, "circle-color": "#ffffff" }),
        );
        self.add_layer(layer, None)
    }

    /// Marks the style as loaded (emitting a style event) or unloaded
    pub fn set_style_loaded(&self, loaded: bool) {
        self.style_loaded.set(loaded);
        if loaded {
            self.emit(&MapEvent::StyleData);
        }
    }

    fn set_source_loaded(&self, id: &str, loaded: bool) -> bool {
        match self.sources.borrow_mut().get_mut(id) {
            Some(source) => {
                source.loaded = loaded;
                true
            }
            None => false,
        }
    }

    /// Marks a source as fully loaded and emits the matching data event
    pub fn finish_source(&self, id: &str) -> Result<()> {
        if !self.set_source_loaded(id, true) {
            return Err(Error::UnknownSource(id.to_string()));
        }
        self.emit(&MapEvent::source_loaded(id));
        Ok(())
    }

    /// Makes the next `add_layer` calls for `layer_id` fail
    pub fn reject_layer(&self, layer_id: &str) {
        self.rejected_layers.borrow_mut().insert(layer_id.to_string());
    }

    /// Dispatches an event to every matching listener, returning how many ran.
    ///
    /// Listeners are snapshotted first and called with no borrow held. One
    /// removed by an earlier callback of the same dispatch is skipped.
    pub fn emit(&self, event: &MapEvent) -> usize {
        let kind = event.kind();
        let snapshot: Vec<(ListenerId, EventCallback, bool)> = self
            .listeners
            .borrow()
            .iter()
            .filter(|entry| entry.kind == kind)
            .map(|entry| (entry.id, entry.callback.clone(), entry.once))
            .collect();

        let mut invoked = 0;
        for (id, callback, once) in snapshot {
            if !self.has_listener(id) {
                continue;
            }
            if once {
                self.off(id);
            }
            callback(event);
            invoked += 1;
        }
        invoked
    }

    pub fn has_listener(&self, id: ListenerId) -> bool {
        self.listeners.borrow().iter().any(|entry| entry.id == id)
    }

    pub fn listener_count(&self, kind: MapEventKind) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|entry| entry.kind == kind)
            .count()
    }

    pub fn total_listeners(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Layer ids in render order, bottom first
    pub fn layer_ids(&self) -> Vec<String> {
        self.layers
            .borrow()
            .iter()
            .map(|layer| layer.spec.id.clone())
            .collect()
    }

    pub fn source_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sources.borrow().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn source(&self, id: &str) -> Option<SourceSpec> {
        self.sources.borrow().get(id).map(|source| source.spec.clone())
    }

    pub fn filter(&self, layer_id: &str) -> Option<Filter> {
        self.layers
            .borrow()
            .iter()
            .find(|layer| layer.spec.id == layer_id)
            .and_then(|layer| layer.filter.clone())
    }

    pub fn layer(&self, layer_id: &str) -> Option<LayerSpec> {
        self.layers
            .borrow()
            .iter()
            .find(|layer| layer.spec.id == layer_id)
            .map(|layer| layer.spec.clone())
    }

    fn register(&self, kind: MapEventKind, callback: EventCallback, once: bool) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners.borrow_mut().push(ListenerEntry {
            id,
            kind,
            callback,
            once,
        });
        id
    }

    fn layer_position(&self, layer_id: &str) -> Option<usize> {
        self.layers
            .borrow()
            .iter()
            .position(|layer| layer.spec.id == layer_id)
    }
}

impl MapFacade for HeadlessMap {
    fn center(&self) -> LatLng {
        self.center.get()
    }

    fn set_center(&self, center: LatLng) {
        self.center.set(center.wrapped());
    }

    fn is_style_loaded(&self) -> bool {
        self.style_loaded.get()
    }

    fn has_source(&self, id: &str) -> bool {
        self.sources.borrow().contains_key(id)
    }

    fn add_source(&self, id: &str, spec: &SourceSpec) -> Result<()> {
        let mut sources = self.sources.borrow_mut();
        if sources.contains_key(id) {
            return Err(Error::DuplicateSource(id.to_string()));
        }
        sources.insert(
            id.to_string(),
            HeadlessSource {
                spec: spec.clone(),
                loaded: false,
            },
        );
        log::debug!("headless: added {} source {}", spec.kind, id);
        Ok(())
    }

    fn remove_source(&self, id: &str) -> Result<()> {
        let in_use = self
            .layers
            .borrow()
            .iter()
            .any(|layer| layer.spec.source.as_deref() == Some(id));
        if in_use {
            return Err(Error::SourceInUse(id.to_string()));
        }
        self.sources
            .borrow_mut()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Error::UnknownSource(id.to_string()))
    }

    fn is_source_loaded(&self, id: &str) -> bool {
        self.sources
            .borrow()
            .get(id)
            .map(|source| source.loaded)
            .unwrap_or(false)
    }

    fn has_layer(&self, id: &str) -> bool {
        self.layer_position(id).is_some()
    }

    fn add_layer(&self, spec: LayerSpec, before: Option<&str>) -> Result<()> {
        if self.has_layer(&spec.id) {
            return Err(Error::DuplicateLayer(spec.id));
        }
        if self.rejected_layers.borrow().contains(&spec.id) {
            return Err(Error::Rejected(format!("layer {} refused by style", spec.id)));
        }
        if let Some(source) = spec.source.as_deref() {
            if !self.has_source(source) {
                return Err(Error::UnknownSource(source.to_string()));
            }
        }

        let position = match before {
            Some(anchor) => self
                .layer_position(anchor)
                .ok_or_else(|| Error::UnknownLayer(anchor.to_string()))?,
            None => self.layers.borrow().len(),
        };

        self.layers
            .borrow_mut()
            .insert(position, HeadlessLayer { spec, filter: None });
        Ok(())
    }

    fn remove_layer(&self, id: &str) -> Result<()> {
        let position = self
            .layer_position(id)
            .ok_or_else(|| Error::UnknownLayer(id.to_string()))?;
        self.layers.borrow_mut().remove(position);
        Ok(())
    }

    fn set_filter(&self, layer_id: &str, filter: Option<Filter>) -> Result<()> {
        let mut layers = self.layers.borrow_mut();
        let layer = layers
            .iter_mut()
            .find(|layer| layer.spec.id == layer_id)
            .ok_or_else(|| Error::UnknownLayer(layer_id.to_string()))?;
        layer.filter = filter;
        Ok(())
    }

    fn on(&self, kind: MapEventKind, callback: EventCallback) -> ListenerId {
        self.register(kind, callback, false)
    }

    fn once(&self, kind: MapEventKind, callback: EventCallback) -> ListenerId {
        self.register(kind, callback, true)
    }

    fn off(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|entry| entry.id != id);
    }
}

impl Default for HeadlessMap {
    fn default() -> Self {
        Self::new(LatLng::default())
    }
}
