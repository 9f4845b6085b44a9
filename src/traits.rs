//! Seams between the preview/rotation core and its host
//!
//! The map rendering engine is an external collaborator. Everything the core
//! needs from it goes through [`MapFacade`], so any engine (a browser map, a
//! native renderer, the bundled [`HeadlessMap`](crate::core::map::HeadlessMap))
//! can drive it.

use crate::{
    core::geo::LatLng,
    input::events::{MapEvent, MapEventKind},
    layers::{
        filter::Filter,
        registry::{LayerSpec, SourceSpec},
    },
    Result,
};
use std::rc::Rc;

/// Event listener callback type
pub type EventCallback = Rc<dyn Fn(&MapEvent)>;

/// Handle returned by [`MapFacade::on`] and [`MapFacade::once`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Operations the core performs on a map instance.
///
/// All methods take `&self`: implementations are shared as `Rc<dyn MapFacade>`
/// on a single thread and use interior mutability. Implementations must not
/// hold internal borrows while invoking listeners, since listeners call back
/// into the facade.
pub trait MapFacade {
    /// Current camera center
    fn center(&self) -> LatLng;

    fn set_center(&self, center: LatLng);

    /// Whether layer and filter mutations are currently safe
    fn is_style_loaded(&self) -> bool;

    fn has_source(&self, id: &str) -> bool;

    fn add_source(&self, id: &str, spec: &SourceSpec) -> Result<()>;

    fn remove_source(&self, id: &str) -> Result<()>;

    /// Whether the source exists and has finished loading its data
    fn is_source_loaded(&self, id: &str) -> bool;

    fn has_layer(&self, id: &str) -> bool;

    /// Adds a layer, placed directly beneath `before` when given, on top otherwise
    fn add_layer(&self, spec: LayerSpec, before: Option<&str>) -> Result<()>;

    fn remove_layer(&self, id: &str) -> Result<()>;

    /// Replaces the layer's filter; `None` draws every feature
    fn set_filter(&self, layer_id: &str, filter: Option<Filter>) -> Result<()>;

    /// Registers a recurring listener
    fn on(&self, kind: MapEventKind, callback: EventCallback) -> ListenerId;

    /// Registers a listener removed right before its first invocation
    fn once(&self, kind: MapEventKind, callback: EventCallback) -> ListenerId;

    /// Removes a listener; unknown ids are ignored
    fn off(&self, id: ListenerId);
}
