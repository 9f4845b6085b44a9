//! Prelude module for common globeview types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use globeview::prelude::*;`

pub use crate::core::{
    config::{AnimationConfig, PreviewConfig, RotationProfile, SessionConfig},
    geo::LatLng,
    map::HeadlessMap,
    slot::MapSlot,
};

pub use crate::input::{
    events::{MapEvent, MapEventKind},
    tracker::InteractionTracker,
};

pub use crate::layers::{
    filter::Filter,
    manager::LayerLifecycleManager,
    registry::{LayerSpec, ProjectConfig, ProjectRegistry, SourceSpec},
};

pub use crate::animation::{scheduler::AnimationScheduler, state::AnimationState};

pub use crate::hover::HoverStore;

pub use crate::runtime::{FrameHost, FrameId, ManualFrameHost};

#[cfg(feature = "tokio-runtime")]
pub use crate::runtime::LocalFrameHost;

pub use crate::session::MapSession;

pub use crate::traits::{ListenerId, MapFacade};

pub use crate::{Error as GlobeError, Result};

pub use std::rc::Rc;

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
