//! # Globeview
//!
//! Hover-driven preview layers and idle globe rotation for interactive
//! project maps.
//!
//! The map engine itself is an external collaborator reached through the
//! [`MapFacade`] trait. On top of it this crate keeps two time-sensitive
//! behaviours correct under rapid event churn: mounting a temporary preview
//! layer for the hovered project ([`LayerLifecycleManager`]) and rotating the
//! camera while nobody interacts with the map ([`AnimationScheduler`]).
//! Everything runs on one thread, driven by host callbacks.

pub mod animation;
pub mod core;
pub mod hover;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod runtime;
pub mod session;
pub mod traits;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::{AnimationConfig, PreviewConfig, RotationProfile, SessionConfig},
    geo::LatLng,
    map::HeadlessMap,
    slot::MapSlot,
};

pub use animation::{scheduler::AnimationScheduler, state::AnimationState};

pub use hover::HoverStore;

pub use input::{
    events::{MapEvent, MapEventKind},
    tracker::InteractionTracker,
};

pub use layers::{
    filter::Filter,
    manager::LayerLifecycleManager,
    registry::{LayerSpec, ProjectConfig, ProjectLayerConfig, ProjectRegistry, SourceSpec},
};

pub use runtime::{FrameHost, FrameId, ManualFrameHost};

pub use session::MapSession;

pub use traits::{EventCallback, ListenerId, MapFacade};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Source already exists: {0}")]
    DuplicateSource(String),

    #[error("Layer already exists: {0}")]
    DuplicateLayer(String),

    #[error("Unknown source: {0}")]
    UnknownSource(String),

    #[error("Unknown layer: {0}")]
    UnknownLayer(String),

    #[error("Source still referenced by a layer: {0}")]
    SourceInUse(String),

    #[error("Rejected by map: {0}")]
    Rejected(String),

    #[error("Duplicate project id: {0}")]
    DuplicateProject(String),
}

/// Initializes `env_logger` with `info` as the default level.
/// Returns false if a logger was already installed.
#[cfg(feature = "debug")]
pub fn init_logging() -> bool {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init()
        .is_ok()
}
