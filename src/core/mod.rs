pub mod config;
pub mod constants;
pub mod geo;
pub mod map;
pub mod slot;

pub use config::{AnimationConfig, PreviewConfig, RotationProfile, SessionConfig};
pub use geo::LatLng;
pub use map::HeadlessMap;
pub use slot::MapSlot;
