pub mod filter;
pub mod manager;
pub mod registry;

pub use filter::Filter;
pub use manager::{LayerLifecycleManager, LoadingCallback};
pub use registry::{LayerSpec, ProjectConfig, ProjectLayerConfig, ProjectRegistry, SourceSpec};
