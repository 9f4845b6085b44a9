pub mod events;
pub mod tracker;

// Re-export the essential types
pub use events::{MapEvent, MapEventKind};
pub use tracker::InteractionTracker;
