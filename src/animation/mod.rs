pub mod scheduler;
pub mod state;

// Re-export commonly used types for convenience
pub use scheduler::AnimationScheduler;
pub use state::AnimationState;
