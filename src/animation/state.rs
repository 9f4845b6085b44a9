use std::cell::Cell;

/// Flags gating the idle rotation, shared between the interaction tracker,
/// the session and the animation scheduler
#[derive(Debug, Default)]
pub struct AnimationState {
    user_interacting: Cell<bool>,
    hovering_project: Cell<bool>,
    /// Timestamp of the last applied rotation step, in milliseconds
    last_applied: Cell<f64>,
}

impl AnimationState {
    pub fn new(user_interacting: bool) -> Self {
        Self {
            user_interacting: Cell::new(user_interacting),
            ..Self::default()
        }
    }

    pub fn is_user_interacting(&self) -> bool {
        self.user_interacting.get()
    }

    pub fn set_user_interacting(&self, interacting: bool) {
        self.user_interacting.set(interacting);
    }

    pub fn is_hovering_project(&self) -> bool {
        self.hovering_project.get()
    }

    pub fn set_hovering_project(&self, hovering: bool) {
        self.hovering_project.set(hovering);
    }

    /// True when nothing holds the rotation back
    pub fn is_idle(&self) -> bool {
        !self.user_interacting.get() && !self.hovering_project.get()
    }

    pub fn last_applied(&self) -> f64 {
        self.last_applied.get()
    }

    pub fn mark_applied(&self, timestamp: f64) {
        self.last_applied.set(timestamp);
    }
}
