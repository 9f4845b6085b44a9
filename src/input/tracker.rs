use crate::{
    animation::state::AnimationState,
    input::events::MapEventKind,
    traits::{ListenerId, MapFacade},
};
use std::cell::RefCell;
use std::rc::Rc;

struct Binding {
    map: Rc<dyn MapFacade>,
    listeners: Vec<ListenerId>,
}

/// Mirrors gesture start/end events onto the shared interaction flag.
///
/// Handlers are bound once per map instance and kept so they can be
/// detached when the instance is replaced or the tracker is dropped.
/// An end event clears the flag immediately; there is no release delay.
pub struct InteractionTracker {
    state: Rc<AnimationState>,
    binding: RefCell<Option<Binding>>,
}

impl InteractionTracker {
    pub fn new(state: Rc<AnimationState>) -> Self {
        Self {
            state,
            binding: RefCell::new(None),
        }
    }

    /// Binds the gesture handlers to `map`.
    ///
    /// Returns false when no map is available yet; the caller retries once
    /// it is. Binding the same instance twice is a no-op, binding a
    /// different one first detaches from the previous instance.
    pub fn setup(&self, map: Option<Rc<dyn MapFacade>>) -> bool {
        let Some(map) = map else {
            log::debug!("interaction tracking deferred: map not initialized");
            return false;
        };

        if let Some(binding) = self.binding.borrow().as_ref() {
            if Rc::ptr_eq(&binding.map, &map) {
                return true;
            }
        }
        self.detach();

        let mut listeners = Vec::with_capacity(
            MapEventKind::INTERACTION_START.len() + MapEventKind::INTERACTION_END.len(),
        );
        for kind in MapEventKind::INTERACTION_START {
            let state = self.state.clone();
            listeners.push(map.on(
                kind,
                Rc::new(move |_| state.set_user_interacting(true)),
            ));
        }
        for kind in MapEventKind::INTERACTION_END {
            let state = self.state.clone();
            listeners.push(map.on(
                kind,
                Rc::new(move |_| state.set_user_interacting(false)),
            ));
        }

        log::debug!("bound {} interaction handlers", listeners.len());
        *self.binding.borrow_mut() = Some(Binding { map, listeners });
        true
    }

    /// Removes every handler from the bound map, if any
    pub fn detach(&self) {
        let Some(binding) = self.binding.borrow_mut().take() else {
            return;
        };
        for id in binding.listeners {
            binding.map.off(id);
        }
        log::debug!("interaction handlers detached");
    }

    pub fn is_bound(&self) -> bool {
        self.binding.borrow().is_some()
    }

    pub fn is_user_interacting(&self) -> bool {
        self.state.is_user_interacting()
    }
}

impl Drop for InteractionTracker {
    fn drop(&mut self) {
        self.detach();
    }
}
