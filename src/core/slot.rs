use crate::traits::MapFacade;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared accessor for a map instance that may not exist yet.
///
/// Components hold a clone of the slot and look the map up on every use, so
/// a map attached (or replaced) later is picked up without rewiring.
#[derive(Clone, Default)]
pub struct MapSlot {
    inner: Rc<RefCell<Option<Rc<dyn MapFacade>>>>,
}

impl MapSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_map(map: Rc<dyn MapFacade>) -> Self {
        let slot = Self::new();
        slot.attach(map);
        slot
    }

    /// Installs a map, returning the one it replaced
    pub fn attach(&self, map: Rc<dyn MapFacade>) -> Option<Rc<dyn MapFacade>> {
        self.inner.borrow_mut().replace(map)
    }

    pub fn detach(&self) -> Option<Rc<dyn MapFacade>> {
        self.inner.borrow_mut().take()
    }

    pub fn get(&self) -> Option<Rc<dyn MapFacade>> {
        self.inner.borrow().clone()
    }

    pub fn is_attached(&self) -> bool {
        self.inner.borrow().is_some()
    }
}

impl std::fmt::Debug for MapSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapSlot")
            .field("attached", &self.is_attached())
            .finish()
    }
}
