//! Hover-target store
//!
//! Holds the id of the project currently under the pointer. The store is owned
//! by the host UI; the preview manager only observes `(old, new)` transitions
//! and reads the live value.
//!
//! A watcher may write the store. The nested change is queued and delivered
//! once the current transition has reached every watcher, so transitions
//! are always observed one at a time and in order.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

/// Watcher invoked with `(old, new)` on every change
pub type HoverCallback = Rc<dyn Fn(Option<&str>, Option<&str>)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(pub u64);

#[derive(Default)]
struct HoverInner {
    current: RefCell<Option<String>>,
    watchers: RefCell<Vec<(WatchId, HoverCallback)>>,
    next_id: Cell<u64>,
    /// Transitions not yet delivered, oldest first
    queue: RefCell<VecDeque<(Option<String>, Option<String>)>>,
    dispatching: Cell<bool>,
}

#[derive(Clone, Default)]
pub struct HoverStore {
    inner: Rc<HoverInner>,
}

impl HoverStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live hover target
    pub fn get(&self) -> Option<String> {
        self.inner.current.borrow().clone()
    }

    pub fn is(&self, id: Option<&str>) -> bool {
        self.inner.current.borrow().as_deref() == id
    }

    /// Replaces the hover target and notifies watchers when it changed
    pub fn set<S: Into<String>>(&self, target: Option<S>) {
        let new = target.map(Into::into);
        let old = {
            let mut current = self.inner.current.borrow_mut();
            if *current == new {
                return;
            }
            std::mem::replace(&mut *current, new.clone())
        };

        self.inner.queue.borrow_mut().push_back((old, new));
        if self.inner.dispatching.replace(true) {
            return;
        }
        self.drain();
    }

    fn drain(&self) {
        loop {
            let next = self.inner.queue.borrow_mut().pop_front();
            let Some((old, new)) = next else {
                break;
            };
            let watchers: Vec<HoverCallback> = self
                .inner
                .watchers
                .borrow()
                .iter()
                .map(|(_, callback)| callback.clone())
                .collect();
            for watcher in watchers {
                watcher(old.as_deref(), new.as_deref());
            }
        }
        self.inner.dispatching.set(false);
    }

    pub fn hover(&self, id: &str) {
        self.set(Some(id));
    }

    pub fn clear(&self) {
        self.set(None::<String>);
    }

    pub fn subscribe(&self, callback: HoverCallback) -> WatchId {
        let id = WatchId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner.watchers.borrow_mut().push((id, callback));
        id
    }

    pub fn unsubscribe(&self, id: WatchId) {
        self.inner.watchers.borrow_mut().retain(|(w, _)| *w != id);
    }

    pub fn watcher_count(&self) -> usize {
        self.inner.watchers.borrow().len()
    }
}

impl std::fmt::Debug for HoverStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HoverStore")
            .field("current", &self.get())
            .field("watchers", &self.watcher_count())
            .finish()
    }
}
