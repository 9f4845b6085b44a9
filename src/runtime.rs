//! Frame scheduling abstraction
//!
//! The animation loop never blocks: it asks a [`FrameHost`] for the next
//! frame and is called back with a timestamp. Hosts are provided for manual
//! stepping (tests, headless use), for a tokio `LocalSet`, and for the
//! browser's `requestAnimationFrame`.

use crate::prelude::HashMap;
use std::cell::{Cell, RefCell};

/// Callback run on the next frame with a timestamp in milliseconds
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Handle to a requested frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub u64);

/// A trait for requesting one-shot frame callbacks
pub trait FrameHost {
    /// Schedule `callback` for the next frame
    fn request_frame(&self, callback: FrameCallback) -> FrameId;

    /// Cancel a pending frame; unknown or already-run ids are ignored
    fn cancel_frame(&self, id: FrameId);
}

/// Frame host stepped explicitly by the caller
#[derive(Default)]
pub struct ManualFrameHost {
    pending: RefCell<Vec<(FrameId, FrameCallback)>>,
    next_id: Cell<u64>,
}

impl ManualFrameHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs every callback pending at call time with `timestamp`.
    ///
    /// Frames requested by those callbacks wait for the next call.
    pub fn run_frame(&self, timestamp: f64) -> usize {
        let due = std::mem::take(&mut *self.pending.borrow_mut());
        let count = due.len();
        for (_, callback) in due {
            callback(timestamp);
        }
        count
    }

    pub fn pending_frames(&self) -> usize {
        self.pending.borrow().len()
    }
}

impl FrameHost for ManualFrameHost {
    fn request_frame(&self, callback: FrameCallback) -> FrameId {
        let id = FrameId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.pending.borrow_mut().push((id, callback));
        id
    }

    fn cancel_frame(&self, id: FrameId) {
        self.pending.borrow_mut().retain(|(pending, _)| *pending != id);
    }
}

/// Default host implementations
pub mod hosts {
    use super::*;

    #[cfg(feature = "tokio-runtime")]
    pub mod tokio_impl {
        use super::*;
        use ::tokio::task::JoinHandle;
        use ::tokio::time::{sleep, Duration, Instant};
        use std::rc::Rc;

        /// Frame host backed by `tokio::task::spawn_local`.
        ///
        /// Must be used from inside a `LocalSet`. Each frame is a local task
        /// sleeping for one interval; cancelling aborts the task.
        pub struct LocalFrameHost {
            origin: Instant,
            interval: Duration,
            tasks: Rc<RefCell<HashMap<FrameId, JoinHandle<()>>>>,
            next_id: Cell<u64>,
        }

        impl LocalFrameHost {
            pub fn new(interval: Duration) -> Self {
                Self {
                    origin: Instant::now(),
                    interval,
                    tasks: Rc::new(RefCell::new(HashMap::default())),
                    next_id: Cell::new(0),
                }
            }

            pub fn pending_frames(&self) -> usize {
                self.tasks.borrow().len()
            }
        }

        impl FrameHost for LocalFrameHost {
            fn request_frame(&self, callback: FrameCallback) -> FrameId {
                let id = FrameId(self.next_id.get());
                self.next_id.set(id.0 + 1);

                let origin = self.origin;
                let interval = self.interval;
                let tasks = self.tasks.clone();
                let handle = ::tokio::task::spawn_local(async move {
                    sleep(interval).await;
                    tasks.borrow_mut().remove(&id);
                    callback(origin.elapsed().as_secs_f64() * 1000.0);
                });
                self.tasks.borrow_mut().insert(id, handle);
                id
            }

            fn cancel_frame(&self, id: FrameId) {
                if let Some(handle) = self.tasks.borrow_mut().remove(&id) {
                    handle.abort();
                }
            }
        }

        impl Drop for LocalFrameHost {
            fn drop(&mut self) {
                for (_, handle) in self.tasks.borrow_mut().drain() {
                    handle.abort();
                }
            }
        }
    }

    #[cfg(feature = "wasm")]
    pub mod web {
        use super::*;
        use wasm_bindgen::closure::Closure;
        use wasm_bindgen::JsCast;

        /// Frame host driven by `window.requestAnimationFrame`
        pub struct WebFrameHost {
            window: Option<web_sys::Window>,
            next_id: Cell<u64>,
            raf_ids: std::rc::Rc<RefCell<HashMap<FrameId, i32>>>,
        }

        impl WebFrameHost {
            pub fn new() -> Self {
                Self {
                    window: web_sys::window(),
                    next_id: Cell::new(0),
                    raf_ids: Default::default(),
                }
            }
        }

        impl Default for WebFrameHost {
            fn default() -> Self {
                Self::new()
            }
        }

        impl FrameHost for WebFrameHost {
            fn request_frame(&self, callback: FrameCallback) -> FrameId {
                let id = FrameId(self.next_id.get());
                self.next_id.set(id.0 + 1);

                let Some(window) = self.window.as_ref() else {
                    log::warn!("requestAnimationFrame unavailable: no window");
                    return id;
                };

                let raf_ids = self.raf_ids.clone();
                let closure = Closure::once_into_js(move |timestamp: f64| {
                    raf_ids.borrow_mut().remove(&id);
                    callback(timestamp);
                });
                match window.request_animation_frame(closure.unchecked_ref()) {
                    Ok(raf_id) => {
                        self.raf_ids.borrow_mut().insert(id, raf_id);
                    }
                    Err(e) => log::warn!("requestAnimationFrame failed: {:?}", e),
                }
                id
            }

            fn cancel_frame(&self, id: FrameId) {
                if let Some(raf_id) = self.raf_ids.borrow_mut().remove(&id) {
                    if let Some(window) = self.window.as_ref() {
                        if let Err(e) = window.cancel_animation_frame(raf_id) {
                            log::warn!("cancelAnimationFrame failed: {:?}", e);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(feature = "tokio-runtime")]
pub use hosts::tokio_impl::LocalFrameHost;

#[cfg(feature = "wasm")]
pub use hosts::web::WebFrameHost;
