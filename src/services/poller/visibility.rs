use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Listener invoked with the new `hidden` flag.
pub type VisibilityListener = Arc<dyn Fn(bool) + Send + Sync>;

/// Handle returned by [`PageVisibilitySource::on_change`], used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Where the poller learns whether its consumer is currently looking.
pub trait PageVisibilitySource: Send + Sync {
    fn is_hidden(&self) -> bool;

    /// Register a listener for visibility changes. It stays registered until
    /// [`remove_listener`](Self::remove_listener) is called with the returned id.
    fn on_change(&self, listener: VisibilityListener) -> ListenerId;

    /// Unregister a listener. Unknown ids are ignored.
    fn remove_listener(&self, id: ListenerId);
}

/// Source that never reports hidden and never changes.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysVisible;

impl PageVisibilitySource for AlwaysVisible {
    fn is_hidden(&self) -> bool {
        false
    }

    fn on_change(&self, _listener: VisibilityListener) -> ListenerId {
        ListenerId(0)
    }

    fn remove_listener(&self, _id: ListenerId) {}
}

/// Visibility flag flipped explicitly, by tests or by the status surface.
#[derive(Default)]
pub struct ManualVisibility {
    hidden: AtomicBool,
    next_id: AtomicU64,
    listeners: Mutex<Vec<(ListenerId, VisibilityListener)>>,
}

impl ManualVisibility {
    pub fn new(hidden: bool) -> Self {
        Self {
            hidden: AtomicBool::new(hidden),
            next_id: AtomicU64::new(0),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Update the flag and notify listeners. Setting the current value is a no-op.
    pub fn set_hidden(&self, hidden: bool) {
        if self.hidden.swap(hidden, Ordering::SeqCst) == hidden {
            return;
        }

        tracing::debug!(hidden, "Visibility changed");

        // Notify outside the lock so listeners may call back into the source
        let listeners: Vec<VisibilityListener> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        for listener in listeners {
            listener(hidden);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl PageVisibilitySource for ManualVisibility {
    fn is_hidden(&self) -> bool {
        self.hidden.load(Ordering::SeqCst)
    }

    fn on_change(&self, listener: VisibilityListener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, listener));
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(existing, _)| *existing != id);
    }
}
