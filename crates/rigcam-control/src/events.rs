//! Lock-cancellation observers

use std::fmt;

use crate::lock::LockTarget;

/// Handle returned by [`LockCancelObservers::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&LockTarget)>;

/// Listeners called synchronously, in registration order, when a lock is
/// cancelled. Each receives the lock target that was active, which is
/// [`LockTarget::None`] if nothing was locked.
#[derive(Default)]
pub struct LockCancelObservers {
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u64,
}

impl LockCancelObservers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&LockTarget) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener; returns whether it was registered
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn notify(&mut self, previous: &LockTarget) {
        for (_, listener) in &mut self.listeners {
            listener(previous);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for LockCancelObservers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockCancelObservers")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
