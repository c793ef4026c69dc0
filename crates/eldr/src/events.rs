//! Notification primitives: [`Event`] and [`EventDispatcher`].
//!
//! [`Event`] is a named signal with a subscriber list — used for things like
//! a [`Space`](crate::space::Space) announcing a resize. [`EventDispatcher`]
//! is its typed cousin: listeners subscribe to an event *name* and receive a
//! payload, which is the adapter shape external runtimes (UI layers, vector
//! animation players) expect.
//!
//! Listeners are plain `FnMut` closures. The engine is single-threaded
//! cooperative, so no synchronization is needed; subscribers run inline when
//! the event is raised.

use std::collections::HashMap;

/// A named signal with zero or more subscribers.
pub struct Event {
    name: String,
    listeners: Vec<Box<dyn FnMut()>>,
}

impl Event {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            listeners: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a subscriber. Subscribers stay attached for the event's lifetime.
    pub fn subscribe(&mut self, listener: impl FnMut() + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Invoke every subscriber once, in subscription order.
    pub fn raise(&mut self) {
        for listener in &mut self.listeners {
            listener();
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl std::fmt::Debug for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Event")
            .field("name", &self.name)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Token returned by [`EventDispatcher::add_listener`], used to remove a
/// listener again. Closures have no identity of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

/// Dispatches typed payloads to listeners keyed by event name.
pub struct EventDispatcher<T> {
    listeners: HashMap<String, Vec<(ListenerId, Box<dyn FnMut(&T)>)>>,
    next_id: u64,
}

impl<T> EventDispatcher<T> {
    pub fn new() -> Self {
        Self {
            listeners: HashMap::new(),
            next_id: 0,
        }
    }

    /// Subscribe to events of the given name.
    pub fn add_listener(&mut self, name: &str, listener: impl FnMut(&T) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners
            .entry(name.to_string())
            .or_default()
            .push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. No-op if the token is unknown.
    pub fn remove_listener(&mut self, name: &str, id: ListenerId) {
        if let Some(entries) = self.listeners.get_mut(name) {
            entries.retain(|(entry_id, _)| *entry_id != id);
        }
    }

    /// Dispatch a payload to every listener of `name`, in subscription order.
    pub fn dispatch(&mut self, name: &str, payload: &T) {
        if let Some(entries) = self.listeners.get_mut(name) {
            for (_, listener) in entries {
                listener(payload);
            }
        }
    }

    pub fn listener_count(&self, name: &str) -> usize {
        self.listeners.get(name).map_or(0, Vec::len)
    }
}

impl<T> Default for EventDispatcher<T> {
    fn default() -> Self {
        Self::new()
    }
}
