//! Subscriber registry for session notifications.
//!
//! Replaces engine-style delegate binding with an explicit mapping from
//! event kind to an ordered handler list, invoked synchronously while the
//! coordinator pumps completions.

use std::collections::HashMap;

use session_shared::{EventKind, SessionEvent};

type Handler = Box<dyn FnMut(&SessionEvent) + Send>;

/// Ordered per-event-kind handler lists.
#[derive(Default)]
pub struct Subscribers {
    handlers: HashMap<EventKind, Vec<Handler>>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for one event kind. Handlers for the same kind
    /// run in registration order.
    pub fn subscribe(&mut self, kind: EventKind, handler: Handler) {
        self.handlers.entry(kind).or_default().push(handler);
    }

    /// Invokes every handler registered for the event's kind.
    pub fn dispatch(&mut self, event: &SessionEvent) {
        if let Some(handlers) = self.handlers.get_mut(&event.kind()) {
            for handler in handlers.iter_mut() {
                handler(event);
            }
        }
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map(Vec::len).unwrap_or(0)
    }
}
