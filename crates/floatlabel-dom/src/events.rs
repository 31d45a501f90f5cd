//! DOM Events
//!
//! Event objects, listener identity and the per-document listener registry.
//! Dispatch itself lives on [`Document`](crate::Document) because handlers
//! receive the document mutably.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{Document, NodeId};

/// Event type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    KeyDown,
    KeyUp,
    Input,
    Change,
    Focus,
    Blur,
    Click,
    DomContentLoaded,
    ReadyStateChange,
    Load,
}

impl EventType {
    /// DOM event name
    pub fn name(self) -> &'static str {
        match self {
            Self::KeyDown => "keydown",
            Self::KeyUp => "keyup",
            Self::Input => "input",
            Self::Change => "change",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::Click => "click",
            Self::DomContentLoaded => "DOMContentLoaded",
            Self::ReadyStateChange => "readystatechange",
            Self::Load => "load",
        }
    }

    /// Check if this event type bubbles
    pub fn bubbles(self) -> bool {
        !matches!(self, Self::Focus | Self::Blur | Self::Load | Self::ReadyStateChange)
    }

    /// Check if listeners may cancel the default action
    pub fn cancelable(self) -> bool {
        matches!(self, Self::KeyDown | Self::KeyUp | Self::Click)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Dispatch phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventPhase {
    #[default]
    None,
    Capturing,
    AtTarget,
    Bubbling,
}

/// DOM event
#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: EventType,
    /// Node the event was dispatched at
    pub target: NodeId,
    /// Node whose listeners are running
    pub current_target: NodeId,
    pub phase: EventPhase,
    pub bubbles: bool,
    pub cancelable: bool,
    default_prevented: bool,
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
}

impl Event {
    /// Create an event with the platform defaults for `event_type`
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            target: NodeId::NONE,
            current_target: NodeId::NONE,
            phase: EventPhase::None,
            bubbles: event_type.bubbles(),
            cancelable: event_type.cancelable(),
            default_prevented: false,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
        }
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Stop after the listeners of the current node
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop before the next listener, even on the current node
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn is_immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped
    }
}

/// Something that reacts to dispatched events
pub trait EventHandler {
    fn handle_event(&self, document: &mut Document, event: &mut Event);
}

impl<F> EventHandler for F
where
    F: Fn(&mut Document, &mut Event),
{
    fn handle_event(&self, document: &mut Document, event: &mut Event) {
        self(document, event)
    }
}

/// Listener identity. Adding the same id twice to one target, type and
/// phase registers it once; removal goes through the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(pub u64);

impl HandlerId {
    /// Allocate a process-unique id
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Listener options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Run during the capture phase
    pub capture: bool,
    /// Remove after the first invocation
    pub once: bool,
}

impl ListenerOptions {
    pub fn once() -> Self {
        Self { capture: false, once: true }
    }

    pub fn capture() -> Self {
        Self { capture: true, once: false }
    }
}

#[derive(Clone)]
pub(crate) struct Listener {
    pub handler_id: HandlerId,
    pub handler: Rc<dyn EventHandler>,
    pub capture: bool,
    pub once: bool,
}

/// Listeners by (target, event type), in registration order
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    listeners: HashMap<(NodeId, EventType), Vec<Listener>>,
}

impl ListenerRegistry {
    pub fn add(
        &mut self,
        target: NodeId,
        event_type: EventType,
        handler_id: HandlerId,
        handler: Rc<dyn EventHandler>,
        options: ListenerOptions,
    ) -> bool {
        let list = self.listeners.entry((target, event_type)).or_default();
        if list.iter().any(|l| l.handler_id == handler_id && l.capture == options.capture) {
            return false;
        }
        list.push(Listener {
            handler_id,
            handler,
            capture: options.capture,
            once: options.once,
        });
        true
    }

    pub fn remove(&mut self, target: NodeId, event_type: EventType, handler_id: HandlerId, capture: bool) -> bool {
        let key = (target, event_type);
        let Some(list) = self.listeners.get_mut(&key) else {
            return false;
        };
        let before = list.len();
        list.retain(|l| !(l.handler_id == handler_id && l.capture == capture));
        let removed = list.len() != before;
        if list.is_empty() {
            self.listeners.remove(&key);
        }
        removed
    }

    pub fn contains(&self, target: NodeId, event_type: EventType, handler_id: HandlerId, capture: bool) -> bool {
        self.listeners
            .get(&(target, event_type))
            .is_some_and(|list| list.iter().any(|l| l.handler_id == handler_id && l.capture == capture))
    }

    pub fn count(&self, target: NodeId, event_type: EventType) -> usize {
        self.listeners.get(&(target, event_type)).map_or(0, Vec::len)
    }

    /// Listeners registered for one phase, cloned so handlers may mutate
    /// the registry while running
    pub fn snapshot(&self, target: NodeId, event_type: EventType, capture: Option<bool>) -> Vec<Listener> {
        self.listeners
            .get(&(target, event_type))
            .map(|list| {
                list.iter()
                    .filter(|l| capture.is_none_or(|c| l.capture == c))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Rc<dyn EventHandler> {
        Rc::new(|_: &mut Document, _: &mut Event| {})
    }

    #[test]
    fn test_event_defaults() {
        let input = Event::new(EventType::Input);
        assert!(input.bubbles);
        assert!(!input.cancelable);

        let focus = Event::new(EventType::Focus);
        assert!(!focus.bubbles);
    }

    #[test]
    fn test_prevent_default_needs_cancelable() {
        let mut input = Event::new(EventType::Input);
        input.prevent_default();
        assert!(!input.is_default_prevented());

        let mut key = Event::new(EventType::KeyUp);
        key.prevent_default();
        assert!(key.is_default_prevented());
    }

    #[test]
    fn test_handler_ids_unique() {
        assert_ne!(HandlerId::next(), HandlerId::next());
    }

    #[test]
    fn test_registry_dedup_and_remove() {
        let mut registry = ListenerRegistry::default();
        let target = NodeId(3);
        let id = HandlerId::next();

        assert!(registry.add(target, EventType::Input, id, noop(), ListenerOptions::default()));
        assert!(!registry.add(target, EventType::Input, id, noop(), ListenerOptions::default()));
        assert!(registry.add(target, EventType::Input, id, noop(), ListenerOptions::capture()));
        assert_eq!(registry.count(target, EventType::Input), 2);

        assert!(registry.remove(target, EventType::Input, id, false));
        assert!(!registry.remove(target, EventType::Input, id, false));
        assert!(registry.contains(target, EventType::Input, id, true));
        assert_eq!(registry.snapshot(target, EventType::Input, Some(false)).len(), 0);
    }
}
