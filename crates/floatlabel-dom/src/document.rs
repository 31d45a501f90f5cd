//! Document - High-level document API
//!
//! Wraps the [`DomTree`] with everything page scripts touch: element
//! lookup, attributes and classes, form control values, event listeners
//! and the loading lifecycle.

use std::rc::Rc;

use crate::events::ListenerRegistry;
use crate::{
    DOMTokenList, DomError, DomResult, DomTree, Event, EventHandler, EventPhase, EventType, HandlerId,
    ListenerOptions, NodeId, Selector,
};

/// `document.readyState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    /// Still being parsed
    Loading,
    /// Parsed, `DOMContentLoaded` fired
    Interactive,
    /// Fully loaded
    Complete,
}

impl ReadyState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Interactive => "interactive",
            Self::Complete => "complete",
        }
    }
}

/// HTML Document
pub struct Document {
    /// The DOM tree
    tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
    ready_state: ReadyState,
    listeners: ListenerRegistry,
}

impl Document {
    /// Create a complete document with an html/head/body skeleton
    pub fn new(url: &str) -> Self {
        let mut doc = Self::empty(url);
        let html = doc.tree.create_element("html");
        let head = doc.tree.create_element("head");
        let body = doc.tree.create_element("body");

        // Freshly created nodes under the root cannot violate the hierarchy.
        let _ = doc.tree.append_child(NodeId::ROOT, html);
        let _ = doc.tree.append_child(html, head);
        let _ = doc.tree.append_child(html, body);

        doc.html_element = html;
        doc.head_element = head;
        doc.body_element = body;
        doc.ready_state = ReadyState::Complete;
        doc
    }

    /// Create a document with no structure, still `Loading`
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
            ready_state: ReadyState::Loading,
            listeners: ListenerRegistry::default(),
        }
    }

    /// Re-locate html/head/body after the tree was built externally
    pub fn finalize(&mut self) {
        self.html_element = self.find_child_element(NodeId::ROOT, "html");
        self.head_element = self.find_child_element(self.html_element, "head");
        self.body_element = self.find_child_element(self.html_element, "body");
    }

    fn find_child_element(&self, parent: NodeId, tag: &str) -> NodeId {
        self.tree
            .children(parent)
            .find(|(_, node)| node.as_element().is_some_and(|e| e.is(tag)))
            .map_or(NodeId::NONE, |(id, _)| id)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// Create an element with attributes and append it to `parent`
    pub fn append_element(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> DomResult<NodeId> {
        let id = self.tree.create_element(tag);
        let elem = self.tree.try_element_mut(id)?;
        for (name, value) in attrs {
            elem.set_attr(name, *value);
        }
        self.tree.append_child(parent, id)
    }

    // --- Queries ---

    /// First element in document order with the given id
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(NodeId::ROOT)
            .find(|&node| self.tree.element(node).and_then(|e| e.id()) == Some(id))
    }

    /// All elements matching `selector`, in document order
    pub fn select_all(&self, selector: &Selector) -> Vec<NodeId> {
        self.tree
            .descendants(NodeId::ROOT)
            .filter(|&node| self.tree.element(node).is_some_and(|e| selector.matches(e)))
            .collect()
    }

    /// First element matching `selector`
    pub fn select_first(&self, selector: &Selector) -> Option<NodeId> {
        self.tree
            .descendants(NodeId::ROOT)
            .find(|&node| self.tree.element(node).is_some_and(|e| selector.matches(e)))
    }

    /// `document.querySelector`
    pub fn query_selector(&self, selector: &str) -> DomResult<Option<NodeId>> {
        Ok(self.select_first(&Selector::parse(selector)?))
    }

    /// `document.querySelectorAll`
    pub fn query_selector_all(&self, selector: &str) -> DomResult<Vec<NodeId>> {
        Ok(self.select_all(&Selector::parse(selector)?))
    }

    // --- Attributes and classes ---

    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.tree.element(node)?.get_attr(name)
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> DomResult<()> {
        self.tree.try_element_mut(node)?.set_attr(name, value);
        Ok(())
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> DomResult<Option<String>> {
        Ok(self.tree.try_element_mut(node)?.remove_attr(name))
    }

    pub fn class_list(&self, node: NodeId) -> Option<&DOMTokenList> {
        self.tree.element(node).map(|e| e.class_list())
    }

    /// `el.classList.add`. Returns true if the class list changed.
    pub fn add_class(&mut self, node: NodeId, class: &str) -> DomResult<bool> {
        Ok(self.tree.try_element_mut(node)?.add_class(class))
    }

    /// `el.classList.remove`. Returns true if the class list changed.
    pub fn remove_class(&mut self, node: NodeId, class: &str) -> DomResult<bool> {
        Ok(self.tree.try_element_mut(node)?.remove_class(class))
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.tree.element(node).is_some_and(|e| e.has_class(class))
    }

    // --- Form controls ---

    /// Current value of an `<input>` or `<textarea>`, `None` for anything else
    pub fn control_value(&self, node: NodeId) -> Option<String> {
        let elem = self.tree.element(node)?;
        if let Some(value) = elem.dirty_value() {
            return Some(value.to_string());
        }
        if elem.is("input") {
            Some(elem.get_attr("value").unwrap_or_default().to_string())
        } else if elem.is("textarea") {
            Some(self.tree.text_content(node))
        } else {
            None
        }
    }

    /// Set a control's value without firing events (`el.value = ...`)
    pub fn set_control_value(&mut self, node: NodeId, value: &str) -> DomResult<()> {
        let elem = self.tree.try_element_mut(node)?;
        if !elem.is_form_control() {
            return Err(DomError::NotAFormControl(node));
        }
        elem.set_dirty_value(value);
        Ok(())
    }

    /// Apply a user edit: set the value, then fire `input` and `keyup`
    pub fn edit_control(&mut self, node: NodeId, value: &str) -> DomResult<()> {
        self.set_control_value(node, value)?;
        self.dispatch_event(node, Event::new(EventType::Input))?;
        self.dispatch_event(node, Event::new(EventType::KeyUp))?;
        Ok(())
    }

    // --- Events ---

    /// `addEventListener`. Returns false if the listener was already present.
    pub fn add_event_listener(
        &mut self,
        target: NodeId,
        event_type: EventType,
        handler_id: HandlerId,
        handler: Rc<dyn EventHandler>,
        options: ListenerOptions,
    ) -> DomResult<bool> {
        self.tree.get(target).ok_or(DomError::NotFound(target))?;
        Ok(self.listeners.add(target, event_type, handler_id, handler, options))
    }

    /// `removeEventListener`. Returns true if a listener was removed.
    pub fn remove_event_listener(
        &mut self,
        target: NodeId,
        event_type: EventType,
        handler_id: HandlerId,
        capture: bool,
    ) -> bool {
        self.listeners.remove(target, event_type, handler_id, capture)
    }

    pub fn has_event_listener(&self, target: NodeId, event_type: EventType, handler_id: HandlerId, capture: bool) -> bool {
        self.listeners.contains(target, event_type, handler_id, capture)
    }

    /// Number of listeners for `event_type` on `target`, both phases
    pub fn listener_count(&self, target: NodeId, event_type: EventType) -> usize {
        self.listeners.count(target, event_type)
    }

    /// `dispatchEvent`: capture from the document down, at target, then
    /// bubble back up. Returns false if a listener cancelled the event.
    pub fn dispatch_event(&mut self, target: NodeId, mut event: Event) -> DomResult<bool> {
        self.tree.get(target).ok_or(DomError::NotFound(target))?;
        event.target = target;

        // Path is fixed before any listener runs.
        let path: Vec<NodeId> = self.tree.ancestors(target).collect();
        tracing::trace!("dispatch {} at {:?} (path depth {})", event.event_type, target, path.len());

        event.phase = EventPhase::Capturing;
        for &node in path.iter().rev() {
            self.invoke_listeners(node, &mut event, Some(true));
            if event.is_propagation_stopped() {
                break;
            }
        }

        if !event.is_propagation_stopped() {
            event.phase = EventPhase::AtTarget;
            self.invoke_listeners(target, &mut event, None);
        }

        if event.bubbles && !event.is_propagation_stopped() {
            event.phase = EventPhase::Bubbling;
            for &node in &path {
                self.invoke_listeners(node, &mut event, Some(false));
                if event.is_propagation_stopped() {
                    break;
                }
            }
        }

        event.phase = EventPhase::None;
        event.current_target = NodeId::NONE;
        Ok(!event.is_default_prevented())
    }

    fn invoke_listeners(&mut self, node: NodeId, event: &mut Event, capture: Option<bool>) {
        let event_type = event.event_type;
        for listener in self.listeners.snapshot(node, event_type, capture) {
            if event.is_immediate_propagation_stopped() {
                break;
            }
            // An earlier listener may have removed this one.
            if !self.listeners.contains(node, event_type, listener.handler_id, listener.capture) {
                continue;
            }
            if listener.once {
                self.listeners.remove(node, event_type, listener.handler_id, listener.capture);
            }
            event.current_target = node;
            listener.handler.handle_event(self, event);
        }
    }

    fn dispatch_at_document(&mut self, event_type: EventType) {
        if let Err(err) = self.dispatch_event(NodeId::ROOT, Event::new(event_type)) {
            tracing::warn!("failed to dispatch {}: {}", event_type, err);
        }
    }

    // --- Lifecycle ---

    /// `document.readyState`
    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    /// Change the ready state and fire `readystatechange` at the document
    pub fn set_ready_state(&mut self, state: ReadyState) {
        if state == self.ready_state {
            return;
        }
        tracing::debug!("{}: readyState {} -> {}", self.url, self.ready_state.as_str(), state.as_str());
        self.ready_state = state;
        self.dispatch_at_document(EventType::ReadyStateChange);
    }

    /// End of parsing: become `Interactive` and fire `DOMContentLoaded`
    pub fn finish_parsing(&mut self) {
        if self.ready_state != ReadyState::Loading {
            return;
        }
        self.set_ready_state(ReadyState::Interactive);
        self.dispatch_at_document(EventType::DomContentLoaded);
    }

    /// End of loading: become `Complete` and fire `load`
    pub fn finish_loading(&mut self) {
        self.finish_parsing();
        if self.ready_state != ReadyState::Interactive {
            return;
        }
        self.set_ready_state(ReadyState::Complete);
        self.dispatch_at_document(EventType::Load);
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}
