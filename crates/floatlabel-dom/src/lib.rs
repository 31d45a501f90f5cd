//! floatlabel DOM - Document Object Model
//!
//! Arena-based DOM tree with the element class, attribute and event APIs
//! form widgets are written against.

mod classlist;
mod document;
mod error;
mod events;
mod forms;
mod node;
mod selector;
mod tree;

pub use classlist::DOMTokenList;
pub use document::{Document, ReadyState};
pub use error::{DomError, DomResult};
pub use events::{Event, EventHandler, EventPhase, EventType, HandlerId, ListenerOptions};
pub use forms::InputType;
pub use node::{Attribute, ElementData, Node, NodeData};
pub use selector::{AttributeMatch, CompoundSelector, Selector};
pub use tree::DomTree;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID (the document node)
    pub const ROOT: NodeId = NodeId(0);

    /// Null node ID
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this ID refers to a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Raw arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
