//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts it into the arena DOM.

use floatlabel_dom::{Document, DomTree, NodeId};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::HtmlResult;

/// HTML5 parser
#[derive(Debug, Default)]
pub struct HtmlParser;

impl HtmlParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> HtmlResult<Document> {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a document URL.
    ///
    /// The returned document is still `Loading`; call
    /// [`Document::finish_parsing`] to fire `DOMContentLoaded`.
    pub fn parse_with_url(&self, html: &str, url: &str) -> HtmlResult<Document> {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = parse_document(RcDom::default(), Default::default()).one(html);

        let mut document = Document::empty(url);
        self.convert_children(&dom.document, document.tree_mut(), NodeId::ROOT, false)?;
        document.finalize();

        tracing::debug!("Parsed {} nodes", document.tree().len());
        Ok(document)
    }

    fn convert_children(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId, keep_whitespace: bool) -> HtmlResult<()> {
        for child in handle.children.borrow().iter() {
            self.convert_node(child, tree, parent, keep_whitespace)?;
        }
        Ok(())
    }

    /// Convert an RcDom node and its subtree
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId, keep_whitespace: bool) -> HtmlResult<()> {
        match &handle.data {
            RcNodeData::Document => self.convert_children(handle, tree, parent, false)?,
            RcNodeData::Doctype { name, .. } => {
                let id = tree.create_doctype(name);
                tree.append_child(parent, id)?;
            }
            RcNodeData::Text { contents } => {
                let text = contents.borrow();
                // Whitespace is only content inside textareas.
                if keep_whitespace || !text.trim().is_empty() {
                    let id = tree.create_text(&text);
                    tree.append_child(parent, id)?;
                }
            }
            RcNodeData::Comment { contents } => {
                let id = tree.create_comment(contents);
                tree.append_child(parent, id)?;
            }
            RcNodeData::Element { name, attrs, .. } => {
                let tag: &str = &name.local;
                let id = tree.create_element(tag);
                let elem = tree.try_element_mut(id)?;
                for attr in attrs.borrow().iter() {
                    let attr_name: &str = &attr.name.local;
                    elem.set_attr(attr_name, attr.value.to_string());
                }
                tree.append_child(parent, id)?;
                self.convert_children(handle, tree, id, tag == "textarea")?;
            }
            RcNodeData::ProcessingInstruction { .. } => {}
        }
        Ok(())
    }
}
