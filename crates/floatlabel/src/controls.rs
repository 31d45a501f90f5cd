//! Text controls and their labels

use floatlabel_dom::{AttributeMatch, CompoundSelector, Document, InputType, NodeId, Selector};

/// `<input type>` values that float their label
pub const TEXT_INPUT_TYPES: [&str; 7] = ["text", "password", "email", "search", "url", "tel", "number"];

/// `input[type="text"], ..., textarea`
pub fn text_control_selector() -> Selector {
    let inputs = TEXT_INPUT_TYPES.iter().map(|ty| CompoundSelector {
        tag: Some("input".to_string()),
        attributes: vec![AttributeMatch::Equals("type".to_string(), (*ty).to_string())],
        ..Default::default()
    });
    let textarea = CompoundSelector {
        tag: Some("textarea".to_string()),
        ..Default::default()
    };
    Selector::from_compounds(inputs.chain(std::iter::once(textarea)).collect())
}

/// `<textarea>`, or an `<input>` whose `type` attribute names a text-like type
pub fn is_text_control(document: &Document, node: NodeId) -> bool {
    let Some(elem) = document.tree().element(node) else {
        return false;
    };
    if elem.is("textarea") {
        return true;
    }
    elem.is("input")
        && elem
            .get_attr("type")
            .and_then(InputType::from_keyword)
            .is_some_and(InputType::is_text_like)
}

/// `label[for="<id>"]` for the control's id; controls without an id have no label
pub fn find_label(document: &Document, control: NodeId) -> Option<NodeId> {
    let id = document.get_attribute(control, "id").filter(|id| !id.is_empty())?;
    document.select_first(&Selector::attribute_equals("label", "for", id))
}
