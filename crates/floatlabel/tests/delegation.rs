//! Delegated listeners on <body>

use floatlabel::{LabelSynchronizer, SYNC_EVENTS};
use floatlabel_dom::{Document, EventType, NodeId, ReadyState};
use serde_json::json;

const FORM: &str = r#"
<body>
  <label for="q">Search</label>
  <input id="q" type="search">
</body>
"#;

fn loaded() -> Document {
    let mut doc = floatlabel_html::parse(FORM).unwrap();
    doc.finish_loading();
    doc
}

#[test]
fn test_delegated_listeners_attached_once() {
    let mut doc = loaded();
    let sync = LabelSynchronizer::new();

    sync.init(&mut doc, &json!({ "delegateEvents": true })).unwrap();
    sync.init(&mut doc, &json!({ "delegateEvents": true })).unwrap();
    let report = sync.scan_and_bind(&mut doc).unwrap();

    assert!(sync.events_delegated());
    assert!(!report.delegated, "already delegated before this pass");
    for event_type in SYNC_EVENTS {
        assert_eq!(doc.listener_count(doc.body(), event_type), 1);
    }
    let q = doc.get_element_by_id("q").unwrap();
    assert_eq!(doc.listener_count(q, EventType::Input), 0);
}

#[test]
fn test_delegated_events_update_labels() {
    let mut doc = loaded();
    LabelSynchronizer::new()
        .init(&mut doc, &json!({ "delegateEvents": true }))
        .unwrap();

    let q = doc.get_element_by_id("q").unwrap();
    let label = floatlabel::find_label(&doc, q).unwrap();

    doc.edit_control(q, "rust").unwrap();
    assert!(doc.has_class(label, "floating"));

    doc.edit_control(q, "").unwrap();
    assert!(!doc.has_class(label, "floating"));
}

#[test]
fn test_delegation_covers_controls_added_later() {
    let mut doc = loaded();
    LabelSynchronizer::new()
        .init(&mut doc, &json!({ "delegateEvents": true }))
        .unwrap();

    let body = doc.body();
    let label = doc.append_element(body, "label", &[("for", "late")]).unwrap();
    let late = doc.append_element(body, "input", &[("id", "late"), ("type", "tel")]).unwrap();

    doc.edit_control(late, "555").unwrap();
    assert!(doc.has_class(label, "floating"));
}

#[test]
fn test_per_input_mode_ignores_controls_added_later() {
    let mut doc = loaded();
    let sync = LabelSynchronizer::new();
    sync.init(&mut doc, &json!({})).unwrap();

    let body = doc.body();
    let label = doc.append_element(body, "label", &[("for", "late")]).unwrap();
    let late = doc.append_element(body, "input", &[("id", "late"), ("type", "text")]).unwrap();

    doc.edit_control(late, "x").unwrap();
    assert!(!doc.has_class(label, "floating"));

    sync.scan_and_bind(&mut doc).unwrap();
    assert!(doc.has_class(label, "floating"));
}

#[test]
fn test_switching_to_delegation_does_not_double_fire() {
    let mut doc = loaded();
    let sync = LabelSynchronizer::new();
    sync.init(&mut doc, &json!({ "delegateEvents": true })).unwrap();
    // Back to per-input listeners; the body listeners stay attached.
    sync.init(&mut doc, &json!({ "delegateEvents": false })).unwrap();

    let q = doc.get_element_by_id("q").unwrap();
    assert_eq!(doc.listener_count(q, EventType::Input), 1);
    assert_eq!(doc.listener_count(doc.body(), EventType::Input), 1);

    doc.edit_control(q, "x").unwrap();
    let label = floatlabel::find_label(&doc, q).unwrap();
    assert!(doc.has_class(label, "floating"));
}

#[test]
fn test_document_without_body_delegates_on_document() {
    let mut doc = Document::empty("test://bare");
    let form = doc.append_element(NodeId::ROOT, "form", &[]).unwrap();
    let label = doc.append_element(form, "label", &[("for", "n")]).unwrap();
    let input = doc.append_element(form, "input", &[("id", "n"), ("type", "text")]).unwrap();
    doc.set_ready_state(ReadyState::Complete);

    let sync = LabelSynchronizer::new();
    sync.init(&mut doc, &json!({ "delegateEvents": true })).unwrap();
    assert_eq!(doc.listener_count(NodeId::ROOT, EventType::KeyUp), 1);

    doc.edit_control(input, "x").unwrap();
    assert!(doc.has_class(label, "floating"));
}
