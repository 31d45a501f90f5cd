//! Label synchronizer
//!
//! Binds `keyup`/`input` listeners (per input, or once on `<body>` when
//! delegating) and keeps each text control's `<label for>` carrying the
//! floating class exactly while the control has a value.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use floatlabel_dom::{Document, Event, EventHandler, EventType, HandlerId, ListenerOptions, NodeId, ReadyState};
use serde_json::Value;

use crate::controls::{find_label, is_text_control, text_control_selector};
use crate::{Config, MissingLabel, Result};

/// Events after which a label is recomputed
pub const SYNC_EVENTS: [EventType; 2] = [EventType::KeyUp, EventType::Input];

/// Outcome of one scan pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Text controls visited
    pub scanned: usize,
    /// Controls that got their own listeners
    pub bound: usize,
    /// Controls without a label
    pub skipped: usize,
    /// Labels left floating
    pub floating: usize,
    /// Delegated listeners were attached by this pass
    pub delegated: bool,
    /// A missing label ended the pass early
    pub stopped_early: bool,
}

/// State shared between the synchronizer handle and its listeners
#[derive(Debug)]
struct Shared {
    config: RefCell<Config>,
    /// Delegated listeners attached; goes false -> true once
    delegated: Cell<bool>,
    /// Identity of every listener this synchronizer registers
    handler_id: HandlerId,
}

/// Floating label synchronizer for one document context.
///
/// Cloning yields another handle to the same configuration and listeners.
#[derive(Debug, Clone)]
pub struct LabelSynchronizer {
    shared: Rc<Shared>,
}

impl LabelSynchronizer {
    pub fn new() -> Self {
        Self::from_valid_config(Config::default())
    }

    /// Synchronizer over `config`, rejected if the class name is not a single token
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: Config) -> Self {
        Self {
            shared: Rc::new(Shared {
                config: RefCell::new(config),
                delegated: Cell::new(false),
                handler_id: HandlerId::next(),
            }),
        }
    }

    /// Snapshot of the current configuration
    pub fn config(&self) -> Config {
        self.shared.config.borrow().clone()
    }

    /// Whether the delegated listeners have been attached
    pub fn events_delegated(&self) -> bool {
        self.shared.delegated.get()
    }

    /// Listener identity used for every registration
    pub fn handler_id(&self) -> HandlerId {
        self.shared.handler_id
    }

    /// Merge `options` into the configuration and schedule the scan.
    ///
    /// While the document is loading the scan waits for `DOMContentLoaded`;
    /// otherwise it runs immediately.
    pub fn init(&self, document: &mut Document, options: &Value) -> Result<()> {
        let applied = self.shared.config.borrow_mut().apply_options(options);
        {
            let config = self.shared.config.borrow();
            tracing::info!(
                "floating labels initialized: class `{}`, delegate {} ({} options applied)",
                config.floating_class_name,
                config.delegate_events,
                applied
            );
        }

        if document.ready_state() == ReadyState::Loading {
            let added = document.add_event_listener(
                NodeId::ROOT,
                EventType::DomContentLoaded,
                self.shared.handler_id,
                self.listener(),
                ListenerOptions::once(),
            )?;
            if added {
                tracing::debug!("{}: scan deferred until DOMContentLoaded", document.url());
            }
            Ok(())
        } else {
            self.scan_and_bind(document).map(|_| ())
        }
    }

    /// Evaluate every text control now and (re)bind listeners
    pub fn scan_and_bind(&self, document: &mut Document) -> Result<ScanReport> {
        scan_and_bind(&self.shared, document)
    }

    fn listener(&self) -> Rc<dyn EventHandler> {
        listener(&self.shared)
    }
}

impl Default for LabelSynchronizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Add or remove `class_name` on `label` depending on whether `input`
/// currently holds a value. Returns true if the label now carries the class.
pub fn set_label_state(document: &mut Document, input: NodeId, label: NodeId, class_name: &str) -> Result<bool> {
    let has_value = document.control_value(input).is_some_and(|value| !value.is_empty());
    if has_value {
        document.add_class(label, class_name)?;
    } else {
        document.remove_class(label, class_name)?;
    }
    Ok(document.has_class(label, class_name))
}

fn listener(shared: &Rc<Shared>) -> Rc<dyn EventHandler> {
    Rc::new(SyncListener {
        shared: Rc::clone(shared),
    })
}

fn scan_and_bind(shared: &Rc<Shared>, document: &mut Document) -> Result<ScanReport> {
    let config = shared.config.borrow().clone();
    let handler_id = shared.handler_id;
    let mut report = ScanReport::default();

    for input in document.select_all(&text_control_selector()) {
        report.scanned += 1;

        let Some(label) = find_label(document, input) else {
            report.skipped += 1;
            match config.missing_label {
                MissingLabel::SkipInput => {
                    tracing::trace!("{:?} has no label, skipped", input);
                    continue;
                }
                MissingLabel::StopScan => {
                    tracing::debug!("{:?} has no label, stopping scan", input);
                    report.stopped_early = true;
                    break;
                }
            }
        };

        if set_label_state(document, input, label, &config.floating_class_name)? {
            report.floating += 1;
        }

        for event_type in SYNC_EVENTS {
            document.remove_event_listener(input, event_type, handler_id, false);
        }
        if !config.delegate_events {
            for event_type in SYNC_EVENTS {
                document.add_event_listener(input, event_type, handler_id, listener(shared), ListenerOptions::default())?;
            }
            report.bound += 1;
        }
    }

    if config.delegate_events && !shared.delegated.get() {
        let body = document.body();
        let target = if body.is_valid() {
            body
        } else {
            tracing::warn!("{}: no <body>, delegating on the document", document.url());
            NodeId::ROOT
        };
        for event_type in SYNC_EVENTS {
            document.add_event_listener(target, event_type, handler_id, listener(shared), ListenerOptions::default())?;
        }
        shared.delegated.set(true);
        report.delegated = true;
    }

    tracing::debug!(
        "{}: scanned {} controls, {} bound, {} without label, {} floating",
        document.url(),
        report.scanned,
        report.bound,
        report.skipped,
        report.floating
    );
    Ok(report)
}

/// Listener registered on inputs, `<body>` and the document
struct SyncListener {
    shared: Rc<Shared>,
}

impl SyncListener {
    fn sync_target(&self, document: &mut Document, event: &Event) {
        let target = event.target;

        // A delegated listener leaves inputs with their own listener alone.
        if event.current_target != target
            && document.has_event_listener(target, event.event_type, self.shared.handler_id, false)
        {
            return;
        }

        let Some(label) = find_label(document, target) else {
            return;
        };
        if !is_text_control(document, target) {
            return;
        }

        let class_name = self.shared.config.borrow().floating_class_name.clone();
        match set_label_state(document, target, label, &class_name) {
            Ok(floating) => tracing::trace!("{} on {:?}: floating = {}", event.event_type, target, floating),
            Err(err) => tracing::warn!("failed to update label for {:?}: {}", target, err),
        }
    }
}

impl EventHandler for SyncListener {
    fn handle_event(&self, document: &mut Document, event: &mut Event) {
        match event.event_type {
            EventType::DomContentLoaded => {
                if let Err(err) = scan_and_bind(&self.shared, document) {
                    tracing::warn!("floating label scan failed: {}", err);
                }
            }
            EventType::KeyUp | EventType::Input => self.sync_target(document, event),
            _ => {}
        }
    }
}
