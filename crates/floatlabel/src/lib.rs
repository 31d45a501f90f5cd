//! floatlabel
//!
//! Keeps `<label>` elements in sync with their text inputs: while an input
//! holds a value its label carries a class (`floating` by default), giving
//! the "floating label" effect.
//!
//! # Example
//! ```rust,ignore
//! use floatlabel::LabelSynchronizer;
//!
//! let mut document = floatlabel_html::parse(html)?;
//! let labels = LabelSynchronizer::new();
//! labels.init(&mut document, &serde_json::json!({ "delegateEvents": true }))?;
//! document.finish_parsing(); // DOMContentLoaded runs the scan
//! ```

mod config;
mod controls;
mod error;
mod synchronizer;

pub use config::{Config, DEFAULT_FLOATING_CLASS, MissingLabel};
pub use controls::{TEXT_INPUT_TYPES, find_label, is_text_control, text_control_selector};
pub use error::{Error, Result};
pub use synchronizer::{LabelSynchronizer, SYNC_EVENTS, ScanReport, set_label_state};
