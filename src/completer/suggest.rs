//! Inline ghost-text suggestions
//!
//! Where the completion list offers candidates, the suggestion engine
//! offers at most one string: the remaining template of a structured
//! value. It only ever fires with the cursor at end-of-line and a
//! parameter open, and it goes quiet once every structured part has been
//! typed.

use std::rc::Rc;

use crate::completer::context;
use crate::composite;
use crate::registry::{Registry, ValueKind};

const DATE_TEMPLATE: &str = "YYYY-MM-DD";

pub struct Suggester {
    registry: Rc<Registry>,
}

impl Suggester {
    pub fn new(registry: Rc<Registry>) -> Self {
        Self { registry }
    }

    /// The ghost text to render after the cursor, if any.
    pub fn suggestion(&self, line: &str, cursor: usize) -> Option<String> {
        let context = context::resolve(line, cursor, &self.registry)?;
        if !context.cursor_at_end {
            return None;
        }
        let param = context.active_param?;
        let fragment = composite::active_list_segment(&context.incomplete);
        match &param.kind {
            ValueKind::Date => date_remainder(fragment),
            ValueKind::FinancialsIdentifier => financials_template(fragment),
            ValueKind::MetricIdentifier => metric_template(fragment),
            ValueKind::Path { extensions } => path_template(fragment, extensions),
            _ => None,
        }
    }
}

/// The untyped tail of the date pattern.
fn date_remainder(fragment: &str) -> Option<String> {
    if fragment.len() < DATE_TEMPLATE.len() {
        Some(DATE_TEMPLATE[fragment.len()..].to_string())
    } else {
        None
    }
}

/// Placeholders shrink as separators are typed; a fully separated
/// identifier has nothing left to suggest.
fn financials_template(fragment: &str) -> Option<String> {
    match fragment.matches('-').count() {
        0 if fragment.is_empty() => Some("Ticker-[Fiscal Year]-[Fiscal Period]".to_string()),
        0 => Some("-[Fiscal Year]-[Fiscal Period]".to_string()),
        1 => Some("-[Fiscal Period]".to_string()),
        _ => None,
    }
}

fn metric_template(fragment: &str) -> Option<String> {
    if fragment.contains('.') {
        None
    } else if fragment.is_empty() {
        Some("Metric.[Optional Period]".to_string())
    } else {
        Some(".[Optional Period]".to_string())
    }
}

fn path_template(fragment: &str, extensions: &[&str]) -> Option<String> {
    if fragment.is_empty() {
        Some(format!("[path]/[filename].[{}]", extensions.join("|")))
    } else {
        None
    }
}
