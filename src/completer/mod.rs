//! Interactive shell completion
//!
//! Four layers: [`context`] resolves the line and cursor into a command
//! context, [`engine`] turns a context into the ranked completion list,
//! [`suggest`] produces the single inline ghost-text hint, and
//! [`readline`] wires both into the line editor.

pub mod context;
pub mod engine;
pub mod readline;
pub mod suggest;

pub use context::LineContext;
pub use engine::{CompletionItem, Engine};
pub use readline::{shell_helper, ShellHelper};
pub use suggest::Suggester;
