//! Line editor integration
//!
//! Adapts the completion and suggestion engines to the line editor's
//! `Helper` traits: tab completion from the engine, ghost-text hints from
//! the suggester, dimmed hint rendering, and no input validation.

use std::borrow::Cow;
use std::rc::Rc;

use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use crate::completer::engine::Engine;
use crate::completer::suggest::Suggester;

pub struct ShellHelper {
    engine: Engine,
    suggester: Suggester,
}

impl ShellHelper {
    pub fn new(engine: Engine, suggester: Suggester) -> Self {
        Self { engine, suggester }
    }
}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let items = self.engine.completions(line, pos);
        // All items of one request share the same replacement span.
        let start = pos.saturating_sub(items.first().map_or(0, |item| item.span));
        let pairs = items
            .into_iter()
            .map(|item| {
                let display = if item.description.is_empty() {
                    item.text.clone()
                } else {
                    format!("{}  {}", item.text, item.description)
                };
                Pair {
                    display,
                    replacement: item.text,
                }
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for ShellHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        self.suggester.suggestion(line, pos)
    }
}

impl Highlighter for ShellHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(format!("\x1b[2m{hint}\x1b[0m"))
    }
}

impl Validator for ShellHelper {}

impl Helper for ShellHelper {}

pub fn shell_helper(
    registry: Rc<crate::registry::Registry>,
    store: Rc<crate::catalog::CatalogStore>,
) -> ShellHelper {
    let engine = Engine::new(registry.clone(), store);
    let suggester = Suggester::new(registry);
    ShellHelper::new(engine, suggester)
}
