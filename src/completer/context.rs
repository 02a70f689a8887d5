//! Line tokenizer and context resolver
//!
//! Turns the current line and cursor offset into a [`LineContext`]: which
//! command node the cursor is inside, which flags have been used, which
//! parameter (if any) is open and awaiting a value, and the fragment being
//! typed. A quoting error in the line yields `None` and downstream stays
//! silent.

use crate::registry::{CommandNode, ParamSpec, Registry, ValueKind};

/// Resolved editing state for one completion request.
#[derive(Debug)]
pub struct LineContext<'r> {
    /// Deepest command node the typed path reaches.
    pub node: &'r CommandNode,
    /// Flag-shaped raw tokens anywhere on the line.
    pub used_flags: Vec<String>,
    /// The parameter whose value the cursor is in, when one is open.
    pub active_param: Option<&'r ParamSpec>,
    /// Partially typed text immediately before the cursor.
    pub incomplete: String,
    pub cursor_at_end: bool,
}

/// Resolve the completion context at `cursor`. Returns `None` when the
/// text before the cursor fails shell lexing (unbalanced quote).
pub fn resolve<'r>(line: &str, cursor: usize, registry: &'r Registry) -> Option<LineContext<'r>> {
    let cursor = cursor.min(line.len());
    // A cursor inside a multi-byte character cannot be split on; treat it
    // like any other unresolvable input and stay silent.
    if !line.is_char_boundary(cursor) {
        return None;
    }
    let before = &line[..cursor];

    // The lexed token list is authoritative for path resolution.
    let mut lexed = shlex::split(before)?;

    // A cursor directly after non-whitespace means the last token is the
    // fragment still being typed.
    let incomplete = if !before.is_empty() && before.trim_end() == before {
        lexed.pop().unwrap_or_default()
    } else {
        String::new()
    };

    let node = registry.resolve(lexed.iter().map(String::as_str));

    let used_flags: Vec<String> = line
        .split(' ')
        .filter(|token| token.starts_with('-'))
        .map(str::to_string)
        .collect();

    let cursor_at_end = cursor == line.len();
    // The token preceding the fragment decides the open parameter. It must
    // come from the lexed list, not a raw split: a quoted value containing
    // a space is one lexed token but several raw ones.
    let last_flag = if cursor_at_end {
        lexed.last().cloned()
    } else {
        closest_flag_before_cursor(before, cursor, node)
    };

    let active_param = last_flag
        .and_then(|flag| node.param_by_flag(&flag))
        // Boolean switches consume no value, so they never open a slot.
        .filter(|param| !matches!(param.kind, ValueKind::Flag));

    Some(LineContext {
        node,
        used_flags,
        active_param,
        incomplete,
        cursor_at_end,
    })
}

/// Mid-line variant: among flag tokens the node declares, pick the one
/// positionally closest before the cursor. A strict-less comparison keeps
/// the earliest-seen token on equal distance, which matches parameter
/// declaration order.
fn closest_flag_before_cursor(
    before: &str,
    cursor: usize,
    node: &CommandNode,
) -> Option<String> {
    let mut best: Option<(usize, &str)> = None;
    let mut offset = 0;
    for token in before.split(' ') {
        if token.starts_with('-') && node.param_by_flag(token).is_some() {
            let distance = cursor - offset;
            if best.is_none_or(|(d, _)| distance < d) {
                best = Some((distance, token));
            }
        }
        offset += token.len() + 1;
    }
    best.map(|(_, token)| token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::standard_registry;

    fn ctx<'r>(registry: &'r Registry, line: &str) -> LineContext<'r> {
        resolve(line, line.len(), registry).unwrap()
    }

    #[test]
    fn test_unbalanced_quote_yields_none_anywhere() {
        let registry = standard_registry();
        let line = "metrics search --keyword \"net inc";
        for cursor in 26..=line.len() {
            assert!(resolve(line, cursor, &registry).is_none());
        }
    }

    #[test]
    fn test_path_resolution_descends_groups() {
        let registry = standard_registry();
        let context = ctx(&registry, "price plot ");
        assert_eq!(context.node.name, "plot");
        assert!(context.incomplete.is_empty());
        assert!(context.active_param.is_none());
    }

    #[test]
    fn test_incomplete_fragment_is_popped() {
        let registry = standard_registry();
        let context = ctx(&registry, "price cha");
        assert_eq!(context.node.name, "price");
        assert_eq!(context.incomplete, "cha");
    }

    #[test]
    fn test_trailing_flag_opens_its_parameter() {
        let registry = standard_registry();
        let context = ctx(&registry, "price compare --tickers ");
        let param = context.active_param.unwrap();
        assert_eq!(param.long, "--tickers");
        assert!(context.incomplete.is_empty());
    }

    #[test]
    fn test_flag_with_partial_value() {
        let registry = standard_registry();
        let context = ctx(&registry, "price compare --tickers AAP");
        assert_eq!(context.active_param.unwrap().long, "--tickers");
        assert_eq!(context.incomplete, "AAP");
    }

    #[test]
    fn test_short_spelling_opens_same_parameter() {
        let registry = standard_registry();
        let context = ctx(&registry, "price plot -k AAP");
        assert_eq!(context.active_param.unwrap().long, "--ticker");
    }

    #[test]
    fn test_boolean_flag_opens_nothing() {
        let registry = standard_registry();
        let context = ctx(&registry, "clear --all ");
        assert!(context.active_param.is_none());
    }

    #[test]
    fn test_unknown_token_stops_the_walk() {
        let registry = standard_registry();
        let context = ctx(&registry, "price bogus chart ");
        assert_eq!(context.node.name, "price");
    }

    #[test]
    fn test_used_flags_collected_from_whole_line() {
        let registry = standard_registry();
        let context = ctx(&registry, "price compare --tickers AAPL --period 1M x");
        assert_eq!(context.used_flags, ["--tickers", "--period"]);
    }

    #[test]
    fn test_mid_line_picks_closest_preceding_flag() {
        let registry = standard_registry();
        let line = "price compare --tickers AAP --period 1M";
        // Cursor just after "AAP": --tickers is the closest flag before it.
        let cursor = line.find("AAP").unwrap() + 3;
        let context = resolve(line, cursor, &registry).unwrap();
        assert_eq!(context.active_param.unwrap().long, "--tickers");
        assert_eq!(context.incomplete, "AAP");
        assert!(!context.cursor_at_end);
    }

    #[test]
    fn test_quoted_value_lexes_as_one_token() {
        let registry = standard_registry();
        let context = ctx(&registry, "watchlist details --name \"Tech Giants\"");
        assert_eq!(context.incomplete, "Tech Giants");
        assert_eq!(context.active_param.unwrap().long, "--name");
    }

    #[test]
    fn test_quoted_multiword_value_does_not_break_later_flags() {
        let registry = standard_registry();
        let context = ctx(&registry, "watchlist add --name \"My List\" --tickers AAP");
        assert_eq!(context.active_param.unwrap().long, "--tickers");
        assert_eq!(context.incomplete, "AAP");

        // A completed quoted value closes the slot again.
        let context = ctx(&registry, "watchlist details --name \"Tech Giants\" ");
        assert!(context.active_param.is_none());
    }

    #[test]
    fn test_cursor_inside_multibyte_char_yields_none() {
        let registry = standard_registry();
        let line = "company search --keyword Café";
        let inside = line.len() - 1;
        assert!(!line.is_char_boundary(inside));
        assert!(resolve(line, inside, &registry).is_none());
        assert!(resolve(line, line.len(), &registry).is_some());
    }
}
