//! Interactive shell
//!
//! The read loop owns the line editor and dispatches entered lines
//! against the command registry. Completion never interrupts the loop:
//! the helper degrades to silence on any internal failure, and command
//! errors are printed and swallowed.

use std::path::Path;
use std::rc::Rc;

use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

use crate::catalog::CatalogStore;
use crate::client::HttpDataApi;
use crate::completer::shell_helper;
use crate::config::AppConfig;
use crate::registry::{standard_registry, CommandNode, Registry};
use crate::LOGO;

const PROMPT: &str = "finterm> ";

enum Outcome {
    Continue,
    Exit,
}

/// Run the interactive shell until exit.
pub fn run(config: &AppConfig, settings_dir: &Path) -> Result<()> {
    let api = HttpDataApi::new(&config.api.base_url)?;
    let store = Rc::new(CatalogStore::new(
        Box::new(api),
        settings_dir,
        config.cache.age_hours,
        config.metric_views.clone(),
    ));
    let registry = Rc::new(standard_registry());

    banner();

    let mut editor: Editor<_, DefaultHistory> = Editor::new()?;
    editor.set_helper(Some(shell_helper(registry.clone(), store.clone())));

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(&line);
                match dispatch(&line, &registry, &store) {
                    Ok(Outcome::Exit) => break,
                    Ok(Outcome::Continue) => {}
                    Err(e) => println!("{} {e:#}", "Error:".red()),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

fn banner() {
    println!("{}", LOGO.cyan());
    println!(
        "Welcome to {} v{} - use TAB for suggestions, 'exit' to quit.\n",
        "finterm".bold(),
        env!("CARGO_PKG_VERSION")
    );
}

fn dispatch(line: &str, registry: &Registry, store: &CatalogStore) -> Result<Outcome> {
    let Some(tokens) = shlex::split(line) else {
        println!("{}", "Unbalanced quote in input.".yellow());
        return Ok(Outcome::Continue);
    };
    let words: Vec<&str> = tokens.iter().map(String::as_str).collect();

    match words.as_slice() {
        [] => Ok(Outcome::Continue),
        ["exit" | "quit", ..] => Ok(Outcome::Exit),
        ["help", ..] => {
            println!("Available commands:");
            for child in &registry.root().children {
                println!("  {:<12} {}", child.name.bold(), child.help);
            }
            Ok(Outcome::Continue)
        }
        ["version", ..] => {
            println!("finterm v{}", env!("CARGO_PKG_VERSION"));
            Ok(Outcome::Continue)
        }
        ["clear", ..] => {
            // ANSI clear screen and home the cursor.
            print!("\x1b[2J\x1b[1;1H");
            Ok(Outcome::Continue)
        }
        ["metrics", "search", rest @ ..] => {
            metrics_search(store, flag_value(rest, "--keyword", "-k").unwrap_or(""));
            Ok(Outcome::Continue)
        }
        ["metrics", "describe", rest @ ..] => {
            match flag_value(rest, "--name", "-n") {
                Some(name) => metrics_describe(store, name),
                None => println!("{}", "Usage: metrics describe --name <metric>".yellow()),
            }
            Ok(Outcome::Continue)
        }
        ["watchlist", "list", ..] => {
            watchlist_list(store);
            Ok(Outcome::Continue)
        }
        ["screen", "profiles", ..] => {
            screen_profiles(store);
            Ok(Outcome::Continue)
        }
        path => {
            let node = registry.resolve(path.iter().copied());
            if node.is_group() {
                print_group_help(node);
            } else if node.name.is_empty() {
                println!("{} {}", "Unknown command:".yellow(), line);
            } else {
                println!(
                    "{}",
                    "This command requires a connected data session and is not available here."
                        .yellow()
                );
            }
            Ok(Outcome::Continue)
        }
    }
}

/// The value token following a flag spelling, if present.
fn flag_value<'a>(words: &'a [&'a str], long: &str, short: &str) -> Option<&'a str> {
    words
        .iter()
        .position(|w| *w == long || *w == short)
        .and_then(|i| words.get(i + 1))
        .copied()
}

fn print_group_help(node: &CommandNode) {
    if !node.help.is_empty() {
        println!("{}", node.help);
    }
    println!("Subcommands:");
    for child in &node.children {
        println!("  {:<12} {}", child.name.bold(), child.help);
    }
}

fn metrics_search(store: &CatalogStore, keyword: &str) {
    let keyword = keyword.to_lowercase();
    let rows: Vec<_> = store
        .metric_rows()
        .into_iter()
        .filter(|row| {
            row.metric_name.to_lowercase().contains(&keyword)
                || row.display_name.to_lowercase().contains(&keyword)
        })
        .collect();
    if rows.is_empty() {
        println!("No metrics matched '{keyword}'.");
        return;
    }
    for row in rows {
        println!("  {:<32} {}", row.metric_name.bold(), row.display_name);
    }
}

fn metrics_describe(store: &CatalogStore, name: &str) {
    let Some(row) = store.metric_metadata(name) else {
        println!("Metric '{name}' not found.");
        return;
    };
    println!("{}", row.display_name.bold());
    println!("  name:        {}", row.metric_name);
    println!("  type:        {}", row.kind);
    println!("  data format: {}", row.data_format);
    if let Some(unit) = row.unit {
        println!("  unit:        {unit}");
    }
    if let Some(period) = row.period_type_default {
        println!("  default period type: {period}");
    }
}

fn watchlist_list(store: &CatalogStore) {
    let lists = store.watchlists();
    if lists.is_empty() {
        println!("You have no watchlists.");
        return;
    }
    for (name, tickers) in lists {
        println!("  {:<24} {}", name.bold(), tickers.join(", "));
    }
}

fn screen_profiles(store: &CatalogStore) {
    let profiles = store.catalog(crate::registry::CatalogKind::ScreeningProfile);
    if profiles.is_empty() {
        println!("No screening profiles available.");
        return;
    }
    for profile in profiles {
        println!("  {:<24} {}", profile.value.bold(), profile.description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_value_accepts_both_spellings() {
        let words = ["--keyword", "net", "--other", "x"];
        assert_eq!(flag_value(&words, "--keyword", "-k"), Some("net"));
        let words = ["-k", "net"];
        assert_eq!(flag_value(&words, "--keyword", "-k"), Some("net"));
        assert_eq!(flag_value(&["-k"], "--keyword", "-k"), None);
    }
}
