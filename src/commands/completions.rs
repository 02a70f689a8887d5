//! Shell completion script generation

use anyhow::{bail, Result};
use clap::Command;
use clap_complete::{generate, Shell as CompletionShell};
use std::io;
use std::str::FromStr;

/// Shells we emit completion scripts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
}

impl Shell {
    fn generator(self) -> CompletionShell {
        match self {
            Shell::Bash => CompletionShell::Bash,
            Shell::Zsh => CompletionShell::Zsh,
            Shell::Fish => CompletionShell::Fish,
        }
    }
}

impl FromStr for Shell {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "bash" => Ok(Shell::Bash),
            "zsh" => Ok(Shell::Zsh),
            "fish" => Ok(Shell::Fish),
            _ => bail!("unknown shell '{s}' (expected bash, zsh, or fish)"),
        }
    }
}

/// Write the completion script for `shell` to stdout.
pub fn generate_completions(shell: Shell, command: &mut Command) -> Result<()> {
    let name = command.get_name().to_string();
    generate(shell.generator(), command, name, &mut io::stdout());
    Ok(())
}
