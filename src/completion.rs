//! # Shell Completion Module
//!
//! Generates completion scripts for the supported shells through
//! clap_complete.
//!
//! ## Usage
//!
//! ```bash
//! # Generate bash completions
//! tasteradio completion bash > ~/.local/share/bash-completion/completions/tasteradio
//!
//! # Generate zsh completions
//! tasteradio completion zsh > ~/.config/zsh/completions/_tasteradio
//! ```

use crate::cli::Shell;
use clap::Command;
use clap_complete::{generate, Generator, Shell as CompletionShell};
use std::io::{self, Write};

/// Write the completion script for `gen` into `out`.
pub fn write_completions<G: Generator>(gen: G, cmd: &mut Command, out: &mut dyn Write) {
    let name = cmd.get_name().to_string();
    generate(gen, cmd, name, out);
}

/// Generate shell completions for the given shell on stdout
pub fn generate_completions<G: Generator>(gen: G, cmd: &mut Command) {
    write_completions(gen, cmd, &mut io::stdout());
}

/// Map our CLI shell enum onto clap_complete's
#[must_use]
pub const fn shell_to_completion_shell(shell: Shell) -> CompletionShell {
    match shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    }
}
