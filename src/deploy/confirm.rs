use colored::Colorize;
use std::io::{self, BufRead, Write};

/// Gate in front of every state-changing transaction.
pub trait Confirm: Send + Sync {
    /// `true` to go ahead with `action`.
    fn approve(&self, action: &str) -> bool;
}

/// Approves everything (`--yes`, CI).
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoApprove;

impl Confirm for AutoApprove {
    fn approve(&self, _action: &str) -> bool {
        true
    }
}

/// Asks on stdin; only `y` or `yes` approves. EOF declines.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinPrompt;

impl Confirm for StdinPrompt {
    fn approve(&self, action: &str) -> bool {
        print!("  {} {} [y/N] ", "CONFIRM".yellow().bold(), action);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => false,
            Ok(_) => is_yes(&line),
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
