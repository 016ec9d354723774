use crate::domain::ports::Confirm;
use std::io::{BufRead, Write};

/// Prints the discovered files and asks for a yes/no answer on standard input.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, paths: &[String]) -> bool {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        ask(paths, &mut stdin.lock(), &mut stdout.lock())
    }
}

/// Used for `--yes`.
pub struct AutoConfirm;

impl Confirm for AutoConfirm {
    fn confirm(&self, paths: &[String]) -> bool {
        tracing::info!("Auto-confirmed transfer of {} files", paths.len());
        true
    }
}

fn ask<R: BufRead, W: Write>(paths: &[String], input: &mut R, output: &mut W) -> bool {
    let _ = writeln!(output, "Found {} files:", paths.len());
    for (i, path) in paths.iter().enumerate() {
        let _ = writeln!(output, "  {:>4}. {}", i + 1, path);
    }
    let _ = write!(output, "Download and convert these files? [y/N] ");
    let _ = output.flush();

    let mut answer = String::new();
    if input.read_line(&mut answer).is_err() {
        return false;
    }
    is_affirmative(&answer)
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
