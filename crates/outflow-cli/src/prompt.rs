//! Minimal stdin prompting shared by the interactive commands.

use std::io::{self, BufRead, Write};

/// Ask for one line of input; returns the trimmed answer.
pub(crate) fn line(label: &str) -> anyhow::Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim().to_owned())
}

/// Yes/no question; empty input means no.
pub(crate) fn confirm(question: &str) -> anyhow::Result<bool> {
    let answer = line(&format!("{question} [y/N]"))?;
    Ok(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Ask for an index into a list of `len` options; retries until valid, or
/// returns `None` if the user enters nothing.
pub(crate) fn index(label: &str, len: usize) -> anyhow::Result<Option<usize>> {
    loop {
        let answer = line(label)?;
        if answer.is_empty() {
            return Ok(None);
        }
        match answer.parse::<usize>() {
            Ok(n) if n >= 1 && n <= len => return Ok(Some(n - 1)),
            _ => println!("enter a number between 1 and {len}, or nothing to go back"),
        }
    }
}
