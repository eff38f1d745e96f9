pub mod ask;
pub mod catalog;
pub mod config;
pub mod copilot;

use std::io::{self, Write};

use crate::error::AppResult;

/// Prints `label` and reads one line from stdin. `None` means stdin is closed.
pub(crate) fn read_line(label: &str) -> AppResult<Option<String>> {
    let mut stdout = io::stdout();
    write!(stdout, "{label}")?;
    stdout.flush()?;

    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}
