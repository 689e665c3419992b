//! Result rendering for commands.
//!
//! `--json` prints compact single-line JSON. Without it, mappings and
//! sequences are printed as indented JSON and scalars as plain text.

use std::io::{self, BufRead, Write};

use serde::Serialize;
use serde_json::Value;

/// Renders command results to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Output {
    json: bool,
}

impl Output {
    /// Creates an output renderer.
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// `true` when rendering compact JSON.
    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Prints `data` on stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if `data` cannot be converted to JSON.
    pub fn print<T: Serialize + ?Sized>(&self, data: &T) -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(data)?;
        println!("{}", render(&value, self.json));
        Ok(())
    }
}

/// Renders a value the way [`Output::print`] does.
pub fn render(value: &Value, json: bool) -> String {
    if json {
        return value.to_string();
    }
    match value {
        Value::Object(_) | Value::Array(_) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Asks a yes/no question on stdin.
///
/// An empty answer takes the default, which is "no" when `assume_no` is set
/// and "yes" otherwise.
///
/// # Errors
///
/// Returns an I/O error if stdin or stdout fail.
pub fn confirm(prompt: &str, assume_no: bool) -> io::Result<bool> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    confirm_with(&mut stdin.lock(), &mut stdout.lock(), prompt, assume_no)
}

/// [`confirm`] over arbitrary streams.
///
/// # Errors
///
/// Returns an I/O error if reading or writing fails.
pub fn confirm_with<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    assume_no: bool,
) -> io::Result<bool> {
    let hint = if assume_no { "y/N" } else { "Y/n" };
    write!(output, "{prompt} [{hint}]: ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim().to_ascii_lowercase();
    if answer.is_empty() {
        return Ok(!assume_no);
    }
    Ok(matches!(answer.as_str(), "y" | "yes"))
}
