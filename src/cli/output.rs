//! Colored output helpers for CLI
//!
//! Status output goes to stderr. Stdout is reserved for results (the report
//! narrative, a workflow snapshot, rendered config) so they can be piped.

use crate::types::ProgressEvent;
use owo_colors::OwoColorize;
use std::io::{self, BufRead, Write};

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    pub fn banner(&self) {
        if self.colored {
            eprintln!(
                "\n  {} {}\n",
                "Deep Research".bright_cyan().bold(),
                format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
            );
        } else {
            eprintln!("\n  Deep Research v{}\n", env!("CARGO_PKG_VERSION"));
        }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✓".green().bold(), message.green());
        } else {
            eprintln!("  [OK] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "•".blue(), message);
        } else {
            eprintln!("  [INFO] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            eprintln!("  [WARN] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print one workflow milestone. The terminal event carries the report
    /// and is printed separately.
    pub fn progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Completed(_) => {}
            ProgressEvent::NotificationFailed { .. } => self.warning(&event.to_string()),
            _ => {
                if self.colored {
                    eprintln!("  {} {}", "→".cyan(), event.to_string().bright_white());
                } else {
                    eprintln!("  [..] {}", event);
                }
            }
        }
    }

    /// Print a file creation message
    pub fn created(&self, file_type: &str, path: &str) {
        if self.colored {
            eprintln!(
                "  {} {} {}",
                "✓".green().bold(),
                file_type.dimmed(),
                path.bright_white()
            );
        } else {
            eprintln!("  [CREATED] {} {}", file_type, path);
        }
    }

    /// Print a file skipped message
    pub fn skipped(&self, path: &str, reason: &str) {
        if self.colored {
            eprintln!(
                "  {} {} {}",
                "○".yellow(),
                path.dimmed(),
                format!("({})", reason).yellow()
            );
        } else {
            eprintln!("  [SKIPPED] {} ({})", path, reason);
        }
    }

    /// Print a header for a section
    pub fn header(&self, title: &str) {
        if self.colored {
            eprintln!("\n  {}", title.bright_white().bold().underline());
        } else {
            eprintln!("\n  === {} ===", title);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            eprintln!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            eprintln!("    {}: {}", key, value);
        }
    }

    /// Print a list item
    pub fn list_item(&self, item: &str) {
        if self.colored {
            eprintln!("    {} {}", "•".blue(), item);
        } else {
            eprintln!("    - {}", item);
        }
    }

    /// Print a hint/tip message
    pub fn hint(&self, message: &str) {
        if self.colored {
            eprintln!("\n  {} {}", "tip:".dimmed(), message.dimmed().italic());
        } else {
            eprintln!("\n  [TIP] {}", message);
        }
    }

    /// Print a command suggestion
    pub fn command(&self, cmd: &str) {
        if self.colored {
            eprintln!("     {}", format!("$ {}", cmd).bright_cyan());
        } else {
            eprintln!("     $ {}", cmd);
        }
    }

    /// Print completion message with next steps
    pub fn complete(&self, message: &str) {
        if self.colored {
            eprintln!("\n  {} {}", "✓".green(), message.bright_green().bold());
        } else {
            eprintln!("\n  [DONE] {}", message);
        }
    }

    /// Ask one numbered clarification question and read the answer from stdin
    pub fn ask(&self, number: usize, question: &str) -> io::Result<String> {
        self.ask_from(number, question, &mut io::stdin().lock())
    }

    /// Same as [`ask`](Self::ask), reading from any buffered source
    pub fn ask_from<R: BufRead>(
        &self,
        number: usize,
        question: &str,
        input: &mut R,
    ) -> io::Result<String> {
        if self.colored {
            eprint!(
                "  {} {}\n    {} ",
                format!("{}.", number).bright_yellow().bold(),
                question.bright_white(),
                ">".dimmed()
            );
        } else {
            eprint!("  {}. {}\n    > ", number, question);
        }
        io::stderr().flush().ok();

        let mut answer = String::new();
        input.read_line(&mut answer)?;
        Ok(answer.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_output_new() {
        let output = Output::new();
        assert!(output.colored);
    }

    #[test]
    fn test_output_no_color() {
        let output = Output::no_color();
        assert!(!output.colored);
    }

    #[test]
    fn test_ask_trims_answer() {
        let output = Output::no_color();
        let mut input = Cursor::new("  Berlin \n");
        assert_eq!(output.ask_from(1, "Which city?", &mut input).unwrap(), "Berlin");
    }

    #[test]
    fn test_ask_at_eof_is_blank() {
        let output = Output::no_color();
        let mut input = Cursor::new("");
        assert_eq!(output.ask_from(1, "Which city?", &mut input).unwrap(), "");
    }

    #[test]
    fn test_output_methods_no_panic() {
        // Smoke test - ensure none of the output methods panic
        for output in [Output::no_color(), Output::new()] {
            output.banner();
            output.success("test success");
            output.info("test info");
            output.warning("test warning");
            output.error("test error");
            output.progress(&ProgressEvent::PlanningSearches);
            output.progress(&ProgressEvent::NotificationFailed {
                reason: "smtp down".to_string(),
            });
            output.created("file", "path/to/file");
            output.skipped("path", "reason");
            output.header("Test Header");
            output.kv("key", "value");
            output.list_item("item");
            output.hint("hint message");
            output.command("some command");
            output.complete("complete message");
        }
    }
}
