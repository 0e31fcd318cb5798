//! Interactive conflict prompt
//!
//! Uses dialoguer for terminal input. The prompt blocks, so it runs on the
//! blocking thread pool while the sync loop waits for the answer.

use async_trait::async_trait;
use colored::Colorize;
use dialoguer::Input;
use mirror_core::{ConflictDecision, DecisionProvider, DiffView, Error};

const INVALID_CHOICE: &str = "Invalid choice. Please enter 1, 2, 3, or 4.";

/// Asks the operator on the terminal
#[derive(Debug, Default)]
pub struct InteractiveDecider;

#[async_trait]
impl DecisionProvider for InteractiveDecider {
    async fn decide(
        &self,
        filename: &str,
        diff: Option<&DiffView>,
    ) -> mirror_core::Result<ConflictDecision> {
        let filename = filename.to_string();
        let diff = diff.cloned();
        tokio::task::spawn_blocking(move || prompt(&filename, diff.as_ref()))
            .await
            .map_err(|e| Error::decision(format!("prompt task failed: {}", e)))?
    }
}

fn prompt(filename: &str, diff: Option<&DiffView>) -> mirror_core::Result<ConflictDecision> {
    println!();
    println!("{} {}", "CONFLICT DETECTED for".yellow().bold(), filename.bold());

    if let Some(diff) = diff {
        print_diff(filename, diff);
    }

    println!();
    println!("Choose action for {}:", filename);
    for line in menu_lines() {
        println!("{}", line);
    }

    let choice: String = Input::new()
        .with_prompt("Enter choice (1/2/3/4)")
        .validate_with(|input: &String| validate_choice(input))
        .interact_text()
        .map_err(terminal_failure)?;

    ConflictDecision::from_choice(&choice).ok_or_else(|| Error::decision(INVALID_CHOICE))
}

/// Terminal read failures abort the decision, not the process.
fn terminal_failure(e: dialoguer::Error) -> Error {
    Error::decision(format!("terminal input failed: {}", e))
}

fn validate_choice(input: &str) -> Result<(), &'static str> {
    ConflictDecision::from_choice(input)
        .map(|_| ())
        .ok_or(INVALID_CHOICE)
}

fn menu_lines() -> Vec<String> {
    ConflictDecision::ALL
        .iter()
        .map(|decision| format!("{}. {}", decision.choice(), decision.description()))
        .collect()
}

fn print_diff(filename: &str, diff: &DiffView) {
    match diff {
        DiffView::Unified(text) => {
            println!();
            println!("{}", format!("=== DIFFERENCES for {} ===", filename).bold());
            for line in text.lines() {
                println!("{}", style_line(line));
            }
            println!("{}", "=".repeat(50));
        }
        DiffView::Identical => {
            println!("{}", diff.to_string().green());
        }
        DiffView::Binary => {
            println!("{}: {}", diff.to_string().yellow(), filename);
        }
        DiffView::Unavailable(_) => {
            println!("{}", diff.to_string().yellow());
        }
    }
}

fn style_line(line: &str) -> colored::ColoredString {
    if line.starts_with("+++") || line.starts_with("---") {
        line.bold()
    } else if line.starts_with("@@") {
        line.cyan()
    } else if line.starts_with('+') {
        line.green()
    } else if line.starts_with('-') {
        line.red()
    } else {
        line.normal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn menu_lists_all_four_choices_in_order() {
        let lines = menu_lines();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("1. Override remote file"));
        assert!(lines[1].starts_with("2. Override local file"));
        assert!(lines[2].starts_with("3. Cancel"));
        assert!(lines[3].starts_with("4. Download a copy"));
    }

    #[rstest]
    #[case("1", true)]
    #[case("4", true)]
    #[case(" 3 ", true)]
    #[case("0", false)]
    #[case("yes", false)]
    #[case("", false)]
    fn validates_choices(#[case] input: &str, #[case] valid: bool) {
        assert_eq!(validate_choice(input).is_ok(), valid);
    }

    #[test]
    fn terminal_failure_becomes_decision_error() {
        let closed = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "stdin closed");
        let err = terminal_failure(dialoguer::Error::from(closed));
        assert!(matches!(&err, Error::Decision { message } if message.contains("stdin closed")));
        assert!(err.to_string().starts_with("Conflict decision failed: terminal input failed"));
    }

    #[test]
    fn diff_lines_keep_their_text() {
        colored::control::set_override(false);
        assert_eq!(style_line("+added").to_string(), "+added");
        assert_eq!(style_line("-removed").to_string(), "-removed");
        assert_eq!(style_line("@@ -1 +1 @@").to_string(), "@@ -1 +1 @@");
    }
}
