//! CLI output formatting utilities.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a ranked search result.
    pub fn search_result(rank: usize, source: &str, distance: f32, text: &str) {
        println!(
            "\n{} {} {} (distance: {:.3})",
            style(format!("[{}]", rank)).green(),
            style(source).bold(),
            style("|").dim(),
            distance
        );
        println!("   {}", content_preview(text, 200));
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Flatten newlines and truncate with an ellipsis, on a character boundary.
fn content_preview(content: &str, max_chars: usize) -> String {
    let content = content.replace('\n', " ");
    if content.chars().count() <= max_chars {
        content
    } else {
        let truncated: String = content.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}
