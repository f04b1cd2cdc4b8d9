//! Terminal styling utilities for the console step log

use std::path::Path;
use std::time::Duration;

use console::{style, Emoji};

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static TARGET: Emoji<'_, '_> = Emoji("🎯 ", "");
pub static TREE: Emoji<'_, '_> = Emoji("🌳 ", "");
pub static LINK: Emoji<'_, '_> = Emoji("🔗 ", "");
pub static CLOCK: Emoji<'_, '_> = Emoji("⏱️  ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    let banner = r#"
    ███████╗ ██████╗██████╗  ██████╗ ███████╗
    ██╔════╝██╔════╝██╔══██╗██╔════╝ ██╔════╝
    █████╗  ██║     ██████╔╝██║  ███╗███████╗
    ██╔══╝  ██║     ██╔══██╗██║   ██║╚════██║
    ███████╗╚██████╗██████╔╝╚██████╔╝███████║
    ╚══════╝ ╚═════╝╚═════╝  ╚═════╝ ╚══════╝
    "#;

    println!();
    println!("{}", style(banner).cyan().bold());
    println!(
        "    {} {}",
        style("SU").magenta().bold(),
        style("Ensemble correlation-based gene selection").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Values shown on the configuration card
pub struct ConfigCard<'a> {
    pub dataset: &'a Path,
    pub class_column: &'a str,
    pub threshold: f64,
    pub classifier: &'a str,
    pub ensemble_size: usize,
    pub retention: &'a str,
    pub folds: usize,
    pub repetitions: usize,
}

/// Print configuration card
pub fn print_config(card: &ConfigCard) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("⚙️  Configuration").cyan().bold(),
        " ".repeat(box_width - 20)
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {} Dataset: {:<38}│",
        FOLDER,
        truncate_path(card.dataset, 37)
    );
    println!(
        "    │  {} Class:   {:<38}│",
        TARGET,
        truncate_string(card.class_column, 37)
    );
    println!("    ├{}┤", line);
    println!(
        "    │  {} Relevance threshold: {:<26}│",
        CHART,
        style(format!("{:.3}", card.threshold)).yellow()
    );
    println!(
        "    │  {} Classifier:          {:<26}│",
        TREE,
        style(card.classifier).yellow()
    );
    println!(
        "    │  {} Ensemble size:       {:<26}│",
        LINK,
        style(card.ensemble_size).yellow()
    );
    println!(
        "    │  {} Retention:           {:<26}│",
        LINK,
        style(card.retention).yellow()
    );
    println!(
        "    │  {} Validation:          {:<26}│",
        CHART,
        style(format!("{}-fold x {}", card.folds, card.repetitions)).yellow()
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print how long a step took
pub fn print_step_time(elapsed: Duration) {
    println!(
        "    {} {}",
        CLOCK,
        style(format!("{:.2}s", elapsed.as_secs_f64())).dim()
    );
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style("Ensemble selection complete!").green().bold()
    );
    println!();
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize, threshold_info: Option<&str>) {
    if let Some(info) = threshold_info {
        println!(
            "      Found {} {} {}",
            style(count).yellow().bold(),
            description,
            style(info).dim()
        );
    } else {
        println!("      Found {} {}", style(count).yellow().bold(), description);
    }
}

/// Accuracy per repetition on one line, comma separated
pub fn format_accuracies(accuracies: &[f64]) -> String {
    accuracies
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// Helper functions

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let tail: String = s
            .chars()
            .rev()
            .take(max_len - 3)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("...{}", tail)
    }
}
