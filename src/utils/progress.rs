//! Progress bar helpers using indicatif

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Create a spinner for indeterminate progress
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Bar over per-feature work such as discretization.
///
/// Returns a hidden bar when `visible` is false so callers can tick it unconditionally.
pub fn create_feature_bar(len: u64, action: &str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "   {} [{{bar:40.cyan/blue}}] {{pos}}/{{len}} features ({{percent}}%) [{{eta}}]",
                action
            ))
            .unwrap()
            .progress_chars("=>-"),
    );
    pb
}

/// Bar over cross-validation repetitions
pub fn create_repetition_bar(repetitions: u64, folds: usize) -> ProgressBar {
    let pb = ProgressBar::new(repetitions);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} repetitions ({eta})")
            .unwrap()
            .progress_chars("█▓▒░"),
    );
    pb.set_message(format!("   {}-fold CV", folds));
    pb
}

/// Finish a progress bar with a success message
pub fn finish_with_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✅ {}", message));
}

/// Finish a progress bar with a warning message
pub fn finish_with_warning(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("⚠️  {}", message));
}
