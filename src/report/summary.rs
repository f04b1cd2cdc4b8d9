//! Selection summary and metrics tables

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::evaluation::Metrics;
use crate::pipeline::RetainedSet;

/// Summary of one selection run
#[derive(Debug, Default)]
pub struct SelectionSummary {
    pub total_features: usize,
    pub single_bin_features: usize,
    pub relevant_features: usize,
    pub threshold: f64,
    pub pairs_evaluated: usize,
    /// Feature names, indexed by feature
    pub feature_names: Vec<String>,
    pub rounds: Vec<RetainedSet>,
    /// Metrics per repetition
    pub metrics: Vec<Metrics>,
    timings: Vec<(&'static str, Duration)>,
}

impl SelectionSummary {
    pub fn new(feature_names: Vec<String>, threshold: f64) -> Self {
        Self {
            total_features: feature_names.len(),
            feature_names,
            threshold,
            ..Default::default()
        }
    }

    pub fn record_time(&mut self, step: &'static str, elapsed: Duration) {
        self.timings.push((step, elapsed));
    }

    pub fn timings(&self) -> &[(&'static str, Duration)] {
        &self.timings
    }

    /// Distinct features used by at least one member
    pub fn features_used(&self) -> usize {
        let mut used: Vec<usize> = self.rounds.iter().flat_map(|r| r.retained.iter().copied()).collect();
        used.sort_unstable();
        used.dedup();
        used.len()
    }

    fn name(&self, feature: usize) -> &str {
        self.feature_names
            .get(feature)
            .map(String::as_str)
            .unwrap_or("?")
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("SELECTION SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("📁 Features"),
            Cell::new(self.total_features),
        ]);
        table.add_row(vec![
            Cell::new("🧱 Without cut points"),
            Cell::new(self.single_bin_features).fg(if self.single_bin_features == 0 {
                Color::White
            } else {
                Color::Yellow
            }),
        ]);
        table.add_row(vec![
            Cell::new(format!("🎯 Relevant (SU > {})", self.threshold)),
            Cell::new(self.relevant_features).fg(Color::Cyan),
        ]);
        table.add_row(vec![
            Cell::new("🔗 Feature pairs scored"),
            Cell::new(self.pairs_evaluated),
        ]);
        table.add_row(vec![
            Cell::new("🌳 Ensemble members"),
            Cell::new(self.rounds.len())
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![
            Cell::new("✅ Features used"),
            Cell::new(self.features_used())
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);

        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        if !self.rounds.is_empty() {
            println!();
            println!(
                "    {} {}",
                style("📝").cyan(),
                style("ENSEMBLE MEMBERS").white().bold()
            );
            println!("    {}", style("─".repeat(50)).dim());

            for set in &self.rounds {
                println!();
                println!(
                    "      {} {}:",
                    style(format!("Member {}", set.round + 1)).yellow(),
                    style(format!(
                        "(start {}, {} retained, {} removed)",
                        self.name(set.start_point),
                        set.retained.len(),
                        set.removed.len()
                    ))
                    .dim()
                );
                for &feature in &set.retained {
                    println!("        {} {}", style("•").dim(), self.name(feature));
                }
            }
        }

        if !self.metrics.is_empty() {
            self.display_metrics();
        }
    }

    fn display_metrics(&self) {
        println!();
        println!(
            "    {} {}",
            style("📈").cyan(),
            style("CROSS-VALIDATION").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Seed").add_attribute(Attribute::Bold),
            Cell::new("Accuracy").add_attribute(Attribute::Bold),
            Cell::new("Error %").add_attribute(Attribute::Bold),
            Cell::new("Sensitivity %").add_attribute(Attribute::Bold),
            Cell::new("Specificity %").add_attribute(Attribute::Bold),
            Cell::new("AUC %").add_attribute(Attribute::Bold),
        ]);

        for (seed, m) in self.metrics.iter().enumerate() {
            let color = if m.accuracy >= 0.9 {
                Color::Green
            } else if m.accuracy >= 0.7 {
                Color::Yellow
            } else {
                Color::Red
            };
            table.add_row(vec![
                Cell::new(seed),
                Cell::new(format!("{:.4}", m.accuracy))
                    .fg(color)
                    .add_attribute(Attribute::Bold),
                Cell::new(percent(m.error_rate)),
                Cell::new(percent(m.sensitivity)),
                Cell::new(percent(m.specificity)),
                Cell::new(percent(m.auc)),
            ]);
        }

        for line in table.to_string().lines() {
            println!("    {}", line);
        }
    }
}

/// Fraction as a percentage rounded to three decimals
pub fn percent(fraction: f64) -> String {
    format!("{:.3}", (fraction * 100.0 * 1000.0).round() / 1000.0)
}
