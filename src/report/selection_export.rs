//! JSON export of a selection run

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::cli::SelectionConfig;
use crate::evaluation::Metrics;
use crate::pipeline::{RelevanceRanking, RetainedSet};

/// Metadata about the run
#[derive(Serialize)]
pub struct RunMetadata {
    /// Timestamp of the run (ISO 8601 format)
    pub timestamp: String,
    pub ecbgs_version: String,
    pub class_column: String,
    pub instances: usize,
    pub config: SelectionConfig,
}

/// One feature's relevance score
#[derive(Serialize)]
pub struct RelevanceEntry {
    pub feature: String,
    pub su: f64,
    /// Position in the relevance ranking, absent when below the threshold
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
}

/// One ensemble member
#[derive(Serialize)]
pub struct MemberEntry {
    pub round: usize,
    pub start_point: String,
    pub retained: Vec<String>,
    pub removed: Vec<String>,
}

/// Complete export
#[derive(Serialize)]
pub struct SelectionExport {
    pub metadata: RunMetadata,
    pub relevance: Vec<RelevanceEntry>,
    pub members: Vec<MemberEntry>,
    pub accuracies: Vec<f64>,
    pub metrics: Vec<Metrics>,
}

/// Inputs for [`export_selection`]
pub struct ExportParams<'a> {
    pub config: &'a SelectionConfig,
    pub class_column: &'a str,
    pub instances: usize,
    pub feature_names: &'a [String],
    pub ranking: &'a RelevanceRanking,
    pub rounds: &'a [RetainedSet],
    pub metrics: &'a [Metrics],
}

/// Assemble the export structure
pub fn build_export(params: &ExportParams) -> SelectionExport {
    let name = |f: usize| params.feature_names[f].clone();

    // Relevant features first, in rank order, then the rest by index
    let mut relevance: Vec<RelevanceEntry> = params
        .ranking
        .relevant
        .iter()
        .enumerate()
        .map(|(rank, &f)| RelevanceEntry {
            feature: name(f),
            su: params.ranking.score(f),
            rank: Some(rank),
        })
        .collect();
    relevance.extend(
        (0..params.feature_names.len())
            .filter(|&f| params.ranking.position(f).is_none())
            .map(|f| RelevanceEntry {
                feature: name(f),
                su: params.ranking.score(f),
                rank: None,
            }),
    );

    let members = params
        .rounds
        .iter()
        .map(|set| MemberEntry {
            round: set.round,
            start_point: name(set.start_point),
            retained: set.retained.iter().map(|&f| name(f)).collect(),
            removed: set.removed.iter().map(|&f| name(f)).collect(),
        })
        .collect();

    SelectionExport {
        metadata: RunMetadata {
            timestamp: Utc::now().to_rfc3339(),
            ecbgs_version: env!("CARGO_PKG_VERSION").to_string(),
            class_column: params.class_column.to_string(),
            instances: params.instances,
            config: params.config.clone(),
        },
        relevance,
        members,
        accuracies: params.metrics.iter().map(|m| m.accuracy).collect(),
        metrics: params.metrics.to_vec(),
    }
}

/// Write the selection results to a JSON file
pub fn export_selection(params: &ExportParams, output_path: &Path) -> Result<()> {
    let export = build_export(params);

    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize selection results to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write selection results to {}", output_path.display()))?;

    Ok(())
}
