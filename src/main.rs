//! ecbgs: Ensemble Correlation-Based Gene Selection CLI
//!
//! Usage: `ecbgs <dataset> <threshold> <C|S> <ensemble-size>`

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use ecbgs::cli::Cli;
use ecbgs::ensemble::select_ensemble;
use ecbgs::evaluation::CrossValidator;
use ecbgs::pipeline::{
    analyze_relevance, discretize_dataset, load_dataset, load_dataset_with_progress,
    resolve_dataset_path, Dataset,
};
use ecbgs::report::{export_selection, ExportParams, SelectionSummary};
use ecbgs::utils::{
    create_repetition_bar, create_spinner, finish_with_success, finish_with_warning,
    format_accuracies, print_banner, print_completion, print_config, print_count, print_info,
    print_step_header, print_step_time, print_success, ConfigCard,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config();
    config.validate()?;
    let verbose = !cli.quiet;

    let dataset_path = resolve_dataset_path(&cli.dataset)?;

    if verbose {
        print_banner(env!("CARGO_PKG_VERSION"));
        let retention = config.retention.to_string();
        let classifier = format!("{} ({})", config.classifier, config.classifier.description());
        print_config(&ConfigCard {
            dataset: &dataset_path,
            class_column: cli.class.as_deref().unwrap_or("(last column)"),
            threshold: config.threshold,
            classifier: &classifier,
            ensemble_size: config.ensemble_size,
            retention: &retention,
            folds: config.folds,
            repetitions: config.repetitions,
        });
    }

    // Step 1: Load dataset
    let step_start = Instant::now();
    let df = if verbose {
        print_step_header(1, "Load Dataset");
        let (df, rows, cols, memory_mb) =
            load_dataset_with_progress(&dataset_path, cli.infer_schema_length)?;
        println!("\n    {} Dataset Statistics:", style("✧").cyan());
        println!("      Rows: {}", rows);
        println!("      Columns: {}", cols);
        println!("      Estimated memory: {:.2} MB", memory_mb);
        df
    } else {
        load_dataset(&dataset_path, cli.infer_schema_length)?
    };

    let data = Dataset::from_dataframe(&df, cli.class.as_deref())
        .with_context(|| format!("Failed to prepare dataset {}", dataset_path.display()))?;
    drop(df);

    let mut summary = SelectionSummary::new(data.feature_names().to_vec(), config.threshold);
    summary.record_time("load", step_start.elapsed());
    if verbose {
        print_success(&format!(
            "{} instances, {} features, {} classes (class column '{}')",
            data.num_instances(),
            data.num_features(),
            data.num_classes(),
            data.class_name()
        ));
        print_step_time(step_start.elapsed());
    }

    // Step 2: Supervised discretization
    if verbose {
        print_step_header(2, "Discretization");
    }
    let step_start = Instant::now();
    let (discrete, discretizer) = discretize_dataset(&data, verbose)?;
    summary.single_bin_features = discretizer.single_bin_features();
    summary.record_time("discretize", step_start.elapsed());
    if verbose {
        print_success(&format!("Discretized {} features", discretizer.num_features()));
        if summary.single_bin_features > 0 {
            print_count("feature(s) without cut points", summary.single_bin_features, None);
        }
        print_step_time(step_start.elapsed());
    }

    // Step 3: Relevance analysis
    if verbose {
        print_step_header(3, "Relevance Analysis");
    }
    let step_start = Instant::now();
    let ranking = analyze_relevance(&discrete, config.threshold)?;
    summary.relevant_features = ranking.len;
    summary.record_time("relevance", step_start.elapsed());
    if verbose {
        print_count(
            "relevant feature(s)",
            ranking.len,
            Some(&format!("(SU > {})", config.threshold)),
        );
        print_step_time(step_start.elapsed());
    }

    // Step 4: Redundancy analysis and ensemble assembly
    if verbose {
        print_step_header(4, "Redundancy Analysis");
    }
    let step_start = Instant::now();
    let spinner = verbose.then(|| create_spinner("Splitting relevant features into subsets..."));
    let outcome = select_ensemble(
        &discrete,
        &ranking,
        config.classifier,
        config.ensemble_size,
        config.retention,
    )?;
    if let Some(spinner) = spinner {
        let message = format!("Built {} ensemble member(s)", outcome.ensemble.len());
        if outcome.ensemble.len() < config.ensemble_size {
            finish_with_warning(
                &spinner,
                &format!("{} (no redundant features left)", message),
            );
        } else {
            finish_with_success(&spinner, &message);
        }
    }
    summary.pairs_evaluated = outcome.pairs_evaluated;
    summary.rounds = outcome.rounds.clone();
    summary.record_time("redundancy", step_start.elapsed());
    if verbose {
        print_info(&format!(
            "{} feature pair(s) scored",
            outcome.pairs_evaluated
        ));
        print_step_time(step_start.elapsed());
    }

    // Step 5: Cross-validation
    if verbose {
        print_step_header(5, "Cross-Validation");
    }
    let step_start = Instant::now();
    let validator = CrossValidator::new(config.folds)?;
    let bar = verbose.then(|| create_repetition_bar(config.repetitions as u64, config.folds));
    for repetition in 0..config.repetitions {
        let metrics = validator
            .evaluate(&outcome.ensemble, &data, repetition as u64)
            .with_context(|| format!("Cross-validation failed for seed {}", repetition))?;
        summary.metrics.push(metrics);
        if let Some(bar) = &bar {
            bar.inc(1);
        }
    }
    if let Some(bar) = bar {
        finish_with_success(&bar, "Cross-validation complete");
    }
    summary.record_time("evaluation", step_start.elapsed());
    if verbose {
        print_step_time(step_start.elapsed());
    }

    let accuracies: Vec<f64> = summary.metrics.iter().map(|m| m.accuracy).collect();

    if let Some(export_path) = &cli.export {
        export_selection(
            &ExportParams {
                config: &config,
                class_column: data.class_name(),
                instances: data.num_instances(),
                feature_names: data.feature_names(),
                ranking: &ranking,
                rounds: &outcome.rounds,
                metrics: &summary.metrics,
            },
            export_path,
        )?;
        if verbose {
            print_success(&format!("Exported results to {}", export_path.display()));
        }
    }

    if verbose {
        summary.display();
        println!();
        println!("    {} {}", style("Accuracy:").bold(), format_accuracies(&accuracies));
        print_completion();
    } else {
        println!("{}", format_accuracies(&accuracies));
    }

    Ok(())
}
