// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Interactive CLI for the unified ML benchmark harness
//!
//! Usage:
//!   ml-runner
//!   ml-runner --base /path/to/project --data data/income.csv --target income
//!
//! Startup walks through dataset/target selection with validation, then a
//! main menu chooses an implementation family (or the cross-run results
//! view), and a per-implementation menu chooses the algorithm to benchmark.

use anyhow::Result;
use clap::Parser;
use ml_runner::algorithms::{self, Language};
use ml_runner::config::{HarnessPaths, RunConfig};
use ml_runner::sloc::SlocCounter;
use ml_runner::{dataset, pipeline, report};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ml-runner")]
#[command(about = "Benchmark C, Java, and Lisp ML implementations side by side")]
#[command(version)]
struct Args {
    /// Base directory containing the collaborator programs
    #[arg(short, long, default_value = ".")]
    base: PathBuf,

    /// Default dataset offered at startup
    #[arg(short, long, default_value = "data/adult_income_cleaned.csv")]
    data: PathBuf,

    /// Default target column offered at startup
    #[arg(short, long, default_value = "income")]
    target: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let paths = HarnessPaths::new(&args.base);

    let Some(run) = setup_run_config(&args) else {
        println!("Exiting...");
        return Ok(());
    };

    let mut sloc = SlocCounter::new(&paths);
    main_menu(&paths, &run, &mut sloc);
    Ok(())
}

fn prompt(message: &str) -> String {
    print!("{message}");
    let _ = io::stdout().flush();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return String::new();
    }
    line.trim().to_string()
}

/// Dataset/target configuration loop. Returns `None` when the user quits
/// instead of fixing a validation failure.
fn setup_run_config(args: &Args) -> Option<RunConfig> {
    let mut default_data = args.data.clone();
    let mut default_target = args.target.clone();

    loop {
        println!("\n========================================");
        println!("Dataset & Target Configuration");
        println!("========================================");
        println!("Default CSV: {}", default_data.display());

        let entry = prompt("Enter CSV (Enter = default): ");
        let data = if entry.is_empty() {
            default_data.clone()
        } else {
            PathBuf::from(entry)
        };

        println!("\nDefault target: {default_target}");
        let entry = prompt("Enter target (Enter = default): ");
        let target = if entry.is_empty() {
            default_target.clone()
        } else {
            entry
        };

        let run = RunConfig::new(data, target);
        match dataset::validate_columns(&run.dataset, &run.target) {
            Ok(_) => {
                println!("\nUsing CSV:    {}", run.dataset.display());
                println!("Using Target: {}\n", run.target);
                return Some(run);
            }
            Err(err) => {
                println!("\n[ERROR] {err}");
                default_data = run.dataset.clone();
                default_target = run.target.clone();

                println!("Choose an option:");
                println!("  (1) Enter NEW target");
                println!("  (2) Choose NEW dataset");
                println!("  (3) Quit");
                match prompt("Enter choice: ").as_str() {
                    "1" => {
                        let available = err.available_columns();
                        if !available.is_empty() {
                            println!("\nAvailable columns:\n  {}", available.join(", "));
                        }
                        default_target = prompt("Enter new target: ");
                    }
                    "2" => continue,
                    _ => return None,
                }
            }
        }
    }
}

fn main_menu(paths: &HarnessPaths, run: &RunConfig, sloc: &mut SlocCounter) {
    loop {
        println!("\n***********************************************");
        println!("Welcome to the AI/ML Library Implementation Comparison");
        println!("***********************************************");
        println!("(1) Procedural (C)");
        println!("(2) Object-Oriented (Java)");
        println!("(3) Functional (Lisp)");
        println!("(4) Print General Results");
        println!("(5) Quit\n");

        match prompt("Enter choice: ").as_str() {
            "1" => implementation_menu(Language::C, paths, run, sloc),
            "2" => implementation_menu(Language::Java, paths, run, sloc),
            "3" => implementation_menu(Language::Lisp, paths, run, sloc),
            "4" => print_general_results(paths, None),
            "5" => {
                println!("Exiting...");
                return;
            }
            _ => println!("Invalid option.\n"),
        }
    }
}

fn implementation_menu(
    language: Language,
    paths: &HarnessPaths,
    run: &RunConfig,
    sloc: &mut SlocCounter,
) {
    loop {
        println!("\n***********************************************");
        println!("You selected: {language}");
        println!("***********************************************");
        println!("(1) Load data (no-op)");
        println!("(2) Linear Regression");
        println!("(3) Logistic Regression");
        println!("(4) KNN");
        println!("(5) Decision Tree");
        println!("(6) Gaussian Naive Bayes");
        println!("(7) Print results");
        println!("(8) Quit to main menu\n");

        let choice = prompt("Enter choice: ");
        match choice.as_str() {
            "1" => println!("\nData loads automatically.\n"),
            "7" => print_general_results(paths, Some(language)),
            "8" => return,
            other => match algorithm_for_choice(other) {
                Some(key) => run_choice(key, language, paths, run, sloc),
                None => println!("Invalid option.\n"),
            },
        }
    }
}

fn algorithm_for_choice(choice: &str) -> Option<&'static str> {
    match choice {
        "2" => Some("linear_regression"),
        "3" => Some("logistic"),
        "4" => Some("knn"),
        "5" => Some("decision_tree"),
        "6" => Some("naive_bayes"),
        _ => None,
    }
}

fn run_choice(
    key: &str,
    language: Language,
    paths: &HarnessPaths,
    run: &RunConfig,
    sloc: &mut SlocCounter,
) {
    let Some(spec) = algorithms::find(key) else {
        println!("Invalid option.\n");
        return;
    };

    println!("\n========================================");
    println!("Running {}", spec.label);
    println!("CSV:    {}", run.dataset.display());
    println!("Target: {}", run.target);
    println!("========================================");

    if let Err(err) = pipeline::run_algorithm(paths, run, spec, Some(language), sloc) {
        tracing::error!("benchmark failed: {err:#}");
    }
}

fn print_general_results(paths: &HarnessPaths, filter: Option<Language>) {
    match report::general_results(&paths.ledger(), filter) {
        Ok(view) => {
            println!("\nGeneral Results (Comparison)");
            println!("***********************************************\n");
            println!("{view}");
        }
        Err(err) => tracing::error!("could not read unified results: {err:#}"),
    }
}
