// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! External collaborator invocation with timing and failure isolation
//!
//! Every run is described up front as an `InvocationPlan`: preparation
//! steps (rebuilds, stale-result cleanup, dataset sanitization), the timed
//! command itself, and resource tweaks. Collaborator quirks live in the
//! plan constructors as data, so adding a fourth implementation means
//! adding a plan, not new branching in the executor or the pipeline.
//!
//! Failures here never propagate: build errors, spawn errors, and non-zero
//! exits are logged as warnings and the harness moves on. One collaborator
//! crashing must not stop the others from being benchmarked.

use crate::algorithms::{AlgorithmSpec, Language};
use crate::config::{HarnessPaths, RunConfig};
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Fields handed to the C parser are capped at this many characters; its
/// row buffers are fixed-width.
const C_FIELD_CAP: usize = 120;

/// C test-split fraction, fixed by the C program's CLI contract.
const C_TEST_SPLIT: &str = "0.3";

/// Stderr shown for a failed collaborator is truncated to this many bytes.
const STDERR_PREVIEW: usize = 300;

/// Java sources compiled before every Java run. The list mirrors the Java
/// project's layout; a stale build directory must never mask a source edit.
const JAVA_SOURCES: &[&str] = &[
    "ml/models/LinearRegression.java",
    "ml/models/LogisticRegression.java",
    "ml/models/KNearestNeighbors.java",
    "ml/models/DecisionTree.java",
    "ml/models/GaussianNaiveBayes.java",
    "ml/models/BaseModel.java",
    "ml/models/Model.java",
    "ml/models/ModelMetrics.java",
    "ml/data/DataLoader.java",
    "ml/data/Dataset.java",
    "ml/utils/MetricsUtil.java",
    "MLLibraryApp.java",
];

/// Per-collaborator failures; always downgraded to warnings by the caller.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}; stderr: {stderr}")]
    Exit {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
}

/// One external command with its working directory.
#[derive(Debug, Clone)]
pub struct PlannedCommand {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    /// Discard stdout/stderr instead of capturing (the C program floods
    /// stdout with per-row diagnostics).
    pub quiet: bool,
}

impl PlannedCommand {
    fn new(program: &str, args: Vec<String>, cwd: &Path) -> Self {
        Self {
            program: program.to_string(),
            args,
            cwd: cwd.to_path_buf(),
            quiet: false,
        }
    }

    fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }
}

/// Preparation step run before the timed invocation.
#[derive(Debug, Clone)]
pub enum PrepStep {
    /// Create a directory if missing (build output, results).
    EnsureDir(PathBuf),
    /// Run a build/tool command; failure is a warning, the run proceeds.
    Build(PlannedCommand),
    /// Remove a stale result file so extraction cannot read old data.
    RemoveFile(PathBuf),
    /// Rewrite the dataset into a width-capped, quote-free copy.
    SanitizeDataset { input: PathBuf, output: PathBuf },
}

/// Fully resolved invocation of one collaborator for one algorithm.
#[derive(Debug, Clone)]
pub struct InvocationPlan {
    pub language: Language,
    pub prep: Vec<PrepStep>,
    pub run: PlannedCommand,
    /// Raise RLIMIT_STACK to unlimited before the run; the C implementation
    /// recurses deeply on large datasets.
    pub raise_stack: bool,
}

/// Build the invocation plan for one (language, algorithm) pair.
pub fn plan_for(
    language: Language,
    spec: &AlgorithmSpec,
    paths: &HarnessPaths,
    run: &RunConfig,
) -> InvocationPlan {
    match language {
        Language::C => c_plan(spec, paths, run),
        Language::Java => java_plan(spec, paths, run),
        Language::Lisp => lisp_plan(spec, paths, run),
    }
}

fn c_plan(_spec: &AlgorithmSpec, paths: &HarnessPaths, run: &RunConfig) -> InvocationPlan {
    let sanitized = paths.c_temp_input();
    InvocationPlan {
        language: Language::C,
        prep: vec![
            PrepStep::Build(PlannedCommand::new("make", vec![], &paths.c_dir)),
            PrepStep::SanitizeDataset {
                input: run.dataset.clone(),
                output: sanitized.clone(),
            },
        ],
        run: PlannedCommand::new(
            "./ml_program",
            vec![
                file_name_of(&sanitized),
                run.target.clone(),
                C_TEST_SPLIT.to_string(),
            ],
            &paths.c_dir,
        )
        .quiet(),
        raise_stack: true,
    }
}

fn java_plan(spec: &AlgorithmSpec, paths: &HarnessPaths, run: &RunConfig) -> InvocationPlan {
    let mut javac_args = vec!["-d".to_string(), "build".to_string()];
    javac_args.extend(JAVA_SOURCES.iter().map(|s| s.to_string()));

    InvocationPlan {
        language: Language::Java,
        prep: vec![
            PrepStep::EnsureDir(paths.java_dir.join("build")),
            PrepStep::Build(PlannedCommand::new("javac", javac_args, &paths.java_dir)),
            PrepStep::RemoveFile(paths.java_results()),
        ],
        run: PlannedCommand::new(
            "java",
            vec![
                "-cp".to_string(),
                "build".to_string(),
                "MLLibraryApp".to_string(),
                "--batch".to_string(),
                "--algorithm".to_string(),
                spec.java_key.to_string(),
                "--data".to_string(),
                run.dataset.display().to_string(),
            ],
            &paths.java_dir,
        ),
        raise_stack: false,
    }
}

fn lisp_plan(spec: &AlgorithmSpec, paths: &HarnessPaths, run: &RunConfig) -> InvocationPlan {
    // Arguments are passed as discrete strings, never interpolated into an
    // eval form; the script dispatches on its positional arguments.
    let target = spec
        .lisp_override
        .as_ref()
        .map(|ov| ov.target.to_string())
        .unwrap_or_else(|| run.target.clone());

    let mut args = vec![
        "--noinform".to_string(),
        "--disable-debugger".to_string(),
        "--script".to_string(),
        paths.lisp_script.display().to_string(),
        spec.key.to_string(),
        run.dataset.display().to_string(),
        target,
    ];
    if let Some(ov) = &spec.lisp_override {
        args.push(ov.l2.to_string());
    }

    InvocationPlan {
        language: Language::Lisp,
        prep: vec![],
        run: PlannedCommand::new("sbcl", args, &paths.base),
        raise_stack: false,
    }
}

/// Execute the plan and return the wall-clock duration of the timed run
/// command. Preparation happens outside the timed window; every failure is
/// logged and swallowed so sibling collaborators still get their turn.
pub fn execute(plan: &InvocationPlan) -> Duration {
    for step in &plan.prep {
        if let Err(err) = apply_prep(step) {
            tracing::warn!(language = %plan.language, "prep step failed: {err:#}");
        }
    }

    if plan.raise_stack {
        raise_stack_limit();
    }

    let started = Instant::now();
    if let Err(err) = run_command(&plan.run) {
        tracing::warn!(language = %plan.language, "{err}");
    }
    started.elapsed()
}

fn apply_prep(step: &PrepStep) -> Result<()> {
    match step {
        PrepStep::EnsureDir(dir) => fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display())),
        PrepStep::Build(cmd) => {
            run_command(cmd).map_err(anyhow::Error::from)
        }
        PrepStep::RemoveFile(path) => {
            if path.exists() {
                fs::remove_file(path)
                    .with_context(|| format!("failed to remove {}", path.display()))?;
            }
            Ok(())
        }
        PrepStep::SanitizeDataset { input, output } => sanitize_dataset(input, output),
    }
}

fn run_command(cmd: &PlannedCommand) -> std::result::Result<(), CollaboratorError> {
    let mut command = Command::new(&cmd.program);
    command.args(&cmd.args).current_dir(&cmd.cwd);
    if cmd.quiet {
        command.stdout(Stdio::null()).stderr(Stdio::null());
    }

    let output = command.output().map_err(|source| CollaboratorError::Spawn {
        program: cmd.program.clone(),
        source,
    })?;

    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let preview: String = stderr.chars().take(STDERR_PREVIEW).collect();
    Err(CollaboratorError::Exit {
        program: cmd.program.clone(),
        status: output.status,
        stderr: if preview.is_empty() {
            "(none)".to_string()
        } else {
            preview
        },
    })
}

/// Copy the dataset with the header verbatim and every other field stripped
/// of quote characters and capped at `C_FIELD_CAP` characters. The C parser
/// reads fixed-width buffers and chokes on embedded quotes.
pub fn sanitize_dataset(input: &Path, output: &Path) -> Result<()> {
    let raw = fs::read(input)
        .with_context(|| format!("failed to read dataset {}", input.display()))?;
    let text = String::from_utf8_lossy(&raw);

    let mut out = fs::File::create(output)
        .with_context(|| format!("failed to create {}", output.display()))?;

    let mut lines = text.lines();
    if let Some(header) = lines.next() {
        writeln!(out, "{}", header)?;
    }
    for line in lines {
        let cells: Vec<String> = line
            .trim()
            .split(',')
            .map(|cell| cell.replace('"', "").chars().take(C_FIELD_CAP).collect())
            .collect();
        writeln!(out, "{}", cells.join(","))?;
    }
    Ok(())
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Best-effort RLIMIT_STACK raise; failure only costs us a warning.
#[cfg(unix)]
fn raise_stack_limit() {
    let limit = libc::rlimit {
        rlim_cur: libc::RLIM_INFINITY,
        rlim_max: libc::RLIM_INFINITY,
    };
    let rc = unsafe { libc::setrlimit(libc::RLIMIT_STACK, &limit) };
    if rc != 0 {
        tracing::warn!(
            "could not raise RLIMIT_STACK: {}",
            std::io::Error::last_os_error()
        );
    }
}

#[cfg(not(unix))]
fn raise_stack_limit() {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, HarnessPaths, RunConfig) {
        let dir = TempDir::new().unwrap();
        let paths = HarnessPaths::new(dir.path());
        fs::create_dir_all(&paths.c_dir).unwrap();
        fs::create_dir_all(&paths.java_dir).unwrap();
        let dataset = dir.path().join("data.csv");
        fs::write(&dataset, "a,b,income\n1,2,3\n").unwrap();
        let run = RunConfig::new(dataset, "income");
        (dir, paths, run)
    }

    #[test]
    fn test_c_plan_shape() {
        let (_dir, paths, run) = fixture();
        let spec = algorithms::find("knn").unwrap();
        let plan = plan_for(Language::C, spec, &paths, &run);

        assert!(plan.raise_stack);
        assert!(plan.run.quiet);
        assert_eq!(plan.run.program, "./ml_program");
        assert_eq!(
            plan.run.args,
            vec!["temp_c_input.csv", "income", "0.3"]
        );
        assert!(matches!(plan.prep[0], PrepStep::Build(_)));
        assert!(matches!(plan.prep[1], PrepStep::SanitizeDataset { .. }));
    }

    #[test]
    fn test_java_plan_removes_stale_results() {
        let (_dir, paths, run) = fixture();
        let spec = algorithms::find("naive_bayes").unwrap();
        let plan = plan_for(Language::Java, spec, &paths, &run);

        assert!(plan
            .prep
            .iter()
            .any(|step| matches!(step, PrepStep::RemoveFile(p) if *p == paths.java_results())));
        assert!(plan.run.args.contains(&"--batch".to_string()));
        assert!(plan.run.args.contains(&"naivebayes".to_string()));
    }

    #[test]
    fn test_lisp_plan_uses_discrete_arguments() {
        let (_dir, paths, run) = fixture();
        let spec = algorithms::find("knn").unwrap();
        let plan = plan_for(Language::Lisp, spec, &paths, &run);

        assert_eq!(plan.run.program, "sbcl");
        assert!(plan.run.args.contains(&"knn".to_string()));
        assert!(plan.run.args.contains(&"income".to_string()));
        // No eval form anywhere in the argument list.
        assert!(plan.run.args.iter().all(|arg| !arg.contains('(')));
    }

    #[test]
    fn test_lisp_linear_regression_override() {
        let (_dir, paths, run) = fixture();
        let spec = algorithms::find("linear_regression").unwrap();
        let plan = plan_for(Language::Lisp, spec, &paths, &run);

        // The session target is replaced by the fixed override target and
        // the L2 argument is appended.
        assert!(plan.run.args.contains(&"hours.per.week".to_string()));
        assert!(!plan.run.args.contains(&"income".to_string()));
        assert_eq!(plan.run.args.last().unwrap(), "1");
    }

    #[test]
    fn test_sanitize_dataset_caps_and_strips() {
        let (dir, _paths, _run) = fixture();
        let input = dir.path().join("raw.csv");
        let output = dir.path().join("safe.csv");
        let long_field = "x".repeat(200);
        fs::write(
            &input,
            format!("a,b,c\n\"quoted\",{},ok\n", long_field),
        )
        .unwrap();

        sanitize_dataset(&input, &output).unwrap();

        let text = fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "a,b,c");
        let cells: Vec<&str> = lines[1].split(',').collect();
        assert_eq!(cells[0], "quoted");
        assert_eq!(cells[1].len(), C_FIELD_CAP);
        assert_eq!(cells[2], "ok");
    }

    #[cfg(unix)]
    #[test]
    fn test_execute_swallows_spawn_failure() {
        let (dir, _paths, _run) = fixture();
        let plan = InvocationPlan {
            language: Language::C,
            prep: vec![],
            run: PlannedCommand::new("./definitely-not-a-program", vec![], dir.path()),
            raise_stack: false,
        };

        // Must not panic or propagate; timing is still reported.
        let elapsed = execute(&plan);
        assert!(elapsed < Duration::from_secs(5));
    }

    #[cfg(unix)]
    #[test]
    fn test_execute_swallows_nonzero_exit() {
        let (dir, _paths, _run) = fixture();
        let plan = InvocationPlan {
            language: Language::Java,
            prep: vec![],
            run: PlannedCommand::new("false", vec![], dir.path()),
            raise_stack: false,
        };

        let _elapsed = execute(&plan);
    }
}
