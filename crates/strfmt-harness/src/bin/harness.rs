//! CLI entrypoint for the strfmt fixture harness.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};
use strfmt_core::{FormatArg, format_string_in, measure};
use strfmt_harness::config::{LOG_ENV, MAX_ALLOC_ENV};
use strfmt_harness::fixtures::collect_fixture_paths;
use strfmt_harness::structured_log::{
    ArtifactIndex, LogEmitter, LogEntry, LogLevel, Outcome, StreamKind, now_utc,
    validate_log_file,
};
use strfmt_harness::{
    ConformanceReport, FixtureArg, FixtureSet, HarnessConfig, HarnessError, TestRunner,
    VerificationSummary,
};

/// Fixture tooling for strfmt.
#[derive(Debug, Parser)]
#[command(name = "strfmt-harness")]
#[command(about = "Fixture verification harness for strfmt")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Format a template once and print the result and its measured length.
    Render {
        /// printf-style template.
        #[arg(long)]
        template: String,
        /// Argument as `<int|uint|float|char|str|ptr>:<value>`; repeatable.
        #[arg(long = "arg")]
        args: Vec<String>,
        /// Refuse outputs needing more than this many bytes (`64k`, `1m`).
        #[arg(long, env = MAX_ALLOC_ENV)]
        max_alloc: Option<String>,
    },
    /// Verify the formatter against fixture files.
    Verify {
        /// Fixture JSON file or a directory of them.
        #[arg(long)]
        fixture: PathBuf,
        /// Output report path (markdown).
        #[arg(long)]
        report: Option<PathBuf>,
        /// Structured JSONL log path.
        #[arg(long, env = LOG_ENV)]
        log: Option<PathBuf>,
    },
    /// Validate a structured JSONL log file.
    ValidateLog {
        #[arg(long, env = LOG_ENV)]
        log: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Render {
            template,
            args,
            max_alloc,
        } => render(&template, &args, max_alloc.as_deref()),
        Command::Verify {
            fixture,
            report,
            log,
        } => verify(&fixture, report.as_deref(), log),
        Command::ValidateLog { log } => validate_log(&log),
    };
    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
    }
}

fn render(
    template: &str,
    raw_args: &[String],
    max_alloc: Option<&str>,
) -> Result<bool, HarnessError> {
    let config = HarnessConfig::new(None, max_alloc)?;
    let parsed = raw_args
        .iter()
        .map(|raw| FixtureArg::parse_cli(raw))
        .collect::<Result<Vec<_>, _>>()?;
    let args: Vec<FormatArg<'_>> = parsed.iter().map(FixtureArg::as_format_arg).collect();

    let measured = measure(template, &args);
    let out = format_string_in(&config.allocator(), template, &args)?;
    println!("{out}");
    eprintln!("measured_len={measured}");
    Ok(true)
}

fn verify(
    fixture: &Path,
    report: Option<&Path>,
    log: Option<PathBuf>,
) -> Result<bool, HarnessError> {
    let config = HarnessConfig::new(log, None)?;
    eprintln!("Verifying against fixtures in {}", fixture.display());

    let mut fixture_sets = Vec::new();
    for path in collect_fixture_paths(fixture)? {
        match FixtureSet::from_file(&path) {
            Ok(set) => fixture_sets.push(set),
            Err(err) => eprintln!("Skipping {}: {err}", path.display()),
        }
    }
    if fixture_sets.is_empty() {
        return Err(HarnessError::NoFixtures(fixture.to_path_buf()));
    }

    let runner = TestRunner::new("fixture-verify");
    let run_id = format!("run-{}", std::process::id());
    let log_err = |e| HarnessError::io(config.log_path.clone().unwrap_or_default(), e);
    let mut emitter = match &config.log_path {
        Some(path) => Some(LogEmitter::to_file(path, &runner.campaign, &run_id).map_err(log_err)?),
        None => None,
    };

    let mut results = Vec::new();
    for set in &fixture_sets {
        for case in &set.cases {
            let started = Instant::now();
            let result = runner.run_case(case);
            let elapsed = u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX);
            if let Some(emitter) = emitter.as_mut() {
                let (level, outcome) = if result.passed {
                    (LogLevel::Info, Outcome::Pass)
                } else {
                    (LogLevel::Error, Outcome::Fail)
                };
                let entry = LogEntry::new("", level, "case_result")
                    .with_stream(StreamKind::Conformance)
                    .with_case(&set.family, &case.name)
                    .with_template(&case.template)
                    .with_outcome(outcome)
                    .with_measured_len(result.measured_len)
                    .with_latency_ns(elapsed);
                emitter.emit_entry(entry).map_err(log_err)?;
            }
            results.push(result);
        }
    }

    let summary = VerificationSummary::from_results(results);
    for r in summary.failures() {
        eprintln!("FAIL {}", r.case_name);
        if let Some(diff) = &r.diff {
            eprintln!("{diff}");
        }
    }
    eprintln!(
        "Verification complete: total={}, passed={}, failed={}",
        summary.total, summary.passed, summary.failed
    );
    let all_passed = summary.all_passed();

    if let Some(report_path) = report {
        let report = ConformanceReport {
            title: String::from("strfmt Conformance Report"),
            families: fixture_sets.iter().map(|s| s.family.clone()).collect(),
            timestamp: now_utc(),
            summary,
        };
        std::fs::write(report_path, report.to_markdown())
            .map_err(|e| HarnessError::io(report_path, e))?;

        let mut index = ArtifactIndex::new(&run_id);
        index.add_file(report_path, "report")?;
        let index_path = report_path.with_extension("index.json");
        let index_json = index.to_json().map_err(|source| HarnessError::Json {
            path: index_path.clone(),
            source,
        })?;
        std::fs::write(&index_path, index_json).map_err(|e| HarnessError::io(&index_path, e))?;

        if let Some(emitter) = emitter.as_mut() {
            let entry = LogEntry::new("", LogLevel::Info, "report_written").with_artifacts(vec![
                report_path.display().to_string(),
                index_path.display().to_string(),
            ]);
            emitter.emit_entry(entry).map_err(log_err)?;
        }
        eprintln!("Report written to {}", report_path.display());
    }

    if let Some(emitter) = emitter.as_mut() {
        emitter.flush().map_err(log_err)?;
    }
    Ok(all_passed)
}

fn validate_log(log: &Path) -> Result<bool, HarnessError> {
    let (lines, errors) = validate_log_file(log)?;
    for err in &errors {
        eprintln!("{err}");
    }
    eprintln!(
        "Validated {} line(s) in {}: {} error(s)",
        lines,
        log.display(),
        errors.len()
    );
    Ok(errors.is_empty())
}
