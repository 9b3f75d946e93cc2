//! ROI-DSL command-line compiler
//!
//! Wraps the core pipeline with file I/O: reads one `.roi` file, runs
//! `validate`, `preview`, or `compile`, and serializes the generated
//! output trees into one subdirectory per output kind.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use roidsl_compiler::{interpret, validate as validate_document, Compiler};
use roidsl_core::ast::OutputKind;
use roidsl_core::{Diagnostic, Value};

const WATCH_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Parser)]
#[command(name = "roidsl", version, about = "Compile ROI-DSL files into downstream assets")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse and validate a .roi file without generating outputs
    Validate {
        /// Input .roi file path
        input: PathBuf,
    },
    /// Show what a .roi file declares and would generate
    Preview {
        /// Input .roi file path
        input: PathBuf,
    },
    /// Compile a .roi file into its requested outputs
    Compile {
        /// Input .roi file path
        input: PathBuf,
        /// Restrict generation to specific output kinds (repeatable)
        #[arg(short, long = "output")]
        outputs: Vec<OutputKind>,
        /// Directory to write generated files into
        #[arg(long, default_value = "output")]
        out_dir: PathBuf,
        /// Run the full pipeline but write nothing
        #[arg(short, long)]
        dry_run: bool,
        /// Recompile whenever the input file changes
        #[arg(short, long)]
        watch: bool,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Command::Validate { input } => run_validate(&input),
        Command::Preview { input } => run_preview(&input),
        Command::Compile {
            input,
            outputs,
            out_dir,
            dry_run,
            watch,
        } => {
            let selected = if outputs.is_empty() {
                None
            } else {
                Some(outputs)
            };
            if watch {
                run_watch(&input, selected.as_deref(), &out_dir, dry_run)
            } else {
                run_compile(&input, selected.as_deref(), &out_dir, dry_run)
            }
        }
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn read_source(input: &Path) -> Result<String> {
    if input.extension().map_or(true, |ext| ext != "roi") {
        eprintln!("warning: input file should have a .roi extension");
    }
    fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))
}

fn report(diagnostics: &[Diagnostic]) {
    for diag in diagnostics {
        eprintln!("{diag}");
    }
}

fn run_validate(input: &Path) -> Result<bool> {
    let text = read_source(input)?;

    let parsed = match parse_source(&text) {
        Ok(parsed) => parsed,
        Err(diag) => {
            eprintln!("{diag}");
            return Ok(false);
        }
    };
    report(&parsed.diagnostics);

    let report_result = validate_document(&parsed.document);
    report(&report_result.warnings);
    report(&report_result.errors);

    if report_result.is_valid() {
        let doc = &parsed.document;
        println!("valid ROI-DSL file");
        println!("  goals:            {}", doc.goals.len());
        println!("  metrics:          {}", doc.metrics.len());
        println!("  computed metrics: {}", doc.computed_metrics.len());
        println!("  triggers:         {}", doc.triggers.len());
        println!("  outputs:          {}", doc.output_selectors.join(", "));
        Ok(true)
    } else {
        eprintln!(
            "validation failed with {} error(s)",
            report_result.errors.len()
        );
        Ok(false)
    }
}

fn run_preview(input: &Path) -> Result<bool> {
    let text = read_source(input)?;

    let parsed = match parse_source(&text) {
        Ok(parsed) => parsed,
        Err(diag) => {
            eprintln!("{diag}");
            return Ok(false);
        }
    };
    let doc = parsed.document;
    let insights = interpret(&doc);

    if let Some(persona) = doc.primary_persona() {
        println!("Persona: {} ({})", persona.name, persona.description);
    }

    if !doc.goals.is_empty() {
        println!("\nGoals:");
        for goal in &doc.goals {
            println!("  {}: {}", goal.key, goal.description);
        }
    }

    if !doc.metrics.is_empty() {
        println!("\nMetrics:");
        for metric in &doc.metrics {
            println!("  {}: {}", metric.key, metric.value);
        }
    }

    if !insights.computed.is_empty() {
        println!("\nComputed metrics:");
        for (key, value) in &insights.computed {
            println!("  {key}: {value}");
        }
    }

    if !doc.triggers.is_empty() {
        println!("\nAutomation triggers:");
        for trigger in &doc.triggers {
            println!("  WHEN {} THEN {}", trigger.condition, trigger.action);
        }
    }

    println!("\nRisk score: {}", insights.risk_score);

    println!("\nWill generate:");
    for name in &doc.output_selectors {
        if let Some(kind) = OutputKind::from_name(name) {
            println!("  {}/", kind.subdir());
        } else {
            println!("  {name} (unknown)");
        }
    }

    Ok(true)
}

fn run_compile(
    input: &Path,
    selected: Option<&[OutputKind]>,
    out_dir: &Path,
    dry_run: bool,
) -> Result<bool> {
    let text = read_source(input)?;

    let compiler = Compiler::new();
    let result = compiler.compile(&text, selected);
    report(&result.diagnostics);

    if !result.success {
        eprintln!("compilation failed");
        return Ok(false);
    }

    if dry_run {
        println!(
            "dry run: {} output(s) would be written",
            result.outputs.len()
        );
        return Ok(true);
    }

    for (kind, value) in &result.outputs {
        let path = write_output(out_dir, *kind, value)?;
        println!("generated {}", path.display());
    }
    info!("wrote {} outputs under {}", result.outputs.len(), out_dir.display());

    Ok(true)
}

/// Serialize one output tree under `out_dir/<subdir>/`. The skill
/// descriptor is plain text; everything else is pretty-printed JSON.
fn write_output(out_dir: &Path, kind: OutputKind, value: &Value) -> Result<PathBuf> {
    let dir = out_dir.join(kind.subdir());
    fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let path = dir.join(output_file_name(kind));
    let body = match kind {
        OutputKind::SkSkill => value
            .as_object()
            .and_then(|obj| obj.get("content"))
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
        _ => serde_json::to_string_pretty(value).context("failed to serialize output")?,
    };

    fs::write(&path, body).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

fn output_file_name(kind: OutputKind) -> &'static str {
    match kind {
        OutputKind::MintSite => "site_config.json",
        OutputKind::Agent => "ai_agent_config.json",
        OutputKind::SmsCampaign => "sms_campaign.json",
        OutputKind::RMetrics => "metrics_config.json",
        OutputKind::Vroi => "vroi_calculator.json",
        OutputKind::SkSkill => "semantic_skill.txt",
    }
}

/// Poll the input file's mtime and recompile on change
fn run_watch(
    input: &Path,
    selected: Option<&[OutputKind]>,
    out_dir: &Path,
    dry_run: bool,
) -> Result<bool> {
    println!("watching {} (Ctrl+C to stop)", input.display());
    let mut last_modified = modified_time(input)?;
    run_compile(input, selected, out_dir, dry_run)?;

    loop {
        thread::sleep(WATCH_INTERVAL);
        let modified = modified_time(input)?;
        if modified != last_modified {
            println!("\nfile changed, recompiling...");
            run_compile(input, selected, out_dir, dry_run)?;
            last_modified = modified;
        }
    }
}

fn modified_time(input: &Path) -> Result<SystemTime> {
    fs::metadata(input)
        .and_then(|m| m.modified())
        .with_context(|| format!("failed to stat {}", input.display()))
}

/// Parse, converting a fatal error into a printable diagnostic
fn parse_source(
    text: &str,
) -> std::result::Result<roidsl_parser::Parsed, Diagnostic> {
    use roidsl_core::diagnostics::Stage;

    roidsl_parser::parse(text).map_err(|err| {
        let mut diag = Diagnostic::error(Stage::Parse, err.to_string());
        if let Some(line) = err.line() {
            diag = diag.with_line(line);
        }
        diag
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    const SOURCE: &str = r#"
PERSONA Sponsor: "Phase III Program Director"
GOAL ReduceDrift: "Cut vendor slippage"
METRIC VendorDrift: 0.45
OUTPUT MintSite
OUTPUT SK_SKILL
"#;

    #[test]
    fn test_compile_writes_expected_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("profile.roi");
        fs::write(&input, SOURCE).unwrap();
        let out_dir = dir.path().join("output");

        let ok = run_compile(&input, None, &out_dir, false).unwrap();
        assert!(ok);
        assert!(out_dir.join("mintsite/site_config.json").exists());
        assert!(out_dir.join("skills/semantic_skill.txt").exists());

        let skill = fs::read_to_string(out_dir.join("skills/semantic_skill.txt")).unwrap();
        assert!(skill.contains("persona=Sponsor"));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("profile.roi");
        fs::write(&input, SOURCE).unwrap();
        let out_dir = dir.path().join("output");

        let ok = run_compile(&input, None, &out_dir, true).unwrap();
        assert!(ok);
        assert!(!out_dir.exists());
    }

    #[test]
    fn test_selection_restricts_written_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("profile.roi");
        fs::write(&input, SOURCE).unwrap();
        let out_dir = dir.path().join("output");

        let ok = run_compile(&input, Some(&[OutputKind::SkSkill]), &out_dir, false).unwrap();
        assert!(ok);
        assert!(!out_dir.join("mintsite").exists());
        assert!(out_dir.join("skills/semantic_skill.txt").exists());
    }

    #[test]
    fn test_compile_fails_on_invalid_document() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.roi");
        let mut file = fs::File::create(&input).unwrap();
        writeln!(file, "METRIC Drift: 2.0").unwrap();
        writeln!(file, "OUTPUT MintSite").unwrap();
        drop(file);

        let out_dir = dir.path().join("output");
        let ok = run_compile(&input, None, &out_dir, false).unwrap();
        assert!(!ok);
        assert!(!out_dir.exists());
    }

    #[test]
    fn test_validate_reports_success() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("profile.roi");
        fs::write(&input, SOURCE).unwrap();
        assert!(run_validate(&input).unwrap());
    }
}
