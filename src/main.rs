use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use texprep::{PreflightError, PreflightOptions, PreflightReport, PreflightWarning};

/// Check a LaTeX project before conversion: detect its journal template and
/// verify that referenced figures, includes and bibliographies exist.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Project directory, `.zip` archive or main `.tex` file.
    #[arg()]
    input: PathBuf,

    /// Write the report to a file instead of stdout.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Emit the full report as JSON.
    #[arg(long)]
    json: bool,

    /// Main document, relative to the project root. Auto-detected when omitted.
    #[arg(long, value_name = "PATH")]
    main: Option<PathBuf>,

    /// Directory holding per-family template files.
    #[arg(long, value_name = "DIR")]
    templates_dir: Option<PathBuf>,

    /// Leading lines inspected for journal detection (0 scans the whole file).
    #[arg(long, value_name = "N")]
    line_limit: Option<usize>,

    /// Fail when a referenced figure cannot be found.
    #[arg(long)]
    strict: bool,
}

fn print_warnings(warnings: &[PreflightWarning]) {
    for w in warnings {
        let loc = w
            .location
            .as_deref()
            .map(|l| format!(" ({l})"))
            .unwrap_or_default();
        eprintln!("warning: [{:?}] {}{}", w.code, w.message, loc);
    }
}

fn build_options(cli: &Cli) -> PreflightOptions {
    let mut options = PreflightOptions::from_env();
    if cli.templates_dir.is_some() {
        options.templates_dir = cli.templates_dir.clone();
    }
    if let Some(limit) = cli.line_limit {
        options.line_limit = (limit > 0).then_some(limit);
    }
    PreflightOptions {
        main_document: cli.main.clone(),
        strict: cli.strict,
        ..options
    }
}

fn render_summary(report: &PreflightReport) -> String {
    let d = &report.detection;
    let mut out = String::new();
    out.push_str(&format!(
        "main document: {}\n",
        report.main_document_relative().display()
    ));
    out.push_str(&format!("journal family: {}\n", d.journal_family));
    out.push_str(&format!("document class: {}\n", d.document_class));
    if !d.class_options.is_empty() {
        out.push_str(&format!("class options: {}\n", d.class_options.join(", ")));
    }
    out.push_str(&format!("confidence: {}\n", d.confidence_score));
    for signal in &d.matched_signals {
        out.push_str(&format!("  - {signal}\n"));
    }
    if let Some(style) = &d.bibliography_style {
        out.push_str(&format!("bibliography style: {style}\n"));
    }
    if d.requires_logo {
        let logo = d.logo_file_name.as_deref().unwrap_or("(unnamed)");
        out.push_str(&format!("logo: {logo}\n"));
    }
    match &report.template {
        Some(path) => out.push_str(&format!("template: {}\n", path.display())),
        None => out.push_str(&format!("template: {} (not installed)\n", report.template_name)),
    }

    let v = &report.validation;
    out.push_str(&format!(
        "assets: {} resolved, {} missing required, {} missing optional\n",
        v.resolved.len(),
        v.missing_required.len(),
        v.missing_optional.len()
    ));
    for missing in v.missing_required.iter().chain(&v.missing_optional) {
        out.push_str(&format!("  missing {:?}: {}\n", missing.kind, missing.reference));
    }
    out
}

fn run(cli: Cli) -> Result<ExitCode, ExitCode> {
    let options = build_options(&cli);

    let report = texprep::preflight_path(&cli.input, &options).map_err(|e| {
        eprintln!("error: {}: {e}", cli.input.display());
        match e {
            PreflightError::UnsupportedInput { .. } => ExitCode::from(2),
            _ => ExitCode::from(1),
        }
    })?;

    print_warnings(&report.warnings);

    let output_buf = if cli.json {
        let mut json = serde_json::to_string_pretty(&report).map_err(|e| {
            eprintln!("error: cannot serialize report: {e}");
            ExitCode::from(1)
        })?;
        json.push('\n');
        json
    } else {
        render_summary(&report)
    };

    if let Some(ref out_path) = cli.output {
        std::fs::write(out_path, &output_buf).map_err(|e| {
            eprintln!("error: {}: {e}", out_path.display());
            ExitCode::from(1)
        })?;
    } else {
        io::stdout().write_all(output_buf.as_bytes()).map_err(|e| {
            eprintln!("error: stdout: {e}");
            ExitCode::from(1)
        })?;
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(code) => code,
    }
}
