mod config;
mod explain;

use anyhow::{Context, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use config::ConfigMerger;
use fs_err as fs;
use monolint_core::{Engine, resolve_config};
use monolint_fs::FsFileSystem;
use monolint_render::{render_json, render_markdown, render_text};
use monolint_rules::builtin_registry;
use monolint_types::{LintReport, ToolInfo};
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "monolint",
    version,
    about = "Rule-driven consistency linter and fixer for package.json monorepos."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check every workspace package against the configured rules.
    Check(CheckArgs),
    /// List the built-in rules.
    ListRules(ListRulesArgs),
    /// Explain what a rule checks, its options and how its fix behaves.
    Explain(ExplainArgs),
}

#[derive(Debug, Parser)]
struct CheckArgs {
    /// Workspace root containing package.json and monolint.toml.
    #[arg(long, default_value = ".")]
    root: Utf8PathBuf,

    /// Apply fixes for error findings.
    #[arg(long, default_value_t = false)]
    fix: bool,

    /// Show long messages and debug logs.
    #[arg(long, short, default_value_t = false)]
    verbose: bool,

    /// Only check these member package directories.
    #[arg(long, num_args = 1..)]
    paths: Vec<Utf8PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    format: ReportFormat,
}

#[derive(Debug, Parser)]
struct ListRulesArgs {
    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Parser)]
struct ExplainArgs {
    /// Rule name (e.g. "consistent-dependencies").
    rule: String,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ReportFormat {
    Text,
    Json,
    Markdown,
}

/// Exit code when the run itself, the configuration or a rule failed.
const EXIT_FAILURE: u8 = 1;
/// Exit code when error findings remain unfixed.
const EXIT_FINDINGS: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match real_main(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

/// `RUST_LOG` wins; otherwise warnings, or debug with `--verbose`.
fn init_logging(cli: &Cli) {
    let verbose = matches!(&cli.cmd, Command::Check(args) if args.verbose);
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn real_main(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.cmd {
        Command::Check(args) => cmd_check(args),
        Command::ListRules(args) => cmd_list_rules(args).map(|()| ExitCode::SUCCESS),
        Command::Explain(args) => cmd_explain(args).map(|()| ExitCode::SUCCESS),
    }
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<ExitCode> {
    let root = absolute_root(&args.root)?;
    debug!(root = %root, "resolved workspace root");

    let file_config = config::load_or_default(&root).context("load monolint.toml config")?;
    let merged =
        ConfigMerger::new(file_config).merge_check_args(&root, args.fix, args.verbose, &args.paths);

    let registry = builtin_registry();
    let resolved = resolve_config(&merged.lint, &registry, merged.settings);
    let fs = FsFileSystem::new();
    let outcome = Engine::new(&resolved, &fs).run(&root)?;

    let report = outcome.into_report(ToolInfo {
        name: "monolint".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    });

    let rendered = match args.format {
        ReportFormat::Text => render_text(&report, merged.verbose),
        ReportFormat::Json => render_json(&report)?,
        ReportFormat::Markdown => render_markdown(&report),
    };
    print!("{}", rendered);

    let code = exit_code(&report);
    info!(verdict = ?report.verdict.status, code, "check finished");
    Ok(ExitCode::from(code))
}

fn exit_code(report: &LintReport) -> u8 {
    if report.summary.failures > 0 {
        EXIT_FAILURE
    } else if report.summary.unfixed_errors() > 0 {
        EXIT_FINDINGS
    } else {
        0
    }
}

fn absolute_root(root: &Utf8Path) -> anyhow::Result<Utf8PathBuf> {
    let path = fs::canonicalize(root).with_context(|| format!("resolve workspace root {}", root))?;
    Utf8PathBuf::from_path_buf(path)
        .map_err(|p| anyhow!("workspace root is not valid UTF-8: {}", p.display()))
}

fn cmd_list_rules(args: ListRulesArgs) -> anyhow::Result<()> {
    let metas = builtin_registry().metas();

    match args.format {
        OutputFormat::Text => {
            println!("Available rules:\n");
            println!("  {:<26} {:<8} TITLE", "NAME", "FIXABLE");
            println!("  {:<26} {:<8} -----", "----", "-------");
            for meta in &metas {
                println!(
                    "  {:<26} {:<8} {}",
                    meta.name,
                    if meta.fixable { "yes" } else { "no" },
                    meta.title
                );
            }
            println!();
            println!("Use 'monolint explain <rule>' for details.");
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&metas)?);
        }
    }
    Ok(())
}

fn cmd_explain(args: ExplainArgs) -> anyhow::Result<()> {
    use explain::{lookup_guide, normalize_rule_name};

    let registry = builtin_registry();
    let name = normalize_rule_name(&args.rule);
    let Some(description) = registry.describe(&name) else {
        let available: Vec<_> = registry.metas().iter().map(|m| m.name).collect();
        anyhow::bail!(
            "Unknown rule: '{}'\n\nAvailable rules: {}",
            args.rule,
            available.join(", ")
        );
    };
    let meta = &description.meta;

    println!("================================================================================");
    println!("RULE: {}", meta.title);
    println!("================================================================================");
    println!();
    println!("Name:     {}", meta.name);
    println!("Fixable:  {}", if meta.fixable { "yes" } else { "no" });
    println!();

    println!("DESCRIPTION");
    println!("--------------------------------------------------------------------------------");
    println!("{}", meta.description);
    if let Some(guide) = lookup_guide(meta.name) {
        println!();
        println!("{}", guide.details);
        println!();

        println!("FIX");
        println!("--------------------------------------------------------------------------------");
        println!("{}", guide.fix_behavior);
        println!();

        println!("EXAMPLE CONFIG (monolint.toml)");
        println!("--------------------------------------------------------------------------------");
        println!("{}", guide.example);
    }
    println!();

    println!("OPTIONS SCHEMA");
    println!("--------------------------------------------------------------------------------");
    println!(
        "{}",
        serde_json::to_string_pretty(&description.options_schema)?
    );
    println!();

    Ok(())
}
