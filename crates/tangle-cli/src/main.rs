//! `tangle` command-line interface.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use tangle_core::{AnalysisConfig, Analyzer, Language, LanguageFilter};

#[derive(Parser, Debug)]
#[command(
    name = "tangle",
    version,
    about = "Scan a source tree for import dependencies, cycles, coupling, and complexity"
)]
struct Cli {
    /// Root directory to scan
    #[arg(short, long)]
    directory: PathBuf,

    /// Restrict scanning to one language
    #[arg(long, value_enum, default_value_t = LanguageArg::All)]
    language: LanguageArg,

    /// Coupling and complexity threshold
    #[arg(long, default_value_t = 10)]
    threshold: usize,

    /// Run the cycle detector and include cycles in the report
    #[arg(long)]
    detect_circular: bool,

    /// Include fan-in/fan-out neighbor lists in coupling records
    #[arg(long)]
    show_details: bool,

    /// Emit only the dependency graph, in the given form
    #[arg(long, value_enum)]
    output_graph: Option<GraphFormat>,

    /// Restrict complexity and file metrics to one project-relative file
    #[arg(long)]
    file: Option<PathBuf>,

    /// Exclusion glob on top of the default ignore set (repeatable)
    #[arg(long)]
    exclude: Vec<String>,

    /// Line-count policy for flagging oversized files
    #[arg(long, default_value_t = 600)]
    size_policy: usize,

    /// Skip the AST parsers and use the regex fallback for JS/TS
    #[arg(long)]
    force_heuristic: bool,

    /// Worker threads for the per-file phase (0 = all cores)
    #[arg(long, default_value_t = 0)]
    threads: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LanguageArg {
    Python,
    Javascript,
    Typescript,
    All,
}

impl From<LanguageArg> for LanguageFilter {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::Python => LanguageFilter::Only(Language::Python),
            LanguageArg::Javascript => LanguageFilter::Only(Language::JavaScript),
            LanguageArg::Typescript => LanguageFilter::Only(Language::TypeScript),
            LanguageArg::All => LanguageFilter::All,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum GraphFormat {
    Json,
    Dot,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("tangle: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<String> {
    let config = config_from(&cli);
    debug!(directory = %cli.directory.display(), threads = cli.threads, "starting scan");
    let report = Analyzer::new(config)
        .analyze()
        .with_context(|| format!("analyzing {}", cli.directory.display()))?;
    debug!(
        files = report.stats.files_scanned,
        edges = report.stats.edges,
        "scan finished"
    );

    Ok(match cli.output_graph {
        Some(GraphFormat::Json) => report.graph_json().context("serializing graph")?,
        Some(GraphFormat::Dot) => report.to_dot(),
        None => report.to_json().context("serializing report")?,
    })
}

fn config_from(cli: &Cli) -> AnalysisConfig {
    let mut config = AnalysisConfig::for_root(&cli.directory);
    config.language = cli.language.into();
    config.coupling_threshold = cli.threshold;
    config.complexity_threshold = cli.threshold as u32;
    config.detect_cycles = cli.detect_circular;
    config.show_details = cli.show_details;
    config.only_file = cli.file.clone();
    config.exclude = cli.exclude.clone();
    config.size_policy = cli.size_policy;
    config.force_heuristic = cli.force_heuristic;
    config.threads = cli.threads;
    config
}
