//! Command-line interface for `rw-corpus`.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use serde_json::json;
use tracing::error;

use rw_common::{Error, OutputFormat, Result};
use rw_config::{resolve_config, ConfigOverrides, RelationStyle, RelationVocabulary};

use crate::assertions::{AssertionJoiner, AssertionReport};
use crate::exit_codes::ExitCode;
use crate::logging::LogFormat;
use crate::pipeline::{generate_corpus, CorpusSummary};

/// Random-walk corpus tools.
#[derive(Debug, Parser)]
#[command(name = "rw-corpus", version, about)]
pub struct Cli {
    /// Report format on stdout.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// Log line format on stderr.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Increase log verbosity (repeatable).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Decrease log verbosity (repeatable).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub quiet: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn verbosity(&self) -> i8 {
        (self.verbose.min(8) as i8) - (self.quiet.min(8) as i8)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a text corpus from a walk collection.
    Corpus(ConfigArgs),

    /// Join ConceptNet relation files into one assertion table.
    Assertions(AssertionArgs),

    /// Inspect configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the resolved configuration.
    Show(ConfigArgs),
}

/// Corpus settings. Flags win over environment, which wins over the file.
#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    /// TOML config file.
    #[arg(long, env = "RW_CORPUS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Serialized walk collection (.json or .jsonl).
    #[arg(long, short = 'i', env = "RW_CORPUS_INPUT")]
    pub input: Option<PathBuf>,

    /// Corpus output file.
    #[arg(long, short = 'o', env = "RW_CORPUS_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Walks per batch [default: 1000].
    #[arg(long, env = "RW_CORPUS_CHUNK_SIZE")]
    pub chunk_size: Option<usize>,

    /// Worker pool size [default: 10].
    #[arg(long, env = "RW_CORPUS_WORKERS")]
    pub workers: Option<usize>,

    /// Relation token rendering [default: passthrough].
    #[arg(long, value_enum)]
    pub relation_style: Option<RelationStyle>,
}

impl From<&ConfigArgs> for ConfigOverrides {
    fn from(args: &ConfigArgs) -> Self {
        ConfigOverrides {
            config_path: args.config.clone(),
            input_path: args.input.clone(),
            output_path: args.output.clone(),
            chunk_size: args.chunk_size,
            worker_count: args.workers,
            relation_style: args.relation_style,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct AssertionArgs {
    /// Directory holding cn_<relation>.txt files for the whole vocabulary.
    #[arg(long, conflicts_with = "files", required_unless_present = "files")]
    pub relations_dir: Option<PathBuf>,

    /// Explicit relation file (repeatable).
    #[arg(long = "file")]
    pub files: Vec<PathBuf>,

    /// Relation-to-phrase vocabulary.
    #[arg(long, value_enum, default_value_t = RelationVocabulary::Default)]
    pub vocabulary: RelationVocabulary,

    /// Output TSV.
    #[arg(long, short = 'o')]
    pub output: PathBuf,
}

/// Execute a parsed command line and map the outcome to an exit code.
pub fn run(cli: &Cli) -> ExitCode {
    let result = match &cli.command {
        Command::Corpus(args) => run_corpus(args, cli.format),
        Command::Assertions(args) => run_assertions(args, cli.format),
        Command::Config {
            action: ConfigCommand::Show(args),
        } => run_config_show(args, cli.format),
    };

    match result {
        Ok(()) => ExitCode::Ok,
        Err(err) => {
            let code = ExitCode::for_error(&err);
            error!(error = %err, code = err.code(), "command failed");
            report_error(&err, cli.format);
            code
        }
    }
}

fn run_corpus(args: &ConfigArgs, format: OutputFormat) -> Result<()> {
    let resolved = resolve_config(&args.into())?;
    let summary = generate_corpus(&resolved.config)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Human => println!("{}", render_summary(&summary)),
    }
    Ok(())
}

fn run_assertions(args: &AssertionArgs, format: OutputFormat) -> Result<()> {
    let joiner = AssertionJoiner::new(args.vocabulary);
    let files = match &args.relations_dir {
        Some(dir) => joiner.relation_files(dir),
        None => args.files.clone(),
    };
    let report = joiner.join(&files, &args.output)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Human => println!("{}", render_assertion_report(&report)),
    }
    Ok(())
}

fn run_config_show(args: &ConfigArgs, format: OutputFormat) -> Result<()> {
    let resolved = resolve_config(&args.into())?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&resolved)?),
        OutputFormat::Human => {
            let cfg = &resolved.config;
            println!("source:         {}", resolved.source);
            println!("input_path:     {}", cfg.input_path.display());
            println!("output_path:    {}", cfg.output_path.display());
            println!("chunk_size:     {}", cfg.chunk_size);
            println!("worker_count:   {}", cfg.worker_count);
            println!("relation_style: {}", cfg.relation_style);
        }
    }
    Ok(())
}

fn report_error(err: &Error, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let body = json!({
                "status": "error",
                "code": err.code(),
                "message": err.to_string(),
            });
            println!("{body}");
        }
        OutputFormat::Human => eprintln!("error: {err}"),
    }
}

pub fn render_summary(summary: &CorpusSummary) -> String {
    format!(
        "wrote {} ({} bytes): {} blocks from {} walks in {} batches, {} workers, {} ms\nsha256 {}",
        summary.output_path.display(),
        summary.bytes,
        summary.blocks,
        summary.walks,
        summary.batches,
        summary.worker_count,
        summary.elapsed_ms,
        summary.sha256,
    )
}

pub fn render_assertion_report(report: &AssertionReport) -> String {
    let mut lines = vec![format!(
        "wrote {} assertions from {} files to {}",
        report.total,
        report.files,
        report.output_path.display()
    )];
    for (phrase, count) in &report.counts {
        lines.push(format!("  {phrase:24} {count}"));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_corpus_flags() {
        let cli = Cli::try_parse_from([
            "rw-corpus",
            "--format",
            "json",
            "-vv",
            "corpus",
            "--input",
            "walks.json",
            "--output",
            "out/corpus.txt",
            "--chunk-size",
            "7",
            "--workers",
            "4",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.verbosity(), 2);
        let Command::Corpus(args) = cli.command else {
            panic!("expected corpus command");
        };
        let overrides = ConfigOverrides::from(&args);
        assert_eq!(overrides.chunk_size, Some(7));
        assert_eq!(overrides.worker_count, Some(4));
    }

    #[test]
    fn test_assertions_requires_a_source() {
        assert!(Cli::try_parse_from(["rw-corpus", "assertions", "--output", "a.tsv"]).is_err());
        assert!(Cli::try_parse_from([
            "rw-corpus",
            "assertions",
            "--relations-dir",
            "rel",
            "--file",
            "cn_isA.txt",
            "--output",
            "a.tsv",
        ])
        .is_err());
    }

    #[test]
    fn test_render_assertion_report() {
        let report = AssertionReport {
            schema_version: "1.0.0".into(),
            output_path: "a.tsv".into(),
            files: 1,
            total: 2,
            counts: [("is a".to_string(), 2)].into_iter().collect(),
        };
        let text = render_assertion_report(&report);
        assert!(text.starts_with("wrote 2 assertions from 1 files"));
        assert!(text.contains("is a"));
    }
}
