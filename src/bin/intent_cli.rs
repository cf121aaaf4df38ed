/*!
 * Cyberbot Intent CLI
 *
 * Classifies chat lines into assistant intents and prints the extracted
 * task and reminder details, either human-readable or as JSON lines for
 * scripting and regression checks.
 */

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use cyberbot_core::{CatalogConfig, EngineOptions, IntentEngine, IntentResult, TimeOverridePolicy};

#[derive(Parser)]
#[command(name = "intent_cli")]
#[command(about = "Cyberbot - intent classification and parameter extraction", long_about = None)]
struct Cli {
    /// Catalog file (YAML, or JSON with a .json extension) replacing the built-in one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// What wins when a time keyword and a numeric time both match
    /// (regex-overwrites, regex-overwrites-synced, keyword-first)
    #[arg(long, global = true, default_value_t = TimeOverridePolicy::RegexOverwrites)]
    time_policy: TimeOverridePolicy,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a single line of text
    Classify {
        /// Text to classify (multiple words are joined with spaces)
        #[arg(required = true)]
        text: Vec<String>,

        /// Print the result as JSON
        #[arg(short, long)]
        json: bool,

        /// Also print the per-intent score totals
        #[arg(short, long)]
        explain: bool,
    },

    /// Classify every non-empty input line, one JSON object per line
    Stream {
        /// Input file (stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the active catalog as YAML
    Catalog,

    /// Show version information
    Version,
}

/// One line of `stream` output
#[derive(Serialize)]
struct StreamRecord<'a> {
    input: &'a str,
    #[serde(flatten)]
    result: IntentResult,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    if let Commands::Version = cli.command {
        println!("intent_cli v{}", env!("CARGO_PKG_VERSION"));
        println!("Cyberbot intent classifier");
        return Ok(());
    }

    let options = EngineOptions {
        time_policy: cli.time_policy,
    };
    let engine = build_engine(cli.catalog.as_deref(), options)?;

    match cli.command {
        Commands::Classify { text, json, explain } => classify(&engine, &text.join(" "), json, explain),
        Commands::Stream { input, output } => stream(&engine, input, output),
        Commands::Catalog => {
            let yaml = engine.catalog().config().to_yaml().context("failed to export catalog")?;
            print!("{}", yaml);
            Ok(())
        }
        Commands::Version => Ok(()),
    }
}

fn build_engine(catalog: Option<&Path>, options: EngineOptions) -> Result<IntentEngine> {
    match catalog {
        Some(path) => {
            log::info!("loading catalog from {}", path.display());
            IntentEngine::load(path, options)
                .with_context(|| format!("failed to load catalog {}", path.display()))
        }
        None => IntentEngine::from_config(CatalogConfig::builtin(), options)
            .context("failed to compile built-in catalog"),
    }
}

fn classify(engine: &IntentEngine, text: &str, json: bool, explain: bool) -> Result<()> {
    let result = engine.classify(text);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if json {
        if explain {
            let scores: serde_json::Map<String, serde_json::Value> = engine
                .explain(text)
                .iter()
                .map(|(kind, score)| (kind.to_string(), serde_json::json!(score)))
                .collect();
            let mut value = serde_json::to_value(&result)?;
            value["scores"] = serde_json::Value::Object(scores);
            writeln!(out, "{}", value)?;
        } else {
            writeln!(out, "{}", serde_json::to_string(&result)?)?;
        }
        return Ok(());
    }

    writeln!(out, "intent:      {} ({})", result.kind, result.kind.description())?;
    writeln!(out, "confidence:  {:.2}", result.confidence)?;
    if let Some(title) = &result.task_title {
        writeln!(out, "task:        {}", title)?;
    }
    if let Some(description) = &result.task_description {
        writeln!(out, "description: {}", description)?;
    }
    if let Some(reminder) = &result.reminder_time {
        writeln!(out, "reminder:    {}", reminder)?;
    }
    if !result.parameters.is_empty() {
        writeln!(out, "parameters:")?;
        for (key, value) in &result.parameters {
            writeln!(out, "  {} = {}", key, value)?;
        }
    }
    if explain {
        writeln!(out, "scores:")?;
        for (kind, score) in engine.explain(text).iter() {
            writeln!(out, "  {:<16}{:>6.2}", kind.as_str(), score)?;
        }
    }

    Ok(())
}

fn stream(engine: &IntentEngine, input: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    // Open input (stdin or file)
    let stdin = io::stdin();
    let reader: Box<dyn BufRead> = match &input {
        Some(path) => Box::new(io::BufReader::new(
            File::open(path).with_context(|| format!("cannot open {}", path.display()))?,
        )),
        None => Box::new(stdin.lock()),
    };

    // Open output (stdout or file)
    let stdout = io::stdout();
    let mut writer: Box<dyn Write> = match &output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("cannot create {}", path.display()))?,
        ),
        None => Box::new(stdout.lock()),
    };

    let mut count = 0usize;
    for line in reader.lines() {
        let line = line.context("failed to read input")?;
        let text = line.trim_end_matches('\r');
        if text.trim().is_empty() {
            continue;
        }

        let record = StreamRecord {
            input: text,
            result: engine.classify(text),
        };
        writeln!(writer, "{}", serde_json::to_string(&record)?)?;
        count += 1;
    }
    writer.flush()?;

    log::info!("classified {} lines", count);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "intent_cli",
            "classify",
            "remind me",
            "--time-policy",
            "keyword-first",
            "-vv",
        ]);
        assert_eq!(cli.time_policy, TimeOverridePolicy::KeywordFirst);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Classify { .. }));
    }

    #[test]
    fn test_time_policy_reaches_builtin_engine() {
        let options = EngineOptions {
            time_policy: TimeOverridePolicy::KeywordFirst,
        };
        let engine = build_engine(None, options).unwrap();
        assert_eq!(engine.options(), options);
        assert_eq!(
            engine.classify("remind me in 2 weeks").reminder_time.as_deref(),
            Some("In 7 days")
        );
    }

    #[test]
    fn test_stream_record_flattens_result() {
        let record = StreamRecord {
            input: "hello",
            result: IntentResult::general(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["input"], "hello");
        assert_eq!(value["kind"], "general");
    }
}
