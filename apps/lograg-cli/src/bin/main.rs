use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use lograg_core::config::{expand_path, Config, Settings};
use lograg_core::{Error, FieldExtractor, Metadata};
use lograg_retrieval::{LogSummarizer, OpenAiChat, Session};
use lograg_vector::lossy_lines;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "lograg", version, about = "Ask questions about a log file")]
struct Cli {
    /// Configuration file to read instead of ./config.toml.
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the fields extracted from every line.
    Extract {
        file: String,
        /// One JSON object per line instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Ingest a log and answer a question, or read questions from stdin.
    Ask {
        file: String,
        question: Option<String>,
    },
    /// Show the lines closest to a query.
    Search {
        file: String,
        query: String,
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },
    /// Summarize a log chunk by chunk.
    Summarize { file: String },
    /// List the extraction rules in effect.
    Rules,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref().map(expand_path);
    let settings = Config::load_from(config_path.as_deref())?.settings()?;
    init_tracing(&settings);
    tracing::debug!(command = ?cli.command, "starting");

    match cli.command {
        Command::Extract { file, json } => extract(&settings, &expand_path(file), json),
        Command::Ask { file, question } => ask(&settings, &expand_path(file), question.as_deref()),
        Command::Search { file, query, limit } => search(&settings, &expand_path(file), &query, limit),
        Command::Summarize { file } => summarize(&settings, &expand_path(file)),
        Command::Rules => {
            for rule in FieldExtractor::new(&settings.rules)?.rules() {
                println!("{:<14} {}", rule.name(), rule.pattern());
                if !rule.description().is_empty() { println!("{:<14} {}", "", rule.description()); }
            }
            Ok(())
        }
    }
}

/// `RUST_LOG` wins over `log.level`; logs go to stderr.
fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log.level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn spinner(path: &Path) -> Result<ProgressBar> {
    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {pos} lines {msg}")?);
    bar.set_message(format!("from {}", path.display()));
    bar.enable_steady_tick(Duration::from_millis(80));
    Ok(bar)
}

fn extract(settings: &Settings, path: &Path, json: bool) -> Result<()> {
    let extractor = FieldExtractor::new(&settings.rules)?;
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (i, line) in lossy_lines(BufReader::new(file)).enumerate() {
        let text = line?;
        let metadata = Metadata { line_number: i + 1, fields: extractor.extract(&text), text };
        if json {
            writeln!(out, "{}", serde_json::to_string(&metadata)?)?;
        } else if !metadata.fields.is_empty() {
            let fields: Vec<String> = metadata.fields.iter().map(|(n, v)| format!("{n}={v}")).collect();
            writeln!(out, "{:>6}: {}", metadata.line_number, fields.join("  "))?;
        }
    }
    Ok(())
}

fn ask(settings: &Settings, path: &Path, question: Option<&str>) -> Result<()> {
    if settings.llm.api_key().is_none() {
        return Err(Error::InvalidConfig("llm.api_key is not set and OPENAI_API_KEY is empty".into()).into());
    }
    let mut session = Session::from_settings(settings)?;
    let report = session.ingest_file(path, spinner(path)?)?;
    println!("✅ Ingested {} lines ({} batches)", report.records_ingested, report.batches);

    if let Some(question) = question {
        return print_answer(&session, question);
    }

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 { break; }
        let question = line.trim();
        if question.is_empty() { continue; }
        if question == "exit" || question == "quit" { break; }
        match print_answer(&session, question) {
            Ok(()) => {}
            Err(e) => eprintln!("❌ {e:#}"),
        }
    }
    Ok(())
}

fn print_answer(session: &Session, question: &str) -> Result<()> {
    let answer = session.ask(question)?;
    let context = &answer.context;
    println!("📝 line {} (score {:.4}): {}", context.metadata.line_number, context.score, context.metadata.text);
    println!("{}", answer.text);
    Ok(())
}

fn search(settings: &Settings, path: &Path, query: &str, limit: usize) -> Result<()> {
    let mut session = Session::from_settings(settings)?;
    session.ingest_file(path, spinner(path)?)?;

    let hits = session.search(query, limit)?;
    println!("🔍 Found {} results for: \"{}\"", hits.len(), query);
    for (i, hit) in hits.iter().enumerate() {
        let metadata = &hit.entry.metadata;
        println!("\n  {}. score={:.4}  line={}", i + 1, hit.score, metadata.line_number);
        println!("     {}", metadata.text);
    }
    Ok(())
}

fn summarize(settings: &Settings, path: &Path) -> Result<()> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let text = String::from_utf8_lossy(&bytes).replace("\r\n", "\n");
    let chat = OpenAiChat::from_settings(&settings.llm)?;
    let summary = LogSummarizer::new(&chat, settings.summary.chunk_size)?.summarize(&text)?;
    print!("{summary}");
    Ok(())
}
