use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ea_copilot::demo::DEMO_QUESTIONS;
use ea_copilot::{
    Config, ContextRetriever, Copilot, CopilotSettings, Evaluation, KnowledgeStore,
    OpenAiCompletion, format_summary,
};

/// EA Copilot - answer enterprise architecture questions grounded in a curated corpus
#[derive(Parser)]
#[command(name = "ea-copilot", version, about)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, env = "EA_COPILOT_CONFIG")]
    config: Option<PathBuf>,

    /// Corpus CSV to use instead of the embedded dataset
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the retrieved context for a question (no network access)
    Context {
        /// Free-text question
        question: String,
        /// Number of records to retrieve
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
        /// Seed for the no-overlap sampling fallback
        #[arg(long)]
        seed: Option<u64>,
        /// Show the relevance score of each record
        #[arg(long)]
        scores: bool,
    },
    /// Ask a question and print the basic and grounded answers
    Ask {
        /// Free-text question
        question: String,
        /// Number of records to retrieve
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
        /// Only ask without retrieved context
        #[arg(long, conflicts_with = "grounded_only")]
        basic_only: bool,
        /// Only ask with retrieved context
        #[arg(long)]
        grounded_only: bool,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the built-in demonstration questions
    Demo {
        /// Print the results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summarize the corpus by framework
    Summary {
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the corpus to a CSV file
    Export {
        /// Destination path
        path: PathBuf,
    },
    /// Print a seeded sample of corpus records
    Preview {
        /// Number of records
        #[arg(short, long, default_value = "5")]
        count: usize,
        /// Sampling seed
        #[arg(long, default_value = "7")]
        seed: u64,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,ea_copilot=info",
        1 => "info,ea_copilot=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if cli.corpus.is_some() {
        config.corpus_path = cli.corpus;
    }

    let store = load_store(config.corpus_path.as_deref())?;

    match cli.command {
        Command::Context {
            question,
            top_k,
            seed,
            scores,
        } => cmd_context(
            &store,
            &question,
            top_k.unwrap_or(config.retrieval.top_k),
            seed.unwrap_or(config.retrieval.seed),
            scores,
        ),
        Command::Ask {
            question,
            top_k,
            basic_only,
            grounded_only,
            json,
        } => {
            let mut settings = CopilotSettings::from(&config);
            if let Some(top_k) = top_k {
                settings.top_k = top_k;
            }
            let copilot = build_copilot(&config, store, settings)?;
            cmd_ask(&copilot, &question, basic_only, grounded_only, json).await
        }
        Command::Demo { json } => {
            let copilot = build_copilot(&config, store, CopilotSettings::from(&config))?;
            cmd_demo(&copilot, json).await
        }
        Command::Summary { json } => {
            let summary = store.summary();
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", format_summary(&summary));
            }
            Ok(())
        }
        Command::Export { path } => {
            store.write_csv_path(&path)?;
            println!("Wrote {} rows to {}", store.len(), path.display());
            Ok(())
        }
        Command::Preview { count, seed } => {
            for record in store.sample(count, seed) {
                println!("{}", record.text());
            }
            Ok(())
        }
    }
}

fn load_store(corpus_path: Option<&Path>) -> anyhow::Result<KnowledgeStore> {
    let store = match corpus_path {
        Some(path) => KnowledgeStore::from_csv_path(path)?,
        None => KnowledgeStore::embedded()?,
    };
    tracing::debug!(rows = store.len(), "knowledge store ready");
    Ok(store)
}

fn build_copilot(
    config: &Config,
    store: KnowledgeStore,
    settings: CopilotSettings,
) -> anyhow::Result<Copilot> {
    let service = OpenAiCompletion::new(&config.completion)?;
    tracing::debug!(endpoint = service.endpoint(), "completion service ready");
    Ok(Copilot::new(store, Arc::new(service), settings))
}

/// Print the context block, optionally with per-record relevance
fn cmd_context(
    store: &KnowledgeStore,
    question: &str,
    top_k: usize,
    seed: u64,
    scores: bool,
) -> anyhow::Result<()> {
    let selection = ContextRetriever::new(store).select(question, top_k, seed)?;

    if selection.fallback {
        tracing::info!("no keyword overlap, showing a seeded sample");
    }

    if scores {
        for scored in &selection.records {
            println!("[{:>3}] {}", scored.relevance, scored.record.text());
        }
    } else {
        println!("{}", selection.render());
    }

    Ok(())
}

async fn cmd_ask(
    copilot: &Copilot,
    question: &str,
    basic_only: bool,
    grounded_only: bool,
    json: bool,
) -> anyhow::Result<()> {
    if basic_only {
        let answer = copilot.ask_basic(question).await?;
        print_single(json, question, "basic_answer", &answer)?;
        return Ok(());
    }

    if grounded_only {
        let answer = copilot.ask_grounded(question, None).await?;
        print_single(json, question, "grounded_answer", &answer)?;
        return Ok(());
    }

    let evaluation = copilot.evaluate(question).await?;
    print_evaluation(&evaluation, json)
}

async fn cmd_demo(copilot: &Copilot, json: bool) -> anyhow::Result<()> {
    let mut evaluations = Vec::with_capacity(DEMO_QUESTIONS.len());

    for (idx, question) in DEMO_QUESTIONS.iter().enumerate() {
        tracing::info!(question = idx + 1, "evaluating demo question");
        let evaluation = copilot.evaluate(question).await?;
        if json {
            evaluations.push(evaluation);
        } else {
            println!("### Question {}\n", idx + 1);
            print_evaluation(&evaluation, false)?;
            println!();
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&evaluations)?);
    }

    Ok(())
}

fn print_single(json: bool, question: &str, key: &str, answer: &str) -> anyhow::Result<()> {
    if json {
        let mut value = serde_json::Map::new();
        value.insert("question".to_string(), question.into());
        value.insert(key.to_string(), answer.into());
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{answer}");
    }
    Ok(())
}

fn print_evaluation(evaluation: &Evaluation, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(evaluation)?);
        return Ok(());
    }

    println!("{}", evaluation.question);
    println!("\n--- Basic completion ---\n");
    println!("{}", evaluation.basic_answer);
    println!("\n--- Custom completion ---\n");
    println!("{}", evaluation.grounded_answer);
    println!("\n--- Context ---\n");
    println!("{}", evaluation.context);
    Ok(())
}
