//! Command-line cultivation agent.
//!
//! Reads a node's latest snapshot and history from the realtime database,
//! digests the history window and asks the model for advice:
//!
//! ```text
//! advise --uid <UID> --hist 60 --q "Should I water now?"
//! ```
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use dotenvy::dotenv;

use sensorflow_advisor::config::{DEFAULT_HISTORY_LIMIT, DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL};
use sensorflow_advisor::prompt::DEFAULT_QUESTION;
use sensorflow_advisor::{advise, init_tracing, is_valid_uid, OllamaClient, RtdbClient};

// ---

#[derive(Debug, Parser)]
#[command(
    name = "advise",
    about = "Realtime database (latest + history) → model cultivation agent"
)]
struct Cli {
    /// Node id under /nodes/<UID>
    #[arg(long)]
    uid: String,

    /// How many recent history points to consider (<= 0 keeps all)
    #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT, allow_negative_numbers = true)]
    hist: i64,

    /// Question to ground the advice
    #[arg(long = "q", alias = "question", default_value = DEFAULT_QUESTION)]
    question: String,

    /// Realtime database base URL
    #[arg(long, env = "RTDB_URL")]
    dburl: String,

    /// Realtime database auth token
    #[arg(long, env = "RTDB_AUTH", hide_env_values = true)]
    auth: Option<String>,

    /// Model name
    #[arg(long, env = "OLLAMA_MODEL", default_value = DEFAULT_OLLAMA_MODEL)]
    model: String,

    /// Ollama base URL
    #[arg(long, env = "OLLAMA_URL", default_value = DEFAULT_OLLAMA_URL)]
    ollama_url: String,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // ---
    dotenv().ok();
    let cli = Cli::parse();
    init_tracing("warn");

    if !is_valid_uid(&cli.uid) {
        eprintln!("Invalid node id: {:?}", cli.uid);
        return Ok(ExitCode::FAILURE);
    }

    let store = RtdbClient::new(&cli.dburl, cli.auth.filter(|t| !t.is_empty()));
    let llm = OllamaClient::new(&cli.ollama_url, &cli.model);
    tracing::info!("Using model {} for node {}", llm.model(), cli.uid);

    let advice = advise(&store, &llm, &cli.uid, &cli.question, Some(cli.hist)).await?;

    let Some(advice) = advice else {
        eprintln!("No data found. Check /nodes/<UID>/latest or /history.");
        return Ok(ExitCode::FAILURE);
    };

    println!("Snapshot: {}", advice.compact);
    println!(
        "History: {}",
        advice.history_summary.as_deref().unwrap_or_default()
    );
    println!("\nAdvice:\n{}", advice.answer);

    Ok(ExitCode::SUCCESS)
}
