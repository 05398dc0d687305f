//! `studynote`: load a text document, print its summary, then answer
//! questions and generate quizzes about it from an interactive console.

mod console;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use studynote_rag::openai::OpenAIEmbeddingProvider;
use studynote_rag::openai_chat::OpenAIGenerationProvider;
use studynote_rag::{RagConfig, RagOrchestrator};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "studynote", about = "Summarize, question and quiz a study document", version)]
struct Cli {
    /// Plain-text document to load at startup
    file: Option<PathBuf>,

    /// Directory under which per-document vector stores are created
    #[arg(long, env = "STUDYNOTE_STORE_ROOT", default_value = "studynote_stores")]
    store_root: PathBuf,

    /// Number of questions `:quiz` asks for when no count is given
    #[arg(long, default_value_t = 5)]
    questions: usize,

    /// Embedding model name
    #[arg(long, env = "STUDYNOTE_EMBEDDING_MODEL")]
    embedding_model: Option<String>,

    /// Chat model name
    #[arg(long, env = "STUDYNOTE_CHAT_MODEL")]
    chat_model: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    if cli.questions == 0 {
        anyhow::bail!("--questions must be greater than zero");
    }

    let config = RagConfig::builder().store_root(&cli.store_root).build()?;

    let mut embedder = OpenAIEmbeddingProvider::from_env().context("embedding provider")?;
    if let Some(model) = &cli.embedding_model {
        embedder = embedder.with_model(model);
    }
    let mut chat = OpenAIGenerationProvider::from_env().context("chat provider")?;
    if let Some(model) = &cli.chat_model {
        chat = chat.with_model(model);
    }

    let orchestrator = RagOrchestrator::builder()
        .config(config)
        .embedding_provider(Arc::new(embedder))
        .generation_provider(Arc::new(chat))
        .build()?;

    tracing::info!(store_root = %cli.store_root.display(), "studynote ready");
    console::run_console(&orchestrator, cli.file, cli.questions).await
}
