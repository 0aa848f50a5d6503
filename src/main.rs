use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use hearth_api::{ApiState, RestApi};
use hearth_core::EmbeddingProvider;
use hearth_profile::{
    create_provider, EmbedderConfig, EmbedderKind, PreferenceProfile, DEFAULT_DIMENSIONS,
    DEFAULT_MODEL,
};
use hearth_rank::{Recommender, RecommenderConfig, DEFAULT_IMAGE_PREFIX};
use hearth_storage::{
    build_index_file, normalize_catalogue_file, CorpusSource, CorpusStore, DEFAULT_BATCH_SIZE,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Image recommendations from a home-preference profile
#[derive(Parser, Debug)]
#[command(name = "hearth")]
#[command(about = "Recommend inspiration images for a home-preference profile", long_about = None)]
struct Cli {
    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank the corpus against a profile and print the result document
    Recommend {
        /// Profile JSON file
        profile: PathBuf,

        #[command(flatten)]
        corpus: CorpusArgs,

        /// Number of inspirations and least matches
        #[arg(short, default_value_t = 6)]
        k: usize,

        #[command(flatten)]
        embedder: EmbedderArgs,
    },

    /// Convert a raw annotation catalogue into canonical records
    Normalize {
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        output: PathBuf,
    },

    /// Embed a canonical catalogue into an embeddings document
    BuildIndex {
        #[arg(long)]
        catalogue: PathBuf,

        #[arg(long)]
        output: PathBuf,

        /// Texts per provider batch
        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,

        #[command(flatten)]
        embedder: EmbedderArgs,
    },

    /// Serve the REST API
    Serve {
        #[command(flatten)]
        corpus: CorpusArgs,

        /// HTTP API port
        #[arg(long, default_value_t = 6333)]
        http_port: u16,

        /// Directory of corpus images to serve under the image prefix
        #[arg(long)]
        images: Option<PathBuf>,

        /// Default number of inspirations and least matches
        #[arg(short, default_value_t = 6)]
        k: usize,

        #[command(flatten)]
        embedder: EmbedderArgs,
    },
}

#[derive(Args, Debug)]
struct CorpusArgs {
    /// Embeddings document
    #[arg(long)]
    embeddings: PathBuf,

    /// Descriptions document
    #[arg(long)]
    descriptions: PathBuf,
}

impl CorpusArgs {
    fn source(&self) -> CorpusSource {
        CorpusSource::new(&self.embeddings, &self.descriptions)
    }
}

#[derive(Args, Debug)]
struct EmbedderArgs {
    /// Embedding provider: hash or http
    #[arg(long, default_value = "hash")]
    embedder: EmbedderKind,

    /// Endpoint of an OpenAI-compatible embeddings API
    #[arg(long)]
    embedding_url: Option<String>,

    #[arg(long, default_value = DEFAULT_MODEL)]
    embedding_model: String,

    #[arg(long, default_value_t = DEFAULT_DIMENSIONS)]
    embedding_dim: usize,

    #[arg(long, env = "HEARTH_EMBEDDING_API_KEY", hide_env_values = true)]
    embedding_api_key: Option<String>,
}

impl EmbedderArgs {
    fn config(&self) -> EmbedderConfig {
        EmbedderConfig {
            kind: self.embedder,
            url: self.embedding_url.clone(),
            model: self.embedding_model.clone(),
            dimensions: self.embedding_dim,
            api_key: self.embedding_api_key.clone(),
            ..EmbedderConfig::default()
        }
    }

    fn provider(&self) -> anyhow::Result<Arc<dyn EmbeddingProvider>> {
        create_provider(&self.config()).context("failed to create embedding provider")
    }
}

fn recommender_config(k: usize) -> RecommenderConfig {
    RecommenderConfig {
        k,
        image_prefix: DEFAULT_IMAGE_PREFIX.to_string(),
    }
}

fn run_recommend(
    profile: PathBuf,
    corpus: CorpusArgs,
    k: usize,
    embedder: EmbedderArgs,
) -> anyhow::Result<()> {
    let provider = embedder.provider()?;
    let loaded = corpus.source().load(provider.as_ref()).context("failed to load corpus")?;

    let raw = std::fs::read_to_string(&profile)
        .with_context(|| format!("failed to read {:?}", profile))?;
    let profile = PreferenceProfile::from_json_str(&raw)?;

    let recommender = Recommender::new(provider, recommender_config(k));
    let document = recommender.recommend(&loaded.index, &profile)?;
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

fn run_build_index(
    catalogue: PathBuf,
    output: PathBuf,
    batch_size: usize,
    embedder: EmbedderArgs,
) -> anyhow::Result<()> {
    let provider = embedder.provider()?;
    let count = build_index_file(&catalogue, &output, provider.as_ref(), batch_size)?;
    info!("Wrote {} embeddings to {:?}", count, output);
    Ok(())
}

fn open_api_state(
    corpus: CorpusArgs,
    k: usize,
    embedder: EmbedderArgs,
) -> anyhow::Result<ApiState> {
    let provider = embedder.provider()?;
    let store = CorpusStore::open(corpus.source(), provider.clone())
        .context("failed to load corpus")?;
    let recommender = Recommender::new(provider, recommender_config(k));
    Ok(ApiState::new(Arc::new(store), Arc::new(recommender)))
}

async fn serve(state: ApiState, http_port: u16, images: Option<PathBuf>) -> anyhow::Result<()> {
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(state, http_port, images).await {
                eprintln!("HTTP server error: {}", e);
            }
        })
    });

    info!("Hearth started successfully");
    info!("HTTP API: http://localhost:{}/", http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr so `recommend` output stays clean JSON.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Hearth v{}", env!("CARGO_PKG_VERSION"));

    // The embedding clients block, so everything up to serving runs off the async workers.
    match cli.command {
        Command::Recommend { profile, corpus, k, embedder } => {
            tokio::task::spawn_blocking(move || run_recommend(profile, corpus, k, embedder))
                .await??;
        }
        Command::Normalize { input, output } => {
            let count =
                tokio::task::spawn_blocking(move || normalize_catalogue_file(&input, &output))
                    .await??;
            info!("Normalized {} catalogue records", count);
        }
        Command::BuildIndex {
            catalogue,
            output,
            batch_size,
            embedder,
        } => {
            tokio::task::spawn_blocking(move || {
                run_build_index(catalogue, output, batch_size, embedder)
            })
            .await??;
        }
        Command::Serve { corpus, http_port, images, k, embedder } => {
            info!("Embeddings: {:?}", corpus.embeddings);
            info!("Descriptions: {:?}", corpus.descriptions);
            let state =
                tokio::task::spawn_blocking(move || open_api_state(corpus, k, embedder)).await??;
            info!("Corpus loaded ({} entries)", state.store.current().index.size());
            serve(state, http_port, images).await?;
        }
    }

    Ok(())
}
