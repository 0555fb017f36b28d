mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "tweetsmith")]
#[command(about = "Draft X posts with LLMs and publish them")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Draft a post for a topic and print it as JSON
    Generate {
        /// What the post should be about
        #[arg(long)]
        topic: String,
        /// Optional tone or style guidance
        #[arg(long)]
        preferences: Option<String>,
        /// Also print the candidate attempt trail to stderr
        #[arg(long)]
        trace: bool,
    },
    /// Publish a post to X
    Post {
        /// Post text
        text: String,
        /// Skip the identity check before posting
        #[arg(long)]
        skip_verify: bool,
    },
    /// Show the X account behind the configured access token
    Whoami,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = tweetsmith_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Generate {
            topic,
            preferences,
            trace,
        } => commands::run_generate(&config, &topic, preferences.as_deref(), trace).await,
        Commands::Post { text, skip_verify } => {
            commands::run_post(&config, &text, skip_verify).await
        }
        Commands::Whoami => commands::run_whoami(&config).await,
    }
}
