mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "zipeats-cli")]
#[command(about = "Restaurant lookup by zip code: operator command line")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Look up restaurants for a zip code (cache first, then the provider)
    Search {
        /// Zip code to look up
        zip: String,
        /// Skip the cache read; the fresh result is still saved
        #[arg(long)]
        refresh: bool,
        /// Print the restaurants as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show the latest stored snapshot for a zip code
    History {
        /// Zip code to inspect
        zip: String,
    },
    /// Classify a restaurant name into a genre without calling the provider
    Classify {
        /// Restaurant display name
        name: String,
        /// Provider category tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let command = match cli.command {
        // Classification is pure and works without any configuration.
        Some(Commands::Classify { name, tags }) => {
            commands::run_classify(&name, &tags);
            return Ok(());
        }
        Some(command) => command,
        None => {
            println!("zipeats-cli: use --help to list commands");
            return Ok(());
        }
    };

    let config = zipeats_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match command {
        Commands::Migrate => commands::run_migrate(&config).await,
        Commands::Search { zip, refresh, json } => {
            commands::run_search(&config, &zip, refresh, json).await
        }
        Commands::History { zip } => commands::run_history(&config, &zip).await,
        Commands::Classify { name, tags } => {
            commands::run_classify(&name, &tags);
            Ok(())
        }
    }
}
