use anyhow::Result;
use clap::{Parser, Subcommand};
use findback_common::{logger, AppConfig};
use std::path::PathBuf;

/// Find project root by looking for .git directory
fn find_project_root() -> Option<PathBuf> {
    let mut current_dir = std::env::current_dir().ok()?;

    loop {
        if current_dir.join(".git").exists() {
            return Some(current_dir);
        }

        if !current_dir.pop() {
            break;
        }
    }

    None
}

/// Load .env file from project root
fn load_dotenv_from_project_root() {
    match find_project_root().map(|root| root.join(".env")) {
        Some(env_path) if env_path.exists() => {
            dotenv::from_path(&env_path).ok();
        }
        _ => {
            dotenv::dotenv().ok();
        }
    }
}

#[derive(Parser)]
#[command(name = "findback")]
#[command(about = "Findback - lost and found item matching service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long)]
        port: Option<u16>,

        /// Database path
        #[arg(long)]
        db_path: Option<PathBuf>,
    },

    /// Print the effective configuration (secrets omitted)
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    load_dotenv_from_project_root();

    match cli.command {
        Some(Commands::Serve {
            host,
            port,
            db_path,
        }) => {
            // CLI arguments override the environment
            if let Some(host) = &host {
                std::env::set_var("SERVER_HOST", host);
            }
            if let Some(port) = port {
                std::env::set_var("SERVER_PORT", port.to_string());
            }
            if let Some(db) = &db_path {
                std::env::set_var("DB_BASE_PATH", db);
            }

            let config = AppConfig::from_env()?;

            serve(config).await?;
        }
        Some(Commands::Config) => {
            let config = AppConfig::from_env()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        None => {
            let config = AppConfig::from_env()?;
            serve(config).await?;
        }
    }

    Ok(())
}

async fn serve(config: AppConfig) -> Result<()> {
    logger::setup_logging(&config.log_dir, &config.log_level)?;

    tracing::info!("Findback starting...");
    tracing::info!("  Bind: {}", config.server_bind_address());
    tracing::info!("  Items: {}", config.items_path.display());
    tracing::info!(
        "  Matching: threshold={}, max={}",
        config.similarity_threshold,
        config.max_matches
    );

    findback_server::start_server(config).await?;
    Ok(())
}
