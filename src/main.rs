use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todo_lists::{api, config::StorageSettings};

#[derive(Parser)]
#[command(name = "todo-lists")]
#[command(about = "Multi-list todo manager over HTTP")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port for HTTP API
        #[arg(short, long, env = "TODO_LISTS_PORT", default_value = "3000")]
        port: u16,

        #[command(flatten)]
        storage: StorageSettings,
    },
    /// Apply pending database migrations and exit
    Migrate {
        #[command(flatten)]
        storage: StorageSettings,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "todo_lists=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn serve(port: u16, storage: StorageSettings) -> anyhow::Result<()> {
    let backend = storage.backend()?;
    tracing::info!(
        "Starting todo-lists server on port {} with {} storage",
        port,
        backend.mode_name()
    );

    let app = api::create_router(backend);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("todo-lists server listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Commands::Serve { port, storage } => serve(port, storage).await?,
        Commands::Migrate { storage } => {
            storage.open_database()?;
            tracing::info!("Database is up to date");
        }
    }

    Ok(())
}
