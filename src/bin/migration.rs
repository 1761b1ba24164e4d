use clap::{Parser, Subcommand};
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;
use tracing::info;

use restaurant_pos_api::migrator::Migrator;

#[derive(Parser)]
#[command(name = "migration", about = "Apply or roll back the POS schema")]
struct Cli {
    /// Database URL; falls back to DATABASE_URL
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://restaurant_pos.db?mode=rwc")]
    database_url: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Apply pending migrations (default)
    Up {
        #[arg(long)]
        steps: Option<u32>,
    },
    /// Roll back applied migrations, the last one by default
    Down {
        #[arg(long, default_value_t = 1)]
        steps: u32,
    },
    /// Show which migrations are applied
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let cli = Cli::parse();

    let mut options = ConnectOptions::new(cli.database_url.clone());
    options
        .max_connections(5)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(false);

    info!("Connecting to database");
    let db = Database::connect(options).await?;

    match cli.command.unwrap_or(Command::Up { steps: None }) {
        Command::Up { steps } => {
            info!(?steps, "Applying migrations");
            Migrator::up(&db, steps).await?;
            info!("Migration completed successfully");
        }
        Command::Down { steps } => {
            info!(steps, "Rolling back migrations");
            Migrator::down(&db, Some(steps)).await?;
            info!("Rollback completed successfully");
        }
        Command::Status => {
            Migrator::status(&db).await?;
        }
    }

    Ok(())
}
