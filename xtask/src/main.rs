//! Infrastructure chores for the task manager, run as `cargo xtask <command>`.
//!
//! The services only need one DynamoDB table. `dynamodb deploy` creates or
//! updates it (key schema, the four query indexes, notification TTL) and
//! `dynamodb seed` fills a user's partition with sample tasks so the API and
//! the reminder job have something to work on against a local or real table.
//!
//! The `cargo xtask` alias lives in `.cargo/config.toml`.

use clap::Parser;

mod dynamodb;
mod prelude;

/// Table deployment and seeding for the task manager
#[derive(Debug, Parser)]
#[command(name = "xtask")]
#[command(about = "Deploy and seed the task manager's DynamoDB table", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: Global,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Only print prompts and errors, not targets, plans or progress
    #[clap(long, global = true)]
    pub silent: bool,
}

impl Global {
    pub fn is_silent(&self) -> bool {
        self.silent
    }
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Deploy, destroy or seed the TaskManagement table
    Dynamodb(dynamodb::DynamodbCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Dynamodb(dynamodb_cmd) => {
            dynamodb::run(dynamodb_cmd, cli.global).await?;
        }
    }

    Ok(())
}
