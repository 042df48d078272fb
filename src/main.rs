use clap::Parser;
use workflow_builder::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Status => cli::status::run().await,
        Command::Run(args) => cli::run::run(args).await,
    }
}
