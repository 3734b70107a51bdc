use clap::Parser;
use interview_prep_ai::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Questions(args) => cli::generate::run_questions(args).await,
        Command::Explain(args) => cli::generate::run_explain(args).await,
    }
}
