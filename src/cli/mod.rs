//! CLI for the interview prep AI service
//!
//! - `serve`: run the HTTP API
//! - `questions`: generate a question set once and print it as JSON
//! - `explain`: explain a single question once and print it as JSON

pub mod generate;
pub mod serve;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;

/// Interview prep AI - question and explanation generation over an LLM
#[derive(Parser)]
#[command(name = "interview-prep-ai")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Generate interview questions with answers
    Questions(generate::QuestionsArgs),

    /// Explain a single interview question
    Explain(generate::ExplainArgs),
}

/// Load `.env` and layered configuration
pub fn load_config() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    AppConfig::load().context("Failed to load configuration")
}
