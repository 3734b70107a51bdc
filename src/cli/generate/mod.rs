//! One-shot generation commands; results go to stdout as JSON, logs to stderr

use clap::Args;
use serde::Serialize;

use crate::config::AppConfig;
use crate::domain::{ExplanationRequest, QuestionSetRequest};
use crate::infrastructure::logging;

#[derive(Args, Debug)]
pub struct QuestionsArgs {
    /// Target role, e.g. "Backend Engineer"
    #[arg(long)]
    pub role: String,

    /// Years of experience
    #[arg(long)]
    pub experience: f64,

    /// Comma-separated topics to focus on
    #[arg(long)]
    pub topics: String,

    /// Number of questions to generate
    #[arg(long, default_value_t = 10)]
    pub count: i64,

    /// Override the configured number of model attempts
    #[arg(long)]
    pub max_attempts: Option<u32>,
}

#[derive(Args, Debug)]
pub struct ExplainArgs {
    /// Question to explain
    pub question: String,

    /// Override the configured number of model attempts
    #[arg(long)]
    pub max_attempts: Option<u32>,
}

pub async fn run_questions(args: QuestionsArgs) -> anyhow::Result<()> {
    let request = QuestionSetRequest::new(args.role, args.experience, args.topics, args.count)?;
    let config = prepare(args.max_attempts)?;

    let service = crate::create_generation_service(&config.ai)?;
    let questions = service.generate_question_set(&request).await?;

    print_json(&questions)
}

pub async fn run_explain(args: ExplainArgs) -> anyhow::Result<()> {
    let request = ExplanationRequest::new(args.question)?;
    let config = prepare(args.max_attempts)?;

    let service = crate::create_generation_service(&config.ai)?;
    let explanation = service.generate_explanation(&request).await?;

    print_json(&explanation)
}

fn prepare(max_attempts: Option<u32>) -> anyhow::Result<AppConfig> {
    let mut config = super::load_config()?;
    logging::init_logging(&config.logging, true)?;

    if let Some(attempts) = max_attempts {
        config.ai.max_attempts = attempts;
    }

    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use crate::cli::{Cli, Command};

    #[test]
    fn test_parse_questions_command() {
        let cli = Cli::try_parse_from([
            "interview-prep-ai",
            "questions",
            "--role",
            "Data Engineer",
            "--experience",
            "4",
            "--topics",
            "Spark, SQL",
            "--count",
            "3",
        ])
        .unwrap();

        match cli.command {
            Command::Questions(args) => {
                assert_eq!(args.role, "Data Engineer");
                assert_eq!(args.experience, 4.0);
                assert_eq!(args.count, 3);
                assert_eq!(args.max_attempts, None);
            }
            _ => panic!("expected questions command"),
        }
    }

    #[test]
    fn test_parse_explain_command() {
        let cli = Cli::try_parse_from([
            "interview-prep-ai",
            "explain",
            "What is a closure?",
            "--max-attempts",
            "1",
        ])
        .unwrap();

        match cli.command {
            Command::Explain(args) => {
                assert_eq!(args.question, "What is a closure?");
                assert_eq!(args.max_attempts, Some(1));
            }
            _ => panic!("expected explain command"),
        }
    }

    #[test]
    fn test_questions_requires_role() {
        assert!(Cli::try_parse_from(["interview-prep-ai", "questions", "--experience", "1"]).is_err());
    }
}
