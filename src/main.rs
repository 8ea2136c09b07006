use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use triage::cmd::classify::{self, ClassifyCommandArgs};
use triage::cmd::config::{self as config_cmd, ConfigArgs};
use triage::cmd::vocabulary;
use triage::config::AppConfig;
use triage::context::AppContext;
use triage::error::AppResult;

#[derive(Parser)]
#[command(name = "triage", author, version, about = "Support ticket classification CLI")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest a category and priority for a ticket description.
    Classify(ClassifyArgs),
    /// List the accepted ticket categories, priorities and statuses.
    Vocabulary,
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[derive(Args)]
struct ClassifyArgs {
    /// Ticket description. Read from stdin when omitted.
    description: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(error) = run(cli).await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> AppResult<()> {
    match cli.command {
        Commands::Config(args) => {
            config_cmd::run(args.command)?;
            Ok(())
        }
        Commands::Vocabulary => {
            print!("{}", vocabulary::render());
            Ok(())
        }
        Commands::Classify(args) => run_classify(args).await,
    }
}

async fn run_classify(args: ClassifyArgs) -> AppResult<()> {
    let context = AppContext::from_config(AppConfig::load()?);
    info!(
        model = %context.config.gemini_model,
        timeout_secs = context.config.request_timeout.as_secs(),
        enabled = context.classifier.is_enabled(),
        "classifier ready"
    );

    let result = classify::run(
        &context,
        ClassifyCommandArgs {
            description: args.description,
        },
    )
    .await?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
