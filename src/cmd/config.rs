use std::io::{self, Write};

use clap::{Args, Subcommand};

use crate::config::{StoredConfig, config_file_path};
use crate::error::{AppError, AppResult};

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the stored configuration (secrets masked).
    Show,
}

/// A stored setting as the wizard asks for it and `config show` prints it.
#[derive(Debug, Clone, Copy)]
struct Field {
    label: &'static str,
    secret: bool,
}

const PROVIDER: Field = Field::plain("LLM provider (gemini/custom)");
const API_KEY: Field = Field::secret("Gemini API key");
const MODEL: Field = Field::plain("Gemini model");
const TIMEOUT: Field = Field::plain("Request timeout in seconds");

const UNSET: &str = "<not set>";

impl Field {
    const fn plain(label: &'static str) -> Self {
        Self {
            label,
            secret: false,
        }
    }

    const fn secret(label: &'static str) -> Self {
        Self {
            label,
            secret: true,
        }
    }

    /// Value as shown to the user: unset, masked, or verbatim.
    fn render(&self, value: Option<&str>) -> String {
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            return UNSET.to_string();
        };
        if !self.secret {
            return value.to_string();
        }
        // Short or non-ASCII secrets are fully hidden.
        if value.len() > 6 && value.is_ascii() {
            format!("{}***{}", &value[..3], &value[value.len() - 3..])
        } else {
            "***".to_string()
        }
    }

    fn question(&self, current: Option<&str>) -> String {
        match current {
            None => format!("{} (Enter to skip): ", self.label),
            Some(_) if self.secret => {
                format!("{} [****] (Enter to keep, '-' to clear): ", self.label)
            }
            Some(value) => format!("{} [{value}] (Enter to keep, '-' to clear): ", self.label),
        }
    }

    fn ask(&self, target: &mut Option<String>) -> AppResult<()> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", self.question(target.as_deref()))?;
        stdout.flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        PromptAction::from_input(&input).apply(target);
        Ok(())
    }
}

pub fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(),
        ConfigCommand::Show => run_show(),
    }
}

fn run_init() -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;

    println!("Configuring triage.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!("Secrets are stored in the local config file; protect your filesystem accordingly.");
    println!("Environment variables (GEMINI_API_KEY, TRIAGE_*) override these values.");
    println!();

    PROVIDER.ask(&mut cfg.llm_provider)?;
    API_KEY.ask(&mut cfg.gemini_api_key)?;
    MODEL.ask(&mut cfg.gemini_model)?;

    let mut timeout = cfg.timeout_secs.map(|secs| secs.to_string());
    TIMEOUT.ask(&mut timeout)?;
    cfg.timeout_secs = timeout.as_deref().map(parse_timeout_secs).transpose()?;

    cfg.save()?;

    let path = config_file_path()?;
    println!("\nConfiguration saved to {}", path.display());
    Ok(())
}

fn run_show() -> AppResult<()> {
    let cfg = StoredConfig::load()?;
    let path = config_file_path()?;
    let timeout = cfg.timeout_secs.map(|secs| format!("{secs}s"));

    println!("Configuration file: {}", path.display());
    for (field, value) in [
        (PROVIDER, cfg.llm_provider.as_deref()),
        (API_KEY, cfg.gemini_api_key.as_deref()),
        (MODEL, cfg.gemini_model.as_deref()),
        (TIMEOUT, timeout.as_deref()),
    ] {
        println!("{}: {}", field.label, field.render(value));
    }

    Ok(())
}

fn parse_timeout_secs(raw: &str) -> AppResult<u64> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(AppError::Configuration(format!(
            "request timeout must be a positive whole number, got '{raw}'"
        ))),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum PromptAction {
    Keep,
    Clear,
    Set(String),
}

impl PromptAction {
    fn from_input(input: &str) -> Self {
        match input.trim() {
            "" => PromptAction::Keep,
            "-" => PromptAction::Clear,
            value => PromptAction::Set(value.to_string()),
        }
    }

    fn apply(self, target: &mut Option<String>) {
        match self {
            PromptAction::Keep => {}
            PromptAction::Clear => *target = None,
            PromptAction::Set(value) => *target = Some(value),
        }
    }
}
