//! CLI command definitions

use clap::Parser;
use council_domain::{DeliberationRequest, DomainError, OutputFormat, ProviderModelRef};
use std::path::PathBuf;

/// CLI arguments for llm-council
#[derive(Parser, Debug)]
#[command(name = "llm-council")]
#[command(author, version, about = "LLM Council - independent opinions, anonymous review, one verdict")]
#[command(long_about = r#"
llm-council asks a council of LLMs the same question and arbitrates their answers.

The deliberation has three stages:
1. Independent Opinions: every council member answers in parallel
2. Anonymous Cross-Review: members score each other's anonymized answers
3. Chairman Synthesis: a chairman model merges everything into one verdict

Models are written as <provider>:<model> (providers: openrouter, groq).
A bare id containing '/' is an OpenRouter model.

Configuration files are loaded from (in priority order):
1. COUNCIL_* environment variables
2. --config <path>     Explicit config file
3. ./council.toml      Project-level config
4. ~/.config/llm-council/config.toml   Global config

Example:
  llm-council "What's the best way to handle errors in Rust?"
  llm-council -m groq:llama-3.3-70b-versatile -m z-ai/glm-4.5-air:free "Compare async runtimes"
  llm-council -o json --max-tokens 512 "Is P = NP?"
"#)]
pub struct Cli {
    /// The question to put to the council
    #[arg(required_unless_present = "show_config")]
    pub prompt: Option<String>,

    /// Council member (repeatable); defaults to the configured council
    #[arg(short, long = "model", value_name = "PROVIDER:MODEL")]
    pub models: Vec<String>,

    /// Chairman model for the final synthesis
    #[arg(long, value_name = "PROVIDER:MODEL")]
    pub chairman: Option<String>,

    /// Sampling temperature for the opinion stage (0.0-2.0)
    #[arg(short, long)]
    pub temperature: Option<f32>,

    /// Token budget per opinion (64-4096)
    #[arg(long, value_name = "N")]
    pub max_tokens: Option<u32>,

    /// Output format: full, verdict or json
    #[arg(short, long, value_name = "FORMAT")]
    pub output: Option<OutputFormat>,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Council from `--model` flags, or `None` to use the configured default
    pub fn council_models(&self) -> Result<Option<Vec<ProviderModelRef>>, DomainError> {
        if self.models.is_empty() {
            return Ok(None);
        }
        self.models
            .iter()
            .map(|m| ProviderModelRef::parse(m))
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    pub fn chairman_model(&self) -> Result<Option<ProviderModelRef>, DomainError> {
        self.chairman
            .as_deref()
            .map(ProviderModelRef::parse)
            .transpose()
    }

    /// Build the deliberation request described by the flags
    pub fn to_request(&self, prompt: &str) -> Result<DeliberationRequest, DomainError> {
        let mut request = DeliberationRequest::new(prompt);
        if let Some(models) = self.council_models()? {
            request = request.with_council(models);
        }
        if let Some(chairman) = self.chairman_model()? {
            request = request.with_chairman(chairman);
        }
        if let Some(t) = self.temperature {
            request = request.with_temperature(t);
        }
        if let Some(n) = self.max_tokens {
            request = request.with_max_tokens(n);
        }
        Ok(request)
    }
}
