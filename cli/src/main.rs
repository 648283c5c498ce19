//! CLI entrypoint for llm-council
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, anyhow, bail};
use clap::Parser;
use council_application::{ChatGateway, RunDeliberationUseCase};
use council_domain::{ConfigIssue, Severity, has_errors};
use council_infrastructure::{ConfigLoader, FileConfig, ProviderRouter};
use council_presentation::{Cli, ConsoleFormatter, OutputFormatter, ProgressMode};
use std::io::IsTerminal;
use std::sync::Arc;
use colored::Colorize;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(&cli)?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("failed to load configuration: {}", e))?
    };

    let issues = config.validate();
    report_issues(&issues);
    if has_errors(&issues) {
        bail!("configuration has errors, refusing to run");
    }

    // === Request ===
    let Some(prompt) = cli.prompt.as_deref() else {
        bail!("a prompt is required");
    };
    let request = cli.to_request(prompt)?;
    request.validate()?;

    let defaults = config.council_defaults();
    let settings = config.provider_settings();

    let council = request.council_models.as_ref().unwrap_or(&defaults.council);
    let chairman = request.chairman_model.as_ref().unwrap_or(&defaults.chairman);
    report_issues(&FileConfig::credential_issues(
        council.iter().chain(std::iter::once(chairman)),
        &settings,
    ));

    // === Dependency Injection ===
    // One router per invocation, closed once the deliberation is over
    let router = Arc::new(ProviderRouter::from_settings(settings));
    info!(providers = ?router.configured_providers(), "Provider router ready");

    let use_case = RunDeliberationUseCase::with_defaults(router.clone(), defaults);

    let progress = ProgressMode::select(cli.quiet, std::io::stderr().is_terminal()).notifier();
    let trace = use_case
        .execute_with_progress(request, progress.as_ref())
        .await;
    router.close().await;

    if trace.meta.succeeded_opinions == 0 {
        error!("No council member produced a usable opinion");
    }

    // === Output ===
    let no_color = std::env::var_os("NO_COLOR").is_some();
    colored::control::set_override(
        config
            .output
            .color
            .enabled(no_color, std::io::stdout().is_terminal()),
    );
    let format = config.output.resolve_format(cli.output);
    println!("{}", ConsoleFormatter.render(&trace, format));

    Ok(())
}

/// Install the tracing subscriber.
///
/// `RUST_LOG` wins over `-v`. The returned guard flushes the log file on drop.
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match &cli.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| anyhow!("cannot open log file {}: {}", path.display(), e))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

fn report_issues(issues: &[ConfigIssue]) {
    for issue in issues {
        match issue.severity {
            Severity::Error => eprintln!("{}", issue.to_string().red()),
            Severity::Warning => eprintln!("{}", issue.to_string().yellow()),
        }
    }
}
