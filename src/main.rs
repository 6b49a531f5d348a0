//! deep-research CLI entry point
//!
//! - `deep-research run <query>` - direct research, no clarification
//! - `deep-research interactive <query>` - ask clarification questions, then research
//! - `deep-research start <query>` / `resume --state <file>` - the same workflow split
//!   across two invocations
//! - `deep-research init` / `config` - scaffold and inspect `research.toml`

use anyhow::{bail, Context, Result};
use deep_research::{
    cli::{
        init::{self, InitConfig, InitResult},
        output::Output,
        Cli, Commands,
    },
    research::ProgressStream,
    utils::toml_config::{LogFormat, LoggingConfig, NotificationConfig, ProviderConfig},
    ProgressEvent, ResearchConfig, ResearchCoordinator, WorkflowSnapshot,
};
use futures::StreamExt;
use owo_colors::OwoColorize;
use std::fs;
use std::path::Path;
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Re-prompts for a blank clarification answer before giving up on it
const MAX_ASK_ATTEMPTS: usize = 3;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match cli.command {
        Commands::Init {
            path,
            force,
            provider,
        } => run_init(
            InitConfig {
                path,
                force,
                provider: provider.as_str().to_string(),
            },
            &output,
        ),
        Commands::Config { full, validate } => {
            let config = load_config(&cli.config, cli.verbose)?;
            run_config(&config, full, validate, &output)
        }
        Commands::Run { query } => {
            let config = load_config(&cli.config, cli.verbose)?;
            let coordinator = ResearchCoordinator::from_config(&config).await?;
            output.banner();
            drive(coordinator.stream_direct(&query)?, &output, false).await
        }
        Commands::Start { query, out } => {
            let config = load_config(&cli.config, cli.verbose)?;
            let coordinator = ResearchCoordinator::from_config(&config).await?;
            run_start(&coordinator, &query, out.as_deref(), &output).await
        }
        Commands::Resume {
            state,
            answer,
            json,
        } => {
            let config = load_config(&cli.config, cli.verbose)?;
            let coordinator = ResearchCoordinator::from_config(&config).await?;
            let snapshot = read_snapshot(&state)?;
            drive(coordinator.resume(snapshot, answer)?, &output, json).await
        }
        Commands::Interactive { query } => {
            let config = load_config(&cli.config, cli.verbose)?;
            let coordinator = ResearchCoordinator::from_config(&config).await?;
            run_interactive(&coordinator, &query, &output).await
        }
    }
}

/// Load `research.toml` (or defaults when absent) and install logging
fn load_config(path: &Path, verbose: bool) -> Result<ResearchConfig> {
    let (config, found) = ResearchConfig::load_or_default(path)
        .with_context(|| format!("Failed to load {}", path.display()))?;

    init_tracing(&config.logging, verbose);
    if !found {
        debug!("No config file at {}, using defaults", path.display());
    }
    Ok(config)
}

/// Logs go to stderr; `RUST_LOG` overrides the configured level
fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,deep_research={}", level)));

    let registry = tracing_subscriber::registry().with(filter);
    match logging.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

fn run_init(config: InitConfig, output: &Output) -> Result<()> {
    match init::run(config, output) {
        InitResult::Success | InitResult::AlreadyExists => Ok(()),
        InitResult::Error(e) => bail!("init failed: {}", e),
    }
}

fn run_config(config: &ResearchConfig, full: bool, validate: bool, output: &Output) -> Result<()> {
    if full {
        println!("{}", config.to_toml()?);
        return Ok(());
    }

    output.header("Configuration");
    match &config.provider {
        ProviderConfig::Ollama { base_url, model } => {
            output.kv("provider", "ollama");
            output.kv("base_url", base_url);
            output.kv("model", model);
        }
        ProviderConfig::OpenAI {
            api_base, model, ..
        } => {
            output.kv("provider", "openai");
            output.kv("api_base", api_base);
            output.kv("model", model);
        }
    }
    output.kv(
        "clarification_questions",
        &config.workflow.clarification_questions.to_string(),
    );
    output.kv(
        "searches_per_plan",
        &config.workflow.searches_per_plan.to_string(),
    );
    output.kv("web_lookup", &config.search.web_lookup.to_string());
    output.kv(
        "notification",
        match config.notification {
            NotificationConfig::Log => "log",
            NotificationConfig::SendGrid { .. } => "sendgrid",
        },
    );

    if validate {
        output.header("Validation");
        config.validate()?;
        output.success("Value ranges");

        let provider = config.provider()?;
        output.success(&format!("{} provider credentials", provider.name()));
        if !provider.is_enabled() {
            output.warning(&format!(
                "{} support is not compiled in (enable the '{}' feature)",
                provider.name(),
                provider.feature_name()
            ));
        }

        if let NotificationConfig::SendGrid { api_key_env, .. } = &config.notification {
            ResearchConfig::validate_env_var(api_key_env)?;
            output.success("SendGrid credentials");
        }

        output.complete("Configuration is valid");
    }

    Ok(())
}

async fn run_start(
    coordinator: &ResearchCoordinator,
    query: &str,
    out: Option<&Path>,
    output: &Output,
) -> Result<()> {
    let snapshot = coordinator.start(query).await?;
    let rendered = serde_json::to_string_pretty(&snapshot)?;

    output.header("Clarification questions");
    for (i, question) in snapshot.clarification_plan.questions().enumerate() {
        output.list_item(&format!("{}. {}", i + 1, question));
    }

    match out {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            output.created("snapshot", &path.display().to_string());
            output.hint("Continue with:");
            output.command(&format!(
                "deep-research resume --state {} --answer \"...\"",
                path.display()
            ));
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

fn read_snapshot(path: &Path) -> Result<WorkflowSnapshot> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not a workflow snapshot", path.display()))
}

async fn run_interactive(
    coordinator: &ResearchCoordinator,
    query: &str,
    output: &Output,
) -> Result<()> {
    output.banner();
    let snapshot = coordinator.start(query).await?;

    let mut answers = Vec::with_capacity(snapshot.clarification_plan.len());
    if snapshot.clarification_plan.is_empty() {
        output.info("No clarification needed, starting research");
    } else {
        output.header("Please answer a few questions first");
        for (i, question) in snapshot.clarification_plan.questions().enumerate() {
            let mut answer = String::new();
            for _ in 0..MAX_ASK_ATTEMPTS {
                answer = output.ask(i + 1, question)?;
                if !answer.is_empty() {
                    break;
                }
                output.warning("Please answer the question");
            }
            answers.push(answer);
        }
    }

    drive(coordinator.resume(snapshot, answers)?, output, false).await
}

/// Print progress as it arrives, then the report narrative on stdout
async fn drive(mut events: ProgressStream, output: &Output, json: bool) -> Result<()> {
    while let Some(event) = events.next().await {
        let event = event?;

        if json {
            println!("{}", serde_json::to_string(&event)?);
            continue;
        }

        output.progress(&event);
        if let ProgressEvent::Completed(state) = &event {
            println!("{}", event);
            if let Some(report) = &state.report {
                if !report.follow_ups.is_empty() {
                    output.header("Suggested follow-up research");
                    for topic in &report.follow_ups {
                        output.list_item(topic);
                    }
                }
            }
        }
    }

    Ok(())
}
