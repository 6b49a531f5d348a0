//! Init command implementation
//!
//! Scaffolds `research.toml`, `.env.example` and a `.gitignore` for a new
//! research setup.

use super::output::Output;
use crate::utils::toml_config::DEFAULT_CONFIG_FILE;
use std::fs;
use std::path::Path;

/// Result of the init operation
#[derive(Debug)]
pub enum InitResult {
    /// Initialization completed successfully
    Success,
    /// research.toml already exists
    AlreadyExists,
    /// An error occurred during initialization
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Directory to initialize
    pub path: std::path::PathBuf,
    /// Overwrite existing files
    pub force: bool,
    /// LLM provider to configure (ollama or openai)
    pub provider: String,
}

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.banner();
    output.header("Initializing research configuration");

    let base_path = &config.path;
    let config_path = base_path.join(DEFAULT_CONFIG_FILE);
    if config_path.exists() && !config.force {
        output.warning(&format!("{} already exists!", DEFAULT_CONFIG_FILE));
        output.hint("Use --force to overwrite existing files");
        return InitResult::AlreadyExists;
    }

    if !base_path.exists() {
        if let Err(e) = fs::create_dir_all(base_path) {
            output.error(&format!("Failed to create {}: {}", base_path.display(), e));
            return InitResult::Error(e.to_string());
        }
    }

    let files = [
        (DEFAULT_CONFIG_FILE, "config", generate_research_toml(&config)),
        (".env.example", "env", generate_env_example(&config)),
    ];
    for (name, kind, content) in &files {
        if let Err(e) = write_file(&base_path.join(name), content, config.force) {
            output.error(&format!("Failed to create {}: {}", name, e));
            return InitResult::Error(e.to_string());
        }
        output.created(kind, name);
    }

    let gitignore_path = base_path.join(".gitignore");
    if gitignore_path.exists() {
        output.skipped(".gitignore", "already exists");
    } else if let Err(e) = write_file(&gitignore_path, &generate_gitignore(), false) {
        output.warning(&format!("Failed to create .gitignore: {}", e));
    } else {
        output.created("file", ".gitignore");
    }

    output.complete("Research configuration initialized!");

    output.header("Next Steps");
    output.info("1. Set up environment variables:");
    output.command("cp .env.example .env");

    if config.provider == "openai" {
        output.command("# Edit .env and set OPENAI_API_KEY");
    } else {
        output.info("2. Start Ollama (if not running):");
        output.command("ollama serve");
        output.command("ollama pull llama3.2  # or your preferred model");
    }

    output.info("3. Run some research:");
    output.command("deep-research interactive \"Impact of remote work on urban housing\"");

    output.hint("Set [notification] type = \"sendgrid\" to receive reports by email");

    InitResult::Success
}

fn write_file(path: &Path, content: &str, force: bool) -> std::io::Result<()> {
    if path.exists() && !force {
        return Ok(()); // Skip existing files unless force is true
    }
    fs::write(path, content)
}

fn generate_research_toml(config: &InitConfig) -> String {
    let provider_section = if config.provider == "openai" {
        r#"# OpenAI API (set OPENAI_API_KEY in .env)
[provider]
type = "openai"
api_key_env = "OPENAI_API_KEY"
api_base = "https://api.openai.com/v1"
model = "gpt-4o-mini"
"#
    } else {
        r#"# Ollama - Local inference (no API key required)
[provider]
type = "ollama"
base_url = "http://localhost:11434"
model = "llama3.2"
"#
    };

    format!(
        r#"# deep-research configuration
# ===========================

[logging]
# trace, debug, info, warn, error (RUST_LOG takes precedence)
level = "info"
# pretty or json
format = "pretty"

{provider_section}
# Per-stage model overrides (optional)
[models]
# clarification = "llama3.2"
# planning = "llama3.2"
# search = "llama3.2"
# synthesis = "llama3.1:8b"

[workflow]
# Clarification questions asked before research (0 disables clarification)
clarification_questions = 3
# Web searches planned per query
searches_per_plan = 5

[search]
# Ground search summaries on live DuckDuckGo results
web_lookup = true
web_results = 5
# max_concurrent = 5
# timeout_secs = 60

[notification]
type = "log"
# type = "sendgrid"
# api_key_env = "SENDGRID_API_KEY"
# from = "research-bot@example.com"
# to = "you@example.com"
"#
    )
}

fn generate_env_example(config: &InitConfig) -> String {
    let openai = if config.provider == "openai" {
        "OPENAI_API_KEY=sk-..."
    } else {
        "# OPENAI_API_KEY=sk-..."
    };

    format!(
        r#"# deep-research Environment Variables
# Copy this file to .env and fill in the values.

# Optional: Logging level (trace, debug, info, warn, error)
RUST_LOG=info,deep_research=debug

# OpenAI API key (if using the OpenAI provider)
{openai}

# Optional: SendGrid API key (if using email notification)
# SENDGRID_API_KEY=SG....
"#
    )
}

fn generate_gitignore() -> String {
    r#"# Environment
.env

# Saved workflow snapshots
*.snapshot.json

# Rust
/target/

# OS
.DS_Store
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::toml_config::{ProviderConfig, ResearchConfig};
    use tempfile::TempDir;

    fn create_test_config(temp_dir: &TempDir, provider: &str, force: bool) -> InitConfig {
        InitConfig {
            path: temp_dir.path().to_path_buf(),
            force,
            provider: provider.to_string(),
        }
    }

    #[test]
    fn test_generated_ollama_toml_is_valid_config() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let content = generate_research_toml(&create_test_config(&temp_dir, "ollama", false));

        let config = ResearchConfig::parse(&content).expect("generated config must parse");
        assert!(config.validate().is_ok());
        assert!(matches!(config.provider, ProviderConfig::Ollama { .. }));
    }

    #[test]
    fn test_generated_openai_toml_is_valid_config() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let content = generate_research_toml(&create_test_config(&temp_dir, "openai", false));

        let config = ResearchConfig::parse(&content).expect("generated config must parse");
        assert!(config.validate().is_ok());
        assert!(matches!(
            config.provider,
            ProviderConfig::OpenAI { ref api_key_env, .. } if api_key_env == "OPENAI_API_KEY"
        ));
    }

    #[test]
    fn test_generate_env_example() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let content = generate_env_example(&create_test_config(&temp_dir, "openai", false));

        assert!(content.contains("RUST_LOG"));
        assert!(content.contains("\nOPENAI_API_KEY=sk-..."));
        assert!(content.contains("SENDGRID_API_KEY"));
    }

    #[test]
    fn test_write_file_skips_existing_without_force() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("test.txt");

        fs::write(&file_path, "original").expect("Failed to write");
        assert!(write_file(&file_path, "new content", false).is_ok());

        let content = fs::read_to_string(&file_path).expect("Failed to read file");
        assert_eq!(content, "original");
    }

    #[test]
    fn test_run_creates_all_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let result = run(
            create_test_config(&temp_dir, "ollama", false),
            &Output::no_color(),
        );

        assert!(matches!(result, InitResult::Success));
        assert!(temp_dir.path().join("research.toml").exists());
        assert!(temp_dir.path().join(".env.example").exists());
        assert!(temp_dir.path().join(".gitignore").exists());
    }

    #[test]
    fn test_run_creates_missing_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = InitConfig {
            path: temp_dir.path().join("nested/project"),
            force: false,
            provider: "ollama".to_string(),
        };

        assert!(matches!(run(config, &Output::no_color()), InitResult::Success));
        assert!(temp_dir.path().join("nested/project/research.toml").exists());
    }

    #[test]
    fn test_run_already_exists_without_force() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join("research.toml"), "existing").expect("Failed to write");

        let result = run(
            create_test_config(&temp_dir, "ollama", false),
            &Output::no_color(),
        );
        assert!(matches!(result, InitResult::AlreadyExists));
    }

    #[test]
    fn test_run_force_overwrites() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join("research.toml"), "existing").expect("Failed to write");

        let result = run(
            create_test_config(&temp_dir, "openai", true),
            &Output::no_color(),
        );
        assert!(matches!(result, InitResult::Success));

        let content =
            fs::read_to_string(temp_dir.path().join("research.toml")).expect("Failed to read");
        assert!(content.contains("type = \"openai\""));
        assert!(!content.contains("existing"));
    }
}
