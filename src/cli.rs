//! Command-line interface for bedrock-console
//!
//! Running without arguments starts the interactive console. The only
//! subcommand writes a template configuration file.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Interactive console chat client for Amazon Bedrock models
#[derive(Parser)]
#[command(name = "bedrock-console")]
#[command(version)]
#[command(about = "Interactive console chat client for Amazon Bedrock models")]
#[command(
    long_about = "Reads messages from the terminal, sends each one to an Amazon Bedrock \
    model through the Converse API, and prints the reply with its token usage. \
    Credentials are read from AWS_BEARER_TOKEN_BEDROCK and the region from AWS_REGION."
)]
pub struct Cli {
    /// Optional configuration file (built-in defaults are used otherwise)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a template configuration file
    Config {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Generate template configuration content
pub fn generate_config_template() -> &'static str {
    r#"# bedrock-console Configuration
# =============================
#
# Every setting below is optional. Values shown are the built-in defaults.

# ─────────────────────────────────────────────────────────────────────────────
# MODEL
# ─────────────────────────────────────────────────────────────────────────────
#
# Fixed for the whole session:
#   - model_id: Bedrock model or inference profile identifier
#   - max_tokens: Maximum tokens generated per reply (must be > 0)
#   - temperature: Sampling temperature (0.0-1.0)

[model]
model_id = "amazon.nova-lite-v1:0"
max_tokens = 3000
temperature = 0.7

# ─────────────────────────────────────────────────────────────────────────────
# ENDPOINT
# ─────────────────────────────────────────────────────────────────────────────

[endpoint]
# AWS region. The AWS_REGION environment variable takes precedence.
region = "us-east-1"

# Explicit endpoint URL (VPC endpoint, local proxy). Derived from the region
# when not set.
# endpoint_url = "https://bedrock-runtime.us-east-1.amazonaws.com"

# Transport timeout in seconds (1-900). The HTTP client default applies when
# not set.
# request_timeout_seconds = 120

# ─────────────────────────────────────────────────────────────────────────────
# OBSERVABILITY
# ─────────────────────────────────────────────────────────────────────────────

[observability]
# Log level: "trace", "debug", "info", "warn", "error"
# Logs are written to stderr; RUST_LOG overrides this value.
log_level = "warn"
"#
}
