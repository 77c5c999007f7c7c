//! bedrock-console binary
//!
//! Starts the interactive console on stdin/stdout, or writes a template
//! configuration with the `config` subcommand.

use bedrock_console::{
    adapter::InferenceAdapter,
    cli::{Cli, Command, generate_config_template},
    config::Config,
    converse::{BedrockClient, EnvCredentialProvider},
    error::AppError,
    session::Session,
    telemetry,
};
use clap::Parser;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Command::Config { output }) = cli.command {
        let template = generate_config_template();
        match output {
            Some(path) => {
                std::fs::write(&path, template).map_err(AppError::Io)?;
                eprintln!("Wrote template configuration to {}", path.display());
            }
            None => print!("{}", template),
        }
        return Ok(());
    }

    // Load configuration
    let config = Config::load(cli.config.as_deref())?;

    // Initialize telemetry
    telemetry::init(&config.observability.log_level);

    tracing::info!(
        model_id = %config.model.model_id(),
        region = %config.endpoint.region(),
        debug = config.debug(),
        "Starting bedrock-console"
    );

    let client = BedrockClient::new(&config.endpoint, Arc::new(EnvCredentialProvider::new()))?;
    let adapter = InferenceAdapter::new(client, config.model.clone()).with_debug(config.debug());
    let session = Session::new(adapter);

    let input = tokio::io::BufReader::new(tokio::io::stdin());
    let mut output = std::io::stdout();
    session.run(input, &mut output).await?;

    Ok(())
}
