//! drvup - Driver update orchestrator
//!
//! This is the main CLI application that runs one full update pass
//! (search, download, install) through the ops crate.

mod cli;
mod display;
mod error;
mod events;
mod logging;
mod privilege;

use crate::cli::Cli;
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::events::EventHandler;
use clap::Parser;
use drvup_agent::{SimService, UpdateService};
use drvup_config::Config;
use drvup_events::EventReceiver;
use drvup_ops::{OperationResult, OpsContextBuilder, UpdateOptions};
use drvup_types::{BackendKind, ColorChoice, OutputFormat};
use std::process;
use tokio::select;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Parse command line arguments first to check for JSON mode
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    // Initialize tracing with JSON awareness
    logging::init_tracing(json_mode, cli.global.debug);

    // Run the application and handle errors
    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        if !json_mode {
            eprintln!("Error: {e}");
        }
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    info!("Starting drvup v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration with proper precedence:
    // 1. Start with file config (or defaults)
    let mut config = Config::load_or_default(&cli.global.config)
        .await
        .map_err(CliError::Config)?;

    // 2. Merge environment variables
    config.merge_env().map_err(CliError::Config)?;

    // 3. Apply CLI flags (highest precedence)
    apply_cli_config(&mut config, &cli)?;

    // Create event channel
    let (event_sender, event_receiver) = drvup_events::channel();

    // Driver installation usually needs elevation; say so up front but keep going.
    privilege::advise(&event_sender);

    // Construct the update service backend
    let service: Box<dyn UpdateService> = match config.service.backend {
        BackendKind::Sim => {
            let catalog = config.catalog_path().map_err(CliError::Config)?;
            Box::new(SimService::new(catalog))
        }
    };

    // Build operations context
    let ops_ctx = OpsContextBuilder::new()
        .with_service(service)
        .with_event_sender(event_sender.clone())
        .with_config(config.clone())
        .build()?;

    let json_output = cli.global.json || config.general.default_output == OutputFormat::Json;
    let color_choice = cli.global.color.unwrap_or(config.general.color);

    // Create output renderer
    let renderer = OutputRenderer::new(json_output, color_choice);

    // Create event handler
    let colors_enabled = match color_choice {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => console::Term::stdout().features().colors_supported(),
    };
    let mut event_handler = EventHandler::new(
        colors_enabled,
        config.log.debug,
        json_output,
        config.log.transcript_path.as_deref(),
    );

    let options = UpdateOptions {
        dry_run: cli.dry_run,
    };

    // Run the update pass with event handling
    let result =
        run_update_with_events(ops_ctx, options, event_receiver, &mut event_handler).await?;

    event_handler.record_outcome(&display::outcome_line(&result));

    // Render final result
    renderer.render_result(&result)?;

    info!("Update pass completed successfully");
    Ok(())
}

/// Run the update pass with concurrent event handling
async fn run_update_with_events(
    ops_ctx: drvup_ops::OpsCtx,
    options: UpdateOptions,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<OperationResult, CliError> {
    let mut update_future = Box::pin(async move { drvup_ops::update(&ops_ctx, &options).await });

    // Handle events concurrently with the running update
    loop {
        select! {
            // Update pass completed
            result = &mut update_future => {
                // Drain any remaining events
                while let Ok(message) = event_receiver.try_recv() {
                    event_handler.handle_message(&message);
                }
                return result.map_err(CliError::from);
            }

            // Event received
            message = event_receiver.recv() => {
                match message {
                    Some(message) => event_handler.handle_message(&message),
                    None => { /* Channel closed: keep waiting for the update to finish */ }
                }
            }
        }
    }
}

/// Apply CLI flag overrides on top of file and environment configuration
fn apply_cli_config(config: &mut Config, cli: &Cli) -> Result<(), CliError> {
    // Global CLI flags override everything
    if let Some(color) = &cli.global.color {
        config.general.color = *color;
    }
    if cli.global.json {
        config.general.default_output = OutputFormat::Json;
    }
    if cli.global.debug {
        config.log.debug = true;
    }

    // Run-specific CLI flags
    if let Some(backend) = cli.backend {
        config.service.backend = backend;
    }
    if let Some(catalog) = &cli.catalog {
        config.service.catalog_path = Some(catalog.clone());
    }
    if let Some(log_file) = &cli.log_file {
        if log_file.as_os_str().is_empty() {
            return Err(CliError::InvalidArguments(
                "--log-file requires a non-empty path".to_string(),
            ));
        }
        config.log.transcript_path = Some(log_file.clone());
    }

    Ok(())
}
