//! Camclip CLI entry point

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use camclip::cli::{
    app::{load_merged_config, run_capture, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
};
use camclip::domain::config::AppConfig;
use camclip::domain::recording::Countdown;
use camclip::infrastructure::XdgConfigStore;

/// Install the log subscriber; `RUST_LOG` wins over `--verbose`
fn init_tracing(verbose: bool) {
    let default = if verbose { "camclip=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let presenter = Presenter::new();

    // Handle subcommands
    if let Some(Commands::Config { action }) = cli.command {
        let store = XdgConfigStore::new();
        if let Err(e) = handle_config_command(action, &store, &presenter).await {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
        return ExitCode::SUCCESS;
    }

    let countdown = match cli.countdown.as_deref().map(str::parse::<Countdown>) {
        Some(Ok(c)) => Some(c.as_secs()),
        Some(Err(e)) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
        None => None,
    };

    if cli.width == Some(0) {
        presenter.error("Invalid width: must be a positive number of pixels");
        return ExitCode::from(EXIT_USAGE_ERROR);
    }

    // Build CLI config from args
    let cli_config = AppConfig {
        upload_url: cli.endpoint.clone(),
        instructions: cli.instructions.clone(),
        mime_type: cli.mime.map(|m| m.as_config_value().to_string()),
        assemble_as: cli.assemble_as.map(|m| m.as_config_value().to_string()),
        video_width: cli.width,
        audio: cli.audio.then_some(true),
        countdown,
        device: cli.device.clone(),
        output_dir: cli.output.clone(),
        upload: cli.upload.then_some(true),
        snapshot: cli.snapshot.then_some(true),
        notify: cli.notify.then_some(true),
    };

    let config = load_merged_config(cli_config).await;
    tracing::debug!(?config, "configuration loaded");

    run_capture(config).await
}
