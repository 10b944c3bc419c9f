//! Process startup: arguments, configuration, logging, then the subcommand

use clap::Parser;
use std::io::IsTerminal;
use std::process::ExitCode;

use crate::app::cli::args::{Args, Command, ReplayArgs};
use crate::app::cli::config::{load_config, AppConfig};
use crate::app::replay::{load_fixture, print_report, replay};
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::{init_logging, level_with_verbosity};
use crate::core::shutdown::ShutdownCoordinator;
use crate::core::version::{build_time, version_line};

/// Initialize application startup
pub async fn startup() -> ExitCode {
    let args = Args::parse();

    // Configuration comes first so it can supply logging defaults
    let config = match load_config(args.config_file.as_deref()).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let use_color = args
        .color_choice()
        .or(config.color)
        .unwrap_or_else(|| std::io::stdout().is_terminal());
    colored::control::set_override(use_color);

    let base_level = args
        .log_level
        .as_deref()
        .or(config.log_level.as_deref())
        .unwrap_or("info");
    if let Err(e) = init_logging(
        Some(level_with_verbosity(base_level, args.verbosity())),
        args.log_format.as_deref().or(config.log_format.as_deref()),
        args.log_file.as_deref().or(config.log_file.as_deref()),
        use_color,
    ) {
        eprintln!("Failed to initialise logging: {e}");
        return ExitCode::FAILURE;
    }

    for warning in &config.warnings {
        log::warn!("{warning}");
    }
    log::info!(
        "mediaindex {} starting (built {})",
        version_line(),
        build_time()
    );
    log::debug!("Effective configuration: {config:?}");

    match &args.command {
        Command::Replay(replay_args) => run_replay(replay_args, config).await,
        Command::CheckConfig => {
            for line in config.summary_lines() {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
    }
}

async fn run_replay(args: &ReplayArgs, config: AppConfig) -> ExitCode {
    let (coordinator, shutdown_rx) = ShutdownCoordinator::new();
    coordinator.install_signal_handlers();

    let fixture = match load_fixture(&args.fixture).await {
        Ok(fixture) => fixture,
        Err(e) => {
            log_error_with_context(&e, "Loading fixture");
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match replay(args, fixture, config.index, shutdown_rx).await {
        Ok(report) => {
            print_report(&report);
            if report.end.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            log_error_with_context(&e, "Replay");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
