mod cli;
mod commands;
mod error_fmt;
mod replay;

use std::path::Path;

use clap::Parser;
use eyre::{Result, WrapErr};
use helios_config::{Logging, Profile, load_profile};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::{Cli, Commands, FILE_GUARD, JSON_MODE};
use crate::error_fmt::{ProfileContext, exit_code_for_error, format_error_json, humanize};

fn init_tracing(json: bool, level: &str, logging: &Logging) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .wrap_err_with(|| format!("invalid log level '{level}'"))?;

    let console = if json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer().with_writer(std::io::stderr).boxed()
    };

    let file_layer = match &logging.file {
        Some(file) => {
            let path = Path::new(file);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| eyre::eyre!("logging.file has no file name: {file}"))?;
            let appender = match logging
                .rotation
                .as_deref()
                .map(str::to_ascii_lowercase)
                .as_deref()
            {
                Some("daily") => tracing_appender::rolling::daily(dir, name),
                Some("hourly") => tracing_appender::rolling::hourly(dir, name),
                _ => tracing_appender::rolling::never(dir, name),
            };
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            Some(fmt::layer().json().with_writer(writer).boxed())
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()
        .wrap_err("install tracing subscriber")?;
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let profile = if cli.cmd.needs_profile() {
        load_profile(&cli.profile).wrap_err(ProfileContext(cli.profile.clone()))?
    } else {
        Profile::default()
    };

    let level = cli
        .log_level
        .as_deref()
        .or(profile.logging.level.as_deref())
        .unwrap_or("info");
    init_tracing(cli.json, level, &profile.logging)?;
    tracing::debug!(profile = %cli.profile.display(), command = ?cli.cmd, "starting");

    match &cli.cmd {
        Commands::Check => commands::check(&profile, &cli.profile, cli.json),
        Commands::Eval { table, values } => {
            commands::eval(&profile, &cli.profile, table, values, cli.json)
        }
        Commands::Sweep {
            table,
            from,
            to,
            steps,
        } => commands::sweep(
            &profile,
            &cli.profile,
            table,
            *from,
            *to,
            *steps,
            cli.json,
        ),
        Commands::Replay { input } => {
            commands::replay(&profile, &cli.profile, input.as_deref(), cli.json)
        }
        Commands::Builtin { name, values } => commands::builtin(name, values, cli.json),
    }
}

fn main() {
    let _ = color_eyre::install();
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(err) = run(cli) {
        tracing::error!(error = %format!("{err:#}"), "command failed");
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&err));
        } else {
            eprintln!("{}", humanize(&err));
        }
        std::process::exit(exit_code_for_error(&err));
    }
}
