// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cfo_copilot::{Copilot, cli, commands, db, ledger};

fn init_logger(level: &str) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::new(format!(
            "{}={level},cfo_copilot={level}",
            env!("CARGO_CRATE_NAME")
        )),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn data_path(matches: &clap::ArgMatches) -> Result<PathBuf> {
    match matches.get_one::<String>("data") {
        Some(p) => Ok(PathBuf::from(p.trim())),
        None => db::db_path(),
    }
}

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();
    init_logger(
        matches
            .get_one::<String>("log_level")
            .map(|s| s.as_str())
            .unwrap_or("warn"),
    );

    match matches.subcommand() {
        None => {
            cli::build_cli().print_help()?;
            println!();
            return Ok(());
        }
        Some(("classify", sub)) => return commands::ask::classify(sub),
        _ => {}
    }

    let path = data_path(&matches)?;
    debug!("ledger source {}", path.display());

    if let Some(("import", sub)) = matches.subcommand() {
        if path.is_dir() {
            return Err(anyhow!(
                "--data {} is a directory; import needs a SQLite file",
                path.display()
            ));
        }
        let mut conn = db::open_or_init(&path)?;
        return commands::importer::handle(&mut conn, sub);
    }

    let copilot = Copilot::open(ledger::source_for_path(&path))
        .with_context(|| format!("Failed to load ledger data from {}", path.display()))?;
    let store = copilot.store();

    match matches.subcommand() {
        Some(("ask", sub)) => commands::ask::handle(&copilot, sub)?,
        Some(("summary", sub)) => commands::reports::summary(store, sub)?,
        Some(("opex", sub)) => commands::reports::opex(store, sub)?,
        Some(("trend", sub)) => commands::reports::trend(store, sub)?,
        Some(("runway", sub)) => commands::reports::runway(store, sub)?,
        Some(("report", sub)) => commands::reports::report(store, sub)?,
        Some(("fx", sub)) => commands::fx::list(store, sub)?,
        Some(("export", sub)) => commands::exporter::handle(store, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(store)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
