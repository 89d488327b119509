// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use okane::app::Okane;
use okane::config::AppConfig;
use okane::db::{self, SqliteRepository};
use okane::repo::{MemoryRepository, Repository};
use okane::utils::today;
use okane::{cli, commands};

fn run<R: Repository>(app: &mut Okane<R>, matches: &clap::ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("tx", sub)) => commands::transactions::handle(app, sub)?,
        Some(("balance", sub)) => commands::balance::handle(app, sub)?,
        Some(("work", sub)) => commands::works::handle(app, sub)?,
        Some(("quest", sub)) => commands::quests::handle(app, sub)?,
        Some(("settings", sub)) => commands::settings::handle(app, sub)?,
        Some(("rollover", sub)) => commands::rollover::handle(app, sub)?,
        Some(("export", sub)) => commands::exporter::handle(app, sub)?,
        Some(("import", sub)) => commands::importer::handle(app, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(app)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("okane=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let config = AppConfig::load().unwrap_or_else(|err| {
        tracing::error!("failed to load config, using defaults: {err:#}");
        AppConfig::default()
    });

    if let Some(("init", sub)) = matches.subcommand() {
        let mut repo = SqliteRepository::open()?;
        if sub.get_flag("seed") {
            if db::seed(&mut repo)? {
                println!("Loaded the sample household");
            } else {
                println!("Database already has data, skipped seeding");
            }
        }
        println!("Database initialized at {}", db::db_path()?.display());
        return Ok(());
    }

    if matches.get_flag("memory") {
        let mut app = Okane::load(MemoryRepository::seeded(), &config, today())?;
        run(&mut app, &matches)
    } else {
        let mut app = Okane::load(SqliteRepository::open()?, &config, today())?;
        run(&mut app, &matches)
    }
}
