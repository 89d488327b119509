// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::app::Okane;
use crate::models::DailyWorkRecord;
use crate::repo::Repository;
use crate::utils::{fmt_money, today};
use anyhow::Result;
use std::thread;
use std::time::Duration;

pub fn handle<R: Repository>(app: &mut Okane<R>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("check", _)) => {
            let records = app.tick(today())?;
            print_records(app.day().date, &records);
        }
        Some(("watch", sub)) => watch(app, sub)?,
        _ => {}
    }
    Ok(())
}

fn print_records(date: chrono::NaiveDate, records: &[DailyWorkRecord]) {
    if records.is_empty() {
        println!("Day {} is current", date);
        return;
    }
    for r in records {
        println!(
            "Backfilled {} ({} scheduled, max {})",
            r.date,
            r.scheduled_tasks_count,
            fmt_money(r.max_possible_reward)
        );
    }
    println!("Opened {}", date);
}

/// Poll for a date change until interrupted or `--iterations` checks ran.
fn watch<R: Repository>(app: &mut Okane<R>, sub: &clap::ArgMatches) -> Result<()> {
    let secs = sub
        .get_one::<u64>("interval-secs")
        .copied()
        .unwrap_or(app.config().rollover_interval_secs)
        .max(1);
    let iterations = sub.get_one::<u64>("iterations").copied();
    tracing::info!(interval_secs = secs, "watching for day changes");
    let mut ran = 0u64;
    loop {
        let records = app.tick(today())?;
        if !records.is_empty() {
            print_records(app.day().date, &records);
        }
        ran += 1;
        if iterations.is_some_and(|n| ran >= n) {
            break;
        }
        thread::sleep(Duration::from_secs(secs));
    }
    Ok(())
}
