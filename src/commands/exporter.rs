// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::app::Okane;
use crate::repo::Repository;
use crate::utils::arg;
use anyhow::{Result, bail};
use serde_json::json;

pub fn handle<R: Repository>(app: &Okane<R>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(app, sub),
        _ => Ok(()),
    }
}

fn export_transactions<R: Repository>(app: &Okane<R>, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = arg(sub, "format")?.to_lowercase();
    let out = arg(sub, "out")?;
    let rows = app.ledger().history();

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "id", "timestamp", "title", "amount", "category", "balance", "note",
            ])?;
            for t in rows {
                wtr.write_record([
                    t.id.to_string(),
                    t.timestamp.to_rfc3339(),
                    t.title.clone(),
                    t.amount.to_string(),
                    t.category.to_string(),
                    t.balance.to_string(),
                    t.note.clone(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = rows
                .iter()
                .map(|t| {
                    json!({
                        "id": t.id, "timestamp": t.timestamp.to_rfc3339(), "title": t.title,
                        "amount": t.amount, "category": t.category, "balance": t.balance, "note": t.note
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    println!("Exported {} transactions to {}", rows.len(), out);
    Ok(())
}
