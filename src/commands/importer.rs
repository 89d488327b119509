// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::app::Okane;
use crate::ledger::Ledger;
use crate::models::{Category, TransactionRequest};
use crate::repo::Repository;
use crate::utils::{arg, now, parse_amount};
use anyhow::{Context, Result};
use csv::ReaderBuilder;

pub fn handle<R: Repository>(app: &mut Okane<R>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => import_transactions(app, sub),
        _ => Ok(()),
    }
}

/// Rows are checked up front so a bad line leaves the ledger untouched.
fn import_transactions<R: Repository>(app: &mut Okane<R>, sub: &clap::ArgMatches) -> Result<()> {
    let path = arg(sub, "path")?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let mut requests = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let line = i + 2;
        let rec = result?;
        let title = rec.get(0).context("title missing")?.trim().to_string();
        let amount_raw = rec.get(1).context("amount missing")?.trim();
        let category_raw = rec.get(2).context("category missing")?.trim();
        let note = rec.get(3).unwrap_or("").trim().to_string();

        let req = TransactionRequest {
            amount: parse_amount(amount_raw)
                .with_context(|| format!("line {}: invalid amount for '{}'", line, title))?,
            title,
            note,
            category: category_raw
                .parse::<Category>()
                .with_context(|| format!("line {}", line))?,
        };
        Ledger::validate(&req).with_context(|| format!("line {}", line))?;
        requests.push(req);
    }

    let at = now();
    let count = requests.len();
    for req in requests {
        app.append(req, at)?;
    }
    println!(
        "Imported {} transactions from {} (balance {})",
        count,
        path,
        app.balance()
    );
    Ok(())
}
