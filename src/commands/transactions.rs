// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::app::Okane;
use crate::models::{Category, TransactionRequest};
use crate::repo::Repository;
use crate::utils::{
    arg, fmt_money, maybe_print_json, now, opt_arg, parse_amount, parse_date, pretty_table,
    start_of_day,
};
use anyhow::Result;
use chrono::Local;
use serde::Serialize;

pub fn handle<R: Repository>(app: &mut Okane<R>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(app, sub)?,
        Some(("list", sub)) => list(app, sub)?,
        Some(("chart", sub)) => chart(app, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn request_from(sub: &clap::ArgMatches) -> Result<TransactionRequest> {
    Ok(TransactionRequest {
        amount: parse_amount(arg(sub, "amount")?)?,
        title: arg(sub, "title")?.to_string(),
        note: opt_arg(sub, "note").unwrap_or_default().to_string(),
        category: arg(sub, "category")?.parse::<Category>()?,
    })
}

fn add<R: Repository>(app: &mut Okane<R>, sub: &clap::ArgMatches) -> Result<()> {
    let req = request_from(sub)?;
    let tx = app.append(req, now())?;
    println!(
        "Recorded {} {} '{}' (balance {})",
        tx.category,
        fmt_money(tx.amount),
        tx.title,
        fmt_money(tx.balance)
    );
    Ok(())
}

fn list<R: Repository>(app: &Okane<R>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(app, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                let signed = match r.category {
                    Category::Income => format!("+{}", fmt_money(r.amount)),
                    Category::Expense => format!("-{}", fmt_money(r.amount)),
                };
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.title.clone(),
                    signed,
                    fmt_money(r.balance),
                    r.note.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Date", "Title", "Amount", "Balance", "Note"], rows)
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub title: String,
    pub amount: i64,
    pub category: Category,
    pub balance: i64,
    pub note: String,
}

/// Newest first, like a passbook read from the top.
pub fn query_rows<R: Repository>(app: &Okane<R>, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let since = match opt_arg(sub, "since") {
        Some(s) => Some(start_of_day(parse_date(s)?)?),
        None => None,
    };
    let limit = sub.get_one::<usize>("limit").copied().unwrap_or(usize::MAX);
    Ok(app
        .ledger()
        .history()
        .iter()
        .rev()
        .filter(|t| since.is_none_or(|s| t.timestamp >= s))
        .take(limit)
        .map(|t| TransactionRow {
            id: t.id,
            date: t
                .timestamp
                .with_timezone(&Local)
                .format("%Y-%m-%d")
                .to_string(),
            title: t.title.clone(),
            amount: t.amount,
            category: t.category,
            balance: t.balance,
            note: t.note.clone(),
        })
        .collect())
}

fn chart<R: Repository>(app: &Okane<R>, sub: &clap::ArgMatches) -> Result<()> {
    let days = sub
        .get_one::<i64>("days")
        .copied()
        .unwrap_or(app.config().chart_days);
    let points = app.chart(now(), days);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &points)? {
        let rows = points
            .iter()
            .map(|p| {
                vec![
                    p.timestamp
                        .with_timezone(&Local)
                        .format("%Y-%m-%d %H:%M")
                        .to_string(),
                    fmt_money(p.balance),
                    fmt_money(p.income),
                    fmt_money(p.expense),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["When", "Balance", "Income", "Expense"], rows)
        );
    }
    Ok(())
}
