// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::app::Okane;
use crate::models::{Quest, Span, Transaction};
use crate::repo::Repository;
use crate::utils::{
    arg, confirm, fmt_days, fmt_money, maybe_print_json, now, opt_arg, parse_amount, parse_days,
    parse_id, pretty_table,
};
use anyhow::Result;

pub fn handle<R: Repository>(app: &mut Okane<R>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(app, sub)?,
        Some(("complete", sub)) => complete(app, sub)?,
        Some(("undo", sub)) => {
            let id = parse_id(arg(sub, "id")?)?;
            let tx = app.undo_quest(id, now())?;
            report(id, "undone", tx.as_ref());
        }
        Some(("add", sub)) => add(app, sub)?,
        _ => {}
    }
    Ok(())
}

fn report(id: i64, what: &str, tx: Option<&Transaction>) {
    match tx {
        Some(tx) => println!(
            "Quest {} {}: {} {} (balance {})",
            id,
            what,
            tx.category,
            fmt_money(tx.amount),
            fmt_money(tx.balance)
        ),
        None => println!("Quest {} {}", id, what),
    }
}

fn list<R: Repository>(app: &Okane<R>, sub: &clap::ArgMatches) -> Result<()> {
    let board = app.quest_board();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &board)? {
        return Ok(());
    }
    let rows = board
        .iter()
        .map(|b| {
            vec![
                b.quest.id.to_string(),
                b.quest.title.clone(),
                fmt_money(b.quest.reward),
                fmt_days(b.quest.frequency, &b.quest.execution_days),
                if b.claimed { "x".into() } else { String::new() },
                b.quest.description.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Title", "Reward", "Days", "Claimed", "Description"],
            rows
        )
    );
    Ok(())
}

fn complete<R: Repository>(app: &mut Okane<R>, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(arg(sub, "id")?)?;
    if !sub.get_flag("yes") {
        let title = app
            .quests()
            .iter()
            .find(|q| q.id == id)
            .map(|q| q.title.clone())
            .unwrap_or_else(|| format!("#{}", id));
        if !confirm(&format!("Complete quest '{}'?", title))? {
            println!("Cancelled");
            return Ok(());
        }
    }
    let tx = app.complete_quest(id, now())?;
    report(id, "completed", tx.as_ref());
    Ok(())
}

fn add<R: Repository>(app: &mut Okane<R>, sub: &clap::ArgMatches) -> Result<()> {
    let frequency: Span = arg(sub, "frequency")?.parse()?;
    let id = match opt_arg(sub, "id") {
        Some(s) => parse_id(s)?,
        None => app.next_quest_id(),
    };
    let quest = Quest {
        id,
        title: arg(sub, "title")?.to_string(),
        description: opt_arg(sub, "description").unwrap_or_default().to_string(),
        reward: parse_amount(arg(sub, "reward")?)?,
        is_valid: !sub.get_flag("inactive"),
        frequency,
        execution_days: parse_days(arg(sub, "days")?, frequency)?,
    };
    let title = quest.title.clone();
    app.upsert_quest(arg(sub, "passcode")?, quest)?;
    println!("Saved quest {} '{}'", id, title);
    Ok(())
}
