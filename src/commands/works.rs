// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::app::Okane;
use crate::models::{Span, Work};
use crate::repo::Repository;
use crate::utils::{
    arg, fmt_days, fmt_money, maybe_print_json, now, opt_arg, parse_amount, parse_days, parse_id,
    pretty_table,
};
use anyhow::Result;

pub fn handle<R: Repository>(app: &mut Okane<R>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("today", sub)) => today(app, sub)?,
        Some(("toggle", sub)) => {
            let id = parse_id(arg(sub, "id")?)?;
            let done = app.toggle_work(id)?;
            println!(
                "Work {} marked {}",
                id,
                if done { "done" } else { "not done" }
            );
        }
        Some(("finish", _)) => {
            let r = app.finish_day()?;
            println!(
                "Submitted {}: {}/{} tasks, earned {} of {}",
                r.date,
                r.completed_tasks_count,
                r.scheduled_tasks_count,
                fmt_money(r.earned_reward),
                fmt_money(r.max_possible_reward)
            );
        }
        Some(("payout", _)) => match app.pay_work_rewards(now())? {
            Some(tx) => println!(
                "Paid {} '{}' (balance {})",
                fmt_money(tx.amount),
                tx.title,
                fmt_money(tx.balance)
            ),
            None => println!("Nothing to pay out"),
        },
        Some(("records", sub)) => records(app, sub)?,
        Some(("catalog", sub)) => catalog(app, sub)?,
        Some(("add", sub)) => add(app, sub)?,
        _ => {}
    }
    Ok(())
}

fn today<R: Repository>(app: &Okane<R>, sub: &clap::ArgMatches) -> Result<()> {
    let list = app.todays_work();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &list)? {
        return Ok(());
    }
    if list.is_empty() {
        println!("No work scheduled for {}", app.day().date);
        return Ok(());
    }
    let rows = list
        .iter()
        .map(|s| {
            vec![
                s.work.id.to_string(),
                s.work.title.clone(),
                fmt_money(s.work.reward),
                if s.completed { "x".into() } else { String::new() },
                s.work.note.clone(),
            ]
        })
        .collect();
    println!(
        "{} ({:?})",
        app.day().date,
        app.day().status
    );
    println!(
        "{}",
        pretty_table(&["ID", "Title", "Reward", "Done", "Note"], rows)
    );
    Ok(())
}

fn records<R: Repository>(app: &Okane<R>, sub: &clap::ArgMatches) -> Result<()> {
    let data = app.daily_records()?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let paid_through = app.day().paid_through_record;
    let rows = data
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.date.to_string(),
                r.kind.as_str().to_string(),
                format!("{}/{}", r.completed_tasks_count, r.scheduled_tasks_count),
                fmt_money(r.earned_reward),
                fmt_money(r.max_possible_reward),
                if r.id <= paid_through { "yes".into() } else { String::new() },
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Date", "Kind", "Done", "Earned", "Max", "Paid"],
            rows
        )
    );
    Ok(())
}

fn catalog<R: Repository>(app: &Okane<R>, sub: &clap::ArgMatches) -> Result<()> {
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &app.works())? {
        return Ok(());
    }
    let rows = app
        .works()
        .iter()
        .map(|w| {
            vec![
                w.id.to_string(),
                w.title.clone(),
                fmt_money(w.reward),
                w.execution_span.to_string(),
                fmt_days(w.execution_span, &w.execution_days),
                if w.is_valid { "yes".into() } else { "no".into() },
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Title", "Reward", "Span", "Days", "Active"], rows)
    );
    Ok(())
}

fn add<R: Repository>(app: &mut Okane<R>, sub: &clap::ArgMatches) -> Result<()> {
    let span: Span = arg(sub, "span")?.parse()?;
    let id = match opt_arg(sub, "id") {
        Some(s) => parse_id(s)?,
        None => app.next_work_id(),
    };
    let work = Work {
        id,
        title: arg(sub, "title")?.to_string(),
        note: opt_arg(sub, "note").unwrap_or_default().to_string(),
        reward: parse_amount(arg(sub, "reward")?)?,
        is_valid: !sub.get_flag("inactive"),
        execution_span: span,
        execution_days: parse_days(arg(sub, "days")?, span)?,
    };
    let title = work.title.clone();
    app.upsert_work(arg(sub, "passcode")?, work)?;
    println!("Saved work {} '{}'", id, title);
    Ok(())
}
