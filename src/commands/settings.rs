// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::app::Okane;
use crate::models::Span;
use crate::repo::Repository;
use crate::settings::{PaymentSchedule, Section, Settings};
use crate::utils::{arg, maybe_print_json, pretty_table, weekday_name};
use anyhow::Result;

pub fn handle<R: Repository>(app: &mut Okane<R>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(app.settings(), sub)?,
        Some(("set", sub)) => {
            let section: Section = arg(sub, "section")?.parse()?;
            let key = arg(sub, "key")?.to_string();
            let value = arg(sub, "value")?.to_string();
            app.update_settings(arg(sub, "passcode")?, &[(section, key.clone(), value.clone())])?;
            println!("Set {}.{} = {}", section, key, value);
        }
        _ => {}
    }
    Ok(())
}

fn fmt_schedule(p: &PaymentSchedule) -> String {
    match p.payment_span {
        Span::Weekly => format!("weekly on {}", weekday_name(p.payment_day)),
        Span::Monthly => format!("monthly on day {}", p.payment_day),
    }
}

fn show(settings: &Settings, sub: &clap::ArgMatches) -> Result<()> {
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), settings)? {
        return Ok(());
    }
    let mut rows = vec![
        vec![
            Section::CompoundInterest.to_string(),
            "interest_rate".into(),
            format!("{}%", settings.compound_interest.interest_rate),
        ],
    ];
    for section in [Section::CompoundInterest, Section::WorkList, Section::QuestBoard] {
        rows.push(vec![
            section.to_string(),
            "payment".into(),
            fmt_schedule(settings.schedule(section)),
        ]);
    }
    let extra = [
        (Section::CompoundInterest, &settings.compound_interest.fields),
        (Section::WorkList, &settings.work_list.fields),
        (Section::QuestBoard, &settings.quest_board.fields),
    ];
    for (section, fields) in extra {
        for (k, v) in fields {
            rows.push(vec![section.to_string(), k.clone(), v.clone()]);
        }
    }
    println!("{}", pretty_table(&["Section", "Key", "Value"], rows));
    Ok(())
}
