// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::app::Okane;
use crate::models::Span;
use crate::repo::Repository;
use crate::utils::{pretty_table, today};
use anyhow::Result;
use chrono::NaiveDate;
use std::collections::BTreeSet;

fn bad_days(span: Span, days: &BTreeSet<u8>) -> Vec<u8> {
    let (lo, hi) = span.day_range();
    days.iter().copied().filter(|d| *d < lo || *d > hi).collect()
}

/// One row per problem found: `[issue, detail]`.
pub fn diagnose<R: Repository>(app: &Okane<R>, today: NaiveDate) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    for m in app.mismatches() {
        rows.push(vec![
            "balance_mismatch".into(),
            format!("tx {} stored {} expected {}", m.id, m.stored, m.expected),
        ]);
    }

    for w in app.works() {
        let bad = bad_days(w.execution_span, &w.execution_days);
        if !bad.is_empty() {
            rows.push(vec!["work_bad_days".into(), format!("work {} {:?}", w.id, bad)]);
        }
        if w.execution_days.is_empty() {
            rows.push(vec!["work_never_due".into(), format!("work {}", w.id)]);
        }
    }
    for q in app.quests() {
        let bad = bad_days(q.frequency, &q.execution_days);
        if !bad.is_empty() {
            rows.push(vec!["quest_bad_days".into(), format!("quest {} {:?}", q.id, bad)]);
        }
    }

    if app.day().date > today {
        rows.push(vec!["day_in_future".into(), app.day().date.to_string()]);
    }

    let records = app.daily_records()?;
    let mut seen = BTreeSet::new();
    for r in &records {
        if !seen.insert(r.id) {
            rows.push(vec!["duplicate_record_id".into(), r.id.to_string()]);
        }
    }
    Ok(rows)
}

pub fn handle<R: Repository>(app: &Okane<R>) -> Result<()> {
    let rows = diagnose(app, today())?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
