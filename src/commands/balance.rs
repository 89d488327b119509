// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::app::Okane;
use crate::repo::Repository;
use crate::utils::{fmt_money, maybe_print_json, pretty_table, today};
use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct BalanceSummary {
    pub balance: i64,
    pub interest_rate: Decimal,
    pub next_interest: i64,
    pub next_interest_payment: Option<NaiveDate>,
    pub next_work_payout: Option<NaiveDate>,
    pub transactions: usize,
}

pub fn summary<R: Repository>(app: &Okane<R>, today: NaiveDate) -> BalanceSummary {
    let projection = app.interest_projection(today);
    BalanceSummary {
        balance: projection.balance,
        interest_rate: projection.rate,
        next_interest: projection.next_interest,
        next_interest_payment: projection.next_payment,
        next_work_payout: app.next_work_payout(today),
        transactions: app.ledger().len(),
    }
}

pub fn handle<R: Repository>(app: &Okane<R>, m: &clap::ArgMatches) -> Result<()> {
    let s = summary(app, today());
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &s)? {
        return Ok(());
    }
    let date_or_dash = |d: Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_else(|| "-".into());
    let rows = vec![
        vec!["Balance".into(), fmt_money(s.balance)],
        vec!["Interest rate".into(), format!("{}%", s.interest_rate)],
        vec!["Next interest".into(), fmt_money(s.next_interest)],
        vec!["Next interest payment".into(), date_or_dash(s.next_interest_payment)],
        vec!["Next work payout".into(), date_or_dash(s.next_work_payout)],
        vec!["Transactions".into(), s.transactions.to_string()],
    ];
    println!("{}", pretty_table(&["Item", "Value"], rows));
    Ok(())
}
