// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use std::collections::BTreeSet;
use std::io::{self, BufRead, Write};

use crate::models::Span;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Required clap argument, trimmed.
pub fn arg<'a>(m: &'a clap::ArgMatches, name: &str) -> Result<&'a str> {
    m.get_one::<String>(name)
        .map(|s| s.trim())
        .ok_or_else(|| anyhow!("Missing required argument --{}", name))
}

pub fn opt_arg<'a>(m: &'a clap::ArgMatches, name: &str) -> Option<&'a str> {
    m.get_one::<String>(name)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Start of `date` in local time, as UTC.
pub fn start_of_day(date: NaiveDate) -> Result<DateTime<Utc>> {
    let naive = date
        .and_hms_opt(0, 0, 0)
        .with_context(|| format!("Invalid date {}", date))?;
    Ok(Local
        .from_local_datetime(&naive)
        .earliest()
        .with_context(|| format!("No local midnight on {}", date))?
        .with_timezone(&Utc))
}

pub fn parse_amount(s: &str) -> Result<i64> {
    s.trim()
        .replace(['_', ','], "")
        .parse::<i64>()
        .with_context(|| format!("Invalid amount '{}', expected a whole number", s))
}

pub fn parse_id(s: &str) -> Result<i64> {
    s.trim()
        .parse::<i64>()
        .with_context(|| format!("Invalid id '{}'", s))
}

/// "1,2,3" or "mon,tue" for weekly spans; "1,15,31" for monthly.
pub fn parse_days(s: &str, span: Span) -> Result<BTreeSet<u8>> {
    let mut out = BTreeSet::new();
    for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let day = if span == Span::Weekly && part.chars().all(|c| c.is_ascii_alphabetic()) {
            WEEKDAYS
                .iter()
                .position(|w| part.len() >= 3 && w.eq_ignore_ascii_case(&part[..3]))
                .map(|i| i as u8)
                .with_context(|| format!("Invalid day '{}'", part))?
        } else {
            part.parse::<u8>()
                .with_context(|| format!("Invalid day '{}'", part))?
        };
        out.insert(day);
    }
    if out.is_empty() {
        return Err(anyhow!("At least one execution day is required"));
    }
    Ok(out)
}

pub fn fmt_days(span: Span, days: &BTreeSet<u8>) -> String {
    days.iter()
        .map(|d| match span {
            Span::Weekly => WEEKDAYS
                .get(usize::from(*d))
                .map(|s| s.to_string())
                .unwrap_or_else(|| d.to_string()),
            Span::Monthly => d.to_string(),
        })
        .collect::<Vec<_>>()
        .join(",")
}

pub fn weekday_name(day: u8) -> &'static str {
    WEEKDAYS.get(usize::from(day)).copied().unwrap_or("?")
}

pub fn fmt_money(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if amount < 0 {
        format!("-¥{}", grouped)
    } else {
        format!("¥{}", grouped)
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

/// Ask a yes/no question on stdin. Anything but y/yes is a no.
pub fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_is_grouped() {
        assert_eq!(fmt_money(0), "¥0");
        assert_eq!(fmt_money(9700), "¥9,700");
        assert_eq!(fmt_money(-1234567), "-¥1,234,567");
    }

    #[test]
    fn days_accept_names_and_numbers() {
        let weekdays = parse_days("mon, Tue,3", Span::Weekly).unwrap();
        assert_eq!(weekdays.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
        let monthly = parse_days("1,15,31", Span::Monthly).unwrap();
        assert_eq!(fmt_days(Span::Monthly, &monthly), "1,15,31");
        assert!(parse_days("", Span::Weekly).is_err());
        assert!(parse_days("someday", Span::Weekly).is_err());
    }

    #[test]
    fn amounts_allow_separators() {
        assert_eq!(parse_amount(" 10,000 ").unwrap(), 10000);
        assert!(parse_amount("12.5").is_err());
    }
}
