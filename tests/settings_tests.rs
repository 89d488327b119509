// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use okane::app::Okane;
use okane::commands::balance;
use okane::config::AppConfig;
use okane::error::OkaneError;
use okane::models::Span;
use okane::repo::MemoryRepository;
use okane::{cli, commands::settings};
use rust_decimal::Decimal;

fn wednesday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 10, 16).unwrap()
}

fn setup() -> Okane<MemoryRepository> {
    Okane::load(MemoryRepository::seeded(), &AppConfig::default(), wednesday()).unwrap()
}

fn set(
    app: &mut Okane<MemoryRepository>,
    passcode: &str,
    section: &str,
    key: &str,
    value: &str,
) -> anyhow::Result<()> {
    let matches = cli::build_cli().try_get_matches_from([
        "okane", "settings", "set", "--passcode", passcode, "--section", section, "--key", key,
        "--value", value,
    ])?;
    match matches.subcommand() {
        Some(("settings", m)) => settings::handle(app, m),
        _ => panic!("no settings subcommand"),
    }
}

#[test]
fn defaults_project_interest_and_dates() {
    let app = setup();
    let s = balance::summary(&app, wednesday());
    assert_eq!(s.balance, 9700);
    assert_eq!(s.interest_rate, Decimal::new(5, 1));
    assert_eq!(s.next_interest, 48);
    assert_eq!(s.next_interest_payment, NaiveDate::from_ymd_opt(2024, 10, 20));
    assert_eq!(s.next_work_payout, NaiveDate::from_ymd_opt(2024, 10, 20));
}

#[test]
fn wrong_passcode_changes_nothing() {
    let mut app = setup();
    let err = set(&mut app, "0000", "interest", "interest_rate", "2").unwrap_err();
    assert_eq!(err.downcast_ref::<OkaneError>(), Some(&OkaneError::WrongPasscode));
    assert_eq!(app.settings().compound_interest.interest_rate, Decimal::new(5, 1));
}

#[test]
fn edits_are_saved_and_used() {
    let mut app = setup();
    set(&mut app, "1234", "interest", "interest_rate", "1").unwrap();
    set(&mut app, "1234", "compound_interest", "payment_span", "monthly").unwrap();
    set(&mut app, "1234", "compound_interest", "payment_day", "25").unwrap();
    set(&mut app, "1234", "work_list", "payment_day", "3").unwrap();

    let saved = &app.repo().settings;
    assert_eq!(saved.compound_interest.payment.payment_span, Span::Monthly);
    let s = balance::summary(&app, wednesday());
    assert_eq!(s.next_interest, 97);
    assert_eq!(s.next_interest_payment, NaiveDate::from_ymd_opt(2024, 10, 25));
    assert_eq!(s.next_work_payout, NaiveDate::from_ymd_opt(2024, 10, 16));
}

#[test]
fn out_of_range_values_are_rejected() {
    let mut app = setup();
    assert!(set(&mut app, "1234", "work_list", "payment_day", "7").is_err());
    assert!(set(&mut app, "1234", "quest_board", "interest_rate", "1").is_err());
    assert!(set(&mut app, "1234", "interest", "interest_rate", "-1").is_err());
    assert!(set(&mut app, "1234", "nowhere", "payment_day", "1").is_err());
    assert_eq!(app.repo().settings, okane::settings::Settings::default());
}
