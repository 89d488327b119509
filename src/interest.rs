// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Compound-interest projection and payment-day arithmetic.
//!
//! Projections are display-only: nothing here posts to the ledger.

use crate::models::Span;
use crate::settings::PaymentSchedule;
use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// `principal * (1 + rate)`, unrounded. `None` when it leaves the decimal range.
pub fn compounded_value(principal: Decimal, rate: Decimal) -> Option<Decimal> {
    Decimal::ONE
        .checked_add(rate)
        .and_then(|factor| principal.checked_mul(factor))
}

/// Interest the balance would earn over one period, floored to whole units.
/// Balances at or below zero earn nothing, and so does a projection that
/// does not fit the decimal or `i64` range.
pub fn next_interest(balance: i64, rate: Decimal) -> i64 {
    if balance <= 0 {
        return 0;
    }
    let principal = Decimal::from(balance);
    compounded_value(principal, rate)
        .and_then(|value| value.checked_sub(principal))
        .and_then(|interest| interest.floor().to_i64())
        .unwrap_or(0)
}

/// Percentage per period ("0.5") to a fractional rate (0.005).
pub fn rate_from_percent(percent: Decimal) -> Decimal {
    percent / Decimal::ONE_HUNDRED
}

/// The next date, `today` included, on which the schedule pays out.
/// `None` when the payment day can never occur (e.g. monthly day 0).
pub fn next_payment_date(schedule: &PaymentSchedule, today: NaiveDate) -> Option<NaiveDate> {
    match schedule.payment_span {
        Span::Weekly => {
            if schedule.payment_day > 6 {
                return None;
            }
            let current = today.weekday().num_days_from_sunday();
            let ahead = (u32::from(schedule.payment_day) + 7 - current) % 7;
            Some(today + Duration::days(i64::from(ahead)))
        }
        Span::Monthly => {
            let day = u32::from(schedule.payment_day);
            if !(1..=31).contains(&day) {
                return None;
            }
            let (mut year, mut month) = (today.year(), today.month());
            // A day 29..31 shows up at least once in any 13 consecutive months.
            for _ in 0..13 {
                if let Some(d) = NaiveDate::from_ymd_opt(year, month, day) {
                    if d >= today {
                        return Some(d);
                    }
                }
                if month == 12 {
                    year += 1;
                    month = 1;
                } else {
                    month += 1;
                }
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn schedule(span: Span, day: u8) -> PaymentSchedule {
        PaymentSchedule {
            payment_span: span,
            payment_day: day,
        }
    }

    #[test]
    fn half_percent_on_ten_thousand() {
        let rate = Decimal::from_str("0.005").unwrap();
        assert_eq!(
            compounded_value(Decimal::from(10000), rate),
            Some(Decimal::from(10050))
        );
        assert_eq!(next_interest(10000, rate), 50);
    }

    #[test]
    fn interest_is_floored() {
        let rate = rate_from_percent(Decimal::from_str("0.5").unwrap());
        // 9700 * 0.005 = 48.5
        assert_eq!(next_interest(9700, rate), 48);
        assert_eq!(next_interest(-500, rate), 0);
    }

    #[test]
    fn out_of_range_projection_earns_nothing() {
        assert_eq!(compounded_value(Decimal::from(i64::MAX), Decimal::MAX), None);
        assert_eq!(next_interest(i64::MAX, Decimal::MAX), 0);
        // Doubling i64::MAX fits a decimal but not an i64.
        assert_eq!(next_interest(i64::MAX, Decimal::from(2)), 0);
        assert_eq!(next_interest(100, Decimal::ONE), 100);
    }

    #[test]
    fn weekly_payment_includes_today() {
        // 2024-10-13 is a Sunday.
        let s = schedule(Span::Weekly, 0);
        assert_eq!(next_payment_date(&s, d(2024, 10, 13)), Some(d(2024, 10, 13)));
        assert_eq!(next_payment_date(&s, d(2024, 10, 14)), Some(d(2024, 10, 20)));
    }

    #[test]
    fn monthly_payment_skips_short_months() {
        let s = schedule(Span::Monthly, 31);
        assert_eq!(next_payment_date(&s, d(2024, 4, 2)), Some(d(2024, 5, 31)));
        assert_eq!(next_payment_date(&schedule(Span::Monthly, 0), d(2024, 4, 2)), None);
    }
}
